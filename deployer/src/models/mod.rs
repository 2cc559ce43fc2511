//! Data models

pub mod bundle;
pub mod deployment;
