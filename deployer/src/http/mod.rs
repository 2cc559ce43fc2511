//! HTTP layer for the NetPad backend

pub mod client;
pub mod deployments;
