//! NetPad Deployer Library
//!
//! Client-side orchestration for publishing NetPad form/workflow bundles to a
//! hosting provider and tracking rollout status.

pub mod app;
pub mod bundle;
pub mod deploy;
pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod settings;
pub mod utils;
