//! Bundle handling

pub mod validate;
