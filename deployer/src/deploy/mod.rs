//! Deployment orchestration and status tracking

pub mod poller;
pub mod progress;
pub mod sequencer;
