//! Observed deployment progression
//!
//! The hosting backend owns all state transitions; the client only watches
//! them through status polling. This tracker enforces the observable
//! contract: forward-only advancement (a tick may skip an intermediate
//! state, never revisit an earlier one), terminal states accept nothing
//! further, `active` requires a URL and `failed` requires an error.

use serde::{Deserialize, Serialize};

use crate::models::deployment::{DeploymentStatus, StatusResponse};

/// Tracks one deployment's observed status progression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentProgress {
    status: DeploymentStatus,
    status_message: Option<String>,
    deployed_url: Option<String>,
    error: Option<String>,
}

impl DeploymentProgress {
    /// Create a new tracker in the draft state
    pub fn new() -> Self {
        Self {
            status: DeploymentStatus::Draft,
            status_message: None,
            deployed_url: None,
            error: None,
        }
    }

    /// Get current status
    pub fn status(&self) -> DeploymentStatus {
        self.status
    }

    /// Get the latest sub-step description
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Get the deployed URL, present once active
    pub fn deployed_url(&self) -> Option<&str> {
        self.deployed_url.as_deref()
    }

    /// Get the failure message, present once failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether no further observations are expected
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Apply one polled status update
    pub fn observe(&mut self, update: &StatusResponse) -> Result<(), String> {
        if self.status.is_terminal() {
            return Err(format!(
                "deployment already terminal ({}), ignoring update to {}",
                self.status, update.status
            ));
        }

        match update.status {
            DeploymentStatus::Active => {
                if update.deployed_url.as_deref().map_or(true, str::is_empty) {
                    return Err("active status without a deployed URL".to_string());
                }
            }
            DeploymentStatus::Failed => {
                if update.error.as_deref().map_or(true, str::is_empty) {
                    return Err("failed status without an error message".to_string());
                }
            }
            _ => {
                if update.status.rank() < self.status.rank() {
                    return Err(format!(
                        "backward transition observed: {} -> {}",
                        self.status, update.status
                    ));
                }
            }
        }

        self.status = update.status;
        if update.status_message.is_some() {
            self.status_message = update.status_message.clone();
        }
        if update.deployed_url.is_some() {
            self.deployed_url = update.deployed_url.clone();
        }
        if update.error.is_some() {
            self.error = update.error.clone();
        }
        Ok(())
    }
}

impl Default for DeploymentProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(status: DeploymentStatus) -> StatusResponse {
        StatusResponse {
            status,
            status_message: None,
            deployed_url: None,
            host_status: None,
            error: None,
        }
    }

    #[test]
    fn test_full_progression() {
        let mut progress = DeploymentProgress::new();
        assert_eq!(progress.status(), DeploymentStatus::Draft);

        progress.observe(&update(DeploymentStatus::Configuring)).unwrap();
        progress.observe(&update(DeploymentStatus::Provisioning)).unwrap();
        progress.observe(&update(DeploymentStatus::Deploying)).unwrap();

        let mut active = update(DeploymentStatus::Active);
        active.deployed_url = Some("https://intake.example.com".to_string());
        progress.observe(&active).unwrap();

        assert!(progress.is_terminal());
        assert_eq!(progress.deployed_url(), Some("https://intake.example.com"));
    }

    #[test]
    fn test_skipped_state_is_allowed() {
        // A poll tick can miss an intermediate state
        let mut progress = DeploymentProgress::new();
        progress.observe(&update(DeploymentStatus::Provisioning)).unwrap();
        assert_eq!(progress.status(), DeploymentStatus::Provisioning);
    }

    #[test]
    fn test_repeated_state_is_allowed() {
        let mut progress = DeploymentProgress::new();
        progress.observe(&update(DeploymentStatus::Deploying)).unwrap();

        let mut repeat = update(DeploymentStatus::Deploying);
        repeat.status_message = Some("Still building".to_string());
        progress.observe(&repeat).unwrap();

        assert_eq!(progress.status_message(), Some("Still building"));
    }

    #[test]
    fn test_backward_transition_rejected() {
        let mut progress = DeploymentProgress::new();
        progress.observe(&update(DeploymentStatus::Deploying)).unwrap();

        let result = progress.observe(&update(DeploymentStatus::Configuring));
        assert!(result.is_err());
        assert_eq!(progress.status(), DeploymentStatus::Deploying);
    }

    #[test]
    fn test_failed_reachable_from_any_in_progress_state() {
        for initial in [
            DeploymentStatus::Configuring,
            DeploymentStatus::Provisioning,
            DeploymentStatus::Deploying,
        ] {
            let mut progress = DeploymentProgress::new();
            progress.observe(&update(initial)).unwrap();

            let mut failed = update(DeploymentStatus::Failed);
            failed.error = Some("build exploded".to_string());
            progress.observe(&failed).unwrap();

            assert!(progress.is_terminal());
            assert_eq!(progress.error(), Some("build exploded"));
        }
    }

    #[test]
    fn test_active_requires_url() {
        let mut progress = DeploymentProgress::new();
        progress.observe(&update(DeploymentStatus::Deploying)).unwrap();

        let result = progress.observe(&update(DeploymentStatus::Active));
        assert!(result.is_err());
        assert!(!progress.is_terminal());
    }

    #[test]
    fn test_failed_requires_error() {
        let mut progress = DeploymentProgress::new();
        let result = progress.observe(&update(DeploymentStatus::Failed));
        assert!(result.is_err());
        assert_eq!(progress.status(), DeploymentStatus::Draft);
    }

    #[test]
    fn test_terminal_rejects_further_updates() {
        let mut progress = DeploymentProgress::new();
        let mut paused = update(DeploymentStatus::Paused);
        paused.status_message = Some("Suspended by billing".to_string());
        progress.observe(&paused).unwrap();

        let result = progress.observe(&update(DeploymentStatus::Deploying));
        assert!(result.is_err());
        assert_eq!(progress.status(), DeploymentStatus::Paused);
    }
}
