//! Deployment models

use chrono::{DateTime, Utc};
use colored::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Deployment status as reported by the hosting backend
///
/// The client never writes transitions; it only observes them through
/// status polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    /// Created, no bundle injected yet
    Draft,

    /// Bundle being embedded into the target template
    Configuring,

    /// Backing resources (database, project) being provisioned
    Provisioning,

    /// Host build and rollout in progress
    Deploying,

    /// Live; `deployed_url` is available
    Active,

    /// Rollout failed; `error` carries the provider message
    Failed,

    /// Suspended externally
    Paused,
}

impl DeploymentStatus {
    /// Terminal statuses end polling: no further transitions are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentStatus::Active | DeploymentStatus::Failed | DeploymentStatus::Paused
        )
    }

    /// Position in the forward progression. Terminal failure modes sit past
    /// every in-progress state so observed advancement stays monotonic.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            DeploymentStatus::Draft => 0,
            DeploymentStatus::Configuring => 1,
            DeploymentStatus::Provisioning => 2,
            DeploymentStatus::Deploying => 3,
            DeploymentStatus::Active => 4,
            DeploymentStatus::Failed => 5,
            DeploymentStatus::Paused => 5,
        }
    }

    /// Human label for terminal output
    pub fn label(&self) -> &'static str {
        match self {
            DeploymentStatus::Draft => "Draft",
            DeploymentStatus::Configuring => "Configuring",
            DeploymentStatus::Provisioning => "Provisioning",
            DeploymentStatus::Deploying => "Deploying",
            DeploymentStatus::Active => "Active",
            DeploymentStatus::Failed => "Failed",
            DeploymentStatus::Paused => "Paused",
        }
    }

    /// Display color, presentation only
    pub fn color(&self) -> Color {
        match self {
            DeploymentStatus::Draft => Color::White,
            DeploymentStatus::Configuring => Color::Cyan,
            DeploymentStatus::Provisioning => Color::Blue,
            DeploymentStatus::Deploying => Color::Yellow,
            DeploymentStatus::Active => Color::Green,
            DeploymentStatus::Failed => Color::Red,
            DeploymentStatus::Paused => Color::Magenta,
        }
    }
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One attempt to publish a project to the hosting provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// Opaque identifier assigned by the create call
    pub deployment_id: String,

    /// Current status
    pub status: DeploymentStatus,

    /// Free-text description of the current sub-step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,

    /// Present once the deployment is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_url: Option<String>,

    /// Present when the deployment failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Target app name on the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Configuration for the create call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    /// Project being published
    pub project_id: String,

    /// Owning organization
    pub organization_id: String,

    /// Hosting target, e.g. "vercel"
    pub target: String,

    /// App name to claim on the host
    pub app_name: String,

    /// Environment, e.g. "production"
    pub environment: String,

    /// Database provisioning mode: "provision" or "existing"
    pub database: String,

    /// Extra environment variables injected into the hosted instance
    #[serde(default)]
    pub environment_variables: HashMap<String, String>,
}

impl DeploymentConfig {
    /// Check required fields before the first network call.
    ///
    /// Mirrors the server's 400 contract so obviously broken configs never
    /// leave the client. Accumulates one message per missing field.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.app_name.trim().is_empty() {
            missing.push("appName is required".to_string());
        }
        if self.organization_id.trim().is_empty() {
            missing.push("organizationId is required".to_string());
        }
        if self.database.trim().is_empty() {
            missing.push("database provisioning mode is required".to_string());
        }
        missing
    }
}

/// One status poll response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: DeploymentStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_url: Option<String>,

    /// Raw status string from the hosting provider, informational only
    #[serde(
        default,
        rename = "vercelStatus",
        skip_serializing_if = "Option::is_none"
    )]
    pub host_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
