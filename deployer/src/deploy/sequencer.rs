//! Deployment orchestration sequencer
//!
//! Runs the three dependent calls (create, inject bundle, trigger deploy) in
//! strict order, each awaited before the next begins. The first failure
//! aborts the sequence and is surfaced to the caller; the deployment is left
//! in whatever state the last successful step produced. No rollback or
//! compensation is attempted.

use tracing::info;

use crate::bundle::validate::validate_bundle;
use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::models::bundle::Bundle;
use crate::models::deployment::DeploymentConfig;

/// Result of a completed launch sequence
#[derive(Debug, Clone)]
pub struct LaunchOutcome {
    /// Identifier assigned by the create call
    pub deployment_id: String,

    /// Message returned by the trigger call
    pub message: String,

    /// URL if the host reported one immediately (usually it appears later,
    /// via polling)
    pub deployed_url: Option<String>,
}

/// Run the launch sequence: create, inject bundle, trigger deploy.
///
/// Config and bundle are validated client-side before the first network
/// call, so structurally broken input never reaches the backend.
pub async fn launch(
    client: &HttpClient,
    config: &DeploymentConfig,
    bundle: &Bundle,
) -> Result<LaunchOutcome, DeployerError> {
    let missing = config.missing_fields();
    if !missing.is_empty() {
        return Err(DeployerError::ValidationError(missing.join("; ")));
    }

    let report = validate_bundle(bundle);
    if !report.valid {
        return Err(DeployerError::ValidationError(report.errors.join("; ")));
    }

    info!("Creating deployment for app '{}'...", config.app_name);
    let deployment = client.create_deployment(config).await?;
    let deployment_id = deployment.deployment_id;

    info!("Deployment {} created, injecting bundle...", deployment_id);
    client.inject_bundle(&deployment_id, bundle).await?;

    info!("Bundle injected, triggering deploy...");
    let trigger = client.trigger_deploy(&deployment_id).await?;
    info!("Deploy triggered: {}", trigger.message);

    Ok(LaunchOutcome {
        deployment_id,
        message: trigger.message,
        deployed_url: trigger.deployment.and_then(|d| d.deployed_url),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bundle::Manifest;

    fn config() -> DeploymentConfig {
        DeploymentConfig {
            project_id: "p_1".to_string(),
            organization_id: "org_1".to_string(),
            target: "vercel".to_string(),
            app_name: "intake-app".to_string(),
            environment: "production".to_string(),
            database: "provision".to_string(),
            environment_variables: Default::default(),
        }
    }

    fn bundle() -> Bundle {
        Bundle {
            manifest: Some(Manifest {
                name: Some("intake-suite".to_string()),
                version: Some("1.0.0".to_string()),
            }),
            forms: vec![],
            workflows: vec![],
        }
    }

    #[test]
    fn test_missing_config_fields_fail_before_any_request() {
        // Base URL points nowhere; a network attempt would error differently
        let client = HttpClient::new("http://127.0.0.1:1").unwrap();
        let mut broken = config();
        broken.app_name = String::new();

        let err = tokio_test::block_on(launch(&client, &broken, &bundle())).unwrap_err();
        match err {
            DeployerError::ValidationError(message) => {
                assert!(message.contains("appName"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_bundle_fails_before_any_request() {
        let client = HttpClient::new("http://127.0.0.1:1").unwrap();
        let broken = Bundle {
            manifest: None,
            forms: vec![],
            workflows: vec![],
        };

        let err = tokio_test::block_on(launch(&client, &config(), &broken)).unwrap_err();
        match err {
            DeployerError::ValidationError(message) => {
                assert!(message.contains("manifest"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
