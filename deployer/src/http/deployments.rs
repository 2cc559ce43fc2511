//! Deployment API client

use serde::{Deserialize, Serialize};

use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::models::bundle::Bundle;
use crate::models::deployment::{Deployment, DeploymentConfig, StatusResponse};

/// Create deployment response
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeploymentResponse {
    pub deployment: Deployment,
}

/// List of deployments response
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentListResponse {
    pub deployments: Vec<Deployment>,
}

/// Trigger deploy response
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerDeployResponse {
    pub message: String,

    #[serde(default)]
    pub deployment: Option<TriggeredDeployment>,
}

/// Deployment fields echoed by the trigger call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredDeployment {
    #[serde(default)]
    pub deployed_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct InjectBundleRequest<'a> {
    bundle: &'a Bundle,
}

impl HttpClient {
    /// Create a new deployment; the returned id identifies all follow-up calls
    pub async fn create_deployment(
        &self,
        config: &DeploymentConfig,
    ) -> Result<Deployment, DeployerError> {
        let response: CreateDeploymentResponse = self.post("/deployments", config).await?;
        Ok(response.deployment)
    }

    /// Embed a bundle into the deployment's template
    pub async fn inject_bundle(
        &self,
        deployment_id: &str,
        bundle: &Bundle,
    ) -> Result<(), DeployerError> {
        let path = format!("/deployments/{}/inject-bundle", deployment_id);
        let _: serde_json::Value = self.post(&path, &InjectBundleRequest { bundle }).await?;
        Ok(())
    }

    /// Ask the host to start the rollout
    pub async fn trigger_deploy(
        &self,
        deployment_id: &str,
    ) -> Result<TriggerDeployResponse, DeployerError> {
        let path = format!("/deployments/{}/deploy", deployment_id);
        self.post_empty(&path).await
    }

    /// Fetch current deployment status
    pub async fn get_deployment_status(
        &self,
        deployment_id: &str,
    ) -> Result<StatusResponse, DeployerError> {
        let path = format!("/deployments/{}/status", deployment_id);
        self.get(&path).await
    }

    /// Delete a deployment
    pub async fn delete_deployment(&self, deployment_id: &str) -> Result<(), DeployerError> {
        let path = format!("/deployments/{}", deployment_id);
        let _: serde_json::Value = self.delete(&path).await?;
        Ok(())
    }

    /// List deployments for a project
    pub async fn list_deployments(
        &self,
        project_id: &str,
        page_size: usize,
    ) -> Result<Vec<Deployment>, DeployerError> {
        let path = format!("/deployments?projectId={}&pageSize={}", project_id, page_size);
        let response: DeploymentListResponse = self.get(&path).await?;
        Ok(response.deployments)
    }
}
