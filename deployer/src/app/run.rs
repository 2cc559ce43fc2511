//! Command implementations for the deployer CLI

use std::future::Future;
use std::sync::Arc;

use colored::Colorize;
use tracing::info;

use crate::app::options::AppOptions;
use crate::deploy::poller;
use crate::deploy::progress::DeploymentProgress;
use crate::deploy::sequencer;
use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::models::bundle::Bundle;
use crate::models::deployment::{Deployment, DeploymentConfig, StatusResponse};

fn make_client(options: &AppOptions) -> Result<HttpClient, DeployerError> {
    match &options.api_token {
        Some(token) => HttpClient::with_token(&options.backend_base_url, token.clone()),
        None => HttpClient::new(&options.backend_base_url),
    }
}

fn print_progress(progress: &DeploymentProgress) {
    let status = progress.status();
    let label = status.label().color(status.color()).bold();

    if let Some(error) = progress.error() {
        println!("  {} {}", label, error);
    } else if let Some(url) = progress.deployed_url() {
        println!("  {} {}", label, url);
    } else if let Some(message) = progress.status_message() {
        println!("  {} {}", label, message);
    } else {
        println!("  {}", label);
    }
}

/// Poll one deployment until it terminates or the shutdown signal fires,
/// printing each observed change
async fn watch_until_terminal(
    poller_options: poller::Options,
    client: Arc<HttpClient>,
    deployment_id: String,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<DeploymentProgress, DeployerError> {
    let handle = poller::start(poller_options, client, deployment_id);
    let canceller = handle.canceller();
    let mut updates = handle.updates();

    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let progress = updates.borrow_and_update().clone();
            print_progress(&progress);
        }
    });

    let join = handle.join();
    tokio::pin!(join);
    tokio::pin!(shutdown_signal);

    let result = tokio::select! {
        _ = &mut shutdown_signal => {
            info!("Teardown requested, cancelling status poller...");
            canceller.cancel();
            join.await
        }
        result = &mut join => result,
    };

    // Printer exits once the poll task drops its update sender
    let _ = printer.await;
    result
}

/// Run the full launch sequence and watch the rollout to a terminal state
pub async fn deploy(
    options: &AppOptions,
    config: &DeploymentConfig,
    bundle: &Bundle,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<DeploymentProgress, DeployerError> {
    let client = Arc::new(make_client(options)?);

    let outcome = sequencer::launch(client.as_ref(), config, bundle).await?;
    println!(
        "Deployment {} started: {}",
        outcome.deployment_id.bold(),
        outcome.message
    );

    watch_until_terminal(
        options.poller.clone(),
        client,
        outcome.deployment_id,
        shutdown_signal,
    )
    .await
}

/// Attach to an existing non-terminal deployment and watch it
pub async fn watch(
    options: &AppOptions,
    deployment_id: &str,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<DeploymentProgress, DeployerError> {
    let client = Arc::new(make_client(options)?);
    watch_until_terminal(
        options.poller.clone(),
        client,
        deployment_id.to_string(),
        shutdown_signal,
    )
    .await
}

/// Fetch status once, without polling
pub async fn status(
    options: &AppOptions,
    deployment_id: &str,
) -> Result<StatusResponse, DeployerError> {
    let client = make_client(options)?;
    let response = client.get_deployment_status(deployment_id).await?;

    let label = response.status.label().color(response.status.color()).bold();
    match (&response.error, &response.deployed_url, &response.status_message) {
        (Some(error), _, _) => println!("{} {}", label, error),
        (_, Some(url), _) => println!("{} {}", label, url),
        (_, _, Some(message)) => println!("{} {}", label, message),
        _ => println!("{}", label),
    }

    Ok(response)
}

/// List a project's deployments
pub async fn list(
    options: &AppOptions,
    project_id: &str,
) -> Result<Vec<Deployment>, DeployerError> {
    let client = make_client(options)?;
    let deployments = client
        .list_deployments(project_id, options.list_page_size)
        .await?;

    for deployment in &deployments {
        let label = deployment
            .status
            .label()
            .color(deployment.status.color());
        println!(
            "{}  {}  {}",
            deployment.deployment_id,
            label,
            deployment.app_name.as_deref().unwrap_or("-")
        );
    }

    Ok(deployments)
}

/// Delete a deployment
pub async fn delete(options: &AppOptions, deployment_id: &str) -> Result<(), DeployerError> {
    let client = make_client(options)?;
    client.delete_deployment(deployment_id).await?;
    println!("Deployment {} deleted", deployment_id);
    Ok(())
}
