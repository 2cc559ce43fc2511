//! Deployment status poller
//!
//! One poller owns one deployment id. It ticks at a fixed interval, feeds
//! each response into a [`DeploymentProgress`] tracker, and stops on the
//! first terminal state. Transient tick failures are logged and ignored;
//! losing the deployment server-side (404) is a hard stop. Cancellation is
//! idempotent and also aborts a tick that is still in flight.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::deploy::progress::DeploymentProgress;
use crate::errors::DeployerError;
use crate::http::client::HttpClient;

/// Status poller options
#[derive(Debug, Clone)]
pub struct Options {
    /// Fixed polling interval
    pub interval: Duration,

    /// Delay before the first poll
    pub initial_delay: Duration,

    /// Stop after this many consecutive failed ticks; `None` polls
    /// indefinitely
    pub max_consecutive_failures: Option<u32>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(4),
            initial_delay: Duration::ZERO,
            max_consecutive_failures: None,
        }
    }
}

/// Run the status poll loop
///
/// Returns the tracker in its final observed state: terminal if polling ran
/// to completion, in-progress if the shutdown signal fired first. Errors
/// only on a hard stop (deployment deleted, or the configured failure
/// ceiling reached).
pub async fn run<S, F>(
    options: &Options,
    client: &HttpClient,
    deployment_id: &str,
    updates_tx: &watch::Sender<DeploymentProgress>,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) -> Result<DeploymentProgress, DeployerError>
where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Status poller starting for deployment {}...", deployment_id);

    let mut progress = DeploymentProgress::new();
    let mut failure_streak: u32 = 0;

    sleep_fn(options.initial_delay).await;

    loop {
        // Wait for the next tick
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Status poller for {} cancelled", deployment_id);
                return Ok(progress);
            }
            _ = sleep_fn(options.interval) => {}
        }

        debug!("Polling status of deployment {}...", deployment_id);

        // A cancel while the request is in flight aborts it; the observed
        // state never changes after cancellation.
        let result = tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Status poller for {} cancelled mid-tick", deployment_id);
                return Ok(progress);
            }
            result = client.get_deployment_status(deployment_id) => result,
        };

        match result {
            Ok(update) => {
                failure_streak = 0;
                match progress.observe(&update) {
                    Ok(()) => {
                        let _ = updates_tx.send(progress.clone());
                        if progress.is_terminal() {
                            info!(
                                "Deployment {} reached terminal state: {}",
                                deployment_id,
                                progress.status()
                            );
                            return Ok(progress);
                        }
                    }
                    Err(e) => {
                        warn!("Ignoring inconsistent status update: {}", e);
                    }
                }
            }
            Err(e) if e.is_transient_for_polling() => {
                failure_streak += 1;
                warn!(
                    "Status poll for {} failed ({} consecutive): {}",
                    deployment_id, failure_streak, e
                );
                if let Some(max) = options.max_consecutive_failures {
                    if failure_streak >= max {
                        error!(
                            "Giving up on deployment {} after {} consecutive poll failures",
                            deployment_id, failure_streak
                        );
                        return Err(e);
                    }
                }
            }
            Err(e) => {
                error!("Deployment {} is gone, stopping poller: {}", deployment_id, e);
                return Err(e);
            }
        }
    }
}

/// Handle to a spawned poller
///
/// Owns cancellation for the poll task. Dropping the handle without calling
/// [`PollHandle::join`] detaches the task; call [`PollHandle::cancel`] first
/// when tearing down the owning scope.
pub struct PollHandle {
    shutdown_tx: broadcast::Sender<()>,
    updates_rx: watch::Receiver<DeploymentProgress>,
    task: JoinHandle<Result<DeploymentProgress, DeployerError>>,
}

impl PollHandle {
    /// Cancel the poller. Safe to call any number of times, including after
    /// the poller has already stopped.
    pub fn cancel(&self) {
        // Send fails once the task has exited; that is the no-op case
        let _ = self.shutdown_tx.send(());
    }

    /// Subscribe to progress updates
    pub fn updates(&self) -> watch::Receiver<DeploymentProgress> {
        self.updates_rx.clone()
    }

    /// Get a cancellation grip that outlives consuming calls like
    /// [`PollHandle::join`]
    pub fn canceller(&self) -> PollCanceller {
        PollCanceller {
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }

    /// Wait for the poll task to finish and return the final progress
    pub async fn join(self) -> Result<DeploymentProgress, DeployerError> {
        self.task
            .await
            .map_err(|e| DeployerError::ShutdownError(e.to_string()))?
    }
}

/// Detached cancellation grip for a [`PollHandle`]
#[derive(Clone)]
pub struct PollCanceller {
    shutdown_tx: broadcast::Sender<()>,
}

impl PollCanceller {
    /// Cancel the poller. Idempotent, like [`PollHandle::cancel`].
    pub fn cancel(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Spawn a poller for one deployment and return its handle
pub fn start(options: Options, client: Arc<HttpClient>, deployment_id: String) -> PollHandle {
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
    let (updates_tx, updates_rx) = watch::channel(DeploymentProgress::new());

    let task = tokio::spawn(async move {
        run(
            &options,
            client.as_ref(),
            &deployment_id,
            &updates_tx,
            tokio::time::sleep,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await
    });

    PollHandle {
        shutdown_tx,
        updates_rx,
        task,
    }
}
