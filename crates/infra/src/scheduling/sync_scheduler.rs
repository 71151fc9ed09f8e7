//! Interval scheduler for the order auto-sync
//!
//! Runs [`OrderSyncService::run`] on a fixed interval with lifecycle
//! management: explicit start/stop, a join handle for the spawned task and
//! cancellation-token support. A failed pass is logged and the loop keeps
//! going; per-order problems already land in the pass's report.

use std::sync::Arc;
use std::time::Duration;

use salgspuls_core::OrderSyncService;
use salgspuls_domain::constants::DEFAULT_SYNC_INTERVAL_SECS;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the sync scheduler
#[derive(Debug, Clone)]
pub struct SyncSchedulerConfig {
    /// Delay between sync passes
    pub interval: Duration,
}

impl Default for SyncSchedulerConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS) }
    }
}

/// Background scheduler that repeats the order auto-sync
pub struct SyncScheduler {
    service: Arc<OrderSyncService>,
    config: SyncSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl SyncScheduler {
    pub fn new(service: Arc<OrderSyncService>, config: SyncSchedulerConfig) -> Self {
        Self {
            service,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the scheduler
    ///
    /// Spawns a background task that runs the sync periodically. The first
    /// pass happens after one full interval, not immediately.
    ///
    /// # Errors
    /// Returns [`SchedulerError::AlreadyRunning`] if already started.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!(interval_secs = self.config.interval.as_secs(), "Starting sync scheduler");

        // New token each start so the scheduler can be restarted after stop
        self.cancellation_token = CancellationToken::new();

        let service = Arc::clone(&self.service);
        let interval = self.config.interval;
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::sync_loop(service, interval, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!("Sync scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully
    ///
    /// Cancels the background task and awaits completion.
    ///
    /// # Errors
    /// Returns [`SchedulerError::NotRunning`] if not started, or a timeout
    /// when the task does not wind down within five seconds.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping sync scheduler");
        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = Duration::from_secs(5);
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { seconds: join_timeout.as_secs() })?
                .map_err(|err| SchedulerError::TaskJoinFailed(err.to_string()))?;
        }

        info!("Sync scheduler stopped");
        Ok(())
    }

    /// Check if the scheduler is running
    ///
    /// A scheduler is considered running if it has an active task handle that
    /// hasn't finished.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    async fn sync_loop(service: Arc<OrderSyncService>, interval: Duration, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Sync loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    match service.run().await {
                        Ok(report) => {
                            info!(
                                synced = report.synced_orders,
                                new = report.new_orders,
                                errors = report.errors.len(),
                                "Scheduled sync pass finished"
                            );
                            for problem in &report.errors {
                                warn!(problem, "Sync pass skipped an order");
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "Scheduled sync pass failed");
                        }
                    }
                }
            }
        }
    }
}
