//! StockSyncWorker — periodic safety-net reconciliation
//!
//! Transition-triggered passes already keep the projection close to the
//! ledger; this worker catches whatever slipped through (failed passes,
//! manual database edits) by re-running the full pass on an interval.

use std::sync::Arc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use super::service::StockService;

pub struct StockSyncWorker {
    service: Arc<StockService>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl StockSyncWorker {
    pub fn new(service: Arc<StockService>, interval_secs: u64, shutdown: CancellationToken) -> Self {
        Self {
            service,
            interval_secs,
            shutdown,
        }
    }

    /// Run until shutdown; one reconciliation pass per interval tick
    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval_secs, "StockSyncWorker started");

        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        interval.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("StockSyncWorker shutting down");
                    break;
                }

                _ = interval.tick() => {
                    let report = self.service.resync().await;
                    if report.success {
                        tracing::debug!(
                            updated = report.updated,
                            released = report.released,
                            "Periodic stock resync complete"
                        );
                    } else {
                        tracing::error!(
                            errors = report.errors.len(),
                            error = report.error.as_deref().unwrap_or(""),
                            "Periodic stock resync failed"
                        );
                    }
                }
            }
        }

        tracing::info!("StockSyncWorker stopped");
    }
}
