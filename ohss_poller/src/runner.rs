use ohss_metrics::MetricsCalculator;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Drives the calculator: once at startup, then every `interval` until
/// cancelled.
pub struct Poller {
    calculator: Arc<MetricsCalculator>,
    interval: Duration,
}

impl Poller {
    pub fn new(calculator: Arc<MetricsCalculator>, interval: Duration) -> Self {
        Self {
            calculator,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one calculation before the HTTP endpoint comes up so the first
    /// scrape already has data. A failed query is logged and startup goes on.
    pub async fn prime(&self) {
        self.poll_once().await;
    }

    /// Sleep, calculate, repeat. Returns once `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        info!("Polling every {:?}", self.interval);

        loop {
            debug!("Sleeping for {:?}...", self.interval);
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            self.poll_once().await;
        }

        info!("Poller stopped");
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }

    async fn poll_once(&self) {
        // The calculator logs and counts failures; the next cycle retries.
        let _ = self.calculator.calculate().await;
    }
}
