use crate::collector::IssueCollector;
use crate::store::MetricsStore;
use anyhow::Context;
use ohss_core::Result;
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::Arc;

/// Content type of the text exposition format.
pub use prometheus::TEXT_FORMAT as CONTENT_TYPE;

/// Renders the store (plus process metrics on Linux) in the Prometheus text
/// exposition format.
pub struct PrometheusExporter {
    registry: Registry,
}

impl PrometheusExporter {
    pub fn new(store: Arc<MetricsStore>) -> Result<Self> {
        let registry = Registry::new();

        registry
            .register(Box::new(store.poll_failures_counter().clone()))
            .context("registering poll failure counter")?;
        registry
            .register(Box::new(store.last_success_gauge().clone()))
            .context("registering last success gauge")?;
        registry
            .register(Box::new(IssueCollector::new(store)))
            .context("registering issue collector")?;

        #[cfg(target_os = "linux")]
        registry
            .register(Box::new(
                prometheus::process_collector::ProcessCollector::for_self(),
            ))
            .context("registering process collector")?;

        Ok(Self { registry })
    }

    pub fn gather(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("encoding metrics")?;
        Ok(String::from_utf8(buffer).context("metrics output is not UTF-8")?)
    }
}
