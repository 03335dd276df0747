use crate::aggregator::{IssueSnapshot, MetricsAggregator};
use crate::store::MetricsStore;
use chrono::Utc;
use ohss_core::{DynIssueSource, Result};
use std::sync::Arc;
use tracing::{debug, error};

/// One metrics refresh: query the source, rebuild the tables, publish.
pub struct MetricsCalculator {
    source: DynIssueSource,
    store: Arc<MetricsStore>,
}

impl MetricsCalculator {
    pub fn new(source: DynIssueSource, store: Arc<MetricsStore>) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &Arc<MetricsStore> {
        &self.store
    }

    /// On a failed query the previously published tables stay in place.
    pub async fn calculate(&self) -> Result<Arc<IssueSnapshot>> {
        debug!("Querying issue source for OHSS issues");

        let issues = match self.source.get_issues().await {
            Ok(issues) => issues,
            Err(e) => {
                error!("There was an error querying the issue source: {}", e);
                self.store.record_failure();
                return Err(e);
            }
        };

        let snapshot = MetricsAggregator::aggregate(&issues, Utc::now());
        debug!(
            "Aggregated {} issues, {} breaching SLA",
            snapshot.total_issues(),
            snapshot.total_breaching()
        );

        self.store.publish(snapshot)?;
        debug!("Gauges updated");

        Ok(self.store.snapshot())
    }
}
