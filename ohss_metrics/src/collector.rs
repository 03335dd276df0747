use crate::store::MetricsStore;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use std::sync::Arc;

/// Prometheus collector over whatever the store has currently published.
pub struct IssueCollector {
    store: Arc<MetricsStore>,
}

impl IssueCollector {
    pub fn new(store: Arc<MetricsStore>) -> Self {
        Self { store }
    }
}

impl Collector for IssueCollector {
    fn desc(&self) -> Vec<&Desc> {
        let template = self.store.template();
        let mut descs = template.issues.desc();
        descs.extend(template.breaching.desc());
        descs
    }

    fn collect(&self) -> Vec<MetricFamily> {
        // One load, so both families come from the same snapshot.
        let current = self.store.current();
        let mut families = current.issues.collect();
        families.extend(current.breaching.collect());
        families
    }
}
