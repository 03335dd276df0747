pub mod aggregator;
pub mod calculator;
pub mod collector;
pub mod exporters;
pub mod store;

pub use aggregator::{IssueSnapshot, MetricsAggregator};
pub use calculator::MetricsCalculator;
pub use collector::IssueCollector;
pub use exporters::PrometheusExporter;
pub use store::MetricsStore;
