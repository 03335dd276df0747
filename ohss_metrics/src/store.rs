use crate::aggregator::IssueSnapshot;
use anyhow::Context;
use arc_swap::ArcSwap;
use chrono::{DateTime, TimeZone, Utc};
use ohss_core::Result;
use prometheus::{IntCounter, IntGauge, IntGaugeVec, Opts};
use std::sync::Arc;

pub const ISSUES_METRIC: &str = "ohss_issues";
pub const BREACHING_METRIC: &str = "ohss_issues_breaching_sla";
pub const POLL_FAILURES_METRIC: &str = "ohss_poll_failures_total";
pub const LAST_SUCCESS_METRIC: &str = "ohss_last_successful_poll_timestamp_seconds";

/// Gauge vectors filled from one snapshot. Never mutated after publishing.
pub(crate) struct IssueGauges {
    pub(crate) snapshot: Arc<IssueSnapshot>,
    pub(crate) issues: IntGaugeVec,
    pub(crate) breaching: IntGaugeVec,
}

impl IssueGauges {
    fn empty() -> prometheus::Result<Self> {
        Ok(Self {
            snapshot: Arc::new(IssueSnapshot::default()),
            issues: IntGaugeVec::new(issues_opts(), &["priority", "status"])?,
            breaching: IntGaugeVec::new(breaching_opts(), &["priority"])?,
        })
    }

    fn from_snapshot(snapshot: IssueSnapshot) -> prometheus::Result<Self> {
        let gauges = Self::empty()?;

        for (priority, status, count) in snapshot.issue_counts() {
            gauges
                .issues
                .get_metric_with_label_values(&[priority, status])?
                .set(count as i64);
        }

        for (priority, count) in snapshot.breach_counts() {
            gauges
                .breaching
                .get_metric_with_label_values(&[priority])?
                .set(count as i64);
        }

        Ok(Self {
            snapshot: Arc::new(snapshot),
            ..gauges
        })
    }
}

fn issues_opts() -> Opts {
    Opts::new(
        ISSUES_METRIC,
        "The total number of OHSS issues on the board, including recently resolved",
    )
}

fn breaching_opts() -> Opts {
    Opts::new(
        BREACHING_METRIC,
        "The total number of OHSS issues breaching SLA, labeled by priority",
    )
}

/// Owns the published issue metrics.
///
/// The poller builds a complete set of gauges off to the side and swaps it
/// in with one pointer store, so a scrape sees either the previous tables or
/// the new ones and never a half-rebuilt or zeroed table.
pub struct MetricsStore {
    current: ArcSwap<IssueGauges>,
    // Only used for descriptors; `current` is what gets collected.
    template: IssueGauges,
    poll_failures: IntCounter,
    last_success: IntGauge,
}

impl MetricsStore {
    pub fn new() -> Result<Self> {
        let current = IssueGauges::empty().context("creating issue gauges")?;
        let template = IssueGauges::empty().context("creating issue gauges")?;
        let poll_failures = IntCounter::new(
            POLL_FAILURES_METRIC,
            "Number of issue queries that failed since startup",
        )
        .context("creating poll failure counter")?;
        let last_success = IntGauge::new(
            LAST_SUCCESS_METRIC,
            "Unix time of the last successful issue query",
        )
        .context("creating last success gauge")?;

        Ok(Self {
            current: ArcSwap::from_pointee(current),
            template,
            poll_failures,
            last_success,
        })
    }

    /// Replace the published tables with `snapshot`.
    pub fn publish(&self, snapshot: IssueSnapshot) -> Result<()> {
        let gauges = IssueGauges::from_snapshot(snapshot).context("filling issue gauges")?;
        self.current.store(Arc::new(gauges));
        self.last_success.set(Utc::now().timestamp());
        Ok(())
    }

    pub fn snapshot(&self) -> Arc<IssueSnapshot> {
        self.current.load().snapshot.clone()
    }

    pub fn record_failure(&self) {
        self.poll_failures.inc();
    }

    pub fn poll_failures(&self) -> u64 {
        self.poll_failures.get()
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        match self.last_success.get() {
            0 => None,
            secs => Utc.timestamp_opt(secs, 0).single(),
        }
    }

    pub(crate) fn current(&self) -> arc_swap::Guard<Arc<IssueGauges>> {
        self.current.load()
    }

    pub(crate) fn template(&self) -> &IssueGauges {
        &self.template
    }

    pub(crate) fn poll_failures_counter(&self) -> &IntCounter {
        &self.poll_failures
    }

    pub(crate) fn last_success_gauge(&self) -> &IntGauge {
        &self.last_success
    }
}
