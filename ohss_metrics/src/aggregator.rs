use chrono::{DateTime, Utc};
use ohss_core::{is_breaching, Issue};
use std::collections::BTreeMap;

/// Counter tables built from one complete issue listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueSnapshot {
    issue_counts: BTreeMap<(String, String), u64>,
    breach_counts: BTreeMap<String, u64>,
}

impl IssueSnapshot {
    pub fn issue_count(&self, priority: &str, status: &str) -> u64 {
        self.issue_counts
            .get(&(priority.to_string(), status.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn breach_count(&self, priority: &str) -> u64 {
        self.breach_counts.get(priority).copied().unwrap_or(0)
    }

    /// `(priority, status)` buckets in label order.
    pub fn issue_counts(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.issue_counts
            .iter()
            .map(|((priority, status), count)| (priority.as_str(), status.as_str(), *count))
    }

    pub fn breach_counts(&self) -> impl Iterator<Item = (&str, u64)> {
        self.breach_counts
            .iter()
            .map(|(priority, count)| (priority.as_str(), *count))
    }

    pub fn total_issues(&self) -> u64 {
        self.issue_counts.values().sum()
    }

    pub fn total_breaching(&self) -> u64 {
        self.breach_counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.issue_counts.is_empty() && self.breach_counts.is_empty()
    }
}

pub struct MetricsAggregator;

impl MetricsAggregator {
    /// Count issues per bucket and SLA breaches per priority as of `now`.
    /// Every call starts from empty tables.
    pub fn aggregate(issues: &[Issue], now: DateTime<Utc>) -> IssueSnapshot {
        let mut snapshot = IssueSnapshot::default();

        for issue in issues {
            let priority = issue.priority.as_str().to_string();

            *snapshot
                .issue_counts
                .entry((priority.clone(), issue.status.as_str().to_string()))
                .or_insert(0) += 1;

            if is_breaching(issue, now) {
                *snapshot.breach_counts.entry(priority).or_insert(0) += 1;
            }
        }

        snapshot
    }
}
