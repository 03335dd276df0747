use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket priority as reported by the tracker, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
    /// Any priority name outside the four SLA buckets
    Other(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Other(name) => name,
        }
    }
}

impl From<&str> for Priority {
    fn from(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "urgent" => Priority::Urgent,
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            other => Priority::Other(other.to_string()),
        }
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        Priority::from(raw.as_str())
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow status, normalized to lowercase snake case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    New,
    InProgress,
    /// Pending customer, pending vendor, resolved, ...
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::New => "new",
            Status::InProgress => "in_progress",
            Status::Other(name) => name,
        }
    }

    /// Whether the ticket is waiting on the support team to respond.
    pub fn awaits_response(&self) -> bool {
        matches!(self, Status::New | Status::InProgress)
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "new" => Status::New,
            "in_progress" => Status::InProgress,
            other => Status::Other(other.to_string()),
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        Status::from(raw.as_str())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub key: String,
    pub priority: Priority,
    pub status: Status,
    pub last_updated: DateTime<Utc>,
}

impl Issue {
    pub fn new(
        priority: impl Into<Priority>,
        status: impl Into<Status>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            key: String::new(),
            priority: priority.into(),
            status: status.into(),
            last_updated,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

/// Lowercases a tracker name and collapses whitespace and dashes into `_`,
/// so "In Progress" and "in-progress" both become "in_progress".
fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parsing() {
        assert_eq!(Priority::from("Urgent"), Priority::Urgent);
        assert_eq!(Priority::from("HIGH"), Priority::High);
        assert_eq!(Priority::from(" medium "), Priority::Medium);
        assert_eq!(Priority::from("low"), Priority::Low);
        assert_eq!(
            Priority::from("Blocker"),
            Priority::Other("blocker".to_string())
        );
        assert_eq!(Priority::from("Blocker").as_str(), "blocker");
    }

    #[test]
    fn test_status_normalization() {
        assert_eq!(Status::from("New"), Status::New);
        assert_eq!(Status::from("In Progress"), Status::InProgress);
        assert_eq!(Status::from("in_progress"), Status::InProgress);
        assert_eq!(Status::from("in-progress"), Status::InProgress);
        assert_eq!(Status::from("Pending Customer").as_str(), "pending_customer");
        assert!(!Status::from("Closed").awaits_response());
        assert!(Status::InProgress.awaits_response());
    }

    #[test]
    fn test_issue_serde_uses_label_strings() {
        let issue = Issue::new("High", "In Progress", Utc::now()).with_key("OHSS-1");
        let json = serde_json::to_value(&issue).unwrap();

        assert_eq!(json["priority"], "high");
        assert_eq!(json["status"], "in_progress");

        let back: Issue = serde_json::from_value(json).unwrap();
        assert_eq!(back, issue);
    }
}
