pub mod error;
pub mod issue;
pub mod jira;
pub mod sla;
pub mod source;

pub use error::{OhssError, Result};
pub use issue::{Issue, Priority, Status};
pub use jira::JiraClient;
pub use sla::{is_breaching, response_window};
pub use source::{DynIssueSource, IssueSource};

#[cfg(feature = "mock")]
pub use source::MockIssueSource;

// Re-export commonly used types
pub use async_trait::async_trait;
