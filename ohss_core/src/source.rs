use crate::{error::Result, issue::Issue};
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(feature = "mock")]
use mockall::automock;

/// Anything that can return the current set of tracked tickets.
#[cfg_attr(feature = "mock", automock)]
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Run the query and return every matching issue. A failed query
    /// yields an error, never a partial list.
    async fn get_issues(&self) -> Result<Vec<Issue>>;
}

pub type DynIssueSource = Arc<dyn IssueSource>;
