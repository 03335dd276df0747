use crate::{
    error::{OhssError, Result},
    issue::Issue,
    source::IssueSource,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable holding the personal access token.
pub const TOKEN_ENV_VAR: &str = "JIRA_API_TOKEN";

/// The OHSS board filter.
pub const DEFAULT_JQL: &str = "filter = 12346875";

pub const DEFAULT_MAX_RESULTS: u32 = 1000;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SEARCH_PATH: &str = "/rest/api/2/search";
const SEARCH_FIELDS: &str = "priority,status,updated";
const JIRA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Jira REST client authenticated with a bearer (PAT) token.
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    jql: String,
    max_results: u32,
    timeout: Duration,
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url)
            .field("jql", &self.jql)
            .field("max_results", &self.max_results)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(OhssError::InvalidConfig(
                "Jira base URL cannot be empty".to_string(),
            ));
        }

        let token = token.into();
        if token.trim().is_empty() {
            return Err(OhssError::MissingToken(TOKEN_ENV_VAR));
        }

        Ok(Self {
            http: build_http_client(DEFAULT_TIMEOUT)?,
            base_url,
            token,
            jql: DEFAULT_JQL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Build a client whose token comes from `JIRA_API_TOKEN`.
    pub fn from_env(base_url: impl Into<String>) -> Result<Self> {
        let token = std::env::var(TOKEN_ENV_VAR).unwrap_or_default();
        Self::new(base_url, token)
    }

    pub fn with_jql(mut self, jql: impl Into<String>) -> Self {
        self.jql = jql.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = build_http_client(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn jql(&self) -> &str {
        &self.jql
    }

    async fn search(&self) -> Result<SearchResponse> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let max_results = self.max_results.to_string();

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[
                ("jql", self.jql.as_str()),
                ("maxResults", max_results.as_str()),
                ("fields", SEARCH_FIELDS),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<SearchResponse>().await?)
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn get_issues(&self) -> Result<Vec<Issue>> {
        debug!("Searching Jira: {}", self.jql);
        let response = self.search().await?;

        let returned = response.issues.len();
        if let Some(total) = response.total {
            if total > returned as u64 {
                warn!(
                    "Jira reported {} matching issues but returned {}; raise max_results",
                    total, returned
                );
            }
        }

        response
            .issues
            .into_iter()
            .map(RawIssue::into_issue)
            .collect()
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(raw, JIRA_TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| OhssError::InvalidResponse(format!("bad timestamp '{}': {}", raw, e)))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    #[serde(default)]
    key: String,
    fields: RawFields,
}

#[derive(Debug, Deserialize)]
struct RawFields {
    #[serde(default)]
    priority: Option<NamedField>,
    #[serde(default)]
    status: Option<NamedField>,
    updated: String,
}

#[derive(Debug, Deserialize)]
struct NamedField {
    name: String,
}

impl RawIssue {
    fn into_issue(self) -> Result<Issue> {
        let last_updated = parse_timestamp(&self.fields.updated)?;
        let priority = name_or_unknown(self.fields.priority);
        let status = name_or_unknown(self.fields.status);

        Ok(Issue::new(priority.as_str(), status.as_str(), last_updated).with_key(self.key))
    }
}

fn name_or_unknown(field: Option<NamedField>) -> String {
    field
        .map(|f| f.name)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
