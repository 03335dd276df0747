use ohss_core::jira::{DEFAULT_JQL, DEFAULT_MAX_RESULTS, DEFAULT_TIMEOUT};
use ohss_core::{JiraClient, OhssError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://issues.redhat.com";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_jql")]
    pub jql: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(with = "humantime_serde", default = "default_poll_interval")]
    pub poll_interval: Duration,
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub request_timeout: Duration,
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_jql() -> String {
    DEFAULT_JQL.to_string()
}

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_request_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            jql: default_jql(),
            max_results: default_max_results(),
            poll_interval: default_poll_interval(),
            request_timeout: default_request_timeout(),
            listen: default_listen(),
        }
    }
}

impl ExporterConfig {
    pub fn builder() -> ExporterConfigBuilder {
        ExporterConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(invalid("Jira base URL cannot be empty"));
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(invalid(format!(
                "Jira base URL '{}' must start with http:// or https://",
                base_url
            )));
        }

        if self.jql.trim().is_empty() {
            return Err(invalid("JQL query cannot be empty"));
        }

        if self.max_results == 0 {
            return Err(invalid("max_results must be > 0"));
        }

        if self.poll_interval.is_zero() {
            return Err(invalid("poll_interval must be > 0"));
        }

        if self.request_timeout.is_zero() {
            return Err(invalid("request_timeout must be > 0"));
        }

        Ok(())
    }

    /// Jira client for this configuration, authenticated from the
    /// environment. Fails if the token is missing.
    pub fn jira_client(&self) -> Result<JiraClient> {
        JiraClient::from_env(self.base_url.as_str())?
            .with_jql(self.jql.as_str())
            .with_max_results(self.max_results)
            .with_timeout(self.request_timeout)
    }
}

fn invalid(message: impl Into<String>) -> OhssError {
    OhssError::InvalidConfig(message.into())
}

#[derive(Default)]
pub struct ExporterConfigBuilder {
    base_url: Option<String>,
    jql: Option<String>,
    max_results: Option<u32>,
    poll_interval: Option<Duration>,
    request_timeout: Option<Duration>,
    listen: Option<SocketAddr>,
}

impl ExporterConfigBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn jql(mut self, jql: impl Into<String>) -> Self {
        self.jql = Some(jql.into());
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = Some(poll_interval);
        self
    }

    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = Some(request_timeout);
        self
    }

    pub fn listen(mut self, listen: SocketAddr) -> Self {
        self.listen = Some(listen);
        self
    }

    pub fn build(self) -> ExporterConfig {
        let defaults = ExporterConfig::default();

        ExporterConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            jql: self.jql.unwrap_or(defaults.jql),
            max_results: self.max_results.unwrap_or(defaults.max_results),
            poll_interval: self.poll_interval.unwrap_or(defaults.poll_interval),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            listen: self.listen.unwrap_or(defaults.listen),
        }
    }
}

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
