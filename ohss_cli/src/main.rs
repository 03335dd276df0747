mod server;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use ohss_metrics::{MetricsCalculator, MetricsStore, PrometheusExporter};
use ohss_poller::{parse_config_from_file, ExporterConfig, Poller};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};

#[derive(Parser, Debug)]
#[command(name = "ohss-exporter")]
#[command(about = "Prometheus exporter for OHSS ticket counts and SLA breaches", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level to display
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Config file (YAML, TOML, or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the Jira instance
    #[arg(long, env = "JIRA_BASE_URL")]
    base_url: Option<String>,

    /// JQL query selecting the tracked issues
    #[arg(long)]
    jql: Option<String>,

    /// Time between Jira queries (e.g. 60s, 5m)
    #[arg(long, value_parser = humantime::parse_duration)]
    poll_interval: Option<Duration>,

    /// Address to serve /metrics on
    #[arg(long)]
    listen: Option<SocketAddr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    #[value(alias = "warning")]
    Warn,
    #[value(alias = "err")]
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .init();

    let config = load_config(&cli).await?;
    let client = config.jira_client().context("configuring Jira client")?;

    let store = Arc::new(MetricsStore::new()?);
    let exporter = Arc::new(PrometheusExporter::new(store.clone())?);
    let calculator = Arc::new(MetricsCalculator::new(Arc::new(client), store.clone()));
    let poller = Poller::new(calculator, config.poll_interval);

    // Prime before binding so the first scrape is never empty.
    info!("Querying {} for '{}'", config.base_url, config.jql);
    poller.prime().await;

    let shutdown = CancellationToken::new();
    let poller_handle = poller.spawn(shutdown.clone());

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl-C, shutting down"),
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
        signal_token.cancel();
    });

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("binding {}", config.listen))?;
    info!("Serving metrics on http://{}/metrics", listener.local_addr()?);

    server::serve(
        listener,
        server::AppState::new(store, exporter),
        shutdown.clone(),
    )
    .await?;

    shutdown.cancel();
    poller_handle.await?;

    Ok(())
}

/// Defaults, then the config file, then command-line flags.
async fn load_config(cli: &Cli) -> anyhow::Result<ExporterConfig> {
    let mut config = match &cli.config {
        Some(path) => parse_config_from_file(path).await?,
        None => ExporterConfig::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(jql) = &cli.jql {
        config.jql = jql.clone();
    }
    if let Some(poll_interval) = cli.poll_interval {
        config.poll_interval = poll_interval;
    }
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ohss-exporter").chain(args.iter().copied()))
    }

    #[test]
    fn test_log_level_values() {
        assert_eq!(parse(&[]).unwrap().log_level, LogLevel::Info);

        for (arg, expected) in [
            ("debug", LogLevel::Debug),
            ("info", LogLevel::Info),
            ("warn", LogLevel::Warn),
            ("warning", LogLevel::Warn),
            ("err", LogLevel::Error),
            ("error", LogLevel::Error),
        ] {
            let cli = parse(&["--log-level", arg]).unwrap();
            assert_eq!(cli.log_level, expected, "{arg}");
        }

        assert!(parse(&["--log-level", "verbose"]).is_err());
    }

    #[test]
    fn test_log_level_maps_to_tracing() {
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
    }

    #[tokio::test]
    async fn test_flags_override_defaults() {
        let cli = parse(&[
            "--base-url",
            "https://jira.example.com",
            "--jql",
            "project = OHSS",
            "--poll-interval",
            "5m",
            "--listen",
            "127.0.0.1:9100",
        ])
        .unwrap();

        let config = load_config(&cli).await.unwrap();

        assert_eq!(config.base_url, "https://jira.example.com");
        assert_eq!(config.jql, "project = OHSS");
        assert_eq!(config.poll_interval, Duration::from_secs(300));
        assert_eq!(config.listen.port(), 9100);
    }

    #[tokio::test]
    async fn test_empty_base_url_is_rejected() {
        let cli = parse(&["--base-url", ""]).unwrap();
        assert!(load_config(&cli).await.is_err());
    }
}
