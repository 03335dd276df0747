use crate::config::ExporterConfig;
use anyhow::{Context, Result};
use std::path::Path;

pub async fn parse_config_from_file(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config file {}", path.display()))?;

    let extension = path.extension().and_then(|s| s.to_str());

    let config = match extension {
        Some("yaml") | Some("yml") => parse_yaml(&contents),
        Some("toml") => parse_toml(&contents),
        Some("json") => parse_json(&contents),
        _ => Err(anyhow::anyhow!(
            "Unsupported config format. Use .yaml, .yml, .toml, or .json"
        )),
    };

    config.with_context(|| format!("parsing config file {}", path.display()))
}

pub fn parse_config_from_str(content: &str, format: &str) -> Result<ExporterConfig> {
    match format.to_lowercase().as_str() {
        "yaml" | "yml" => parse_yaml(content),
        "toml" => parse_toml(content),
        "json" => parse_json(content),
        _ => Err(anyhow::anyhow!("Unsupported format: {}", format)),
    }
}

fn parse_yaml(content: &str) -> Result<ExporterConfig> {
    let config: ExporterConfig = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

fn parse_toml(content: &str) -> Result<ExporterConfig> {
    let config: ExporterConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

fn parse_json(content: &str) -> Result<ExporterConfig> {
    let config: ExporterConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
base_url: "https://jira.example.com"
poll_interval: 2m
listen: "127.0.0.1:9000"
"#;

        let config = parse_yaml(yaml).unwrap();
        assert_eq!(config.base_url, "https://jira.example.com");
        assert_eq!(config.poll_interval, Duration::from_secs(120));
        assert_eq!(config.listen.port(), 9000);
        assert_eq!(config.max_results, 1000);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
jql = "project = OHSS AND resolution = Unresolved"
max_results = 250
request_timeout = "10s"
"#;

        let config = parse_toml(toml).unwrap();
        assert_eq!(config.jql, "project = OHSS AND resolution = Unresolved");
        assert_eq!(config.max_results, 250);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.base_url, "https://issues.redhat.com");
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{ "poll_interval": "90s" }"#;

        let config = parse_json(json).unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(90));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config_from_str("{}", "json").unwrap();
        assert_eq!(config, ExporterConfig::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(parse_config_from_str(r#"base_url = """#, "toml").is_err());
        assert!(parse_config_from_str("poll_interval: soon", "yaml").is_err());
        assert!(parse_config_from_str(r#"{ "pol_interval": "1m" }"#, "json").is_err());
        assert!(parse_config_from_str("{}", "ini").is_err());
    }

    #[tokio::test]
    async fn test_parse_from_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, r#"poll_interval = "5m""#).unwrap();

        let config = parse_config_from_file(file.path()).await.unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(300));

        let unknown = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(parse_config_from_file(unknown.path()).await.is_err());
    }
}
