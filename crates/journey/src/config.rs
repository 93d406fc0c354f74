//! Project configuration loaded from `journey.toml`.
//!
//! Every value is optional; CLI flags override the file, and built-in
//! defaults cover whatever remains.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use serde::Deserialize;

use journey_sessions::segment::default_timeout;

pub const CONFIG_FILE_NAME: &str = "journey.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4170;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct JourneyConfig {
    /// Log file consumed when no `--file` flag is given
    pub data: Option<PathBuf>,

    /// Inactivity window that closes a session, e.g. "30m" or "2h"
    #[serde(default, with = "humantime_serde")]
    pub session_timeout: Option<Duration>,

    /// Settings for `journey serve`
    #[serde(default)]
    pub serve: ServeConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl JourneyConfig {
    /// Load `journey.toml` from the given directory.
    ///
    /// A missing file is not an error; a file that fails to parse is.
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        let config_path = working_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: JourneyConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Resolve the log file to read: CLI flag first, then the `data` key.
    pub fn data_file(&self, cli: Option<PathBuf>) -> Result<PathBuf> {
        cli.or_else(|| self.data.clone())
            .context("No log file given. Pass --file or set `data` in journey.toml")
    }

    /// Resolve the session timeout: CLI seconds, then `session_timeout`,
    /// then the built-in 30 minute default.
    pub fn segment_timeout(&self, cli_secs: Option<i64>) -> TimeDelta {
        if let Some(secs) = cli_secs {
            return TimeDelta::seconds(secs);
        }
        match self.session_timeout {
            Some(duration) => TimeDelta::from_std(duration).unwrap_or_else(|_| default_timeout()),
            None => default_timeout(),
        }
    }

    pub fn serve_host(&self, cli: Option<String>) -> String {
        cli.or_else(|| self.serve.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    pub fn serve_port(&self, cli: Option<u16>) -> u16 {
        cli.or(self.serve.port).unwrap_or(DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_config_returns_none() {
        let dir = TempDir::new().unwrap();
        let config = JourneyConfig::load(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
data = "logs/app.jsonl"
session_timeout = "45m"

[serve]
host = "0.0.0.0"
port = 9000
"#,
        )
        .unwrap();

        let config = JourneyConfig::load(dir.path()).unwrap().unwrap();
        assert_eq!(config.data, Some(PathBuf::from("logs/app.jsonl")));
        assert_eq!(config.session_timeout, Some(Duration::from_secs(45 * 60)));
        assert_eq!(config.serve.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.serve.port, Some(9000));
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "datafile = \"x\"\n").unwrap();

        let result = JourneyConfig::load(dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_bad_timeout() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "session_timeout = \"soon\"\n",
        )
        .unwrap();

        let result = JourneyConfig::load(dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_data_file_prefers_cli_flag() {
        let config = JourneyConfig {
            data: Some(PathBuf::from("from-config.jsonl")),
            ..Default::default()
        };

        let resolved = config.data_file(Some(PathBuf::from("from-cli.jsonl"))).unwrap();
        assert_eq!(resolved, PathBuf::from("from-cli.jsonl"));

        let resolved = config.data_file(None).unwrap();
        assert_eq!(resolved, PathBuf::from("from-config.jsonl"));
    }

    #[test]
    fn test_data_file_errors_when_nothing_is_set() {
        let config = JourneyConfig::default();
        let result = config.data_file(None);
        assert!(result.is_err());
    }

    #[test]
    fn test_segment_timeout_priority() {
        let config = JourneyConfig {
            session_timeout: Some(Duration::from_secs(600)),
            ..Default::default()
        };

        assert_eq!(config.segment_timeout(Some(90)), TimeDelta::seconds(90));
        assert_eq!(config.segment_timeout(None), TimeDelta::seconds(600));
        assert_eq!(
            JourneyConfig::default().segment_timeout(None),
            TimeDelta::seconds(1800)
        );
    }

    #[test]
    fn test_serve_defaults() {
        let config = JourneyConfig::default();
        assert_eq!(config.serve_host(None), "127.0.0.1");
        assert_eq!(config.serve_port(None), 4170);
        assert_eq!(config.serve_port(Some(8080)), 8080);
    }
}
