//! Configuration types for the mirror updater

use crate::{MirrorEndpoint, MirrorSource, UpdaterError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pages scraped for mirror lists
pub const DEFAULT_SOURCES: &[&str] = &[
    "https://cloud.tencent.com/developer/article/2485043",
    "https://blog.csdn.net/c12312303/article/details/146428465",
];

/// Mirrors used when no source yields anything
pub const DEFAULT_FALLBACK_MIRRORS: &[&str] = &["https://docker.1ms.run", "https://docker.xuanyuan.me"];

pub const DEFAULT_DAEMON_CONFIG_PATH: &str = "/etc/docker/daemon.json";
pub const DEFAULT_LOG_FILE: &str = "/var/log/docker_mirror_updater.log";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SERVICE_MANAGER: &str = "systemctl";
pub const DEFAULT_SERVICE: &str = "docker";

/// Updater configuration
///
/// Every field falls back to the built-in default, so a config file only
/// needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdaterConfig {
    /// Pages to scrape for mirrors
    pub sources: Vec<MirrorSource>,

    /// Mirrors written when scraping yields nothing
    pub fallback_mirrors: Vec<MirrorEndpoint>,

    /// Container runtime daemon configuration file
    pub daemon_config_path: PathBuf,

    /// Log file; `None` logs to stdout only
    pub log_file: Option<PathBuf>,

    /// Per-request timeout for source pages
    pub fetch_timeout_secs: u64,

    /// Service manager executable
    pub service_manager: String,

    /// Unit restarted after the configuration changes
    pub service: String,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().copied().map(MirrorSource::from).collect(),
            fallback_mirrors: DEFAULT_FALLBACK_MIRRORS.iter().copied().map(MirrorEndpoint::from).collect(),
            daemon_config_path: PathBuf::from(DEFAULT_DAEMON_CONFIG_PATH),
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            service_manager: DEFAULT_SERVICE_MANAGER.to_string(),
            service: DEFAULT_SERVICE.to_string(),
        }
    }
}

impl UpdaterConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.fetch_timeout_secs == 0 {
            return Err(UpdaterError::Config("fetchTimeoutSecs must be greater than zero".to_string()));
        }
        if self.service_manager.trim().is_empty() {
            return Err(UpdaterError::Config("serviceManager must not be empty".to_string()));
        }
        if self.service.trim().is_empty() {
            return Err(UpdaterError::Config("service must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UpdaterConfig::default();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.fallback_mirrors[0].as_str(), "https://docker.1ms.run");
        assert_eq!(config.daemon_config_path, PathBuf::from("/etc/docker/daemon.json"));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_config_parse_partial() {
        let json = r#"{
            "daemonConfigPath": "/tmp/daemon.json",
            "fallbackMirrors": ["https://mirror.example.com"]
        }"#;

        let config: UpdaterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.daemon_config_path, PathBuf::from("/tmp/daemon.json"));
        assert_eq!(config.fallback_mirrors, vec![MirrorEndpoint::from("https://mirror.example.com")]);
        assert_eq!(config.sources, UpdaterConfig::default().sources);
        assert_eq!(config.service, "docker");
    }

    #[test]
    fn test_from_file_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("updater.json");
        std::fs::write(&path, r#"{"fetchTimeoutSecs": 0}"#).unwrap();

        let err = UpdaterConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, UpdaterError::Config(_)));
    }

    #[test]
    fn test_from_file_null_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("updater.json");
        std::fs::write(&path, r#"{"logFile": null, "service": "containerd"}"#).unwrap();

        let config = UpdaterConfig::from_file(&path).unwrap();
        assert_eq!(config.log_file, None);
        assert_eq!(config.service, "containerd");
    }
}
