//! Where the CLI finds its config file and puts its logs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use selpick_config::{config_dir, config_file_path, SelpickConfig};

/// The config file to use: the one given on the command line, else the default location.
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config_file_path(&config_dir()))
}

/// Load, override from the environment, fill defaults and validate.
pub async fn load(path: &Path) -> Result<SelpickConfig> {
    selpick_config::load_and_prepare(path)
        .await
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

/// Log directory: `logging.dir` when set, else `logs/` under the config directory.
pub fn log_dir(config: &SelpickConfig) -> PathBuf {
    config
        .logging
        .as_ref()
        .and_then(|logging| logging.dir.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use selpick_config::LoggingConfig;

    #[test]
    fn explicit_path_wins() {
        let path = Path::new("/tmp/custom.yaml");
        assert_eq!(resolve_path(Some(path)), path);
    }

    #[test]
    fn configured_log_dir_wins() {
        let config = SelpickConfig {
            logging: Some(LoggingConfig {
                level: None,
                dir: Some("/var/log/selpick".into()),
            }),
            ..Default::default()
        };
        assert_eq!(log_dir(&config), PathBuf::from("/var/log/selpick"));
        assert!(log_dir(&SelpickConfig::default()).ends_with("logs"));
    }

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("config.yaml")).await.unwrap();
        assert_eq!(config.notification_ttl_ms(), 3000);
        assert!(config.synth.is_some());
    }

    #[tokio::test]
    async fn invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "synth:\n  maxDepth: 1\n").unwrap();
        assert!(load(&path).await.is_err());
    }
}
