//! `selpick config`: show the effective configuration.

use std::path::Path;

use anyhow::{Context, Result};
use selpick_config::{apply_all_defaults, write_config, SelpickConfig};

use crate::terminal_output::{note_info, note_success};

/// Print the effective config as YAML. With `init`, first write a config
/// file holding every default, unless one already exists.
pub async fn run(config: &SelpickConfig, path: &Path, init: bool) -> Result<()> {
    if init {
        if path.exists() {
            note_info(&format!("{} already exists; leaving it alone", path.display()));
        } else {
            write_config(&apply_all_defaults(SelpickConfig::default()), path).await?;
            note_success(&format!("Wrote {}", path.display()));
        }
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    print!("{yaml}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = apply_all_defaults(SelpickConfig::default());

        run(&config, &path, true).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("maxDepth: 3"));

        std::fs::write(&path, "copy:\n  format: query_selector\n").unwrap();
        run(&config, &path, true).await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("query_selector"));
    }
}
