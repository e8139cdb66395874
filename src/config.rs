use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file looked up in the working directory.
const CONFIG_FILE: &str = "aqdash.toml";

/// Startup configuration. The dataset location is configurable rather than
/// baked in; everything else has sensible defaults.
///
/// ```toml
/// data_path = "data/air_quality.csv"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// CSV file loaded on startup.
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("data/air_quality.csv"),
        }
    }
}

impl Config {
    /// Read `aqdash.toml` from the working directory. A missing file means
    /// defaults; a malformed file is logged and also falls back to defaults
    /// so the app still starts.
    pub fn load() -> Config {
        match Config::from_file(Path::new(CONFIG_FILE)) {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                log::warn!("ignoring {CONFIG_FILE}: {e:#}");
                Config::default()
            }
        }
    }

    fn from_file(path: &Path) -> Result<Option<Config>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str(&text).context("parsing config")?;
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_path() {
        let config: Config = toml::from_str("data_path = \"/srv/aq/beijing.csv\"").unwrap();
        assert_eq!(config.data_path, PathBuf::from("/srv/aq/beijing.csv"));
    }

    #[test]
    fn empty_config_uses_default_path() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.data_path, Config::default().data_path);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("dataPath = \"x.csv\"").is_err());
    }
}
