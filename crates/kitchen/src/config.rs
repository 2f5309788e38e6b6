//! Kitchen configuration
//!
//! Loaded from `.kitchen.toml` in the current directory, falling back to
//! `~/.kitchen.toml`. Every field has a default, so an empty or missing file
//! is a valid configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::state::Kitchen;

const CONFIG_FILE: &str = ".kitchen.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Print the kitchen after every committed change
    #[serde(default = "default_echo_state")]
    pub echo_state: bool,

    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// How many people fit into the kitchen
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Switch every appliance off when the last person leaves
    #[serde(default = "default_auto_power_off")]
    pub auto_power_off: bool,

    /// Kitchen to start from instead of the reducers' defaults
    #[serde(default)]
    pub seed: Option<Kitchen>,
}

fn default_echo_state() -> bool {
    true
}

fn default_capacity() -> usize {
    4
}

fn default_auto_power_off() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            echo_state: default_echo_state(),
            log_file: None,
            capacity: default_capacity(),
            auto_power_off: default_auto_power_off(),
            seed: None,
        }
    }
}

impl Config {
    /// Load config from CWD first, then home directory, or use defaults
    ///
    /// A file that fails to parse is reported and skipped.
    pub fn load() -> Self {
        for path in search_paths() {
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", path.display(), e);
                }
            }
        }

        log::debug!("Using default config");
        Self::default()
    }

    /// Load config from an explicitly given file; unlike [`Config::load`] any
    /// failure is an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(CONFIG_FILE));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.echo_state);
        assert!(config.auto_power_off);
        assert_eq!(config.capacity, 4);
        assert_eq!(config.log_file, None);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.echo_state);
        assert_eq!(config.capacity, 4);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            echo_state = false
            log_file = "kitchen.log"
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert!(!config.echo_state);
        assert_eq!(config.log_file, Some(PathBuf::from("kitchen.log")));
        // untouched fields keep their defaults
        assert_eq!(config.capacity, 4);
        assert!(config.auto_power_off);
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(include_str!("../kitchen.example.toml")).unwrap();
        let seed = config.seed.unwrap();

        assert_eq!(config.capacity, 6);
        assert_eq!(
            seed.to_string(),
            "kettle on | toaster off | dishes put away, available | occupied by peter, ali"
        );
    }

    #[test]
    fn test_incomplete_seed_is_rejected() {
        let toml = r#"
            [seed]
            occupied_by = []
        "#;

        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Config::load_from(Path::new("does/not/exist.toml")).unwrap_err();

        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
