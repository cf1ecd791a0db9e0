// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::config::consts::DEFAULT_MAX_LINEAR_NODES;
use crate::errors::ConfigError;
use crate::observability::messages::config::ConfigLoaded;
use crate::observability::messages::StructuredLog;

/// Top-level configuration for the circuit engine.
///
/// Every field is optional; an empty file yields the defaults.
///
/// # Example
/// ```yaml
/// strategy: level
/// conversion:
///   max_linear_nodes: 12
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub conversion: ConversionConfig,
}

/// How a circuit picks the next node(s) to run.
///
/// # Variants
/// * `Sequential` - One node at a time in topological order (default)
/// * `Level` - All nodes of a topological level run concurrently
#[derive(Debug, Default, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Sequential,
    Level,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Level => "level",
        }
    }
}

/// Options governing linear ⇄ graph conversion.
#[derive(Debug, Default, Deserialize, PartialEq, Clone)]
pub struct ConversionConfig {
    pub max_linear_nodes: Option<usize>,
}

impl ConversionConfig {
    /// Get the node limit, using the built-in default if not configured.
    pub fn get_max_linear_nodes(&self) -> usize {
        self.max_linear_nodes.unwrap_or(DEFAULT_MAX_LINEAR_NODES)
    }
}

/// Load a config from a YAML or TOML file, chosen by extension.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let cfg: Config = match extension.as_deref() {
        Some("yaml") | Some("yml") => {
            // serde_yaml reads an empty document as null rather than an empty map
            if content.trim().is_empty() {
                Config::default()
            } else {
                serde_yaml::from_str(&content)?
            }
        }
        Some("toml") => toml::from_str(&content)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    ConfigLoaded {
        path: &path.display().to_string(),
        strategy: cfg.strategy.as_str(),
        max_linear_nodes: cfg.conversion.get_max_linear_nodes(),
    }
    .log();

    Ok(cfg)
}

/// Load a config and reject values the engine cannot work with.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;

    if cfg.conversion.max_linear_nodes == Some(0) {
        return Err(ConfigError::Invalid(
            "conversion.max_linear_nodes must be at least 1".to_string(),
        ));
    }

    Ok(cfg)
}
