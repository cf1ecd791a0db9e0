// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported config format for '{0}' (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
