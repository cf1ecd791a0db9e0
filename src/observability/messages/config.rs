// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading.

use std::fmt::{Display, Formatter};

use crate::observability::messages::StructuredLog;

/// Configuration file parsed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigLoaded<'a> {
    pub path: &'a str,
    pub strategy: &'a str,
    pub max_linear_nodes: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded configuration from {}: strategy={}, max_linear_nodes={}",
            self.path, self.strategy, self.max_linear_nodes
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            strategy = self.strategy,
            max_linear_nodes = self.max_linear_nodes,
            "{}", self
        );
    }
}
