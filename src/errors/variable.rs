// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors from the [`VariableManager`](crate::variables::VariableManager).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariableError {
    #[error("Node-scoped variable '{0}' requires a node id")]
    MissingNodeId(String),
}
