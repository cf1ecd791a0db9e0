// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for circuit construction, scheduling and execution.

use thiserror::Error;

use crate::circuit::PortDirection;
use crate::errors::OperationError;

/// Everything that can go wrong while building or running a [`Circuit`](crate::circuit::Circuit).
///
/// Construction errors (`NodeNotFound`, `DuplicateNode`, `PortNotFound`,
/// `DuplicateConnection`) are returned immediately by the mutating call and
/// leave the circuit untouched. Execution errors abort the whole `execute`
/// call; no partial results are returned.
#[derive(Error, Debug)]
pub enum CircuitError {
    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Node '{0}' already exists")]
    DuplicateNode(String),

    #[error("Node '{node_id}' has no {direction} port named '{port}'")]
    PortNotFound {
        node_id: String,
        port: String,
        direction: PortDirection,
    },

    #[error("Connection '{0}' already exists")]
    DuplicateConnection(String),

    /// Raised by topological sorting; names the node where the cycle closed.
    #[error("Circular dependency detected at node '{node_id}'")]
    CircularDependency { node_id: String },

    #[error("Node '{node_id}' failed: {source}")]
    NodeExecution {
        node_id: String,
        #[source]
        source: OperationError,
    },

    #[error("Circuit is already executing")]
    AlreadyRunning,

    #[error("Circuit serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CircuitError {
    /// Node id carried by the error, if any.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            CircuitError::NodeNotFound(id) | CircuitError::DuplicateNode(id) => Some(id.as_str()),
            CircuitError::PortNotFound { node_id, .. }
            | CircuitError::CircularDependency { node_id }
            | CircuitError::NodeExecution { node_id, .. } => Some(node_id.as_str()),
            CircuitError::DuplicateConnection(_)
            | CircuitError::AlreadyRunning
            | CircuitError::Serialization(_) => None,
        }
    }
}
