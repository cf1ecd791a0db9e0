// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by operation capabilities.

use thiserror::Error;

/// Failure reported by an [`Operation`](crate::traits::Operation).
///
/// The circuit never inspects these beyond recording them on the failing node
/// and wrapping them in [`CircuitError::NodeExecution`](crate::errors::CircuitError::NodeExecution).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperationError {
    /// The input value had the wrong shape or content.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required parameter was not supplied.
    #[error("Missing parameter '{0}'")]
    MissingParameter(String),

    /// A parameter was supplied with an unusable value.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Anything else the operation wants to report.
    #[error("{0}")]
    Failed(String),
}

impl From<String> for OperationError {
    fn from(message: String) -> Self {
        OperationError::Failed(message)
    }
}

impl From<&str> for OperationError {
    fn from(message: &str) -> Self {
        OperationError::Failed(message.to_string())
    }
}
