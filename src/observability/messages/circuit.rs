// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for circuit execution and graph events.
//!
//! This module contains message types for logging events related to:
//! * Execution lifecycle (start, completion, failure)
//! * Individual node execution
//! * Topological ordering and cycle detection
//! * Circuit deserialization

use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

use crate::errors::{CircuitError, OperationError};
use crate::observability::messages::StructuredLog;

/// Circuit execution started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionStarted<'a> {
    pub strategy: &'a str,
    pub node_count: usize,
    pub connection_count: usize,
}

impl Display for ExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting circuit execution with {} scheduler: {} nodes, {} connections",
            self.strategy, self.node_count, self.connection_count
        )
    }
}

impl StructuredLog for ExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            strategy = self.strategy,
            node_count = self.node_count,
            connection_count = self.connection_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution",
            span_name = name,
            strategy = self.strategy,
            node_count = self.node_count,
            connection_count = self.connection_count,
        )
    }
}

/// Circuit execution completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionCompleted<'a> {
    pub strategy: &'a str,
    pub node_count: usize,
    pub result_count: usize,
    pub duration: Duration,
}

impl Display for ExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Circuit execution completed with {} scheduler: {} nodes, {} results in {:?}",
            self.strategy, self.node_count, self.result_count, self.duration
        )
    }
}

impl StructuredLog for ExecutionCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            strategy = self.strategy,
            node_count = self.node_count,
            result_count = self.result_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// Circuit execution aborted.
///
/// # Log Level
/// `error!` - Execution did not produce results
pub struct ExecutionFailed<'a> {
    pub strategy: &'a str,
    pub error: &'a CircuitError,
}

impl Display for ExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Circuit execution failed with {} scheduler: {}", self.strategy, self.error)
    }
}

impl StructuredLog for ExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            strategy = self.strategy,
            node_id = self.error.node_id(),
            error = %self.error,
            "{}", self
        );
    }
}

/// A node ran and its outputs were stored.
///
/// # Log Level
/// `debug!` - Per-node detail
pub struct NodeExecuted<'a> {
    pub node_id: &'a str,
    pub operation: Option<&'a str>,
    pub duration: Duration,
}

impl Display for NodeExecuted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.operation {
            Some(operation) => write!(
                f,
                "Node '{}' executed '{}' in {:?}",
                self.node_id, operation, self.duration
            ),
            None => write!(f, "Node '{}' passed through in {:?}", self.node_id, self.duration),
        }
    }
}

impl StructuredLog for NodeExecuted<'_> {
    fn log(&self) {
        tracing::debug!(
            node_id = self.node_id,
            operation = self.operation,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }
}

/// A node's operation returned an error.
///
/// # Log Level
/// `error!` - Aborts the run
pub struct NodeExecutionFailed<'a> {
    pub node_id: &'a str,
    pub error: &'a OperationError,
}

impl Display for NodeExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Node '{}' failed: {}", self.node_id, self.error)
    }
}

impl StructuredLog for NodeExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            node_id = self.node_id,
            error = %self.error,
            "{}", self
        );
    }
}

/// A source input named a node that is missing or not a source.
///
/// # Log Level
/// `warn!` - Input was dropped
pub struct SourceInputIgnored<'a> {
    pub node_id: &'a str,
}

impl Display for SourceInputIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Ignoring source input for '{}': not a source node", self.node_id)
    }
}

impl StructuredLog for SourceInputIgnored<'_> {
    fn log(&self) {
        tracing::warn!(node_id = self.node_id, "{}", self);
    }
}

/// Topological ordering hit a node already on the DFS stack.
///
/// # Log Level
/// `warn!` - The caller receives the error
pub struct CircularDependencyDetected<'a> {
    pub node_id: &'a str,
}

impl Display for CircularDependencyDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Circular dependency detected at node '{}'", self.node_id)
    }
}

impl StructuredLog for CircularDependencyDetected<'_> {
    fn log(&self) {
        tracing::warn!(node_id = self.node_id, "{}", self);
    }
}

/// A deserialized node names an operation the registry does not know.
///
/// # Log Level
/// `warn!` - The node is kept without a capability
pub struct OperationUnresolved<'a> {
    pub node_id: &'a str,
    pub operation_name: &'a str,
}

impl Display for OperationUnresolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' references unknown operation '{}'; keeping it without a capability",
            self.node_id, self.operation_name
        )
    }
}

impl StructuredLog for OperationUnresolved<'_> {
    fn log(&self) {
        tracing::warn!(
            node_id = self.node_id,
            operation_name = self.operation_name,
            "{}", self
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_started_display() {
        let msg = ExecutionStarted {
            strategy: "level",
            node_count: 4,
            connection_count: 3,
        };
        assert_eq!(
            msg.to_string(),
            "Starting circuit execution with level scheduler: 4 nodes, 3 connections"
        );
    }

    #[test]
    fn test_node_failed_display() {
        let error = OperationError::InvalidInput("expected text".to_string());
        let msg = NodeExecutionFailed {
            node_id: "upper",
            error: &error,
        };
        assert_eq!(msg.to_string(), "Node 'upper' failed: Invalid input: expected text");
    }

    #[test]
    fn test_node_executed_without_operation() {
        let msg = NodeExecuted {
            node_id: "relay",
            operation: None,
            duration: Duration::from_millis(1),
        };
        assert!(msg.to_string().starts_with("Node 'relay' passed through"));
    }
}
