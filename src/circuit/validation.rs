// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Non-executing structural checks.

use std::fmt;

use crate::circuit::{Circuit, NodeKind};
use crate::errors::CircuitError;

/// One problem found by [`Circuit::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A non-source node declares an input nothing is connected to.
    UnconnectedInput { node_id: String, port: String },
    /// The graph has a cycle through `node_id`.
    CircularDependency { node_id: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnconnectedInput { node_id, port } => {
                write!(f, "Node '{}' has no connection to input '{}'", node_id, port)
            }
            ValidationIssue::CircularDependency { node_id } => {
                write!(f, "Circular dependency detected at node '{}'", node_id)
            }
        }
    }
}

/// Outcome of [`Circuit::validate`]; `valid` is true iff `issues` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self {
            valid: issues.is_empty(),
            issues,
        }
    }

    pub fn has_cycle(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| matches!(issue, ValidationIssue::CircularDependency { .. }))
    }
}

impl Circuit {
    /// Check the circuit without running it.
    ///
    /// Reports every unconnected input on non-source nodes, then reuses
    /// [`calculate_execution_order`](Circuit::calculate_execution_order) to surface
    /// a cycle. Node runtime state and results are left alone.
    pub fn validate(&self) -> ValidationReport {
        let mut issues = Vec::new();

        for node in self.nodes().filter(|node| node.kind() != NodeKind::Source) {
            for port in node.inputs() {
                let connected = self.incoming(node.id()).any(|c| &c.to_port == port);
                if !connected {
                    issues.push(ValidationIssue::UnconnectedInput {
                        node_id: node.id().to_string(),
                        port: port.clone(),
                    });
                }
            }
        }

        if let Err(CircuitError::CircularDependency { node_id }) = self.calculate_execution_order() {
            issues.push(ValidationIssue::CircularDependency { node_id });
        }

        ValidationReport::from_issues(issues)
    }
}
