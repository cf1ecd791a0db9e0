// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod connection;
mod execution;
mod graph;
mod node;
mod serialization;
mod validation;

#[cfg(test)]
mod integration_tests;

pub use connection::Connection;
pub use execution::{ExecutionResults, SinkResult, SourceInputs};
pub use graph::{Circuit, DependencyMap};
pub use node::{Node, NodeKind, NodeRuntime, NodeSpec, PortDirection, Position};
pub use serialization::{SerializedCircuit, SerializedNode};
pub use validation::{ValidationIssue, ValidationReport};
