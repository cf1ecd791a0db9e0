// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Nodes and ports: the atomic units of a circuit.
//!
//! A [`Node`] is created from a [`NodeSpec`] by
//! [`Circuit::add_node`](crate::circuit::Circuit::add_node). The spec carries
//! everything static about the node (kind, ports, parameters, operation and
//! cosmetic layout); the node adds its id and the mutable per-run state that
//! only the executor touches.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::consts::{CONDITIONAL_TAG, DEFAULT_INPUT_PORT, DEFAULT_OUTPUT_PORT};
use crate::traits::{Operation, Parameters};

/// Role a node plays in the dataflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Entry point; seeded from the execute call's source inputs.
    Source,
    /// Transforms data; the only kind kept when flattening to a linear recipe.
    Processor,
    /// Exit point; its collected inputs become the execution results.
    Sink,
    /// Inspects data without being part of the linear chain.
    Analysis,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeKind::Source => "source",
            NodeKind::Processor => "processor",
            NodeKind::Sink => "sink",
            NodeKind::Analysis => "analysis",
        };
        f.write_str(label)
    }
}

/// Side of a node a port lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => f.write_str("input"),
            PortDirection::Output => f.write_str("output"),
        }
    }
}

/// Editor layout position. Purely cosmetic; round-tripped by serialization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Static description of a node, consumed by `add_node`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use serde_json::json;
/// use the_circuitboard::backends::local::ReverseTextOperation;
/// use the_circuitboard::circuit::{NodeKind, NodeSpec};
///
/// let spec = NodeSpec::processor(Arc::new(ReverseTextOperation::new()))
///     .with_name("Reverse")
///     .with_parameter("note", json!("demo"));
///
/// assert_eq!(spec.kind, NodeKind::Processor);
/// assert_eq!(spec.inputs, vec!["input"]);
/// assert_eq!(spec.operation_name.as_deref(), Some("reverse_text"));
/// ```
#[derive(Clone)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub name: Option<String>,
    pub description: Option<String>,
    pub operation_name: Option<String>,
    pub operation: Option<Arc<dyn Operation>>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub parameters: Parameters,
    pub position: Option<Position>,
    pub color: Option<String>,
    pub tags: Vec<String>,
}

impl NodeSpec {
    /// A node of the given kind with no ports and no operation.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            description: None,
            operation_name: None,
            operation: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            parameters: Parameters::new(),
            position: None,
            color: None,
            tags: Vec::new(),
        }
    }

    /// Source with a single conventional `output` port.
    pub fn source() -> Self {
        Self::new(NodeKind::Source).with_outputs([DEFAULT_OUTPUT_PORT])
    }

    /// Sink with a single conventional `input` port.
    pub fn sink() -> Self {
        Self::new(NodeKind::Sink).with_inputs([DEFAULT_INPUT_PORT])
    }

    /// Processor wrapping `operation`, with conventional `input`/`output` ports.
    pub fn processor(operation: Arc<dyn Operation>) -> Self {
        Self::new(NodeKind::Processor)
            .with_inputs([DEFAULT_INPUT_PORT])
            .with_outputs([DEFAULT_OUTPUT_PORT])
            .with_operation(operation)
    }

    /// Analysis node wrapping `operation`, with conventional ports.
    pub fn analysis(operation: Arc<dyn Operation>) -> Self {
        Self {
            kind: NodeKind::Analysis,
            ..Self::processor(operation)
        }
    }

    pub fn with_operation(mut self, operation: Arc<dyn Operation>) -> Self {
        self.operation_name = Some(operation.name().to_string());
        self.operation = Some(operation);
        self
    }

    /// Record an operation name without a capability behind it.
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

impl fmt::Debug for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSpec")
            .field("kind", &self.kind)
            .field("operation_name", &self.operation_name)
            .field("has_operation", &self.operation.is_some())
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}

/// Mutable per-run state of a node.
///
/// Cleared at the start of every `execute`; may be left partially populated
/// after a failed run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeRuntime {
    pub input_data: Map<String, Value>,
    pub output_data: Map<String, Value>,
    pub executed: bool,
    pub error: Option<String>,
}

/// A node owned by a circuit.
pub struct Node {
    id: String,
    spec: NodeSpec,
    runtime: Mutex<NodeRuntime>,
}

impl Node {
    pub(crate) fn new(id: String, mut spec: NodeSpec) -> Self {
        dedup_in_order(&mut spec.inputs);
        dedup_in_order(&mut spec.outputs);
        Self {
            id,
            spec,
            runtime: Mutex::new(NodeRuntime::default()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.spec.kind
    }

    /// Display name, falling back to the id.
    pub fn name(&self) -> &str {
        self.spec.name.as_deref().unwrap_or(&self.id)
    }

    pub fn description(&self) -> Option<&str> {
        self.spec.description.as_deref()
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.spec.operation_name.as_deref()
    }

    pub fn operation(&self) -> Option<&Arc<dyn Operation>> {
        self.spec.operation.as_ref()
    }

    pub fn inputs(&self) -> &[String] {
        &self.spec.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.spec.outputs
    }

    pub fn parameters(&self) -> &Parameters {
        &self.spec.parameters
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.spec.parameters
    }

    pub fn position(&self) -> Option<Position> {
        self.spec.position
    }

    pub fn color(&self) -> Option<&str> {
        self.spec.color.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.spec.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.spec.tags.iter().any(|t| t == tag)
    }

    /// Tagged `conditional`, or with `conditional` as a whole word of its name
    /// or operation name (`"Conditional_Jump"` counts, `"Unconditional copy"` does not).
    pub fn is_conditional(&self) -> bool {
        let mentions = |text: &str| {
            text.split(|c: char| !c.is_ascii_alphanumeric())
                .any(|word| word.eq_ignore_ascii_case(CONDITIONAL_TAG))
        };
        self.has_tag(CONDITIONAL_TAG)
            || self.spec.name.as_deref().is_some_and(mentions)
            || self.operation_name().is_some_and(mentions)
    }

    pub fn has_input(&self, port: &str) -> bool {
        self.spec.inputs.iter().any(|p| p == port)
    }

    pub fn has_output(&self, port: &str) -> bool {
        self.spec.outputs.iter().any(|p| p == port)
    }

    /// Exactly one input, named `input`: the operation gets a bare value.
    pub fn has_conventional_input(&self) -> bool {
        self.spec.inputs.len() == 1 && self.spec.inputs[0] == DEFAULT_INPUT_PORT
    }

    /// Exactly one output, named `output`: the operation's result is stored whole.
    pub fn has_conventional_output(&self) -> bool {
        self.spec.outputs.len() == 1 && self.spec.outputs[0] == DEFAULT_OUTPUT_PORT
    }

    /// Sinks, and any node with no outputs, contribute to execution results.
    pub fn is_result_node(&self) -> bool {
        self.spec.kind == NodeKind::Sink || self.spec.outputs.is_empty()
    }

    /// Snapshot of the per-run state.
    pub fn runtime(&self) -> NodeRuntime {
        self.state().clone()
    }

    pub fn input_data(&self) -> Map<String, Value> {
        self.state().input_data.clone()
    }

    pub fn output_data(&self) -> Map<String, Value> {
        self.state().output_data.clone()
    }

    pub fn is_executed(&self) -> bool {
        self.state().executed
    }

    pub fn last_error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub(crate) fn spec(&self) -> &NodeSpec {
        &self.spec
    }

    /// The lock is never held across an await, so a poisoned lock only means a
    /// panic elsewhere; the state itself is still usable.
    pub(crate) fn state(&self) -> MutexGuard<'_, NodeRuntime> {
        self.runtime.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.spec.kind)
            .field("operation_name", &self.spec.operation_name)
            .field("inputs", &self.spec.inputs)
            .field("outputs", &self.spec.outputs)
            .finish()
    }
}

fn dedup_in_order(ports: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    ports.retain(|port| seen.insert(port.clone()));
}
