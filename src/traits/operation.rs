// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::OperationError;

/// Parameter mapping handed to every operation invocation.
pub type Parameters = Map<String, Value>;

/// What a node hands to its operation.
///
/// Nodes with a single conventional `input` port pass the bare value;
/// every other port layout passes a port name → value map.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationInput {
    Single(Value),
    Ports(Map<String, Value>),
}

impl OperationInput {
    /// The single value, or the port map wrapped as a JSON object.
    pub fn into_value(self) -> Value {
        match self {
            OperationInput::Single(value) => value,
            OperationInput::Ports(ports) => Value::Object(ports),
        }
    }

    /// Convenience for text transforms: the single value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OperationInput::Single(value) => value.as_str(),
            OperationInput::Ports(_) => None,
        }
    }
}

/// An operation capability: one external transform a node wraps.
///
/// Operations are stateless. The result is either a single value (for nodes
/// with one conventional `output` port) or a JSON object keyed by output port
/// name.
#[async_trait]
pub trait Operation: Send + Sync {
    async fn run(&self, input: OperationInput, parameters: &Parameters) -> Result<Value, OperationError>;

    /// Stable registry name; this is what gets serialized.
    fn name(&self) -> &str;
}
