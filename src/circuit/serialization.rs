// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Plain-data form of a circuit.
//!
//! Operations are never serialized as code. A node carries only its
//! `operationName`; [`Circuit::deserialize`] looks the name up in an
//! [`OperationRegistry`] and leaves the node without a capability if the name
//! is unknown.
//!
//! ```json
//! {
//!   "nodes": {
//!     "upper": {
//!       "type": "processor", "operationName": "to_upper_case",
//!       "name": "Upper", "description": null,
//!       "inputs": ["input"], "outputs": ["output"],
//!       "parameters": {}, "position": {"x": 0.0, "y": 0.0},
//!       "color": null, "tags": []
//!     }
//!   },
//!   "connections": [{"from": "in", "output": "output", "to": "upper", "input": "input", "id": "in:output->upper:input"}],
//!   "version": "1.0"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, Connection, NodeKind, NodeSpec, Position};
use crate::config::consts::CIRCUIT_FORMAT_VERSION;
use crate::config::OperationRegistry;
use crate::errors::CircuitError;
use crate::observability::messages::circuit::OperationUnresolved;
use crate::observability::messages::StructuredLog;
use crate::traits::Parameters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub operation_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedCircuit {
    /// Nodes in insertion order; written as a JSON object keyed by id.
    #[serde(with = "ordered_nodes")]
    pub nodes: Vec<(String, SerializedNode)>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    CIRCUIT_FORMAT_VERSION.to_string()
}

impl Circuit {
    pub fn serialize(&self) -> SerializedCircuit {
        let nodes = self
            .nodes()
            .map(|node| {
                let spec = node.spec();
                (
                    node.id().to_string(),
                    SerializedNode {
                        kind: spec.kind,
                        operation_name: spec.operation_name.clone(),
                        name: spec.name.clone(),
                        description: spec.description.clone(),
                        inputs: spec.inputs.clone(),
                        outputs: spec.outputs.clone(),
                        parameters: spec.parameters.clone(),
                        position: spec.position,
                        color: spec.color.clone(),
                        tags: spec.tags.clone(),
                    },
                )
            })
            .collect();

        SerializedCircuit {
            nodes,
            connections: self.connections().to_vec(),
            version: CIRCUIT_FORMAT_VERSION.to_string(),
        }
    }

    /// Rebuild a circuit, resolving operation names through `registry`.
    ///
    /// Connections go through [`connect`](Circuit::connect), so a document with
    /// dangling or duplicated connections is rejected with the same errors.
    pub fn deserialize(data: SerializedCircuit, registry: &OperationRegistry) -> Result<Self, CircuitError> {
        let mut circuit = Circuit::new();

        for (id, node) in data.nodes {
            let operation = match node.operation_name.as_deref() {
                Some(name) => {
                    let resolved = registry.get(name).cloned();
                    if resolved.is_none() {
                        OperationUnresolved {
                            node_id: &id,
                            operation_name: name,
                        }
                        .log();
                    }
                    resolved
                }
                None => None,
            };

            let spec = NodeSpec {
                kind: node.kind,
                name: node.name,
                description: node.description,
                operation_name: node.operation_name,
                operation,
                inputs: node.inputs,
                outputs: node.outputs,
                parameters: node.parameters,
                position: node.position,
                color: node.color,
                tags: node.tags,
            };
            circuit.add_node(id, spec)?;
        }

        for connection in &data.connections {
            circuit.connect(
                &connection.from,
                &connection.from_port,
                &connection.to,
                &connection.to_port,
            )?;
        }

        Ok(circuit)
    }

    pub fn to_json(&self) -> Result<String, CircuitError> {
        Ok(serde_json::to_string_pretty(&self.serialize())?)
    }

    pub fn from_json(json: &str, registry: &OperationRegistry) -> Result<Self, CircuitError> {
        let data: SerializedCircuit = serde_json::from_str(json)?;
        Self::deserialize(data, registry)
    }
}

/// Serde adapter writing `Vec<(id, node)>` as a JSON object without losing order.
mod ordered_nodes {
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    use super::SerializedNode;

    pub fn serialize<S>(nodes: &[(String, SerializedNode)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(nodes.len()))?;
        for (id, node) in nodes {
            map.serialize_entry(id, node)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, SerializedNode)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodesVisitor;

        impl<'de> Visitor<'de> for NodesVisitor {
            type Value = Vec<(String, SerializedNode)>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of node id to node")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut nodes = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, node)) = access.next_entry::<String, SerializedNode>()? {
                    nodes.push((id, node));
                }
                Ok(nodes)
            }
        }

        deserializer.deserialize_map(NodesVisitor)
    }
}
