// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Directed edge from one node's output port to another node's input port.
///
/// The id is derived from the four endpoint fields, so two connections with
/// the same endpoints always share an id.
///
/// ```
/// use the_circuitboard::circuit::Connection;
///
/// let connection = Connection::new("upper", "output", "sink", "input");
/// assert_eq!(connection.id, "upper:output->sink:input");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    #[serde(rename = "output")]
    pub from_port: String,
    pub to: String,
    #[serde(rename = "input")]
    pub to_port: String,
    pub id: String,
}

impl Connection {
    pub fn new(
        from: impl Into<String>,
        from_port: impl Into<String>,
        to: impl Into<String>,
        to_port: impl Into<String>,
    ) -> Self {
        let from = from.into();
        let from_port = from_port.into();
        let to = to.into();
        let to_port = to_port.into();
        let id = Self::make_id(&from, &from_port, &to, &to_port);
        Self {
            from,
            from_port,
            to,
            to_port,
            id,
        }
    }

    pub fn make_id(from: &str, from_port: &str, to: &str, to_port: &str) -> String {
        format!("{}:{}->{}:{}", from, from_port, to, to_port)
    }

    pub fn matches(&self, from: &str, from_port: &str, to: &str, to_port: &str) -> bool {
        self.from == from && self.from_port == from_port && self.to == to && self.to_port == to_port
    }

    /// True if `node_id` is either endpoint.
    pub fn touches(&self, node_id: &str) -> bool {
        self.from == node_id || self.to == node_id
    }
}
