// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Circuit construction and scheduling order.
//!
//! The circuit owns an index-addressed node table and an insertion-ordered
//! connection list. All structural mutation goes through `&mut self`, so the
//! borrow checker keeps the graph frozen while an `execute` (which only needs
//! `&self`) is in flight.
//!
//! # Algorithms
//!
//! ## Execution Order
//! Depth-first topological sort with two sets:
//! - **visiting**: nodes on the current DFS path (gray)
//! - **visited**: nodes already appended to the order (black)
//!
//! Each node first visits its upstream dependencies (the sources of its
//! incoming connections, in connection insertion order) and is appended
//! post-order, so every node follows all of its dependencies. Roots are taken
//! in node insertion order, which makes the result deterministic. Reaching a
//! node that is still in the visiting set means a back edge:
//! `CircularDependency` is raised naming that node.
//!
//! **Time Complexity**: O(V + E) with the dependency lists built up front.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::circuit::execution::ExecutionResults;
use crate::circuit::{Connection, Node, NodeSpec, PortDirection};
use crate::engine::{Scheduler, SequentialScheduler};
use crate::errors::CircuitError;
use crate::observability::messages::circuit::CircularDependencyDetected;
use crate::observability::messages::StructuredLog;

/// Upstream dependencies per node id, in connection insertion order.
pub type DependencyMap = HashMap<String, Vec<String>>;

/// A graph of processing nodes and the port-to-port connections between them.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use the_circuitboard::backends::local::ChangeTextCaseOperation;
/// use the_circuitboard::circuit::{Circuit, NodeSpec};
///
/// let mut circuit = Circuit::new();
/// circuit.add_node("in", NodeSpec::source()).unwrap();
/// circuit.add_node("upper", NodeSpec::processor(Arc::new(ChangeTextCaseOperation::upper()))).unwrap();
/// circuit.add_node("out", NodeSpec::sink()).unwrap();
/// circuit.connect("in", "output", "upper", "input").unwrap();
/// circuit.connect("upper", "output", "out", "input").unwrap();
///
/// assert_eq!(circuit.calculate_execution_order().unwrap(), vec!["in", "upper", "out"]);
/// ```
pub struct Circuit {
    pub(crate) nodes: Vec<Node>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) execution_order: Mutex<Option<Vec<String>>>,
    pub(crate) is_running: AtomicBool,
    pub(crate) results: Mutex<ExecutionResults>,
    pub(crate) scheduler: Arc<dyn Scheduler>,
}

impl Circuit {
    /// Empty circuit with the sequential scheduler.
    pub fn new() -> Self {
        Self::with_scheduler(Arc::new(SequentialScheduler))
    }

    pub fn with_scheduler(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            connections: Vec::new(),
            execution_order: Mutex::new(None),
            is_running: AtomicBool::new(false),
            results: Mutex::new(ExecutionResults::new()),
            scheduler,
        }
    }

    pub fn set_scheduler(&mut self, scheduler: Arc<dyn Scheduler>) {
        self.scheduler = scheduler;
    }

    pub fn scheduler(&self) -> &dyn Scheduler {
        self.scheduler.as_ref()
    }

    /// Register a node. Fails with `DuplicateNode` if the id is taken.
    pub fn add_node(&mut self, id: impl Into<String>, spec: NodeSpec) -> Result<&Node, CircuitError> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(CircuitError::DuplicateNode(id));
        }

        let position = self.nodes.len();
        self.index.insert(id.clone(), position);
        self.nodes.push(Node::new(id, spec));
        self.invalidate_order();
        Ok(&self.nodes[position])
    }

    /// Remove a node and every connection touching it. Returns false if absent.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(position) = self.index.remove(id) else {
            return false;
        };

        self.nodes.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        self.connections.retain(|connection| !connection.touches(id));
        self.invalidate_order();
        true
    }

    /// Connect `from.from_port` to `to.to_port`.
    ///
    /// Fails with `NodeNotFound` if an endpoint is missing, `PortNotFound` if a
    /// port is not declared on the relevant side, and `DuplicateConnection` if
    /// the same tuple is already connected.
    pub fn connect(
        &mut self,
        from: &str,
        from_port: &str,
        to: &str,
        to_port: &str,
    ) -> Result<Connection, CircuitError> {
        let source = self.node(from).ok_or_else(|| CircuitError::NodeNotFound(from.to_string()))?;
        let target = self.node(to).ok_or_else(|| CircuitError::NodeNotFound(to.to_string()))?;

        if !source.has_output(from_port) {
            return Err(CircuitError::PortNotFound {
                node_id: from.to_string(),
                port: from_port.to_string(),
                direction: PortDirection::Output,
            });
        }
        if !target.has_input(to_port) {
            return Err(CircuitError::PortNotFound {
                node_id: to.to_string(),
                port: to_port.to_string(),
                direction: PortDirection::Input,
            });
        }
        if self.find_connection(from, from_port, to, to_port).is_some() {
            return Err(CircuitError::DuplicateConnection(Connection::make_id(
                from, from_port, to, to_port,
            )));
        }

        let connection = Connection::new(from, from_port, to, to_port);
        self.connections.push(connection.clone());
        self.invalidate_order();
        Ok(connection)
    }

    /// Remove a connection. Returns false if it did not exist.
    pub fn disconnect(&mut self, from: &str, from_port: &str, to: &str, to_port: &str) -> bool {
        match self.find_connection(from, from_port, to, to_port) {
            Some(position) => {
                self.connections.remove(position);
                self.invalidate_order();
                true
            }
            None => false,
        }
    }

    /// Overwrite one parameter on a node.
    pub fn set_parameter(&mut self, id: &str, key: impl Into<String>, value: Value) -> Result<(), CircuitError> {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| CircuitError::NodeNotFound(id.to_string()))?;
        self.nodes[position].parameters_mut().insert(key.into(), value);
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(Node::id).collect()
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Connections leaving `id`, across all of its output ports.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.from == id)
    }

    /// Connections arriving at `id`, across all of its input ports.
    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.to == id)
    }

    /// Upstream node ids for every node, without duplicates.
    pub fn dependency_map(&self) -> DependencyMap {
        let mut dependencies: DependencyMap = self
            .nodes
            .iter()
            .map(|node| (node.id().to_string(), Vec::new()))
            .collect();

        for connection in &self.connections {
            if let Some(upstream) = dependencies.get_mut(&connection.to) {
                if !upstream.contains(&connection.from) {
                    upstream.push(connection.from.clone());
                }
            }
        }
        dependencies
    }

    /// Topologically sort the nodes, caching the result.
    pub fn calculate_execution_order(&self) -> Result<Vec<String>, CircuitError> {
        let dependencies = self.dependency_map();
        let mut visiting = HashSet::new();
        let mut visited = HashSet::new();
        let mut order = Vec::with_capacity(self.nodes.len());

        for node in &self.nodes {
            if let Err(error) = visit(node.id(), &dependencies, &mut visiting, &mut visited, &mut order) {
                if let CircuitError::CircularDependency { node_id } = &error {
                    CircularDependencyDetected { node_id }.log();
                }
                return Err(error);
            }
        }

        *self.order_cache() = Some(order.clone());
        Ok(order)
    }

    /// The order computed by the last successful `calculate_execution_order`,
    /// unless the graph changed since.
    pub fn cached_execution_order(&self) -> Option<Vec<String>> {
        self.order_cache().clone()
    }

    fn find_connection(&self, from: &str, from_port: &str, to: &str, to_port: &str) -> Option<usize> {
        self.connections
            .iter()
            .position(|c| c.matches(from, from_port, to, to_port))
    }

    fn invalidate_order(&mut self) {
        *self.order_cache() = None;
    }

    fn order_cache(&self) -> MutexGuard<'_, Option<Vec<String>>> {
        self.execution_order.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Circuit")
            .field("nodes", &self.node_ids())
            .field("connection_count", &self.connections.len())
            .field("scheduler", &self.scheduler.name())
            .finish()
    }
}

fn visit<'a>(
    id: &'a str,
    dependencies: &'a DependencyMap,
    visiting: &mut HashSet<&'a str>,
    visited: &mut HashSet<&'a str>,
    order: &mut Vec<String>,
) -> Result<(), CircuitError> {
    if visited.contains(id) {
        return Ok(());
    }
    if !visiting.insert(id) {
        return Err(CircuitError::CircularDependency {
            node_id: id.to_string(),
        });
    }

    if let Some(upstream) = dependencies.get(id) {
        for dependency in upstream {
            visit(dependency, dependencies, visiting, visited, order)?;
        }
    }

    visiting.remove(id);
    visited.insert(id);
    order.push(id.to_string());
    Ok(())
}
