// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::circuit::Circuit;
use crate::errors::BlockReason;

/// Structural facts about a circuit that matter for linear conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplexityMetrics {
    pub node_count: usize,
    pub connection_count: usize,
    pub has_loops: bool,
    pub has_branches: bool,
    pub has_conditionals: bool,
}

impl ComplexityMetrics {
    /// Metrics of an `n`-step linear recipe: a plain chain.
    pub fn linear(step_count: usize) -> Self {
        Self {
            node_count: step_count,
            connection_count: step_count.saturating_sub(1),
            ..Self::default()
        }
    }

    /// The first condition that rules out a linear view, checked in the
    /// order loops, branches, conditionals, size.
    pub fn disqualifier(&self, max_nodes: usize) -> Option<BlockReason> {
        if self.has_loops {
            Some(BlockReason::Loops)
        } else if self.has_branches {
            Some(BlockReason::Branches)
        } else if self.has_conditionals {
            Some(BlockReason::Conditionals)
        } else if self.node_count > max_nodes {
            Some(BlockReason::TooManyNodes {
                count: self.node_count,
                max: max_nodes,
            })
        } else {
            None
        }
    }

    pub fn is_linear(&self, max_nodes: usize) -> bool {
        self.disqualifier(max_nodes).is_none()
    }
}

/// Classify a circuit.
///
/// Loop detection walks the connection graph directly and does not touch the
/// circuit's cached execution order.
pub fn analyze(circuit: &Circuit) -> ComplexityMetrics {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for connection in circuit.connections() {
        adjacency
            .entry(connection.from.as_str())
            .or_default()
            .push(connection.to.as_str());
    }

    ComplexityMetrics {
        node_count: circuit.node_count(),
        connection_count: circuit.connection_count(),
        has_loops: has_loops(circuit, &adjacency),
        has_branches: adjacency.values().any(|targets| targets.len() > 1),
        has_conditionals: circuit.nodes().any(|node| node.is_conditional()),
    }
}

fn has_loops(circuit: &Circuit, adjacency: &HashMap<&str, Vec<&str>>) -> bool {
    let mut visited = HashSet::new();
    let mut stack = HashSet::new();

    circuit
        .nodes()
        .any(|node| !visited.contains(node.id()) && reaches_stack(node.id(), adjacency, &mut visited, &mut stack))
}

/// DFS with a recursion stack; true when a back edge is found.
fn reaches_stack<'a>(
    id: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(id);
    stack.insert(id);

    for &next in adjacency.get(id).into_iter().flatten() {
        if stack.contains(next) {
            return true;
        }
        if !visited.contains(next) && reaches_stack(next, adjacency, visited, stack) {
            return true;
        }
    }

    stack.remove(id);
    false
}
