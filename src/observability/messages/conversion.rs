// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for dual-view initialization and conversion.
//!
//! This module contains message types for logging events related to:
//! * Initializing a manager from a recipe or a circuit
//! * Linear to graph and graph to linear conversion
//! * Conversion refusals and the one-way conversion lock

use std::fmt::{Display, Formatter};
use tracing::Span;

use crate::errors::BlockReason;
use crate::observability::messages::StructuredLog;

/// The manager was given its starting data.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ViewInitialized<'a> {
    pub view: &'a str,
    pub node_count: usize,
}

impl Display for ViewInitialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Initialized {} view with {} nodes", self.view, self.node_count)
    }
}

impl StructuredLog for ViewInitialized<'_> {
    fn log(&self) {
        tracing::info!(view = self.view, node_count = self.node_count, "{}", self);
    }
}

/// A recipe was expanded into a circuit.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConvertedToGraph {
    pub node_count: usize,
    pub connection_count: usize,
}

impl Display for ConvertedToGraph {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Converted linear recipe to graph: {} nodes, {} connections",
            self.node_count, self.connection_count
        )
    }
}

impl StructuredLog for ConvertedToGraph {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            connection_count = self.connection_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("conversion", span_name = name, direction = "to_graph")
    }
}

/// A circuit was flattened back into a recipe.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConvertedToLinear {
    pub operation_count: usize,
}

impl Display for ConvertedToLinear {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Converted graph to linear recipe with {} operations", self.operation_count)
    }
}

impl StructuredLog for ConvertedToLinear {
    fn log(&self) {
        tracing::info!(operation_count = self.operation_count, "{}", self);
    }
}

/// Graph to linear conversion was refused.
///
/// # Log Level
/// `warn!` - The caller receives the error
pub struct ConversionBlocked<'a> {
    pub reason: &'a BlockReason,
}

impl Display for ConversionBlocked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Conversion to linear view blocked: {}", self.reason)
    }
}

impl StructuredLog for ConversionBlocked<'_> {
    fn log(&self) {
        tracing::warn!(reason = %self.reason, "{}", self);
    }
}

/// The graph became too complex for a linear view; the lock is now permanent.
///
/// # Log Level
/// `info!` - State change that cannot be undone
pub struct ConversionLockEngaged<'a> {
    pub reason: &'a BlockReason,
}

impl Display for ConversionLockEngaged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Linear conversion locked: {}", self.reason)
    }
}

impl StructuredLog for ConversionLockEngaged<'_> {
    fn log(&self) {
        tracing::info!(reason = %self.reason, "{}", self);
    }
}
