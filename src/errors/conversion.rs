// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for switching between the linear and graph views.

use std::fmt;
use thiserror::Error;

use crate::dual_view::ViewKind;
use crate::errors::CircuitError;

/// Why a graph cannot be flattened back into a linear recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// The circuit contains a cycle.
    Loops,
    /// Some node feeds more than one downstream connection.
    Branches,
    /// Some node is tagged or named as a conditional.
    Conditionals,
    /// The circuit has more nodes than a linear recipe may hold.
    TooManyNodes { count: usize, max: usize },
    /// A disqualifying feature was seen earlier and the lock is still engaged.
    Locked,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Loops => write!(f, "circuit contains loops"),
            BlockReason::Branches => write!(f, "circuit contains branches"),
            BlockReason::Conditionals => write!(f, "circuit contains conditional nodes"),
            BlockReason::TooManyNodes { count, max } => {
                write!(f, "circuit has {} nodes (maximum {})", count, max)
            }
            BlockReason::Locked => write!(f, "conversion is locked until the view is reinitialized"),
        }
    }
}

/// Errors from the [`DualViewManager`](crate::dual_view::DualViewManager).
///
/// A failed conversion never changes the manager's state.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("No data loaded for the current view")]
    NoData,

    #[error("Cannot convert to linear: {reason}")]
    ConversionBlocked { reason: BlockReason },

    #[error("Operation requires the {expected} view, current view is {actual}")]
    InvalidView { expected: ViewKind, actual: ViewKind },

    #[error(transparent)]
    Circuit(#[from] CircuitError),
}
