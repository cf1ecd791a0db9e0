// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Linear and graph views of the same processing chain.
//!
//! A [`LinearRecipe`] is an ordered list of operations. The
//! [`DualViewManager`] lifts a recipe into a [`Circuit`](crate::circuit::Circuit)
//! and, while the circuit stays a plain chain, flattens it back. Once the
//! circuit grows a loop, a branch, a conditional node or too many nodes the
//! manager engages a conversion lock that only a fresh initialization clears.

use serde::Serialize;
use std::fmt;

mod manager;
pub mod recipe;


pub use manager::DualViewManager;
pub use recipe::{LinearRecipe, RecipeMetadata, RecipeOperation};

/// Which representation the manager currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Uninitialized,
    Linear,
    Graph,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Uninitialized => "uninitialized",
            ViewKind::Linear => "linear",
            ViewKind::Graph => "graph",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
