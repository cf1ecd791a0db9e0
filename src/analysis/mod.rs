// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural analysis of circuits.
//!
//! The dual-view manager uses these metrics to decide whether a circuit can
//! still be expressed as a linear recipe.

pub mod complexity;

pub use complexity::{analyze, ComplexityMetrics};
