// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Global and per-node variables.
//!
//! Variables are plain JSON values looked up by name, first in the asking
//! node's own table and then globally. Variable links are recorded for
//! editors and serialization only; circuit execution never reads them.

mod manager;

pub use manager::{Variable, VariableLink, VariableManager, VariableScope, VariableSnapshot};
