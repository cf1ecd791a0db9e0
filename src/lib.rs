// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod analysis;      // complexity metrics
pub mod backends;      // built-in operations
pub mod circuit;       // node graph, ordering, execution
pub mod config;        // config + operation registry
pub mod dual_view;     // linear ⇄ graph views
pub mod engine;        // schedulers
pub mod errors;        // error handling
pub mod observability;
pub mod traits;        // operation capability contract
pub mod variables;     // global and per-node variables
