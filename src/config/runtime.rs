// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{Config, OperationRegistry};
use crate::dual_view::DualViewManager;

/// Session builder - wires the operation registry and scheduler strategy from configuration.
///
/// # Examples
///
/// ```
/// use the_circuitboard::config::{Config, RuntimeBuilder};
/// use the_circuitboard::dual_view::ViewKind;
///
/// let manager = RuntimeBuilder::from_config(&Config::default());
/// assert_eq!(manager.current_view(), ViewKind::Uninitialized);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a view manager backed by the built-in operations.
    pub fn from_config(cfg: &Config) -> DualViewManager {
        Self::with_registry(cfg, OperationRegistry::with_builtins())
    }

    /// Build a view manager backed by a caller-supplied registry.
    pub fn with_registry(cfg: &Config, registry: OperationRegistry) -> DualViewManager {
        DualViewManager::new(registry)
            .with_conversion_config(cfg.conversion.clone())
            .with_strategy(cfg.strategy)
    }
}
