// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::config::{Config, Strategy};
use crate::engine::level_by_level::LevelScheduler;
use crate::engine::scheduler::{Scheduler, SequentialScheduler};

/// Factory for creating schedulers from configuration
pub struct SchedulerFactory;

impl SchedulerFactory {
    /// Create a scheduler based on the configuration strategy
    pub fn from_config(cfg: &Config) -> Arc<dyn Scheduler> {
        Self::from_strategy(cfg.strategy)
    }

    pub fn from_strategy(strategy: Strategy) -> Arc<dyn Scheduler> {
        match strategy {
            Strategy::Sequential => Arc::new(SequentialScheduler),
            Strategy::Level => Arc::new(LevelScheduler),
        }
    }
}
