// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::circuit::DependencyMap;

/// Turns a topological order into execution batches.
///
/// Every node in a batch has all of its upstream dependencies in earlier
/// batches, so the nodes of one batch may run concurrently. The circuit awaits
/// each batch before starting the next.
pub trait Scheduler: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Partition `order` into batches. `order` is already topologically
    /// sorted and `dependencies` maps each node id to its upstream node ids.
    fn plan(&self, order: &[String], dependencies: &DependencyMap) -> Vec<Vec<String>>;
}

/// One node per batch, in topological order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialScheduler;

impl Scheduler for SequentialScheduler {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn plan(&self, order: &[String], _dependencies: &DependencyMap) -> Vec<Vec<String>> {
        order.iter().map(|id| vec![id.clone()]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_plan_keeps_order() {
        let order = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let plan = SequentialScheduler.plan(&order, &DependencyMap::new());
        assert_eq!(plan, vec![vec!["a"], vec!["b"], vec!["c"]]);
    }

    #[test]
    fn test_sequential_plan_empty() {
        assert!(SequentialScheduler.plan(&[], &DependencyMap::new()).is_empty());
    }
}
