// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, VecDeque};

use crate::circuit::DependencyMap;
use crate::engine::Scheduler;

/// Level-by-level scheduler that batches nodes by topological level.
///
/// ## Execution Strategy
///
/// Levels are computed with Kahn's algorithm over a reverse (dependents) map:
/// - Level 0: nodes with no upstream dependencies
/// - Level N: nodes whose dependencies all sit in levels 0..N-1
///
/// Every node of a level runs concurrently and the level completes before the
/// next one starts. Within a level nodes keep their topological order so logs
/// and error reporting stay deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelScheduler;

impl LevelScheduler {
    /// Compute topological levels for the nodes in `order`.
    ///
    /// Dependencies on ids outside `order` are ignored. Any node left over
    /// after the queue drains (only possible if `order` was not a real
    /// topological order) is appended as a final level of its own.
    pub fn compute_levels(order: &[String], dependencies: &DependencyMap) -> Vec<Vec<String>> {
        let position: HashMap<&str, usize> = order.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();

        let mut in_degree: HashMap<&str, usize> = HashMap::with_capacity(order.len());
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::with_capacity(order.len());
        for id in order {
            let upstream = dependencies
                .get(id)
                .map(|deps| deps.iter().filter(|dep| position.contains_key(dep.as_str())).collect::<Vec<_>>())
                .unwrap_or_default();
            in_degree.insert(id.as_str(), upstream.len());
            for dep in upstream {
                dependents.entry(dep.as_str()).or_default().push(id.as_str());
            }
        }

        let mut levels: Vec<Vec<String>> = Vec::new();
        let mut queue: VecDeque<&str> = order
            .iter()
            .map(String::as_str)
            .filter(|id| in_degree.get(id).copied().unwrap_or(0) == 0)
            .collect();
        let mut placed = 0;

        while !queue.is_empty() {
            let mut current: Vec<&str> = queue.drain(..).collect();
            current.sort_by_key(|id| position[id]);

            for id in &current {
                for dependent in dependents.get(id).into_iter().flatten() {
                    if let Some(degree) = in_degree.get_mut(dependent) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(*dependent);
                        }
                    }
                }
            }

            placed += current.len();
            levels.push(current.into_iter().map(str::to_string).collect());
        }

        if placed < order.len() {
            let leftover: Vec<String> = order
                .iter()
                .filter(|id| in_degree.get(id.as_str()).copied().unwrap_or(0) > 0)
                .cloned()
                .collect();
            levels.push(leftover);
        }

        levels
    }
}

impl Scheduler for LevelScheduler {
    fn name(&self) -> &'static str {
        "level"
    }

    fn plan(&self, order: &[String], dependencies: &DependencyMap) -> Vec<Vec<String>> {
        Self::compute_levels(order, dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn deps(pairs: &[(&str, &[&str])]) -> DependencyMap {
        pairs.iter().map(|(id, upstream)| (id.to_string(), ids(upstream))).collect()
    }

    #[test]
    fn test_diamond_levels() {
        // A -> [B, C] -> D
        let order = ids(&["A", "B", "C", "D"]);
        let dependencies = deps(&[("A", &[]), ("B", &["A"]), ("C", &["A"]), ("D", &["B", "C"])]);

        let levels = LevelScheduler.plan(&order, &dependencies);

        assert_eq!(levels, vec![ids(&["A"]), ids(&["B", "C"]), ids(&["D"])]);
    }

    #[test]
    fn test_independent_roots_share_level_zero() {
        let order = ids(&["left", "right", "join"]);
        let dependencies = deps(&[("left", &[]), ("right", &[]), ("join", &["left", "right"])]);

        let levels = LevelScheduler.plan(&order, &dependencies);

        assert_eq!(levels, vec![ids(&["left", "right"]), ids(&["join"])]);
    }

    #[test]
    fn test_level_follows_longest_path() {
        // a -> b -> c, and a -> c directly: c still waits for b.
        let order = ids(&["a", "b", "c"]);
        let dependencies = deps(&[("a", &[]), ("b", &["a"]), ("c", &["a", "b"])]);

        let levels = LevelScheduler.plan(&order, &dependencies);

        assert_eq!(levels, vec![ids(&["a"]), ids(&["b"]), ids(&["c"])]);
    }

    #[test]
    fn test_levels_keep_topological_order() {
        let order = ids(&["z", "y", "x"]);
        let dependencies = deps(&[("z", &[]), ("y", &[]), ("x", &[])]);

        assert_eq!(LevelScheduler.plan(&order, &dependencies), vec![ids(&["z", "y", "x"])]);
    }

    #[test]
    fn test_unsorted_input_still_places_every_node() {
        let order = ids(&["a", "b"]);
        let dependencies = deps(&[("a", &["b"]), ("b", &["a"])]);

        let levels = LevelScheduler.plan(&order, &dependencies);

        assert_eq!(levels.concat().len(), 2);
    }

    #[test]
    fn test_empty_order() {
        assert!(LevelScheduler.plan(&[], &DependencyMap::new()).is_empty());
    }
}
