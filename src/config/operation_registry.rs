// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::backends::local::LocalOperationFactory;
use crate::traits::Operation;

/// A registry mapping stable operation names to their implementations.
///
/// Circuits never serialize executable code. A node only carries the name of
/// its operation, and this registry turns the name back into a callable when a
/// circuit is deserialized or a recipe is lifted into a graph.
///
/// Operations are held as `Arc<dyn Operation>` so a circuit can share one
/// instance across many nodes and hand clones to spawned tasks.
///
/// # Examples
///
/// ```
/// use the_circuitboard::config::OperationRegistry;
///
/// let registry = OperationRegistry::with_builtins();
/// assert!(registry.contains_key("to_upper_case"));
/// assert!(registry.get("no_such_operation").is_none());
/// ```
#[derive(Clone, Default)]
pub struct OperationRegistry(pub HashMap<String, Arc<dyn Operation>>);

impl OperationRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Create a registry pre-populated with every local operation
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for operation in LocalOperationFactory::create_all() {
            registry.register(operation);
        }
        registry
    }

    /// Insert an operation under an explicit name
    pub fn insert(&mut self, name: String, operation: Arc<dyn Operation>) {
        self.0.insert(name, operation);
    }

    /// Insert an operation under its own [`Operation::name`]
    pub fn register(&mut self, operation: Arc<dyn Operation>) {
        self.0.insert(operation.name().to_string(), operation);
    }

    /// Get an operation by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Operation>> {
        self.0.get(name)
    }

    /// Check if an operation exists
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Get all registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("operation_count", &self.0.len())
            .field("operation_names", &self.names())
            .finish()
    }
}

impl From<HashMap<String, Arc<dyn Operation>>> for OperationRegistry {
    fn from(map: HashMap<String, Arc<dyn Operation>>) -> Self {
        Self(map)
    }
}

impl From<OperationRegistry> for HashMap<String, Arc<dyn Operation>> {
    fn from(registry: OperationRegistry) -> Self {
        registry.0
    }
}
