// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::errors::VariableError;
use crate::observability::messages::variables::VariablesImported;
use crate::observability::messages::StructuredLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableScope {
    Global,
    Node,
}

/// One stored variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    pub value: Value,
    pub scope: VariableScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    /// When the value was last written.
    pub timestamp: DateTime<Utc>,
}

/// Declares that `to_node.input` should receive `from_node`'s `variable`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableLink {
    pub from_node: String,
    pub variable: String,
    pub to_node: String,
    pub input: String,
}

/// Serializable copy of a [`VariableManager`]'s contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableSnapshot {
    #[serde(default)]
    pub global: Vec<Variable>,
    #[serde(default)]
    pub nodes: BTreeMap<String, Vec<Variable>>,
    #[serde(default)]
    pub links: Vec<VariableLink>,
}

/// Variable store for one circuit or session.
///
/// Values handed out are clones; two nodes never share a value.
///
/// # Examples
///
/// ```
/// use the_circuitboard::variables::{VariableManager, VariableScope};
/// use serde_json::json;
///
/// let mut vars = VariableManager::new();
/// vars.set_variable("key", json!("global"), VariableScope::Global, None).unwrap();
/// vars.set_variable("key", json!("local"), VariableScope::Node, Some("cipher")).unwrap();
///
/// assert_eq!(vars.get_variable("key", Some("cipher")), Some(json!("local")));
/// assert_eq!(vars.get_variable("key", Some("other")), Some(json!("global")));
/// ```
#[derive(Debug, Default)]
pub struct VariableManager {
    global: HashMap<String, Variable>,
    nodes: HashMap<String, HashMap<String, Variable>>,
    links: Vec<VariableLink>,
}

impl VariableManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite a variable.
    ///
    /// # Errors
    /// `MissingNodeId` when `scope` is `Node` and no node id is given.
    pub fn set_variable(
        &mut self,
        name: impl Into<String>,
        value: Value,
        scope: VariableScope,
        node_id: Option<&str>,
    ) -> Result<(), VariableError> {
        let name = name.into();
        let table = match (scope, node_id) {
            (VariableScope::Global, _) => &mut self.global,
            (VariableScope::Node, Some(node_id)) => self.nodes.entry(node_id.to_string()).or_default(),
            (VariableScope::Node, None) => return Err(VariableError::MissingNodeId(name)),
        };

        let variable = Variable {
            name: name.clone(),
            value,
            scope,
            node_id: match scope {
                VariableScope::Global => None,
                VariableScope::Node => node_id.map(str::to_string),
            },
            timestamp: Utc::now(),
        };
        table.insert(name, variable);
        Ok(())
    }

    /// Look a value up, preferring the node's own variable over a global one.
    pub fn get_variable(&self, name: &str, node_id: Option<&str>) -> Option<Value> {
        self.get_variable_entry(name, node_id).map(|variable| variable.value.clone())
    }

    pub fn get_variable_entry(&self, name: &str, node_id: Option<&str>) -> Option<&Variable> {
        node_id
            .and_then(|id| self.nodes.get(id))
            .and_then(|table| table.get(name))
            .or_else(|| self.global.get(name))
    }

    /// Returns false if there was nothing to remove.
    pub fn remove_variable(&mut self, name: &str, scope: VariableScope, node_id: Option<&str>) -> bool {
        match (scope, node_id) {
            (VariableScope::Global, _) => self.global.remove(name).is_some(),
            (VariableScope::Node, Some(node_id)) => {
                let Some(table) = self.nodes.get_mut(node_id) else {
                    return false;
                };
                let removed = table.remove(name).is_some();
                if table.is_empty() {
                    self.nodes.remove(node_id);
                }
                removed
            }
            (VariableScope::Node, None) => false,
        }
    }

    /// Drop every variable owned by `node_id`; returns how many were removed.
    pub fn clear_node(&mut self, node_id: &str) -> usize {
        self.nodes.remove(node_id).map_or(0, |table| table.len())
    }

    /// Record a link. Nothing evaluates links; they are kept for callers and
    /// snapshots. Returns false if the same link already exists.
    pub fn connect_variable(
        &mut self,
        from_node: impl Into<String>,
        variable: impl Into<String>,
        to_node: impl Into<String>,
        input: impl Into<String>,
    ) -> bool {
        let link = VariableLink {
            from_node: from_node.into(),
            variable: variable.into(),
            to_node: to_node.into(),
            input: input.into(),
        };
        if self.links.contains(&link) {
            return false;
        }
        self.links.push(link);
        true
    }

    pub fn variable_links(&self) -> &[VariableLink] {
        &self.links
    }

    pub fn links_into<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a VariableLink> + 'a {
        self.links.iter().filter(move |link| link.to_node == node_id)
    }

    /// Global variables sorted by name.
    pub fn global_variables(&self) -> Vec<&Variable> {
        sorted(self.global.values())
    }

    /// A node's own variables sorted by name.
    pub fn node_variables(&self, node_id: &str) -> Vec<&Variable> {
        self.nodes.get(node_id).map(|table| sorted(table.values())).unwrap_or_default()
    }

    pub fn export(&self) -> VariableSnapshot {
        VariableSnapshot {
            global: self.global_variables().into_iter().cloned().collect(),
            nodes: self
                .nodes
                .iter()
                .map(|(node_id, table)| (node_id.clone(), sorted(table.values()).into_iter().cloned().collect()))
                .collect(),
            links: self.links.clone(),
        }
    }

    /// Replace the current contents with `snapshot`.
    ///
    /// Node variables are filed under the snapshot's map key; a stored
    /// `node_id` that disagrees with it is overwritten.
    pub fn import(&mut self, snapshot: VariableSnapshot) {
        VariablesImported {
            variable_count: snapshot.global.len() + snapshot.nodes.values().map(Vec::len).sum::<usize>(),
            link_count: snapshot.links.len(),
        }
        .log();

        self.global = snapshot
            .global
            .into_iter()
            .map(|mut variable| {
                variable.scope = VariableScope::Global;
                variable.node_id = None;
                (variable.name.clone(), variable)
            })
            .collect();

        self.nodes = snapshot
            .nodes
            .into_iter()
            .map(|(node_id, variables)| {
                let table = variables
                    .into_iter()
                    .map(|mut variable| {
                        variable.scope = VariableScope::Node;
                        variable.node_id = Some(node_id.clone());
                        (variable.name.clone(), variable)
                    })
                    .collect();
                (node_id, table)
            })
            .collect();

        self.links = snapshot.links;
    }
}

fn sorted<'a>(variables: impl Iterator<Item = &'a Variable>) -> Vec<&'a Variable> {
    let mut variables: Vec<&Variable> = variables.collect();
    variables.sort_by(|a, b| a.name.cmp(&b.name));
    variables
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_scope_requires_node_id() {
        let mut vars = VariableManager::new();
        assert_eq!(
            vars.set_variable("k", json!(1), VariableScope::Node, None),
            Err(VariableError::MissingNodeId("k".to_string()))
        );
        assert!(vars.get_variable("k", None).is_none());
    }

    #[test]
    fn test_node_value_shadows_global() {
        let mut vars = VariableManager::new();
        vars.set_variable("shift", json!(3), VariableScope::Global, None).unwrap();
        vars.set_variable("shift", json!(13), VariableScope::Node, Some("rot")).unwrap();

        assert_eq!(vars.get_variable("shift", Some("rot")), Some(json!(13)));
        assert_eq!(vars.get_variable("shift", Some("other")), Some(json!(3)));
        assert_eq!(vars.get_variable("shift", None), Some(json!(3)));

        let entry = vars.get_variable_entry("shift", Some("rot")).unwrap();
        assert_eq!(entry.scope, VariableScope::Node);
        assert_eq!(entry.node_id.as_deref(), Some("rot"));
    }

    #[test]
    fn test_global_ignores_node_id() {
        let mut vars = VariableManager::new();
        vars.set_variable("g", json!("v"), VariableScope::Global, Some("n")).unwrap();

        assert!(vars.node_variables("n").is_empty());
        assert_eq!(vars.global_variables()[0].node_id, None);
    }

    #[test]
    fn test_overwrite_refreshes_timestamp() {
        let mut vars = VariableManager::new();
        vars.set_variable("k", json!(1), VariableScope::Global, None).unwrap();
        let first = vars.get_variable_entry("k", None).unwrap().timestamp;
        vars.set_variable("k", json!(2), VariableScope::Global, None).unwrap();

        let entry = vars.get_variable_entry("k", None).unwrap();
        assert_eq!(entry.value, json!(2));
        assert!(entry.timestamp >= first);
        assert_eq!(vars.global_variables().len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut vars = VariableManager::new();
        vars.set_variable("a", json!(1), VariableScope::Node, Some("n")).unwrap();
        vars.set_variable("b", json!(2), VariableScope::Node, Some("n")).unwrap();
        vars.set_variable("c", json!(3), VariableScope::Global, None).unwrap();

        assert!(vars.remove_variable("a", VariableScope::Node, Some("n")));
        assert!(!vars.remove_variable("a", VariableScope::Node, Some("n")));
        assert!(!vars.remove_variable("b", VariableScope::Node, None));
        assert_eq!(vars.clear_node("n"), 1);
        assert_eq!(vars.clear_node("n"), 0);
        assert!(vars.remove_variable("c", VariableScope::Global, None));
        assert!(vars.global_variables().is_empty());
    }

    #[test]
    fn test_links_are_recorded_once() {
        let mut vars = VariableManager::new();
        assert!(vars.connect_variable("a", "key", "b", "input"));
        assert!(!vars.connect_variable("a", "key", "b", "input"));
        assert!(vars.connect_variable("c", "iv", "b", "iv"));
        assert!(vars.connect_variable("b", "out", "d", "input"));

        assert_eq!(vars.variable_links().len(), 3);
        let into_b: Vec<&str> = vars.links_into("b").map(|link| link.from_node.as_str()).collect();
        assert_eq!(into_b, vec!["a", "c"]);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut vars = VariableManager::new();
        vars.set_variable("z", json!("last"), VariableScope::Global, None).unwrap();
        vars.set_variable("a", json!("first"), VariableScope::Global, None).unwrap();
        vars.set_variable("key", json!([1, 2]), VariableScope::Node, Some("n1")).unwrap();
        vars.connect_variable("n1", "key", "n2", "input");

        let snapshot = vars.export();
        assert_eq!(
            snapshot.global.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "z"]
        );

        let json = serde_json::to_string(&snapshot).unwrap();
        let mut restored = VariableManager::new();
        restored.set_variable("stale", json!(0), VariableScope::Global, None).unwrap();
        restored.import(serde_json::from_str(&json).unwrap());

        assert_eq!(restored.export(), snapshot);
        assert!(restored.get_variable("stale", None).is_none());
        assert_eq!(restored.get_variable("key", Some("n1")), Some(json!([1, 2])));
    }
}
