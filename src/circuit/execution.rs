// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Circuit execution.
//!
//! ## Execution Strategy
//!
//! 1. **Single flight**: an atomic `is_running` flag rejects overlapping runs
//!    with `AlreadyRunning`; a drop guard clears it on every exit path,
//!    including cancellation of the returned future.
//! 2. **Reset**: every node's runtime state and the results map are cleared.
//! 3. **Seeding**: source nodes named in the source inputs get the value on all
//!    of their output ports and count as executed.
//! 4. **Ordering**: the execution order is recomputed; a cycle aborts before
//!    any node runs.
//! 5. **Batches**: the circuit's [`Scheduler`](crate::engine::Scheduler) turns
//!    the order into batches. Every node of a batch runs on its own tokio task
//!    and the batch waits for all of them. A panicking operation fails its
//!    node; tasks still in flight are aborted when the batch fails or the
//!    `execute` future is dropped.
//! 6. **Results**: every sink (or output-less node) contributes
//!    `{ data: <its input data> }` keyed by node id.
//!
//! Execution is all-or-nothing. The first failing node aborts the run and its
//! error is returned wrapped in `NodeExecution`; nodes that already ran keep
//! their runtime state until the next `execute`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::task::{AbortHandle, JoinError};
use tracing::Instrument;

use crate::circuit::{Circuit, Node, NodeKind};
use crate::config::consts::DEFAULT_INPUT_PORT;
use crate::errors::{CircuitError, OperationError};
use crate::observability::messages::circuit::{
    ExecutionCompleted, ExecutionFailed, ExecutionStarted, NodeExecuted, NodeExecutionFailed, SourceInputIgnored,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{Operation, OperationInput, Parameters};

/// Values seeding source nodes, keyed by source node id.
pub type SourceInputs = HashMap<String, Value>;

/// What a result node hands back after a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SinkResult {
    pub data: Map<String, Value>,
}

/// Results of a successful run, keyed by sink node id.
pub type ExecutionResults = HashMap<String, SinkResult>;

/// Holds the `is_running` flag for the duration of one `execute`.
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CircuitError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CircuitError::AlreadyRunning)?;
        Ok(Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Everything needed to run one node's operation, detached from the circuit
/// so it can be moved onto a spawned task.
struct NodeInvocation {
    operation: Option<Arc<dyn Operation>>,
    input: OperationInput,
    parameters: Parameters,
    forward_input: bool,
}

impl NodeInvocation {
    /// `Ok(None)` means the node produced nothing to distribute.
    async fn invoke(self) -> Result<Option<Value>, OperationError> {
        match self.operation {
            Some(operation) => operation.run(self.input, &self.parameters).await.map(Some),
            None if self.forward_input => Ok(Some(self.input.into_value())),
            None => Ok(None),
        }
    }
}

impl Circuit {
    /// Run the whole circuit once.
    ///
    /// # Errors
    /// - `AlreadyRunning` if another `execute` on this circuit has not returned
    /// - `CircularDependency` if the graph has a cycle (nothing runs)
    /// - `NodeExecution` for the first node whose operation fails
    pub async fn execute(&self, source_inputs: SourceInputs) -> Result<ExecutionResults, CircuitError> {
        let _guard = RunGuard::acquire(&self.is_running)?;
        let started_at = Instant::now();

        self.reset_run_state();
        self.seed_sources(&source_inputs);
        let order = self.calculate_execution_order()?;

        let start_msg = ExecutionStarted {
            strategy: self.scheduler.name(),
            node_count: self.node_count(),
            connection_count: self.connection_count(),
        };
        start_msg.log();
        let span = start_msg.span("circuit_execution");

        let batches = self.scheduler.plan(&order, &self.dependency_map());
        let outcome = async {
            for batch in &batches {
                self.execute_batch(batch).await?;
            }
            Ok::<(), CircuitError>(())
        }
        .instrument(span)
        .await;

        if let Err(error) = outcome {
            ExecutionFailed {
                strategy: self.scheduler.name(),
                error: &error,
            }
            .log();
            return Err(error);
        }

        let results = self.collect_results();
        *self.results_guard() = results.clone();

        ExecutionCompleted {
            strategy: self.scheduler.name(),
            node_count: self.node_count(),
            result_count: results.len(),
            duration: started_at.elapsed(),
        }
        .log();

        Ok(results)
    }

    /// Run a single node against whatever its upstream nodes currently hold.
    pub async fn execute_node(&self, id: &str) -> Result<(), CircuitError> {
        let invocation = self.prepare_invocation(id)?;
        let started_at = Instant::now();
        let task = tokio::spawn(invocation.invoke());
        let _abort = AbortOnDrop(vec![task.abort_handle()]);
        self.complete_node(id, join_outcome(task.await), started_at)
    }

    /// Gather a node's inputs from the outputs of its upstream nodes.
    ///
    /// For every connection ending at `id`, the upstream node's value on the
    /// connection's output port is copied to the connection's input port.
    /// Ports whose upstream value is missing are left out.
    pub fn collect_input_data(&self, id: &str) -> Result<Map<String, Value>, CircuitError> {
        if !self.contains_node(id) {
            return Err(CircuitError::NodeNotFound(id.to_string()));
        }

        let mut inputs = Map::new();
        for connection in self.incoming(id) {
            let Some(upstream) = self.node(&connection.from) else {
                continue;
            };
            if let Some(value) = upstream.state().output_data.get(&connection.from_port) {
                inputs.insert(connection.to_port.clone(), value.clone());
            }
        }
        Ok(inputs)
    }

    /// Results of the last successful run; empty after a failed or reset run.
    pub fn results(&self) -> ExecutionResults {
        self.results_guard().clone()
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Acquire)
    }

    async fn execute_batch(&self, batch: &[String]) -> Result<(), CircuitError> {
        let pending: Vec<&str> = batch
            .iter()
            .map(String::as_str)
            .filter(|id| self.node(id).is_some_and(|node| !node.is_executed()))
            .collect();

        let mut tasks = Vec::with_capacity(pending.len());
        let mut abort = AbortOnDrop(Vec::with_capacity(pending.len()));
        for id in pending {
            let invocation = self.prepare_invocation(id)?;
            let task = tokio::spawn(invocation.invoke());
            abort.0.push(task.abort_handle());
            tasks.push((id, Instant::now(), task));
        }

        for (node_id, started_at, task) in tasks {
            self.complete_node(node_id, join_outcome(task.await), started_at)?;
        }
        Ok(())
    }

    fn prepare_invocation(&self, id: &str) -> Result<NodeInvocation, CircuitError> {
        let node = self.node(id).ok_or_else(|| CircuitError::NodeNotFound(id.to_string()))?;
        let inputs = self.collect_input_data(id)?;
        node.state().input_data = inputs.clone();

        let input = if node.has_conventional_input() {
            OperationInput::Single(inputs.get(DEFAULT_INPUT_PORT).cloned().unwrap_or(Value::Null))
        } else {
            OperationInput::Ports(inputs)
        };

        Ok(NodeInvocation {
            operation: node.operation().cloned(),
            input,
            parameters: node.parameters().clone(),
            forward_input: node.has_conventional_input() && node.has_conventional_output(),
        })
    }

    fn complete_node(
        &self,
        id: &str,
        outcome: Result<Option<Value>, OperationError>,
        started_at: Instant,
    ) -> Result<(), CircuitError> {
        let node = self.node(id).ok_or_else(|| CircuitError::NodeNotFound(id.to_string()))?;

        let distributed = outcome.and_then(|value| match value {
            Some(value) => distribute_outputs(node, value),
            None => Ok(Map::new()),
        });

        match distributed {
            Ok(outputs) => {
                let mut state = node.state();
                state.output_data = outputs;
                state.executed = true;
                state.error = None;
                drop(state);

                NodeExecuted {
                    node_id: id,
                    operation: node.operation_name(),
                    duration: started_at.elapsed(),
                }
                .log();
                Ok(())
            }
            Err(source) => {
                node.state().error = Some(source.to_string());
                NodeExecutionFailed {
                    node_id: id,
                    error: &source,
                }
                .log();
                Err(CircuitError::NodeExecution {
                    node_id: id.to_string(),
                    source,
                })
            }
        }
    }

    fn reset_run_state(&self) {
        for node in &self.nodes {
            *node.state() = Default::default();
        }
        self.results_guard().clear();
    }

    fn seed_sources(&self, source_inputs: &SourceInputs) {
        for (id, value) in source_inputs {
            let Some(node) = self.node(id).filter(|node| node.kind() == NodeKind::Source) else {
                SourceInputIgnored { node_id: id }.log();
                continue;
            };

            let mut state = node.state();
            for port in node.outputs() {
                state.output_data.insert(port.clone(), value.clone());
            }
            state.executed = true;
        }
    }

    fn collect_results(&self) -> ExecutionResults {
        self.nodes
            .iter()
            .filter(|node| node.is_result_node())
            .map(|node| {
                (
                    node.id().to_string(),
                    SinkResult {
                        data: node.state().input_data.clone(),
                    },
                )
            })
            .collect()
    }

    fn results_guard(&self) -> MutexGuard<'_, ExecutionResults> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Aborts the node tasks of a batch when the batch stops waiting on them,
/// whether through an error or through the `execute` future being dropped.
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// A panicking or aborted operation task fails its node like any other error.
fn join_outcome(
    joined: Result<Result<Option<Value>, OperationError>, JoinError>,
) -> Result<Option<Value>, OperationError> {
    joined.unwrap_or_else(|join_error| Err(OperationError::Failed(format!("task join error: {}", join_error))))
}

/// Spread an operation result over the node's declared output ports.
///
/// A single conventional `output` port takes the whole value. Any other port
/// layout requires a JSON object; keys that are not declared outputs are
/// ignored and undeclared ports are simply left empty.
fn distribute_outputs(node: &Node, value: Value) -> Result<Map<String, Value>, OperationError> {
    let mut outputs = Map::new();

    if node.has_conventional_output() {
        outputs.insert(node.outputs()[0].clone(), value);
        return Ok(outputs);
    }
    if node.outputs().is_empty() {
        return Ok(outputs);
    }

    let Value::Object(mut produced) = value else {
        return Err(OperationError::Failed(format!(
            "node declares outputs [{}] but the operation did not return an object",
            node.outputs().join(", ")
        )));
    };

    for port in node.outputs() {
        if let Some(port_value) = produced.remove(port) {
            outputs.insert(port.clone(), port_value);
        }
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::NodeSpec;
    use serde_json::json;

    #[test]
    fn test_run_guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _guard = RunGuard::acquire(&flag).unwrap();
            assert!(matches!(RunGuard::acquire(&flag), Err(CircuitError::AlreadyRunning)));
        }
        assert!(!flag.load(Ordering::Acquire));
        assert!(RunGuard::acquire(&flag).is_ok());
    }

    #[test]
    fn test_distribute_single_output() {
        let node = Node::new("n".to_string(), NodeSpec::new(NodeKind::Processor).with_outputs(["output"]));
        let outputs = distribute_outputs(&node, json!("x")).unwrap();
        assert_eq!(outputs.get("output"), Some(&json!("x")));
    }

    #[test]
    fn test_distribute_multi_output_filters_keys() {
        let node = Node::new("n".to_string(), NodeSpec::new(NodeKind::Processor).with_outputs(["a", "b"]));
        let outputs = distribute_outputs(&node, json!({"a": 1, "c": 3})).unwrap();
        assert_eq!(Value::Object(outputs), json!({"a": 1}));
    }

    #[test]
    fn test_distribute_multi_output_requires_object() {
        let node = Node::new("n".to_string(), NodeSpec::new(NodeKind::Processor).with_outputs(["a", "b"]));
        assert!(distribute_outputs(&node, json!("flat")).is_err());
    }

    #[test]
    fn test_single_non_conventional_output_expects_object() {
        let node = Node::new("n".to_string(), NodeSpec::new(NodeKind::Processor).with_outputs(["digest"]));
        let outputs = distribute_outputs(&node, json!({"digest": "abc"})).unwrap();
        assert_eq!(outputs.get("digest"), Some(&json!("abc")));
    }

    #[tokio::test]
    async fn test_invocation_without_operation_forwards_input() {
        let invocation = NodeInvocation {
            operation: None,
            input: OperationInput::Single(json!("v")),
            parameters: Parameters::new(),
            forward_input: true,
        };
        assert_eq!(invocation.invoke().await.unwrap(), Some(json!("v")));
    }
}
