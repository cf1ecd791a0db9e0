use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::backends::local::{ChangeTextCaseOperation, JoinTextOperation, ReverseTextOperation, TextStatisticsOperation};
use crate::circuit::{Circuit, NodeKind, NodeSpec, SourceInputs};
use crate::engine::{LevelScheduler, Scheduler, SequentialScheduler};
use crate::errors::{CircuitError, OperationError};
use crate::traits::{Operation, OperationInput, Parameters};

/// Integration tests for circuit execution using real local operations
#[cfg(test)]
mod tests {
    use super::*;

    struct FailingOperation;

    #[async_trait]
    impl Operation for FailingOperation {
        async fn run(&self, _input: OperationInput, _parameters: &Parameters) -> Result<Value, OperationError> {
            Err(OperationError::Failed("boom".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct SlowOperation(Duration);

    #[async_trait]
    impl Operation for SlowOperation {
        async fn run(&self, input: OperationInput, _parameters: &Parameters) -> Result<Value, OperationError> {
            tokio::time::sleep(self.0).await;
            Ok(input.into_value())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    struct PanickingOperation;

    #[async_trait]
    impl Operation for PanickingOperation {
        async fn run(&self, _input: OperationInput, _parameters: &Parameters) -> Result<Value, OperationError> {
            panic!("operation panicked")
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    /// Sleeps, then records that it ran to completion.
    struct MarkingOperation {
        delay: Duration,
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Operation for MarkingOperation {
        async fn run(&self, input: OperationInput, _parameters: &Parameters) -> Result<Value, OperationError> {
            tokio::time::sleep(self.delay).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(input.into_value())
        }

        fn name(&self) -> &str {
            "marking"
        }
    }

    fn inputs(pairs: &[(&str, &str)]) -> SourceInputs {
        pairs
            .iter()
            .map(|(id, value)| (id.to_string(), json!(value)))
            .collect()
    }

    /// text_input -> upper -> output, where the sink's single input port is named `output`.
    fn uppercase_circuit(operation: Arc<dyn Operation>) -> Circuit {
        let mut circuit = Circuit::new();
        circuit.add_node("text_input", NodeSpec::source()).unwrap();
        circuit.add_node("upper", NodeSpec::processor(operation)).unwrap();
        circuit
            .add_node("output", NodeSpec::new(NodeKind::Sink).with_inputs(["output"]))
            .unwrap();
        circuit.connect("text_input", "output", "upper", "input").unwrap();
        circuit.connect("upper", "output", "output", "output").unwrap();
        circuit
    }

    #[tokio::test]
    async fn test_uppercase_pipeline() {
        let circuit = uppercase_circuit(Arc::new(ChangeTextCaseOperation::upper()));

        let results = circuit.execute(inputs(&[("text_input", "hello")])).await.unwrap();

        assert_eq!(
            serde_json::to_value(&results).unwrap(),
            json!({ "output": { "data": { "output": "HELLO" } } })
        );
        assert_eq!(circuit.results(), results);
        assert!(!circuit.is_running());
    }

    #[tokio::test]
    async fn test_failing_operation_aborts_execution() {
        let circuit = uppercase_circuit(Arc::new(FailingOperation));

        let result = circuit.execute(inputs(&[("text_input", "hello")])).await;

        match result {
            Err(CircuitError::NodeExecution { node_id, source }) => {
                assert_eq!(node_id, "upper");
                assert_eq!(source, OperationError::Failed("boom".to_string()));
            }
            other => panic!("Expected NodeExecution error, got {:?}", other),
        }
        assert!(circuit.results().is_empty());
        assert_eq!(circuit.node("upper").unwrap().last_error().as_deref(), Some("boom"));
        assert!(!circuit.node("output").unwrap().is_executed());
        assert!(!circuit.is_running());
    }

    #[tokio::test]
    async fn test_rerun_after_failure_clears_state() {
        let mut circuit = uppercase_circuit(Arc::new(FailingOperation));
        assert!(circuit.execute(inputs(&[("text_input", "x")])).await.is_err());

        assert!(circuit.remove_node("upper"));
        circuit.connect("text_input", "output", "output", "output").unwrap();

        let results = circuit.execute(inputs(&[("text_input", "x")])).await.unwrap();
        assert_eq!(results["output"].data["output"], json!("x"));
        assert!(circuit.node("text_input").unwrap().last_error().is_none());
    }

    #[tokio::test]
    async fn test_second_execute_while_running_is_rejected() {
        let circuit = uppercase_circuit(Arc::new(SlowOperation(Duration::from_millis(50))));

        let (first, second) = tokio::join!(
            circuit.execute(inputs(&[("text_input", "a")])),
            circuit.execute(inputs(&[("text_input", "b")])),
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(CircuitError::AlreadyRunning)));
        assert!(!circuit.is_running());
    }

    #[tokio::test]
    async fn test_cancelled_execution_releases_running_flag() {
        let circuit = uppercase_circuit(Arc::new(SlowOperation(Duration::from_secs(5))));

        let timed_out = tokio::time::timeout(
            Duration::from_millis(10),
            circuit.execute(inputs(&[("text_input", "a")])),
        )
        .await;

        assert!(timed_out.is_err());
        assert!(!circuit.is_running());
    }

    #[tokio::test]
    async fn test_cycle_prevents_any_execution() {
        let mut circuit = Circuit::new();
        let spec = NodeSpec::processor(Arc::new(ReverseTextOperation::new()));
        circuit.add_node("a", spec.clone()).unwrap();
        circuit.add_node("b", spec).unwrap();
        circuit.connect("a", "output", "b", "input").unwrap();
        circuit.connect("b", "output", "a", "input").unwrap();

        let result = circuit.execute(SourceInputs::new()).await;

        assert!(matches!(result, Err(CircuitError::CircularDependency { .. })));
        assert!(circuit.nodes().all(|node| !node.is_executed()));
        assert!(!circuit.is_running());
    }

    fn fan_in_fan_out() -> Circuit {
        let mut circuit = Circuit::new();
        circuit.add_node("left", NodeSpec::source()).unwrap();
        circuit.add_node("right", NodeSpec::source()).unwrap();
        circuit
            .add_node(
                "join",
                NodeSpec::processor(Arc::new(JoinTextOperation::new()))
                    .with_inputs(["a", "b"])
                    .with_parameter("separator", json!(" ")),
            )
            .unwrap();
        circuit
            .add_node(
                "stats",
                NodeSpec::analysis(Arc::new(TextStatisticsOperation::new())).with_outputs(["chars", "words"]),
            )
            .unwrap();
        circuit
            .add_node("reverse", NodeSpec::processor(Arc::new(ReverseTextOperation::new())))
            .unwrap();
        circuit
            .add_node("summary", NodeSpec::new(NodeKind::Sink).with_inputs(["chars", "words"]))
            .unwrap();
        circuit.add_node("text", NodeSpec::sink()).unwrap();

        circuit.connect("left", "output", "join", "a").unwrap();
        circuit.connect("right", "output", "join", "b").unwrap();
        circuit.connect("join", "output", "stats", "input").unwrap();
        circuit.connect("join", "output", "reverse", "input").unwrap();
        circuit.connect("stats", "chars", "summary", "chars").unwrap();
        circuit.connect("stats", "words", "summary", "words").unwrap();
        circuit.connect("reverse", "output", "text", "input").unwrap();
        circuit
    }

    #[tokio::test]
    async fn test_multi_port_nodes() {
        let circuit = fan_in_fan_out();

        let results = circuit
            .execute(inputs(&[("left", "hello"), ("right", "world")]))
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(
            serde_json::to_value(&results["summary"].data).unwrap(),
            json!({"chars": 11, "words": 2})
        );
        assert_eq!(results["text"].data["input"], json!("dlrow olleh"));
        assert_eq!(
            circuit.node("join").unwrap().input_data().get("b"),
            Some(&json!("world"))
        );
    }

    #[tokio::test]
    async fn test_level_scheduler_matches_sequential() {
        let sequential = fan_in_fan_out();
        let mut level = fan_in_fan_out();
        level.set_scheduler(Arc::new(LevelScheduler));

        let source = inputs(&[("left", "one"), ("right", "two three")]);
        let expected = sequential.execute(source.clone()).await.unwrap();
        let actual = level.execute(source).await.unwrap();

        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_level_scheduler_aborts_on_failure() {
        let mut circuit = Circuit::with_scheduler(Arc::new(LevelScheduler));
        circuit.add_node("in", NodeSpec::source()).unwrap();
        circuit
            .add_node("slow", NodeSpec::processor(Arc::new(SlowOperation(Duration::from_millis(5)))))
            .unwrap();
        circuit.add_node("bad", NodeSpec::processor(Arc::new(FailingOperation))).unwrap();
        circuit.add_node("out", NodeSpec::sink()).unwrap();
        circuit.connect("in", "output", "slow", "input").unwrap();
        circuit.connect("in", "output", "bad", "input").unwrap();
        circuit.connect("slow", "output", "out", "input").unwrap();

        let result = circuit.execute(inputs(&[("in", "x")])).await;

        assert!(matches!(result, Err(CircuitError::NodeExecution { node_id, .. }) if node_id == "bad"));
        assert!(circuit.results().is_empty());
    }

    /// in -> {boom, copy}, each feeding its own sink.
    fn panicking_fan_out(scheduler: Arc<dyn Scheduler>) -> Circuit {
        let mut circuit = Circuit::with_scheduler(scheduler);
        circuit.add_node("in", NodeSpec::source()).unwrap();
        circuit.add_node("boom", NodeSpec::processor(Arc::new(PanickingOperation))).unwrap();
        circuit
            .add_node("copy", NodeSpec::processor(Arc::new(ReverseTextOperation::new())))
            .unwrap();
        circuit.add_node("boom_out", NodeSpec::sink()).unwrap();
        circuit.add_node("copy_out", NodeSpec::sink()).unwrap();
        circuit.connect("in", "output", "boom", "input").unwrap();
        circuit.connect("in", "output", "copy", "input").unwrap();
        circuit.connect("boom", "output", "boom_out", "input").unwrap();
        circuit.connect("copy", "output", "copy_out", "input").unwrap();
        circuit
    }

    #[tokio::test]
    async fn test_panicking_operation_fails_node_under_every_scheduler() {
        let schedulers: Vec<Arc<dyn Scheduler>> = vec![Arc::new(SequentialScheduler), Arc::new(LevelScheduler)];

        for scheduler in schedulers {
            let name = scheduler.name();
            let circuit = panicking_fan_out(scheduler);

            let result = circuit.execute(inputs(&[("in", "x")])).await;

            match result {
                Err(CircuitError::NodeExecution { node_id, source }) => {
                    assert_eq!(node_id, "boom", "scheduler {}", name);
                    assert!(source.to_string().contains("panicked"), "scheduler {}: {}", name, source);
                }
                other => panic!("scheduler {}: expected NodeExecution error, got {:?}", name, other),
            }
            assert!(circuit.results().is_empty());
            assert!(circuit.node("boom").unwrap().last_error().is_some());
            assert!(!circuit.is_running());
        }
    }

    #[tokio::test]
    async fn test_panicking_operation_fails_execute_node() {
        let circuit = panicking_fan_out(Arc::new(SequentialScheduler));

        let result = circuit.execute_node("boom").await;

        assert!(matches!(result, Err(CircuitError::NodeExecution { node_id, .. }) if node_id == "boom"));
    }

    #[tokio::test]
    async fn test_cancelled_level_batch_aborts_running_tasks() {
        let finished = Arc::new(AtomicBool::new(false));
        let marking = MarkingOperation {
            delay: Duration::from_millis(50),
            finished: finished.clone(),
        };

        let mut circuit = Circuit::with_scheduler(Arc::new(LevelScheduler));
        circuit.add_node("in", NodeSpec::source()).unwrap();
        circuit.add_node("marker", NodeSpec::processor(Arc::new(marking))).unwrap();
        circuit
            .add_node("slow", NodeSpec::processor(Arc::new(SlowOperation(Duration::from_millis(50)))))
            .unwrap();
        circuit.add_node("out", NodeSpec::sink()).unwrap();
        circuit.connect("in", "output", "marker", "input").unwrap();
        circuit.connect("in", "output", "slow", "input").unwrap();
        circuit.connect("slow", "output", "out", "input").unwrap();

        let timed_out = tokio::time::timeout(Duration::from_millis(10), circuit.execute(inputs(&[("in", "a")]))).await;
        assert!(timed_out.is_err());
        assert!(!circuit.is_running());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_unseeded_source_and_unknown_inputs() {
        let circuit = uppercase_circuit(Arc::new(ChangeTextCaseOperation::upper()));

        // No value for text_input: the upper operation sees null and rejects it.
        let result = circuit.execute(inputs(&[("not_a_node", "x")])).await;
        assert!(matches!(result, Err(CircuitError::NodeExecution { node_id, .. }) if node_id == "upper"));
    }

    #[tokio::test]
    async fn test_non_source_ids_are_not_seeded() {
        let circuit = uppercase_circuit(Arc::new(ChangeTextCaseOperation::upper()));

        let results = circuit
            .execute(inputs(&[("text_input", "abc"), ("upper", "ignored")]))
            .await
            .unwrap();
        assert_eq!(results["output"].data["output"], json!("ABC"));
    }

    #[tokio::test]
    async fn test_node_without_operation_passes_through() {
        let mut circuit = Circuit::new();
        circuit.add_node("in", NodeSpec::source()).unwrap();
        circuit
            .add_node(
                "placeholder",
                NodeSpec::new(NodeKind::Processor)
                    .with_inputs(["input"])
                    .with_outputs(["output"])
                    .with_operation_name("missing_operation"),
            )
            .unwrap();
        circuit.add_node("out", NodeSpec::sink()).unwrap();
        circuit.connect("in", "output", "placeholder", "input").unwrap();
        circuit.connect("placeholder", "output", "out", "input").unwrap();

        let results = circuit.execute(inputs(&[("in", "same")])).await.unwrap();
        assert_eq!(results["out"].data["input"], json!("same"));
    }

    #[tokio::test]
    async fn test_execute_node_step_by_step() {
        let circuit = uppercase_circuit(Arc::new(ChangeTextCaseOperation::upper()));
        circuit.execute(inputs(&[("text_input", "step")])).await.unwrap();

        circuit.execute_node("upper").await.unwrap();
        assert_eq!(
            circuit.node("upper").unwrap().output_data().get("output"),
            Some(&json!("STEP"))
        );
        assert!(matches!(
            circuit.execute_node("ghost").await,
            Err(CircuitError::NodeNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_collect_input_data_copies_upstream_outputs() {
        let circuit = fan_in_fan_out();
        circuit
            .execute(inputs(&[("left", "l"), ("right", "r")]))
            .await
            .unwrap();

        let collected = circuit.collect_input_data("join").unwrap();
        assert_eq!(serde_json::to_value(collected).unwrap(), json!({"a": "l", "b": "r"}));
    }

    #[tokio::test]
    async fn test_round_tripped_circuit_still_executes() {
        let original = fan_in_fan_out();
        let restored = Circuit::from_json(
            &original.to_json().unwrap(),
            &crate::config::OperationRegistry::with_builtins(),
        )
        .unwrap();

        let results = restored
            .execute(inputs(&[("left", "ab"), ("right", "cd")]))
            .await
            .unwrap();
        assert_eq!(results["text"].data["input"], json!("dc ba"));
    }
}
