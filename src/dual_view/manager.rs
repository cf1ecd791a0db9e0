// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::analysis::{analyze, ComplexityMetrics};
use crate::circuit::{Circuit, NodeKind, NodeSpec};
use crate::config::consts::{DEFAULT_INPUT_PORT, DEFAULT_OUTPUT_PORT, INPUT_NODE_ID, OUTPUT_NODE_ID};
use crate::config::{ConversionConfig, OperationRegistry, Strategy};
use crate::dual_view::{LinearRecipe, RecipeOperation, ViewKind};
use crate::engine::SchedulerFactory;
use crate::errors::{BlockReason, ConversionError};
use crate::observability::messages::circuit::OperationUnresolved;
use crate::observability::messages::conversion::{
    ConversionBlocked, ConversionLockEngaged, ConvertedToGraph, ConvertedToLinear, ViewInitialized,
};
use crate::observability::messages::StructuredLog;

#[derive(Debug)]
enum ViewState {
    Uninitialized,
    Linear(LinearRecipe),
    Graph(Circuit),
}

impl ViewState {
    fn kind(&self) -> ViewKind {
        match self {
            ViewState::Uninitialized => ViewKind::Uninitialized,
            ViewState::Linear(_) => ViewKind::Linear,
            ViewState::Graph(_) => ViewKind::Graph,
        }
    }
}

/// View-state machine holding either a linear recipe or a circuit.
///
/// Linear to graph conversion always succeeds. Graph to linear conversion is
/// allowed only while the circuit is a plain chain and the conversion lock is
/// not engaged. The lock is set by [`update_complexity`](Self::update_complexity)
/// the first time a disqualifying feature is seen and stays set until
/// [`initialize_linear`](Self::initialize_linear) or
/// [`initialize_graph`](Self::initialize_graph) starts over.
///
/// Every failed conversion leaves the manager exactly as it was.
///
/// # Examples
///
/// ```
/// use the_circuitboard::config::OperationRegistry;
/// use the_circuitboard::dual_view::{DualViewManager, LinearRecipe, ViewKind};
/// use the_circuitboard::traits::Parameters;
///
/// let mut manager = DualViewManager::new(OperationRegistry::with_builtins());
/// manager.initialize_linear(LinearRecipe::new("shout").push("upper", "to_upper_case", Parameters::new()));
/// manager.convert_to_graph().unwrap();
///
/// assert_eq!(manager.current_view(), ViewKind::Graph);
/// assert_eq!(manager.circuit().unwrap().node_count(), 3);
/// assert!(manager.can_convert_to_linear());
/// ```
#[derive(Debug)]
pub struct DualViewManager {
    registry: OperationRegistry,
    conversion: ConversionConfig,
    strategy: Strategy,
    state: ViewState,
    metrics: ComplexityMetrics,
    conversion_locked: bool,
    /// Header (format, version, metadata) of the last known recipe.
    recipe_header: LinearRecipe,
}

impl DualViewManager {
    pub fn new(registry: OperationRegistry) -> Self {
        Self {
            registry,
            conversion: ConversionConfig::default(),
            strategy: Strategy::default(),
            state: ViewState::Uninitialized,
            metrics: ComplexityMetrics::default(),
            conversion_locked: false,
            recipe_header: LinearRecipe::default(),
        }
    }

    pub fn with_conversion_config(mut self, conversion: ConversionConfig) -> Self {
        self.conversion = conversion;
        self
    }

    /// Scheduler strategy for circuits built by [`convert_to_graph`](Self::convert_to_graph).
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Start over from a recipe. Clears the conversion lock.
    pub fn initialize_linear(&mut self, recipe: LinearRecipe) {
        ViewInitialized {
            view: ViewKind::Linear.as_str(),
            node_count: recipe.len(),
        }
        .log();

        self.recipe_header = header_of(&recipe);
        self.state = ViewState::Linear(recipe);
        self.conversion_locked = false;
        self.update_complexity();
    }

    /// Start over from a circuit. Clears the conversion lock, then evaluates
    /// the circuit, which may engage it again straight away.
    pub fn initialize_graph(&mut self, circuit: Circuit) {
        ViewInitialized {
            view: ViewKind::Graph.as_str(),
            node_count: circuit.node_count(),
        }
        .log();

        self.recipe_header = LinearRecipe::default();
        self.state = ViewState::Graph(circuit);
        self.conversion_locked = false;
        self.update_complexity();
    }

    /// Expand the recipe into `input -> step... -> output`.
    ///
    /// Each step becomes a processor node whose id is the step id. Operations
    /// missing from the registry leave the node without a capability, so it
    /// passes its input straight through when executed.
    ///
    /// # Errors
    /// - `NoData` if nothing has been loaded
    /// - `InvalidView` if the manager is already in the graph view
    /// - `Circuit` if step ids collide with each other or with `input`/`output`
    pub fn convert_to_graph(&mut self) -> Result<(), ConversionError> {
        let recipe = match &self.state {
            ViewState::Linear(recipe) => recipe,
            ViewState::Uninitialized => return Err(ConversionError::NoData),
            other => {
                return Err(ConversionError::InvalidView {
                    expected: ViewKind::Linear,
                    actual: other.kind(),
                })
            }
        };

        let circuit = self.build_circuit(recipe)?;
        let header = header_of(recipe);

        ConvertedToGraph {
            node_count: circuit.node_count(),
            connection_count: circuit.connection_count(),
        }
        .log();

        self.recipe_header = header;
        self.state = ViewState::Graph(circuit);
        self.update_complexity();
        Ok(())
    }

    /// Flatten the circuit back into a recipe.
    ///
    /// Processor nodes are taken in execution order; source, sink and
    /// analysis nodes are dropped. The recipe keeps the metadata of the last
    /// recipe this manager saw. The conversion lock is left as it is.
    ///
    /// # Errors
    /// - `NoData` if nothing has been loaded
    /// - `InvalidView` if the manager is in the linear view
    /// - `ConversionBlocked` if the circuit is not a plain chain or the lock is engaged
    pub fn convert_to_linear(&mut self) -> Result<(), ConversionError> {
        let circuit = match &self.state {
            ViewState::Graph(circuit) => circuit,
            ViewState::Uninitialized => return Err(ConversionError::NoData),
            other => {
                return Err(ConversionError::InvalidView {
                    expected: ViewKind::Graph,
                    actual: other.kind(),
                })
            }
        };

        if let Some(reason) = self.blocking_reason(circuit) {
            ConversionBlocked { reason: &reason }.log();
            return Err(ConversionError::ConversionBlocked { reason });
        }

        let mut recipe = self.recipe_header.clone();
        for id in circuit.calculate_execution_order()? {
            let Some(node) = circuit.node(&id).filter(|node| node.kind() == NodeKind::Processor) else {
                continue;
            };
            recipe.operations.push(RecipeOperation {
                name: node.spec().name.clone().unwrap_or_default(),
                operation: node.operation_name().unwrap_or_default().to_string(),
                parameters: node.parameters().clone(),
                id,
            });
        }

        ConvertedToLinear {
            operation_count: recipe.len(),
        }
        .log();

        self.state = ViewState::Linear(recipe);
        self.update_complexity();
        Ok(())
    }

    /// True iff the manager holds a circuit, the lock is off and the circuit
    /// has no loops, branches or conditionals and at most the configured
    /// number of nodes.
    pub fn can_convert_to_linear(&self) -> bool {
        match &self.state {
            ViewState::Graph(circuit) => self.blocking_reason(circuit).is_none(),
            _ => false,
        }
    }

    /// Recompute the metrics for the current view.
    ///
    /// In the graph view a disqualifying feature engages the conversion lock.
    /// The lock is never cleared here.
    pub fn update_complexity(&mut self) {
        self.metrics = match &self.state {
            ViewState::Uninitialized => ComplexityMetrics::default(),
            ViewState::Linear(recipe) => ComplexityMetrics::linear(recipe.len()),
            ViewState::Graph(circuit) => analyze(circuit),
        };

        if self.state.kind() != ViewKind::Graph || self.conversion_locked {
            return;
        }
        if let Some(reason) = self.metrics.disqualifier(self.conversion.get_max_linear_nodes()) {
            ConversionLockEngaged { reason: &reason }.log();
            self.conversion_locked = true;
        }
    }

    /// Raw access to the circuit. Call [`update_complexity`](Self::update_complexity)
    /// after structural changes, or use [`modify_graph`](Self::modify_graph).
    pub fn graph_mut(&mut self) -> Option<&mut Circuit> {
        match &mut self.state {
            ViewState::Graph(circuit) => Some(circuit),
            _ => None,
        }
    }

    /// Apply `change` to the circuit, then refresh the metrics and lock.
    pub fn modify_graph<F, R>(&mut self, change: F) -> Result<R, ConversionError>
    where
        F: FnOnce(&mut Circuit) -> R,
    {
        let circuit = match &mut self.state {
            ViewState::Graph(circuit) => circuit,
            ViewState::Uninitialized => return Err(ConversionError::NoData),
            other => {
                return Err(ConversionError::InvalidView {
                    expected: ViewKind::Graph,
                    actual: other.kind(),
                })
            }
        };

        let outcome = change(circuit);
        self.update_complexity();
        Ok(outcome)
    }

    pub fn current_view(&self) -> ViewKind {
        self.state.kind()
    }

    pub fn recipe(&self) -> Option<&LinearRecipe> {
        match &self.state {
            ViewState::Linear(recipe) => Some(recipe),
            _ => None,
        }
    }

    pub fn circuit(&self) -> Option<&Circuit> {
        match &self.state {
            ViewState::Graph(circuit) => Some(circuit),
            _ => None,
        }
    }

    /// Metrics as of the last state change or `update_complexity` call.
    pub fn metrics(&self) -> ComplexityMetrics {
        self.metrics
    }

    pub fn is_conversion_locked(&self) -> bool {
        self.conversion_locked
    }

    /// A live disqualifier wins over the lock so callers see the actual cause.
    fn blocking_reason(&self, circuit: &Circuit) -> Option<BlockReason> {
        analyze(circuit)
            .disqualifier(self.conversion.get_max_linear_nodes())
            .or_else(|| self.conversion_locked.then_some(BlockReason::Locked))
    }

    fn build_circuit(&self, recipe: &LinearRecipe) -> Result<Circuit, ConversionError> {
        let mut circuit = Circuit::with_scheduler(SchedulerFactory::from_strategy(self.strategy));
        circuit.add_node(INPUT_NODE_ID, NodeSpec::source().with_name("Input"))?;

        let mut previous = INPUT_NODE_ID;
        for step in &recipe.operations {
            let mut spec = match self.registry.get(&step.operation) {
                Some(operation) => NodeSpec::processor(operation.clone()),
                None => {
                    OperationUnresolved {
                        node_id: &step.id,
                        operation_name: &step.operation,
                    }
                    .log();
                    NodeSpec::new(NodeKind::Processor)
                        .with_inputs([DEFAULT_INPUT_PORT])
                        .with_outputs([DEFAULT_OUTPUT_PORT])
                }
            }
            .with_operation_name(step.operation.clone())
            .with_parameters(step.parameters.clone());
            if !step.name.is_empty() {
                spec = spec.with_name(step.name.clone());
            }

            circuit.add_node(step.id.clone(), spec)?;
            circuit.connect(previous, DEFAULT_OUTPUT_PORT, &step.id, DEFAULT_INPUT_PORT)?;
            previous = step.id.as_str();
        }

        circuit.add_node(OUTPUT_NODE_ID, NodeSpec::sink().with_name("Output"))?;
        circuit.connect(previous, DEFAULT_OUTPUT_PORT, OUTPUT_NODE_ID, DEFAULT_INPUT_PORT)?;
        Ok(circuit)
    }
}

/// A recipe's format, version and metadata without its operations.
fn header_of(recipe: &LinearRecipe) -> LinearRecipe {
    LinearRecipe {
        format: recipe.format.clone(),
        version: recipe.version.clone(),
        metadata: recipe.metadata.clone(),
        operations: Vec::new(),
    }
}
