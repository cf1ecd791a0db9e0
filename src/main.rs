// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context};
use serde_json::json;
use std::env;
use std::time::Instant;
use the_circuitboard::circuit::SourceInputs;
use the_circuitboard::config::consts::{INPUT_NODE_ID, OUTPUT_NODE_ID};
use the_circuitboard::config::{load_and_validate_config, Config, RuntimeBuilder};
use the_circuitboard::dual_view::{DualViewManager, LinearRecipe};
use the_circuitboard::traits::Parameters;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The recipe the demo lifts into a circuit: upper case, then base64, then reverse.
fn demo_recipe() -> LinearRecipe {
    let mut base64_parameters = Parameters::new();
    base64_parameters.insert("alphabet".to_string(), json!("standard"));

    let mut recipe = LinearRecipe::new("Shout and scramble")
        .push("upper", "to_upper_case", Parameters::new())
        .push("encode", "to_base64", base64_parameters)
        .push("reverse", "reverse_text", Parameters::new());
    recipe.metadata.description = "Built-in demo recipe".to_string();
    recipe
}

/// argv[0] for usage text, falling back when the OS passes an empty argv.
fn program_name(args: &[String]) -> &str {
    args.first().map_or("the-circuitboard", String::as_str)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();
    let (config, input_text) = match args.as_slice() {
        [_, input] => (Config::default(), input.clone()),
        [_, config_file, input] => (
            load_and_validate_config(config_file).with_context(|| format!("loading {}", config_file))?,
            input.clone(),
        ),
        _ => {
            let program = program_name(&args);
            eprintln!("Usage: {} [config.yaml|config.toml] <input_text>", program);
            eprintln!("Example: {} \"hello world\"", program);
            eprintln!("Example: {} configs/level.yaml \"hello world\"", program);
            bail!("expected an input text argument");
        }
    };

    println!("Circuitboard Demo");
    println!("═════════════════");
    println!("Input: \"{}\"", input_text);
    println!("Strategy: {}", config.strategy.as_str());
    println!();

    let mut manager = RuntimeBuilder::from_config(&config);
    let recipe = demo_recipe();
    println!("Recipe '{}': {}", recipe.metadata.name, recipe.operation_ids().join(" -> "));

    manager.initialize_linear(recipe);
    manager.convert_to_graph()?;
    run_graph(&manager, &input_text).await?;

    println!();
    println!("Can convert back to linear: {}", manager.can_convert_to_linear());
    manager.convert_to_linear()?;
    if let Some(recipe) = manager.recipe() {
        println!("Recovered recipe:\n{}", recipe.to_json()?);
    }

    Ok(())
}

async fn run_graph(manager: &DualViewManager, input_text: &str) -> anyhow::Result<()> {
    let circuit = manager.circuit().context("manager holds no circuit")?;
    let order = circuit.calculate_execution_order()?;
    println!("Execution order: {}", order.join(" -> "));

    let mut inputs = SourceInputs::new();
    inputs.insert(INPUT_NODE_ID.to_string(), json!(input_text));

    let start = Instant::now();
    let results = circuit.execute(inputs).await?;
    let elapsed = start.elapsed();

    match results.get(OUTPUT_NODE_ID) {
        Some(result) => println!("Output: {}", serde_json::to_string(&result.data)?),
        None => println!("Output: <none>"),
    }
    println!("Completed in {:?}", elapsed);

    let metrics = manager.metrics();
    println!(
        "Complexity: {} nodes, {} connections, loops={}, branches={}, conditionals={}",
        metrics.node_count, metrics.connection_count, metrics.has_loops, metrics.has_branches, metrics.has_conditionals
    );
    Ok(())
}
