/// Maximum number of nodes a graph may have and still flatten to a linear recipe
pub const DEFAULT_MAX_LINEAR_NODES: usize = 20;
/// Conventional name of a node's single input port
pub const DEFAULT_INPUT_PORT: &str = "input";
/// Conventional name of a node's single output port
pub const DEFAULT_OUTPUT_PORT: &str = "output";
/// Id of the source node created when lifting a recipe into a graph
pub const INPUT_NODE_ID: &str = "input";
/// Id of the sink node created when lifting a recipe into a graph
pub const OUTPUT_NODE_ID: &str = "output";
/// Tag marking a node as conditional for complexity analysis
pub const CONDITIONAL_TAG: &str = "conditional";
/// Version written into serialized circuits
pub const CIRCUIT_FORMAT_VERSION: &str = "1.0";
/// Format marker of linear recipes
pub const RECIPE_FORMAT: &str = "encoder-recipe";
/// Version written into linear recipes
pub const RECIPE_VERSION: &str = "1.0";
