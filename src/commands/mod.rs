//! CLI command implementations.
//!
//! Commands orchestrate the various library components to perform user tasks.

pub mod graph;
pub mod utils;

// Re-export main command functions
pub use graph::{build_graph, execute_graph, resolve_config, run_graph, validate_args, GraphArgs, GraphRun};
pub use utils::{display_config, display_version};
