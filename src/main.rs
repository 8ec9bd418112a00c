//! Storage Study CLI
//!
//! Turns `[storagestudy]` trace output from an instrumented storage engine
//! into a weighted call graph in Graphviz DOT format.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use storage_study::commands::{display_config, display_version, execute_graph, validate_args, GraphArgs};

/// Storage Study - call graphs from storage engine traces
#[derive(Parser, Debug)]
#[command(name = "storagestudy")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate a trace and render the call graph
    Graph {
        /// Trace file to read (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output path for the DOT graph (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// TOML configuration file
        #[arg(short, long, env = "STORAGESTUDY_CONFIG")]
        config: Option<PathBuf>,

        /// Era whose samples are counted
        #[arg(long)]
        era: Option<String>,

        /// Frames to strip from the innermost end of each chain
        #[arg(long)]
        leading_frames: Option<usize>,

        /// Frames to strip from the outermost end of each chain
        #[arg(long)]
        trailing_frames: Option<usize>,

        /// Print a hot call site table to stderr
        #[arg(long)]
        summary: bool,

        /// Number of call sites in the summary
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Print the default configuration as TOML
    Config,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Graph {
            input,
            output,
            config,
            era,
            leading_frames,
            trailing_frames,
            summary,
            top,
        } => {
            let args = GraphArgs {
                input,
                output,
                config_path: config,
                target_era: era,
                leading_frames,
                trailing_frames,
                print_summary: summary,
                top_vertices: top,
            };

            // Validate args first
            validate_args(&args)?;

            execute_graph(args)?;
        }

        Commands::Config => {
            display_config()?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
