//! Graph command implementation.
//!
//! The graph command:
//! 1. Resolves configuration (file, then CLI overrides)
//! 2. Aggregates the trace stream
//! 3. Renders the call graph as DOT
//! 4. Writes the graph and, optionally, a hot call site summary

use crate::aggregator::{aggregate_trace, StudyContext};
use crate::graph::{render_dot, summarize_vertices, DotGraph};
use crate::output::{write_dot, write_dot_to};
use crate::utils::config::StudyConfig;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the graph command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct GraphArgs {
    /// Trace file; stdin when absent
    pub input: Option<PathBuf>,

    /// DOT output file; stdout when absent
    pub output: Option<PathBuf>,

    /// TOML configuration file
    pub config_path: Option<PathBuf>,

    /// Overrides the configured target era
    pub target_era: Option<String>,

    /// Overrides the configured leading frame count
    pub leading_frames: Option<usize>,

    /// Overrides the configured trailing frame count
    pub trailing_frames: Option<usize>,

    /// Print hot call site table to stderr
    pub print_summary: bool,

    /// Rows in the summary table
    pub top_vertices: usize,
}

impl Default for GraphArgs {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            config_path: None,
            target_era: None,
            leading_frames: None,
            trailing_frames: None,
            print_summary: false,
            top_vertices: 20,
        }
    }
}

/// Result of one graph run
#[derive(Debug, Clone)]
pub struct GraphRun {
    pub context: StudyContext,
    pub graph: DotGraph,
}

/// Build the effective configuration for a run
///
/// **Public** - CLI flags win over the config file, which wins over defaults
pub fn resolve_config(args: &GraphArgs) -> Result<StudyConfig> {
    let mut config = match &args.config_path {
        Some(path) => StudyConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => StudyConfig::default(),
    };

    if let Some(era) = &args.target_era {
        config.target_era = era.clone();
    }
    if let Some(leading) = args.leading_frames {
        config.leading_frames = leading;
    }
    if let Some(trailing) = args.trailing_frames {
        config.trailing_frames = trailing;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Aggregate a trace and render it
pub fn build_graph<R: BufRead>(config: &StudyConfig, reader: R) -> Result<GraphRun> {
    let context = aggregate_trace(reader, config).context("Failed to aggregate trace")?;
    let graph = render_dot(&context, config);
    Ok(GraphRun { context, graph })
}

/// Aggregate a trace and render it, writing the DOT text to `writer`
///
/// **Public** - the whole pipeline over caller-supplied streams
pub fn run_graph<R: BufRead, W: Write>(config: &StudyConfig, reader: R, writer: W) -> Result<GraphRun> {
    let run = build_graph(config, reader)?;
    write_dot_to(&run.graph.text, writer).context("Failed to write graph")?;
    Ok(run)
}

/// Execute the graph command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable or invalid configuration
/// * Malformed trace lines
/// * File read/write errors
pub fn execute_graph(args: GraphArgs) -> Result<()> {
    let start_time = Instant::now();

    let config = resolve_config(&args)?;
    info!(
        "Aggregating era `{}` ({} operation kinds, stripping {}+{} frames)",
        config.target_era,
        config.operations.len(),
        config.leading_frames,
        config.trailing_frames
    );

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open trace {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin().lock())),
    };

    let run = match &args.output {
        Some(path) => {
            let run = build_graph(&config, reader)?;
            write_dot(&run.graph.text, path).context("Failed to write graph")?;
            run
        }
        None => run_graph(&config, reader, io::stdout().lock())?,
    };

    if !run.graph.unresolved.is_empty() {
        debug!("{} manual edges skipped", run.graph.unresolved.len());
    }

    if args.print_summary {
        eprintln!("\n{}", summarize_vertices(&run.context, &config, args.top_vertices));
    }

    let elapsed = start_time.elapsed();
    info!("Graph completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Validate graph arguments
///
/// **Public** - can be called before execute_graph for early validation
pub fn validate_args(args: &GraphArgs) -> Result<()> {
    if let Some(input) = &args.input {
        // FIFOs and character devices are valid trace inputs
        if !input.exists() {
            anyhow::bail!("Trace file not found: {}", input.display());
        }
        if input.is_dir() {
            anyhow::bail!("Trace input is a directory: {}", input.display());
        }
    }

    if let Some(config) = &args.config_path {
        if !config.is_file() {
            anyhow::bail!("Config file not found: {}", config.display());
        }
    }

    if let Some(era) = &args.target_era {
        if era.is_empty() {
            anyhow::bail!("Era name cannot be empty");
        }
    }

    if args.top_vertices == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.top_vertices > 1000 {
        anyhow::bail!("top is too large (max 1000)");
    }

    Ok(())
}
