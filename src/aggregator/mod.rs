//! Aggregation of trace events into a weighted call graph.
//!
//! This module turns decoded trace events into:
//! - Per-IP symbol lists (registry)
//! - Era gating state
//! - Per-vertex and per-edge counters keyed by operation kind

pub mod call_graph;
pub mod context;
pub mod era;
pub mod registry;

// Re-export main types and functions
pub use call_graph::{CallGraph, OpCounts};
pub use context::{aggregate_trace, IngestStats, StudyContext};
pub use era::EraFilter;
pub use registry::SymbolRegistry;
