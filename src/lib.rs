//! Storage Study
//!
//! Call-graph aggregation for storage engine profiling traces.
//!
//! The instrumented engine prints `[storagestudy]` tagged lines: newly seen
//! instruction pointers, their symbols, era markers, and sampled storage
//! operations with their call chains. This crate folds the samples of one
//! era into per-call-site and per-call-edge counters and renders them as a
//! Graphviz graph whose colors blend the operation kinds involved.
//!
//! ## Getting Started
//!
//! ```bash
//! engine 2>&1 | storagestudy graph --output study.dot
//! dot -Tsvg study.dot > study.svg
//! ```

pub mod aggregator;
pub mod commands;
pub mod graph;
pub mod output;
pub mod parser;
pub mod symbols;
pub mod utils;
