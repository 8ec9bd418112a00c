//! Output writers for rendered graphs.
//!
//! This module handles writing DOT documents to files or stdout.

pub mod dot;

// Re-export main functions
pub use dot::{write_dot, write_dot_to};
