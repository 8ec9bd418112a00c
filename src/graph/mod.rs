//! Call-graph rendering.
//!
//! Converts the aggregated context into a Graphviz DOT document, and into
//! a short text summary of the hottest call sites.

pub mod dot;
pub mod summary;

// Re-export main types
pub use dot::{blend_color, pen_width, render_dot, DotGraph};
pub use summary::{hot_vertices, summarize_vertices, HotVertex};
