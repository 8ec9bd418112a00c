//! Symbol simplification and label bookkeeping.
//!
//! This module handles:
//! - Deriving short labels from raw, decorated symbol text
//! - Building node tooltips from all symbols of an IP
//! - Resolving labels back to IPs for manual edges

pub mod index;
pub mod simplify;

// Re-export main types and functions
pub use index::LabelIndex;
pub use simplify::{derive_label, escape_dot, hex_ip, label_for, simplify_symbol, symbol_tooltip};
