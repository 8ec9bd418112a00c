//! Trace line parsing.
//!
//! This module handles:
//! - Recognizing `[storagestudy]` tagged lines
//! - Decoding event payloads (IPs, symbols, eras, sampled call chains)
//! - Stripping instrumentation frames from call chains

pub mod event;

// Re-export main types
pub use event::{EventParser, TraceEvent};
