//! Utility modules for configuration and error handling.

pub mod error;
pub mod config;

// Re-export commonly used error types for convenience
pub use error::{ConfigError, OutputError, ParseError, RegistryError, TraceError};
pub use config::{ManualEdge, OperationKind, Rgb, StudyConfig};
