//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised for a tagged line whose event is recognized but whose
/// payload cannot be decoded
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid JSON in `{event}` arguments: {source}")]
    InvalidJson {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid weight `{detail}` on `{event}` event")]
    InvalidWeight { event: String, detail: String },

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),
}

/// Errors that abort trace ingestion
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("malformed trace line {line_no}: {line}")]
    Malformed {
        line_no: usize,
        line: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by the symbol registry
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("symbol recorded for unknown ip {0:#018x}")]
    UnknownIp(u64),
}

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
