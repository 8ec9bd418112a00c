//! DOT graph output writer.
//!
//! Writes rendered graphs to a file or to any `Write` sink such as stdout.

use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write DOT text to a file, creating parent directories as needed
///
/// **Public** - main entry point for file output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is empty or a directory
pub fn write_dot(dot: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing graph to: {}", output_path.display());

    validate_dot_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::InvalidPath(format!("Cannot create directory: {}", e)))?;
        }
    }

    let file = File::create(output_path)?;
    write_dot_to(dot, BufWriter::new(file))?;

    info!(
        "Graph written successfully ({} bytes, {:.2} KB)",
        dot.len(),
        dot.len() as f64 / 1024.0
    );

    Ok(())
}

/// Write DOT text to an arbitrary sink and flush it
pub fn write_dot_to<W: Write>(dot: &str, mut writer: W) -> Result<(), OutputError> {
    writer.write_all(dot.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Validate output path for DOT
///
/// **Private** - internal validation
fn validate_dot_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if let Some(ext) = path.extension() {
        if ext != "dot" && ext != "gv" {
            debug!("File does not have a .dot extension: {}", path.display());
        }
    }

    Ok(())
}
