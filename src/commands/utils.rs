use crate::utils::config::{StudyConfig, TRACE_TAG};
use anyhow::{Context, Result};

/// Print the default configuration as TOML
pub fn display_config() -> Result<()> {
    let text = StudyConfig::default()
        .to_toml_string()
        .context("Failed to serialize default configuration")?;

    println!("# Default storagestudy configuration");
    println!("# Save as a file and pass it with `graph --config <file>`");
    println!();
    print!("{}", text);

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Storage Study v{}", env!("CARGO_PKG_VERSION"));
    println!("Trace tag: {}", TRACE_TAG);
    println!();
    println!("Call-graph aggregation for instrumented storage engine traces.");
}
