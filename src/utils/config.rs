//! Configuration and constants for the CLI.
//!
//! Every knob of the analysis lives in [`StudyConfig`]. The defaults match
//! the instrumentation shipped with the storage engine; a TOML file can
//! override any subset of them.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Tag that prefixes every line emitted by the instrumented engine
pub const TRACE_TAG: &str = "[storagestudy]";

/// Era whose samples are aggregated unless configured otherwise
pub const DEFAULT_TARGET_ERA: &str = "bulk-storage";

// Instrumentation scaffolding at the innermost end of every chain,
// runtime startup frames at the outermost end
pub const DEFAULT_LEADING_FRAMES: usize = 3;
pub const DEFAULT_TRAILING_FRAMES: usize = 12;

/// Fill color for vertices and edges that carry no scaled weight
pub const NEUTRAL_COLOR: &str = "#9e9e9e";

//    name          color     scale
const DEFAULT_OPERATIONS: &[(&str, u32, f64)] = &[
    ("get", 0x2196F3, 1.),
    ("set", 0xF44336, 1.),
    ("tx-put", 0xFFC107, 1.),
    ("dh-insert", 0xFF9800, 1.),
    ("sh-set", 0x9C27B0, 1.),
    ("tr-alloc", 0xCDDC39, 1.),
    ("st-insert", 0x4CAF50, 1.),
    ("charge-gas", 0x009688, 256.),
];

const DEFAULT_MANUAL_EDGES: &[(&str, &str)] = &[
    ("State::insert_cache:534", "State::commit:932"),
    ("NodeStorage::alloc:246", "TrieDBMut::commit_node:872"),
    ("NodeStorage::alloc:246", "TrieDBMut::commit:848"),
    ("StorageHashDB::insert:256", "StorageHashDB::commit:128"),
    ("DBTransaction::put:101", "BlockchainStateDb::write_buffered:376"),
    ("DatabaseHandle::insert:293", "DatabaseHandle::commit:343"),
];

/// A 24-bit color, written as `#RRGGBB` in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn red(self) -> u8 {
        (self.0 >> 16 & 0xff) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8 & 0xff) as u8
    }

    pub fn blue(self) -> u8 {
        (self.0 & 0xff) as u8
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red(), self.green(), self.blue())
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value
            .strip_prefix('#')
            .ok_or_else(|| format!("color `{}` must start with '#'", value))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("color `{}` must be #RRGGBB", value));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb)
            .map_err(|e| format!("color `{}`: {}", value, e))
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

/// One kind of counted storage operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationKind {
    /// Event name as emitted in the trace
    pub name: String,

    /// Color this kind contributes to blended fills
    pub color: Rgb,

    /// Raw counts are divided by this before blending
    pub scale: f64,
}

impl OperationKind {
    pub fn new(name: impl Into<String>, color: u32, scale: f64) -> Self {
        Self {
            name: name.into(),
            color: Rgb(color),
            scale,
        }
    }
}

/// A cross-check edge between two labels, drawn dashed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualEdge {
    pub from: String,
    pub to: String,
}

impl ManualEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Full analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Only samples inside this era are aggregated
    pub target_era: String,

    /// Frames dropped from the innermost end of each chain
    pub leading_frames: usize,

    /// Frames dropped from the outermost end of each chain
    pub trailing_frames: usize,

    /// Counted operation kinds, in display order
    pub operations: Vec<OperationKind>,

    /// Expected relationships drawn after the discovered graph
    pub manual_edges: Vec<ManualEdge>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            target_era: DEFAULT_TARGET_ERA.to_string(),
            leading_frames: DEFAULT_LEADING_FRAMES,
            trailing_frames: DEFAULT_TRAILING_FRAMES,
            operations: DEFAULT_OPERATIONS
                .iter()
                .map(|&(name, color, scale)| OperationKind::new(name, color, scale))
                .collect(),
            manual_edges: DEFAULT_MANUAL_EDGES
                .iter()
                .map(|&(from, to)| ManualEdge::new(from, to))
                .collect(),
        }
    }
}

impl StudyConfig {
    pub fn with_target_era(mut self, era: impl Into<String>) -> Self {
        self.target_era = era.into();
        self
    }

    pub fn with_frame_stripping(mut self, leading: usize, trailing: usize) -> Self {
        self.leading_frames = leading;
        self.trailing_frames = trailing;
        self
    }

    /// Position of the operation kind called `name`, if configured
    pub fn operation_index(&self, name: &str) -> Option<usize> {
        self.operations.iter().position(|op| op.name == name)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: StudyConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the invariants the parser and renderer rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_era.is_empty() {
            return Err(ConfigError::Invalid("target_era cannot be empty".to_string()));
        }

        if self.operations.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one operation kind is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for op in &self.operations {
            if op.name.is_empty()
                || op
                    .name
                    .chars()
                    .any(|c| c.is_whitespace() || c == '(' || c == ')')
            {
                return Err(ConfigError::Invalid(format!(
                    "operation name `{}` must be a non-empty token without parentheses",
                    op.name
                )));
            }
            if !seen.insert(op.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate operation `{}`",
                    op.name
                )));
            }
            if !op.scale.is_finite() || op.scale <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "operation `{}` has invalid scale {}",
                    op.name, op.scale
                )));
            }
        }

        Ok(())
    }
}
