//! Symbols discovered for each instruction pointer.

use crate::utils::error::RegistryError;
use std::collections::HashMap;

/// Per-IP raw symbols, in discovery order
#[derive(Debug, Clone, Default)]
pub struct SymbolRegistry {
    symbols: HashMap<u64, Vec<String>>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `ip` has an entry. Existing symbols are kept.
    pub fn record_ip(&mut self, ip: u64) {
        self.symbols.entry(ip).or_default();
    }

    /// Append a raw symbol to a known IP
    ///
    /// # Errors
    /// * `RegistryError::UnknownIp` - `ip` was never introduced; nothing is stored
    pub fn record_symbol(&mut self, ip: u64, symbol: impl Into<String>) -> Result<(), RegistryError> {
        let entry = self.symbols.get_mut(&ip).ok_or(RegistryError::UnknownIp(ip))?;
        entry.push(symbol.into());
        Ok(())
    }

    /// Append a raw symbol, creating the entry for `ip` if needed
    pub fn record_symbol_or_insert(&mut self, ip: u64, symbol: impl Into<String>) {
        self.symbols.entry(ip).or_default().push(symbol.into());
    }

    pub fn contains(&self, ip: u64) -> bool {
        self.symbols.contains_key(&ip)
    }

    /// Symbols for `ip`; empty for unknown IPs
    pub fn symbols(&self, ip: u64) -> &[String] {
        self.symbols.get(&ip).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of IPs with an entry
    pub fn ip_count(&self) -> usize {
        self.symbols.len()
    }
}
