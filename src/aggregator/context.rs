//! Aggregation context threaded through trace ingestion.
//!
//! Owns the symbol registry, the era filter and the call graph, and applies
//! decoded events to them strictly in stream order.

use super::call_graph::CallGraph;
use super::era::EraFilter;
use super::registry::SymbolRegistry;
use crate::parser::{EventParser, TraceEvent};
use crate::utils::config::StudyConfig;
use crate::utils::error::TraceError;
use log::{debug, info, warn};
use std::io::BufRead;

/// Line and sample counters gathered during ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub lines: usize,
    pub recognized: usize,
    pub samples_counted: usize,
    pub samples_skipped: usize,
    pub orphan_symbols: usize,
}

/// All mutable state built from one trace
#[derive(Debug, Clone)]
pub struct StudyContext {
    pub registry: SymbolRegistry,
    pub era: EraFilter,
    pub graph: CallGraph,
    pub stats: IngestStats,
}

impl StudyContext {
    pub fn new(config: &StudyConfig) -> Self {
        Self {
            registry: SymbolRegistry::new(),
            era: EraFilter::new(config.target_era.clone()),
            graph: CallGraph::new(config.operations.len()),
            stats: IngestStats::default(),
        }
    }

    /// Apply one decoded event
    pub fn apply(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::NewIp(ip) => self.registry.record_ip(ip),
            TraceEvent::IpSymbol { ip, symbol } => self.record_symbol(ip, symbol),
            TraceEvent::EraMarker(name) => {
                info!("era {}", name);
                if let Some(previous) = self.era.current() {
                    debug!("leaving era {}", previous);
                }
                self.era.enter(&name);
            }
            TraceEvent::OperationSample {
                kind,
                weight,
                chain,
            } => {
                if self.era.is_counting() {
                    self.graph.add_sample(kind, weight, &chain);
                    self.stats.samples_counted += 1;
                } else {
                    self.stats.samples_skipped += 1;
                }
            }
            TraceEvent::Unrecognized => {}
        }
    }

    // Symbols for IPs never introduced are kept under a synthesized entry
    fn record_symbol(&mut self, ip: u64, symbol: String) {
        if !self.registry.contains(ip) {
            warn!("symbol for ip {:#018x} arrived before new-ip; registering it", ip);
            self.stats.orphan_symbols += 1;
        }
        self.registry.record_symbol_or_insert(ip, symbol);
    }

    /// Consume a whole trace stream
    ///
    /// **Public** - main entry point for aggregation
    ///
    /// # Errors
    /// * `TraceError::Malformed` - a recognized line could not be decoded
    /// * `TraceError::Io` - the reader failed
    pub fn ingest<R: BufRead>(&mut self, mut reader: R, parser: &EventParser) -> Result<(), TraceError> {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            self.stats.lines += 1;

            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches('\n').trim_end_matches('\r');

            let event = parser.parse_line(line).map_err(|source| TraceError::Malformed {
                line_no: self.stats.lines,
                line: line.to_string(),
                source,
            })?;

            if event != TraceEvent::Unrecognized {
                self.stats.recognized += 1;
            }
            self.apply(event);
        }

        debug!(
            "Ingested {} lines ({} recognized): {} samples counted, {} outside era `{}`",
            self.stats.lines,
            self.stats.recognized,
            self.stats.samples_counted,
            self.stats.samples_skipped,
            self.era.target()
        );
        debug!(
            "Call graph: {} vertices, {} edges, {} known ips",
            self.graph.vertex_count(),
            self.graph.edge_count(),
            self.registry.ip_count()
        );

        Ok(())
    }
}

/// Build a context from a full trace stream
pub fn aggregate_trace<R: BufRead>(reader: R, config: &StudyConfig) -> Result<StudyContext, TraceError> {
    let parser = EventParser::new(config);
    let mut context = StudyContext::new(config);
    context.ingest(reader, &parser)?;
    Ok(context)
}
