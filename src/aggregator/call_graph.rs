//! Operation-weighted vertex and edge counters.
//!
//! Every IP in a counted chain gets the sample weight added to its counter
//! for the sample's kind. Every adjacent pair `(chain[i + 1], chain[i])` is
//! a caller -> callee edge and is weighted the same way.

use crate::utils::config::OperationKind;
use log::trace;
use std::collections::BTreeMap;

/// Counters for one vertex or edge, indexed by operation kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpCounts {
    counts: Vec<u64>,
}

impl OpCounts {
    pub fn new(kinds: usize) -> Self {
        Self {
            counts: vec![0; kinds],
        }
    }

    pub fn add(&mut self, kind: usize, weight: u64) {
        let cell = &mut self.counts[kind];
        *cell = cell.saturating_add(weight);
    }

    pub fn get(&self, kind: usize) -> u64 {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }

    /// Raw counts divided by each kind's scale
    pub fn scaled(&self, operations: &[OperationKind]) -> Vec<f64> {
        operations
            .iter()
            .zip(&self.counts)
            .map(|(op, &count)| count as f64 / op.scale)
            .collect()
    }

    /// `"3 get / 0 set / ..."` in configured kind order
    pub fn summarize(&self, operations: &[OperationKind]) -> String {
        operations
            .iter()
            .zip(&self.counts)
            .map(|(op, count)| format!("{} {}", count, op.name))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Aggregated call graph for the counted era
#[derive(Debug, Clone)]
pub struct CallGraph {
    kinds: usize,
    totals: OpCounts,
    vertices: BTreeMap<u64, OpCounts>,
    edges: BTreeMap<(u64, u64), OpCounts>,
}

impl CallGraph {
    pub fn new(kinds: usize) -> Self {
        Self {
            kinds,
            totals: OpCounts::new(kinds),
            vertices: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }

    /// Add one sample whose chain runs innermost frame first
    pub fn add_sample(&mut self, kind: usize, weight: u64, chain: &[u64]) {
        debug_assert!(kind < self.kinds, "operation kind out of range");
        trace!("sample kind={} weight={} frames={}", kind, weight, chain.len());

        self.totals.add(kind, weight);

        let kinds = self.kinds;
        for &ip in chain {
            self.vertices
                .entry(ip)
                .or_insert_with(|| OpCounts::new(kinds))
                .add(kind, weight);
        }

        for pair in chain.windows(2) {
            let (callee, caller) = (pair[0], pair[1]);
            self.edges
                .entry((caller, callee))
                .or_insert_with(|| OpCounts::new(kinds))
                .add(kind, weight);
        }
    }

    /// Weight of every counted sample, whatever its chain length
    pub fn totals(&self) -> &OpCounts {
        &self.totals
    }

    pub fn vertex(&self, ip: u64) -> Option<&OpCounts> {
        self.vertices.get(&ip)
    }

    pub fn edge(&self, caller: u64, callee: u64) -> Option<&OpCounts> {
        self.edges.get(&(caller, callee))
    }

    /// Vertices in ascending IP order
    pub fn vertices(&self) -> impl Iterator<Item = (u64, &OpCounts)> {
        self.vertices.iter().map(|(&ip, counts)| (ip, counts))
    }

    /// Edges as `((caller, callee), counts)` in ascending order
    pub fn edges(&self) -> impl Iterator<Item = ((u64, u64), &OpCounts)> {
        self.edges.iter().map(|(&pair, counts)| (pair, counts))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
