//! Edge reconciliation: fold mixed directed/undirected edge declarations into
//! two canonical cost tables.
//!
//! Precedence rules:
//! - within one kind, the lowest cost ever declared for a pair wins;
//! - a directed declaration (either orientation) evicts an undirected entry for
//!   the same unordered pair, and later undirected declarations for that pair
//!   are dropped.
//!
//! The result is a [`ReconciledGraph`], an immutable value that is threaded
//! through graph construction and output reconciliation.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{FlowNetError, Result};
use crate::registry::{NodeId, NodeRegistry};

/// Fixed-point scale used to turn similarities into integer arc costs.
pub const COST_SCALE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Orientation {
    #[serde(rename = "D")]
    Directed,
    #[serde(rename = "U")]
    Undirected,
}

impl Orientation {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "D" => Some(Self::Directed),
            "U" => Some(Self::Undirected),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Directed => "D",
            Self::Undirected => "U",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One parsed line of the edge file. The orientation tag is kept verbatim and
/// only checked when the record is reconciled.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEdge {
    pub line: usize,
    pub node1: String,
    pub node2: String,
    pub similarity: f64,
    pub tag: String,
}

/// `round((1 - s) * 100)`: higher similarity means a cheaper arc.
pub fn similarity_to_cost(similarity: f64) -> i64 {
    ((1.0 - similarity) * COST_SCALE).round() as i64
}

fn unordered(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn keep_min(slot: &mut i64, cost: i64) {
    if cost < *slot {
        *slot = cost;
    }
}

#[derive(Debug, Default)]
pub struct EdgeReconciler {
    registry: NodeRegistry,
    directed: BTreeMap<(NodeId, NodeId), i64>,
    undirected: BTreeMap<(NodeId, NodeId), i64>,
}

impl EdgeReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile one raw record. Both endpoints are registered before the
    /// orientation tag is examined.
    pub fn add_record(&mut self, edge: &RawEdge) -> Result<()> {
        let a = self.registry.intern(&edge.node1);
        let b = self.registry.intern(&edge.node2);
        let cost = similarity_to_cost(edge.similarity);
        let orientation =
            Orientation::from_tag(&edge.tag).ok_or_else(|| FlowNetError::InvalidInputKind {
                line: edge.line,
                tag: edge.tag.clone(),
            })?;
        self.insert_ids(a, b, cost, orientation);
        Ok(())
    }

    /// Reconcile an already-costed declaration by node name.
    pub fn insert(&mut self, node1: &str, node2: &str, cost: i64, orientation: Orientation) {
        let a = self.registry.intern(node1);
        let b = self.registry.intern(node2);
        self.insert_ids(a, b, cost, orientation);
    }

    fn insert_ids(&mut self, a: NodeId, b: NodeId, cost: i64, orientation: Orientation) {
        let pair = unordered(a, b);
        match orientation {
            Orientation::Directed => {
                if let Some(existing) = self.directed.get_mut(&(a, b)) {
                    keep_min(existing, cost);
                } else {
                    self.undirected.remove(&pair);
                    self.directed.insert((a, b), cost);
                }
            }
            Orientation::Undirected => {
                let claimed_directed =
                    self.directed.contains_key(&(a, b)) || self.directed.contains_key(&(b, a));
                if let Some(existing) = self.undirected.get_mut(&pair) {
                    keep_min(existing, cost);
                } else if !claimed_directed {
                    self.undirected.insert(pair, cost);
                }
            }
        }
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn finish(self) -> ReconciledGraph {
        tracing::debug!(
            nodes = self.registry.len(),
            directed = self.directed.len(),
            undirected = self.undirected.len(),
            "edge tables reconciled"
        );
        ReconciledGraph {
            registry: self.registry,
            directed: self.directed,
            undirected: self.undirected,
        }
    }
}

/// Registry plus the two canonical tables, read-only once built.
#[derive(Debug, Clone)]
pub struct ReconciledGraph {
    registry: NodeRegistry,
    directed: BTreeMap<(NodeId, NodeId), i64>,
    undirected: BTreeMap<(NodeId, NodeId), i64>,
}

impl ReconciledGraph {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RawEdge>) -> Result<Self> {
        let mut reconciler = EdgeReconciler::new();
        for record in records {
            reconciler.add_record(record)?;
        }
        Ok(reconciler.finish())
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Directed entries as `(tail, head, cost)`, ordered by id pair.
    pub fn directed(&self) -> impl Iterator<Item = (NodeId, NodeId, i64)> + '_ {
        self.directed.iter().map(|(&(a, b), &c)| (a, b, c))
    }

    /// Undirected entries as `(lower id, higher id, cost)`.
    pub fn undirected(&self) -> impl Iterator<Item = (NodeId, NodeId, i64)> + '_ {
        self.undirected.iter().map(|(&(a, b), &c)| (a, b, c))
    }

    pub fn directed_len(&self) -> usize {
        self.directed.len()
    }

    pub fn undirected_len(&self) -> usize {
        self.undirected.len()
    }

    pub fn directed_cost(&self, tail: &str, head: &str) -> Option<i64> {
        let a = self.registry.id_of(tail)?;
        let b = self.registry.id_of(head)?;
        self.directed.get(&(a, b)).copied()
    }

    /// Cost of the undirected entry for `{a, b}`; argument order is irrelevant.
    pub fn undirected_cost(&self, a: &str, b: &str) -> Option<i64> {
        let a = self.registry.id_of(a)?;
        let b = self.registry.id_of(b)?;
        self.undirected.get(&unordered(a, b)).copied()
    }

    /// Which table an arc `tail -> head` came from. The directed table is
    /// consulted first.
    pub fn classify(&self, tail: NodeId, head: NodeId) -> Option<Orientation> {
        if self.directed.contains_key(&(tail, head)) {
            Some(Orientation::Directed)
        } else if self.undirected.contains_key(&unordered(tail, head)) {
            Some(Orientation::Undirected)
        } else {
            None
        }
    }

    pub(crate) fn name(&self, id: NodeId) -> &str {
        self.registry.name(id).unwrap_or("<unknown>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_rounds_instead_of_truncating() {
        // (1 - 0.9) * 100 is 9.999999999999998 in binary floating point.
        assert_eq!(similarity_to_cost(0.9), 10);
        assert_eq!(similarity_to_cost(0.99), 1);
        assert_eq!(similarity_to_cost(1.0), 0);
        assert_eq!(similarity_to_cost(0.0), 100);
    }

    #[test]
    fn undirected_after_reverse_directed_is_dropped() {
        let mut r = EdgeReconciler::new();
        r.insert("b", "a", 5, Orientation::Directed);
        r.insert("a", "b", 1, Orientation::Undirected);
        let g = r.finish();
        assert_eq!(g.undirected_len(), 0);
        assert_eq!(g.directed_cost("b", "a"), Some(5));
        assert_eq!(g.directed_cost("a", "b"), None);
    }

    #[test]
    fn directed_evicts_existing_undirected() {
        let mut r = EdgeReconciler::new();
        r.insert("a", "b", 1, Orientation::Undirected);
        r.insert("b", "a", 7, Orientation::Directed);
        let g = r.finish();
        assert_eq!(g.undirected_cost("a", "b"), None);
        assert_eq!(g.directed_cost("b", "a"), Some(7));
    }

    #[test]
    fn unknown_tag_is_rejected_after_registering_endpoints() {
        let mut r = EdgeReconciler::new();
        let err = r
            .add_record(&RawEdge {
                line: 3,
                node1: "x".into(),
                node2: "y".into(),
                similarity: 0.5,
                tag: "B".into(),
            })
            .unwrap_err();
        assert!(matches!(err, FlowNetError::InvalidInputKind { line: 3, ref tag } if tag == "B"));
        assert_eq!(r.registry().len(), 2);
    }
}
