//! Synthetic super source / super target wiring.
//!
//! Terminals are a tagged [`FlowNode`] variant rather than registry entries,
//! so a real node that happens to be called `source` can never alias one.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{FlowNetError, Result};
use crate::reconcile::ReconciledGraph;
use crate::registry::NodeId;
use crate::solver::MinCostFlowSolver;

/// Names the synthetic terminals carried in the original node namespace.
pub const RESERVED_SOURCE: &str = "source";
pub const RESERVED_TARGET: &str = "target";

/// Terminal arcs get this many times the requested flow as capacity, so they
/// are never the binding constraint.
pub const TERMINAL_CAPACITY_FACTOR: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FlowNode {
    Real(NodeId),
    SyntheticSource,
    SyntheticTarget,
}

/// Solver node indices of the two synthetic terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminals {
    pub source: usize,
    pub target: usize,
    pub source_arcs: usize,
    pub target_arcs: usize,
}

impl Terminals {
    /// Classify a solver node index.
    pub fn node(&self, index: usize) -> FlowNode {
        if index == self.source {
            FlowNode::SyntheticSource
        } else if index == self.target {
            FlowNode::SyntheticTarget
        } else {
            FlowNode::Real(NodeId::new(index as u32))
        }
    }
}

/// Fail if a real node uses one of the reserved terminal names.
pub fn check_reserved_names(graph: &ReconciledGraph) -> Result<()> {
    for name in [RESERVED_SOURCE, RESERVED_TARGET] {
        if graph.registry().id_of(name).is_some() {
            return Err(FlowNetError::ReservedNameCollision(name.to_string()));
        }
    }
    Ok(())
}

/// Mint the two terminals after all real nodes and connect them with
/// zero-cost arcs: terminal source to every known source, every known target
/// to the terminal target. Names missing from the registry are skipped.
pub fn inject_terminals<S: MinCostFlowSolver + ?Sized>(
    graph: &ReconciledGraph,
    sources: &BTreeSet<String>,
    targets: &BTreeSet<String>,
    flow: i64,
    solver: &mut S,
) -> Result<Terminals> {
    if flow <= 0 {
        return Err(FlowNetError::InvalidFlow(flow));
    }
    let capacity = flow
        .checked_mul(TERMINAL_CAPACITY_FACTOR)
        .ok_or(FlowNetError::InvalidFlow(flow))?;

    let registry = graph.registry();
    let source = registry.next_id();
    let target = source + 1;

    let mut terminals = Terminals {
        source,
        target,
        source_arcs: 0,
        target_arcs: 0,
    };

    for name in sources {
        match registry.id_of(name) {
            Some(id) => {
                solver.add_arc_with_capacity_and_unit_cost(source, id.index(), capacity, 0);
                terminals.source_arcs += 1;
            }
            None => tracing::warn!(node = %name, "source not in edge file, skipping"),
        }
    }
    for name in targets {
        match registry.id_of(name) {
            Some(id) => {
                solver.add_arc_with_capacity_and_unit_cost(id.index(), target, capacity, 0);
                terminals.target_arcs += 1;
            }
            None => tracing::warn!(node = %name, "target not in edge file, skipping"),
        }
    }

    tracing::debug!(
        sources = terminals.source_arcs,
        targets = terminals.target_arcs,
        capacity,
        "terminal arcs added"
    );
    Ok(terminals)
}
