//! Materialize the canonical edge tables as solver arcs.

use crate::error::{FlowNetError, Result};
use crate::reconcile::ReconciledGraph;
use crate::solver::MinCostFlowSolver;

/// Every edge gets the same capacity regardless of its cost. Directed entries
/// become one arc, undirected entries two mirrored arcs. Real node `NodeId`s
/// are used directly as solver node indices.
///
/// Returns the number of arcs added.
pub fn build_arcs<S: MinCostFlowSolver + ?Sized>(
    graph: &ReconciledGraph,
    capacity: i64,
    solver: &mut S,
) -> Result<usize> {
    if capacity <= 0 {
        return Err(FlowNetError::InvalidCapacity(capacity as f64));
    }

    let before = solver.num_arcs();
    for (tail, head, cost) in graph.directed() {
        solver.add_arc_with_capacity_and_unit_cost(tail.index(), head.index(), capacity, cost);
    }
    for (a, b, cost) in graph.undirected() {
        solver.add_arc_with_capacity_and_unit_cost(a.index(), b.index(), capacity, cost);
        solver.add_arc_with_capacity_and_unit_cost(b.index(), a.index(), capacity, cost);
    }

    let added = solver.num_arcs() - before;
    tracing::debug!(arcs = added, capacity, "edge arcs added");
    Ok(added)
}
