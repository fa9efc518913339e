//! Solve the assembled network and translate the flow back into typed edges.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::builder::build_arcs;
use crate::config::FlowConfig;
use crate::error::{FlowNetError, Result};
use crate::reconcile::{Orientation, ReconciledGraph};
use crate::solver::MinCostFlowSolver;
use crate::terminals::{check_reserved_names, inject_terminals, FlowNode, Terminals};

/// An edge of the reconstructed network, oriented as the flow traverses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputEdge {
    pub node1: String,
    pub node2: String,
    pub orientation: Orientation,
    pub flow: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowSolution {
    pub edges: Vec<OutputEdge>,
    pub total_cost: i64,
    pub node_count: usize,
    pub arc_count: usize,
}

/// Put `+flow` on the terminal source and `-flow` on the terminal target, run
/// the solver and reconcile its assignment. Any status other than optimal is
/// returned as [`FlowNetError::SolveFailed`].
pub fn solve_and_reconcile<S: MinCostFlowSolver + ?Sized>(
    graph: &ReconciledGraph,
    terminals: &Terminals,
    flow: i64,
    solver: &mut S,
) -> Result<Vec<OutputEdge>> {
    if flow <= 0 {
        return Err(FlowNetError::InvalidFlow(flow));
    }
    solver.set_node_supply(terminals.source, flow);
    solver.set_node_supply(terminals.target, -flow);

    tracing::info!(flow, arcs = solver.num_arcs(), "Computing min cost flow");
    let status = solver.solve();
    if !status.is_optimal() {
        tracing::warn!(%status, "There was an issue with the solver");
        return Err(FlowNetError::SolveFailed(status));
    }
    tracing::info!(cost = solver.optimal_cost(), "Solved");

    reconcile_flow(graph, terminals, solver)
}

/// Walk every arc with positive flow, drop terminal arcs and tag the rest by
/// the canonical table that holds their pair.
pub fn reconcile_flow<S: MinCostFlowSolver + ?Sized>(
    graph: &ReconciledGraph,
    terminals: &Terminals,
    solver: &S,
) -> Result<Vec<OutputEdge>> {
    let mut edges = Vec::new();
    for arc in 0..solver.num_arcs() {
        let flow = solver.flow(arc);
        if flow <= 0 {
            continue;
        }
        let tail = terminals.node(solver.tail(arc));
        let head = terminals.node(solver.head(arc));
        let (FlowNode::Real(tail), FlowNode::Real(head)) = (tail, head) else {
            continue;
        };

        let orientation = graph.classify(tail, head).ok_or_else(|| {
            FlowNetError::ReconciliationInvariantViolation {
                tail: graph.name(tail).to_string(),
                head: graph.name(head).to_string(),
            }
        })?;

        edges.push(OutputEdge {
            node1: graph.name(tail).to_string(),
            node2: graph.name(head).to_string(),
            orientation,
            flow,
        });
    }

    tracing::info!("Final network had {} edges", edges.len());
    Ok(edges)
}

/// Build arcs, wire terminals and solve: everything between the reconciled
/// tables and the typed output edges.
pub fn find_network<S: MinCostFlowSolver + ?Sized>(
    graph: &ReconciledGraph,
    sources: &BTreeSet<String>,
    targets: &BTreeSet<String>,
    config: &FlowConfig,
    solver: &mut S,
) -> Result<FlowSolution> {
    config.validate()?;
    if !config.allow_reserved_names {
        check_reserved_names(graph)?;
    }

    build_arcs(graph, config.capacity_units()?, solver)?;
    let terminals = inject_terminals(graph, sources, targets, config.flow, solver)?;
    let edges = solve_and_reconcile(graph, &terminals, config.flow, solver)?;

    Ok(FlowSolution {
        edges,
        total_cost: solver.optimal_cost(),
        node_count: graph.registry().len(),
        arc_count: solver.num_arcs(),
    })
}
