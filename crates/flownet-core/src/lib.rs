//! Flownet: connect source nodes to target nodes through a weighted graph by
//! solving a min-cost flow problem and keeping the edges that carry flow.
//!
//! Pipeline:
//! 1. **Reconcile** raw `D`/`U` edge declarations into a directed and an
//!    undirected cost table (`reconcile`).
//! 2. **Build** solver arcs from both tables with a uniform capacity (`builder`).
//! 3. **Inject** a synthetic source and target wired to the declared node sets
//!    (`terminals`).
//! 4. **Solve** with any [`MinCostFlowSolver`] and map positive-flow arcs back
//!    to typed edges (`flow`).
//!
//! `io` and `run` wrap the pipeline in the plain-text file formats.

pub mod builder;
pub mod config;
pub mod error;
pub mod flow;
pub mod io;
pub mod reconcile;
pub mod registry;
pub mod run;
pub mod solver;
pub mod ssp;
pub mod terminals;

pub use config::{FlowConfig, RunPaths};
pub use error::{FlowNetError, Result};
pub use flow::{find_network, reconcile_flow, solve_and_reconcile, FlowSolution, OutputEdge};
pub use reconcile::{
    similarity_to_cost, EdgeReconciler, Orientation, RawEdge, ReconciledGraph, COST_SCALE,
};
pub use registry::{NodeId, NodeRegistry};
pub use run::{run, RunReport};
pub use solver::{ArcIndex, MinCostFlowSolver, SolveStatus};
pub use ssp::SuccessiveShortestPaths;
pub use terminals::{FlowNode, Terminals};
