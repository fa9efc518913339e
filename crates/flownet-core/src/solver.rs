//! The min-cost flow capability the pipeline depends on.
//!
//! The pipeline only ever talks to a solver through [`MinCostFlowSolver`], so
//! reconciliation can be exercised against a scripted fake as easily as
//! against [`crate::ssp::SuccessiveShortestPaths`].

use std::fmt;

use serde::Serialize;

/// Index of an arc in insertion order.
pub type ArcIndex = usize;

/// Outcome of [`MinCostFlowSolver::solve`], matching the status set of
/// external min-cost flow backends so any of them can sit behind the trait.
/// Only `Optimal` counts as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    NotSolved,
    Optimal,
    Feasible,
    Infeasible,
    Unbalanced,
    /// Reported by external backends whose result failed their own checks.
    /// [`crate::ssp::SuccessiveShortestPaths`] never produces it.
    BadResult,
    BadCostRange,
}

impl SolveStatus {
    pub fn is_optimal(self) -> bool {
        self == Self::Optimal
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotSolved => "not solved",
            Self::Optimal => "optimal",
            Self::Feasible => "feasible but not optimal",
            Self::Infeasible => "infeasible",
            Self::Unbalanced => "unbalanced supplies",
            Self::BadResult => "bad result",
            Self::BadCostRange => "bad cost range",
        };
        f.write_str(s)
    }
}

/// Directed capacitated graph with integer costs and node supplies.
///
/// Nodes are dense `usize` indices; a node exists once an arc or a supply
/// mentions it.
pub trait MinCostFlowSolver {
    fn add_arc_with_capacity_and_unit_cost(
        &mut self,
        tail: usize,
        head: usize,
        capacity: i64,
        unit_cost: i64,
    ) -> ArcIndex;

    /// Positive supply is injected at `node`, negative supply is demanded.
    fn set_node_supply(&mut self, node: usize, supply: i64);

    /// Blocks until the solver finishes.
    fn solve(&mut self) -> SolveStatus;

    fn num_arcs(&self) -> usize;

    fn tail(&self, arc: ArcIndex) -> usize;

    fn head(&self, arc: ArcIndex) -> usize;

    /// Flow on `arc` in the last solution; zero before a successful solve.
    fn flow(&self, arc: ArcIndex) -> i64;

    /// Total cost of the last solution.
    fn optimal_cost(&self) -> i64;
}
