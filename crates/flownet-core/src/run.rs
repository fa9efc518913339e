//! File-level pipeline: read inputs, find the network, write the SIF output.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{FlowConfig, RunPaths};
use crate::error::Result;
use crate::flow::{find_network, FlowSolution, OutputEdge};
use crate::io::{read_graph, read_node_set, write_sif};
use crate::solver::MinCostFlowSolver;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub edges: Vec<OutputEdge>,
    pub total_cost: i64,
    pub node_count: usize,
    pub arc_count: usize,
}

/// The output file is only written once the solve and reconciliation have
/// both succeeded. A failed run also removes any file left at the output path
/// by an earlier run with the same prefix, flow and capacity, so the path
/// never holds a network the current inputs did not produce.
pub fn run<S: MinCostFlowSolver + ?Sized>(
    paths: &RunPaths,
    config: &FlowConfig,
    solver: &mut S,
) -> Result<RunReport> {
    config.validate()?;
    let output_path = config.output_path(&paths.output_prefix);

    let solution = match solve_inputs(paths, config, solver) {
        Ok(solution) => solution,
        Err(err) => {
            remove_stale_output(&output_path);
            return Err(err);
        }
    };

    write_sif(&output_path, &solution.edges)?;
    tracing::info!(path = %output_path.display(), "wrote network");

    Ok(RunReport {
        output_path,
        edges: solution.edges,
        total_cost: solution.total_cost,
        node_count: solution.node_count,
        arc_count: solution.arc_count,
    })
}

fn solve_inputs<S: MinCostFlowSolver + ?Sized>(
    paths: &RunPaths,
    config: &FlowConfig,
    solver: &mut S,
) -> Result<FlowSolution> {
    let sources = read_node_set(&paths.sources_file)?;
    let targets = read_node_set(&paths.targets_file)?;
    let graph = read_graph(&paths.edges_file)?;
    tracing::info!(
        directed = graph.directed_len(),
        undirected = graph.undirected_len(),
        sources = sources.len(),
        targets = targets.len(),
        "inputs parsed"
    );

    find_network(&graph, &sources, &targets, config, solver)
}

fn remove_stale_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::warn!(path = %path.display(), "removed output from an earlier run"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove stale output"),
    }
}
