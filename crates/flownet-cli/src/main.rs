//! Flownet CLI
//!
//! Connects a set of source nodes to a set of target nodes in a weighted,
//! mixed directed/undirected graph by pushing flow through a min-cost flow
//! solver, and writes the edges that carry flow as a tab-separated
//! `node1 node2 D|U` list named `<output>_flow<F>_c<C>.sif`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use flownet_core::{FlowConfig, FlowNetError, RunPaths, SuccessiveShortestPaths};
use tracing_subscriber::filter::LevelFilter;

/// Exit code for a solve that did not reach optimality.
const EXIT_SOLVE_FAILED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "flownet")]
#[command(
    author,
    version,
    about = "Connect sources to targets in a graph using minimum-cost flow"
)]
struct Cli {
    /// Network file: `node1 node2 similarity D|U` per line.
    #[arg(long = "edges_file", alias = "edges-file")]
    edges_file: PathBuf,

    /// File with one source node per line.
    #[arg(long = "sources_file", alias = "sources-file")]
    sources_file: PathBuf,

    /// File with one target node per line.
    #[arg(long = "targets_file", alias = "targets-file")]
    targets_file: PathBuf,

    /// Prefix for all output files.
    #[arg(long)]
    output: PathBuf,

    /// The amount of flow pushed through the network.
    #[arg(long, default_value_t = 1)]
    flow: i64,

    /// The amount of flow which can pass through a single edge.
    ///
    /// Accepted as a decimal; truncated to an integer for the solver.
    #[arg(long, default_value_t = 1.0)]
    capacity: f64,

    /// Accept real nodes named `source` or `target`.
    #[arg(long)]
    allow_reserved_names: bool,

    /// Print a JSON run summary to stdout.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_run(cli: &Cli) -> Result<()> {
    let paths = RunPaths {
        edges_file: cli.edges_file.clone(),
        sources_file: cli.sources_file.clone(),
        targets_file: cli.targets_file.clone(),
        output_prefix: cli.output.clone(),
    };
    let config = FlowConfig {
        flow: cli.flow,
        capacity: cli.capacity,
        allow_reserved_names: cli.allow_reserved_names,
    };

    tracing::debug!(?paths, ?config, "starting run");

    let mut solver = SuccessiveShortestPaths::new();
    let report = flownet_core::run(&paths, &config, &mut solver)
        .with_context(|| format!("network from {}", paths.edges_file.display()))?;

    eprintln!(
        "{} final network had {} edges (cost {})",
        "ok".green().bold(),
        report.edges.len(),
        report.total_cost
    );
    eprintln!(
        "{} {}",
        "wrote".green().bold(),
        report.output_path.display().to_string().bold()
    );
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize run summary")?
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cmd_run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(FlowNetError::SolveFailed(status)) = err.downcast_ref::<FlowNetError>() {
                eprintln!(
                    "{} There was an issue with the solver ({status}); no output written",
                    "error:".red().bold()
                );
                return ExitCode::from(EXIT_SOLVE_FAILED);
            }
            // The context layer keeps the library error reachable by downcast.
            let stage = err
                .downcast_ref::<FlowNetError>()
                .map(FlowNetError::stage)
                .unwrap_or("run");
            eprintln!("{} {stage} failed: {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
