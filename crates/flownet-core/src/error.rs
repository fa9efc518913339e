//! Error taxonomy shared by every stage of the pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::solver::SolveStatus;

pub type Result<T> = std::result::Result<T, FlowNetError>;

#[derive(Debug, Error)]
pub enum FlowNetError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed edge on line {line}: {message}")]
    MalformedEdge { line: usize, message: String },

    #[error("cannot add edge on line {line}: unknown orientation `{tag}` (expected `D` or `U`)")]
    InvalidInputKind { line: usize, tag: String },

    #[error("invalid capacity {0}: must be at least 1 after truncation")]
    InvalidCapacity(f64),

    #[error("invalid flow {0}: must be a positive integer")]
    InvalidFlow(i64),

    #[error("node `{0}` collides with a reserved terminal name")]
    ReservedNameCollision(String),

    #[error("min cost flow was not solved to optimality: {0}")]
    SolveFailed(SolveStatus),

    #[error("edge ({tail}, {head}) carries flow but is in neither edge table")]
    ReconciliationInvariantViolation { tail: String, head: String },
}

impl FlowNetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short name of the stage that produced the error, for diagnostics.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::MalformedEdge { .. } | Self::InvalidInputKind { .. } => "parse",
            Self::InvalidCapacity(_) | Self::InvalidFlow(_) => "config",
            Self::ReservedNameCollision(_) => "terminals",
            Self::SolveFailed(_) => "solve",
            Self::ReconciliationInvariantViolation { .. } => "reconcile",
        }
    }
}
