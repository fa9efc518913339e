//! Run configuration.

use std::path::{Path, PathBuf};

use crate::error::{FlowNetError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct FlowConfig {
    /// Units of flow pushed from the terminal source to the terminal target.
    pub flow: i64,
    /// Per-edge capacity as given by the user; truncated for the solver.
    pub capacity: f64,
    /// Accept real nodes named `source` / `target`.
    pub allow_reserved_names: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            flow: 1,
            capacity: 1.0,
            allow_reserved_names: false,
        }
    }
}

impl FlowConfig {
    pub fn validate(&self) -> Result<()> {
        if self.flow <= 0 {
            return Err(FlowNetError::InvalidFlow(self.flow));
        }
        self.capacity_units()?;
        Ok(())
    }

    /// Integer capacity handed to the solver (truncated toward zero).
    pub fn capacity_units(&self) -> Result<i64> {
        if !self.capacity.is_finite() || self.capacity.trunc() < 1.0 {
            return Err(FlowNetError::InvalidCapacity(self.capacity));
        }
        if self.capacity >= i64::MAX as f64 {
            return Err(FlowNetError::InvalidCapacity(self.capacity));
        }
        Ok(self.capacity.trunc() as i64)
    }

    /// `<prefix>_flow<F>_c<C>.sif`, with the capacity printed as given.
    pub fn output_path(&self, prefix: &Path) -> PathBuf {
        let mut name = prefix.as_os_str().to_os_string();
        name.push(format!("_flow{}_c{}.sif", self.flow, format_capacity(self.capacity)));
        PathBuf::from(name)
    }
}

/// Decimal rendering with at least one fractional digit (`1` -> `1.0`).
pub fn format_capacity(capacity: f64) -> String {
    let s = capacity.to_string();
    if s.contains(['.', 'e', 'E']) || !capacity.is_finite() {
        s
    } else {
        format!("{s}.0")
    }
}

/// Input and output locations for one run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub edges_file: PathBuf,
    pub sources_file: PathBuf,
    pub targets_file: PathBuf,
    pub output_prefix: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_truncated() {
        let cfg = FlowConfig {
            capacity: 2.9,
            ..FlowConfig::default()
        };
        assert_eq!(cfg.capacity_units().unwrap(), 2);

        let cfg = FlowConfig {
            capacity: 0.5,
            ..FlowConfig::default()
        };
        assert!(matches!(
            cfg.capacity_units(),
            Err(FlowNetError::InvalidCapacity(_))
        ));
    }

    #[test]
    fn output_name_matches_prefix_flow_and_capacity() {
        let cfg = FlowConfig {
            flow: 3,
            capacity: 2.0,
            ..FlowConfig::default()
        };
        assert_eq!(
            cfg.output_path(Path::new("out/run")),
            PathBuf::from("out/run_flow3_c2.0.sif")
        );
        assert_eq!(format_capacity(2.5), "2.5");
    }
}
