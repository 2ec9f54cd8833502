use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Immutable configuration bundle for a simulation run.
///
/// All coefficients are plain f64; the engine converts them into its scalar
/// type at genesis. The collapse threshold is not set directly: it derives
/// from `g_tuning_factor`, `k_base` and `g_factor` (see [`entropic_limit`]).
///
/// [`entropic_limit`]: SimConfig::entropic_limit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Side length N of the N×N grid.
    pub grid_size: usize,
    /// Number of scalar channels C stored per cell.
    pub channel_count: usize,
    /// Expansion chaos strength. Scaled by the current complexity at runtime,
    /// so the tension term self-amplifies as disorder rises.
    pub g_factor: f64,
    /// Soft-wall strength (the `x − tanh(x)` stabilizer).
    pub h_base: f64,
    /// Origin-memory strength, pulling cells back toward the initial field.
    pub k_base: f64,
    /// Tuning constant for the derived collapse threshold.
    pub g_tuning_factor: f64,
    /// Bound on the largest per-component update magnitude in one step.
    pub base_dt: f64,
    /// Iteration budget for `run`.
    pub max_iterations: u64,
    /// Recurrence closes when the difference metric drops below this, in
    /// Collapse phase.
    pub recurrence_epsilon: f64,
    /// A Report event is emitted every this many steps.
    pub reporting_interval: u64,
    /// When false, the NaN/Inf halt on the difference metric is skipped.
    pub check_divergence: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 16,
            channel_count: 3,
            g_factor: 1.0,
            h_base: 0.1,
            k_base: 0.05,
            g_tuning_factor: 10.0,
            base_dt: 0.01,
            max_iterations: 10_000,
            recurrence_epsilon: 0.01,
            reporting_interval: 100,
            check_divergence: true,
        }
    }
}

impl SimConfig {
    /// Number of cells, N².
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Number of scalar values the provider must supply, N² × C.
    pub fn value_count(&self) -> usize {
        self.cell_count() * self.channel_count
    }

    /// The entropic limit: the complexity threshold that flips Expansion to
    /// Collapse. Derived, never configured directly:
    /// `g_tuning_factor × (k_base / g_factor)`.
    pub fn entropic_limit(&self) -> f64 {
        self.g_tuning_factor * (self.k_base / self.g_factor)
    }

    /// Fail-fast validation, run before any stepping occurs.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            bail!("grid_size must be greater than zero.");
        }
        if self.channel_count == 0 {
            bail!("channel_count must be greater than zero.");
        }
        if self.g_factor <= 0.0 {
            bail!("g_factor must be positive.");
        }
        if self.base_dt <= 0.0 {
            bail!("base_dt must be positive.");
        }
        if self.recurrence_epsilon <= 0.0 {
            bail!("recurrence_epsilon must be positive.");
        }
        if self.max_iterations == 0 {
            bail!("max_iterations must be greater than zero.");
        }
        if self.reporting_interval == 0 {
            bail!("reporting_interval must be at least 1.");
        }
        Ok(())
    }
}
