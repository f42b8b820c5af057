//! Run configuration: model parameters, sample grid and solver settings.

use serde::{Deserialize, Serialize};

use crate::error::{RelaxError, RelaxResult};
use crate::grid::TimeGrid;

/// Parameters of `dx/dt = (a - x) / tau` with `x(0) = x0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxationParams {
    /// Equilibrium value.
    pub a: f64,
    /// Relaxation time constant, strictly positive.
    pub tau: f64,
    /// Initial condition.
    pub x0: f64,
}

impl Default for RelaxationParams {
    fn default() -> Self {
        Self {
            a: 90.0,
            tau: 45.0,
            x0: 200.0,
        }
    }
}

impl RelaxationParams {
    /// New parameter set; see [`RelaxationParams::validate`].
    pub fn new(a: f64, tau: f64, x0: f64) -> Self {
        Self { a, tau, x0 }
    }

    /// Copy with a different time constant.
    pub fn with_tau(self, tau: f64) -> Self {
        Self { tau, ..self }
    }

    /// Copy with a different initial condition.
    pub fn with_x0(self, x0: f64) -> Self {
        Self { x0, ..self }
    }

    /// All values finite and `tau > 0`.
    pub fn validate(&self) -> RelaxResult<()> {
        if !self.a.is_finite() {
            return Err(RelaxError::invalid(format!("a must be finite, got {}", self.a)));
        }
        if !self.tau.is_finite() || self.tau <= 0.0 {
            return Err(RelaxError::invalid(format!(
                "tau must be positive and finite, got {}",
                self.tau
            )));
        }
        if !self.x0.is_finite() {
            return Err(RelaxError::invalid(format!("x0 must be finite, got {}", self.x0)));
        }
        Ok(())
    }
}

/// Integrator settings shared by every run of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Absolute tolerance.
    pub atol: f64,
    /// Relative tolerance.
    pub rtol: f64,
    /// First step tried; `None` uses the grid spacing.
    pub initial_step: Option<f64>,
    /// Step attempts allowed per trajectory.
    pub max_steps: u64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            atol: 1e-10,
            rtol: 1e-10,
            initial_step: None,
            max_steps: 10_000_000,
        }
    }
}

impl SolverSettings {
    /// Tolerances must be finite, `atol > 0`, `rtol >= 0`.
    pub fn validate(&self) -> RelaxResult<()> {
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(RelaxError::invalid("atol must be positive and finite"));
        }
        if !self.rtol.is_finite() || self.rtol < 0.0 {
            return Err(RelaxError::invalid("rtol must be non-negative and finite"));
        }
        if let Some(h) = self.initial_step {
            if !h.is_finite() || h <= 0.0 {
                return Err(RelaxError::invalid("initial_step must be positive and finite"));
            }
        }
        if self.max_steps == 0 {
            return Err(RelaxError::invalid("max_steps must be greater than zero"));
        }
        Ok(())
    }
}

/// Everything needed to produce one trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Model parameters.
    pub params: RelaxationParams,
    /// Sample times.
    pub grid: TimeGrid,
    /// Integrator settings.
    pub solver: SolverSettings,
}

impl RunConfig {
    /// Baseline for parameter sweeps: `a = 90`, `tau = 45`, `x0 = 200`
    /// sampled every 0.1 over `[0, 300)`.
    pub fn sweep_baseline() -> Self {
        Self {
            params: RelaxationParams::new(90.0, 45.0, 200.0),
            grid: TimeGrid::new(300.0, 0.1),
            solver: SolverSettings::default(),
        }
    }

    /// Baseline for forced runs: `a = 1`, `tau = 1`, `x0 = 0.5`
    /// sampled every 1e-3 over `[0, 10)`.
    pub fn forced_baseline() -> Self {
        Self {
            params: RelaxationParams::new(1.0, 1.0, 0.5),
            grid: TimeGrid::new(10.0, 1e-3),
            solver: SolverSettings::default(),
        }
    }

    /// Same grid and solver with different model parameters.
    pub fn with_params(self, params: RelaxationParams) -> Self {
        Self { params, ..self }
    }

    /// Validate every section.
    pub fn validate(&self) -> RelaxResult<()> {
        self.params.validate()?;
        self.grid.validate()?;
        self.solver.validate()
    }
}
