//! # relaxode: relaxation sweeps and noise-forced runs
//!
//! Numerical integration of the linear relaxation equation
//!
//! ```text
//! dx/dt = (a - x) / tau + f(t)
//! ```
//!
//! on an adaptive Runge-Kutta-Fehlberg 7(8) integrator, sampled at every
//! point of a fixed time grid.
//!
//! ## Features
//!
//! - 13-stage embedded RK7(8) pair with adaptive step-size control
//! - Grid sampling that integrates exactly to each requested time
//! - Sweeps over the time constant `tau` or the initial condition `x0`
//! - Forcing by the zero function or by piecewise-linear interpolation of
//!   a uniform or Gaussian noise table (an Ornstein-Uhlenbeck style process)
//! - Explicit invalid-argument errors for `tau <= 0`, empty or
//!   non-increasing grids and malformed tables
//! - CSV and JSON export of every result
//!
//! ## Sweeping the time constant
//!
//! ```rust
//! use relaxode::{run_sweep, RunConfig, SweepParameter, TimeGrid};
//!
//! let config = RunConfig {
//!     grid: TimeGrid::new(30.0, 0.5),
//!     ..RunConfig::sweep_baseline()
//! };
//! let result = run_sweep(&config, SweepParameter::Tau, &[20.0, 120.0]).unwrap();
//!
//! let fast = &result.runs[0].trajectory;
//! let slow = &result.runs[1].trajectory;
//! assert!(slow[10] > fast[10]);
//! ```
//!
//! ## Forcing
//!
//! ```rust
//! use relaxode::{run_forced, InterpolatedForcing, RunConfig, TimeGrid};
//!
//! let config = RunConfig {
//!     grid: TimeGrid::new(1.0, 0.1),
//!     ..RunConfig::forced_baseline()
//! };
//! let times = config.grid.samples().unwrap();
//! let kick = InterpolatedForcing::new(vec![0.0, 1.0], vec![0.0, 2.0]).unwrap();
//!
//! let trajectory = run_forced(&config, &kick).unwrap();
//! assert_eq!(trajectory.len(), times.len());
//! ```
//!
//! ## Tolerances
//!
//! Runs default to `atol = rtol = 1e-10`. Against the closed form
//! `a + (x0 - a) exp(-t / tau)` this keeps the absolute error far below
//! `1e-6` over the reference horizons.
//!
//! ## References
//!
//! 1. Fehlberg, E. (1968). "Classical Fifth-, Sixth-, Seventh-, and
//!    Eighth-Order Runge-Kutta Formulas with Stepsize Control".
//!    NASA TR R-287.
//!
//! 2. Hairer, E., Nørsett, S.P., & Wanner, G. (1993). "Solving
//!    Ordinary Differential Equations I: Nonstiff Problems".
//!    Springer.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod coefficients;
pub mod config;
pub mod error;
pub mod forced;
pub mod forcing;
pub mod grid;
pub mod model;
pub mod output;
pub mod solver;
pub mod sweep;
pub mod trajectory;

pub use config::{RelaxationParams, RunConfig, SolverSettings};
pub use error::{RelaxError, RelaxResult};
pub use forced::{run_forced, run_forced_process, ForcedProcessConfig, ForcedProcessResult};
pub use forcing::{Forcing, InterpolatedForcing, NoiseKind, ZeroForcing};
pub use grid::{arange, TimeGrid, MAX_SAMPLES};
pub use model::{ForcedRelaxation, Relaxation};
pub use output::{
    write_forced_csv, write_forced_csv_file, write_json, write_json_file, write_sweep_csv,
    write_sweep_csv_file,
};
pub use solver::{IntegrationError, OdeSystem, Rkf78, Stats, StepController, StepResult, Tolerances};
pub use sweep::{
    default_initial_conditions, default_tau_values, run_sweep, SweepParameter, SweepResult,
    SweepRun,
};
pub use trajectory::solve_trajectory;
