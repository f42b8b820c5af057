//! Parameter sweeps: the same relaxation run repeated while one field varies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{RelaxationParams, RunConfig};
use crate::error::{RelaxError, RelaxResult};
use crate::grid::arange;
use crate::model::Relaxation;
use crate::trajectory::solve_trajectory;

/// Field varied by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SweepParameter {
    /// Relaxation time constant.
    Tau,
    /// Initial condition.
    InitialCondition,
}

impl SweepParameter {
    /// New parameter set with this field replaced by `value`.
    pub fn apply(self, params: RelaxationParams, value: f64) -> RelaxationParams {
        match self {
            SweepParameter::Tau => params.with_tau(value),
            SweepParameter::InitialCondition => params.with_x0(value),
        }
    }

    /// Current value of this field in `params`.
    pub fn get(self, params: &RelaxationParams) -> f64 {
        match self {
            SweepParameter::Tau => params.tau,
            SweepParameter::InitialCondition => params.x0,
        }
    }

    /// Short field name, also accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            SweepParameter::Tau => "tau",
            SweepParameter::InitialCondition => "x0",
        }
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SweepParameter {
    type Err = RelaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tau" => Ok(SweepParameter::Tau),
            "x0" | "ic" => Ok(SweepParameter::InitialCondition),
            other => Err(RelaxError::invalid(format!(
                "unknown sweep parameter '{}', expected 'tau' or 'x0'",
                other
            ))),
        }
    }
}

/// One trajectory of a sweep, labelled by the value that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRun {
    /// Value substituted into the swept field.
    pub value: f64,
    /// Solution at every grid time.
    pub trajectory: Vec<f64>,
}

/// Trajectories of a sweep, in the order the values were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// Field that was varied.
    pub parameter: SweepParameter,
    /// Configuration the sweep started from.
    pub base: RunConfig,
    /// Shared sample times.
    pub times: Vec<f64>,
    /// One run per swept value.
    pub runs: Vec<SweepRun>,
}

impl SweepResult {
    /// Swept values, in run order.
    pub fn values(&self) -> Vec<f64> {
        self.runs.iter().map(|run| run.value).collect()
    }

    /// Run produced by `value`, if any.
    pub fn run_for(&self, value: f64) -> Option<&SweepRun> {
        self.runs.iter().find(|run| run.value == value)
    }
}

/// Time constants of the reference sweep: 20, 40, ..., 120.
pub fn default_tau_values() -> Vec<f64> {
    arange(20.0, 120.01, 20.0)
}

/// Initial conditions of the reference sweep: 70, 80, ..., 120.
pub fn default_initial_conditions() -> Vec<f64> {
    arange(70.0, 120.01, 10.0)
}

/// Integrate `base` once per entry of `values`, substituting each into
/// `parameter`.
///
/// Every run gets its own parameter set built from `base`; nothing is
/// mutated between runs. All derived parameter sets are validated before
/// the first integration, so a bad value fails the sweep without partial
/// output.
pub fn run_sweep(
    base: &RunConfig,
    parameter: SweepParameter,
    values: &[f64],
) -> RelaxResult<SweepResult> {
    base.validate()?;
    let times = base.grid.samples()?;

    let models = values
        .iter()
        .map(|&value| {
            let run = base.with_params(parameter.apply(base.params, value));
            Relaxation::from_params(&run.params)
                .map(|model| (value, run, model))
                .map_err(|e| {
                    RelaxError::invalid(format!("{} = {}: {}", parameter, value, e))
                })
        })
        .collect::<RelaxResult<Vec<_>>>()?;

    info!(
        parameter = %parameter,
        runs = models.len(),
        samples = times.len(),
        "starting sweep"
    );

    let mut runs = Vec::with_capacity(models.len());
    for (value, run, model) in models {
        let trajectory = solve_trajectory(&model, run.params.x0, &times, &run.solver)?;
        debug!(
            parameter = %parameter,
            value,
            tau = model.tau(),
            final_value = trajectory.last().copied().unwrap_or(run.params.x0),
            "sweep run finished"
        );
        runs.push(SweepRun { value, trajectory });
    }

    info!(parameter = %parameter, runs = runs.len(), "sweep finished");
    Ok(SweepResult {
        parameter,
        base: *base,
        times,
        runs,
    })
}
