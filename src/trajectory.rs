//! Scalar trajectories sampled on a time grid.

use crate::config::SolverSettings;
use crate::error::{RelaxError, RelaxResult};
use crate::solver::{OdeSystem, Rkf78, Tolerances};

/// Integrate a scalar system from `x0` at `times[0]` and return one value
/// per entry of `times`.
///
/// A fresh integrator is built for every call so runs never share step-size
/// history. Grid and settings problems surface as errors before any
/// integration happens.
pub fn solve_trajectory<S: OdeSystem<1>>(
    system: &S,
    x0: f64,
    times: &[f64],
    settings: &SolverSettings,
) -> RelaxResult<Vec<f64>> {
    settings.validate()?;
    let h0 = match settings.initial_step {
        Some(h) => h,
        None => default_initial_step(times)?,
    };

    let mut solver = Rkf78::new(Tolerances::new(settings.atol, settings.rtol));
    solver.max_steps = settings.max_steps;

    let samples = solver.integrate_on_grid(system, &[x0], times, h0)?;
    Ok(samples.into_iter().map(|[x]| x).collect())
}

/// First grid spacing, or 1.0 for a single-sample grid.
fn default_initial_step(times: &[f64]) -> RelaxResult<f64> {
    match times {
        [] => Err(RelaxError::invalid("time grid is empty")),
        [_] => Ok(1.0),
        [t0, t1, ..] => {
            let h = t1 - t0;
            if h.is_finite() && h > 0.0 {
                Ok(h)
            } else {
                Err(RelaxError::invalid(
                    "time grid must be finite and strictly increasing",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Relaxation;

    #[test]
    fn trajectory_has_one_value_per_time() {
        let model = Relaxation::new(90.0, 45.0).unwrap();
        let times: Vec<f64> = (0..50).map(|i| i as f64).collect();

        let traj = solve_trajectory(&model, 200.0, &times, &SolverSettings::default()).unwrap();
        assert_eq!(traj.len(), times.len());
        assert_eq!(traj[0], 200.0);
        for (t, x) in times.iter().zip(&traj) {
            assert!((x - model.exact(200.0, *t)).abs() < 1e-7);
        }
    }

    #[test]
    fn explicit_initial_step_is_used() {
        let model = Relaxation::new(0.0, 1.0).unwrap();
        let settings = SolverSettings {
            initial_step: Some(1e-4),
            ..Default::default()
        };
        let traj = solve_trajectory(&model, 1.0, &[0.0, 2.0], &settings).unwrap();
        assert!((traj[1] - (-2.0f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn empty_and_decreasing_grids_fail() {
        let model = Relaxation::new(0.0, 1.0).unwrap();
        let settings = SolverSettings::default();

        assert!(matches!(
            solve_trajectory(&model, 1.0, &[], &settings),
            Err(RelaxError::InvalidArgument(_))
        ));
        assert!(solve_trajectory(&model, 1.0, &[1.0, 0.0], &settings).is_err());

        let explicit = SolverSettings {
            initial_step: Some(0.1),
            ..Default::default()
        };
        assert!(matches!(
            solve_trajectory(&model, 1.0, &[0.0, 1.0, 0.5], &explicit),
            Err(RelaxError::Integration(_))
        ));
    }

    #[test]
    fn single_sample_grid_returns_initial_value() {
        let model = Relaxation::new(0.0, 1.0).unwrap();
        let traj = solve_trajectory(&model, 4.0, &[0.0], &SolverSettings::default()).unwrap();
        assert_eq!(traj, vec![4.0]);
    }

    #[test]
    fn non_finite_initial_value_fails() {
        let model = Relaxation::new(0.0, 1.0).unwrap();
        let err = solve_trajectory(&model, f64::NAN, &[0.0, 1.0], &SolverSettings::default())
            .unwrap_err();
        assert!(matches!(err, RelaxError::Integration(_)));
    }
}
