//! End-to-end behaviour of the relaxation runs.

use proptest::prelude::*;
use relaxode::{
    default_initial_conditions, default_tau_values, run_forced, run_forced_process, run_sweep,
    solve_trajectory, ForcedProcessConfig, ForcedRelaxation, Forcing, InterpolatedForcing,
    RelaxError, Relaxation, RelaxationParams, RunConfig, SolverSettings, SweepParameter,
    TimeGrid, ZeroForcing,
};

#[test]
fn unforced_run_matches_closed_form() {
    let config = RunConfig::sweep_baseline();
    let times = config.grid.samples().unwrap();
    let model = Relaxation::from_params(&config.params).unwrap();

    let trajectory = solve_trajectory(&model, config.params.x0, &times, &config.solver).unwrap();

    let max_err = times
        .iter()
        .zip(&trajectory)
        .map(|(t, x)| (x - model.exact(config.params.x0, *t)).abs())
        .fold(0.0f64, f64::max);
    assert!(max_err < 1e-4, "max abs error {:.3e}", max_err);
}

#[test]
fn long_horizon_converges_to_equilibrium() {
    let config = RunConfig {
        params: RelaxationParams::new(90.0, 5.0, 200.0),
        grid: TimeGrid::new(200.0, 1.0),
        solver: SolverSettings::default(),
    };
    let result = run_sweep(&config, SweepParameter::Tau, &[5.0]).unwrap();
    let last = *result.runs[0].trajectory.last().unwrap();
    assert!((last - 90.0).abs() < 1e-6, "final value {}", last);
}

#[test]
fn larger_tau_decays_more_slowly() {
    let config = RunConfig::sweep_baseline();
    let result = run_sweep(&config, SweepParameter::Tau, &default_tau_values()).unwrap();

    assert_eq!(result.runs.len(), 6);
    for run in &result.runs {
        assert_eq!(run.trajectory.len(), result.times.len());
        assert!(
            run.trajectory.windows(2).all(|w| w[1] < w[0]),
            "tau = {} is not strictly decaying",
            run.value
        );
        assert!(
            run.trajectory.iter().all(|&x| x > 90.0),
            "tau = {} crossed the equilibrium",
            run.value
        );
    }

    for pair in result.runs.windows(2) {
        let (fast, slow) = (&pair[0], &pair[1]);
        assert!(slow.value > fast.value);
        for i in 1..result.times.len() {
            assert!(
                slow.trajectory[i] > fast.trajectory[i],
                "tau = {} not above tau = {} at t = {}",
                slow.value,
                fast.value,
                result.times[i]
            );
        }
    }
}

#[test]
fn initial_condition_ordering_is_preserved() {
    let config = RunConfig::sweep_baseline();
    let result = run_sweep(
        &config,
        SweepParameter::InitialCondition,
        &default_initial_conditions(),
    )
    .unwrap();

    assert_eq!(result.runs.len(), 6);
    for pair in result.runs.windows(2) {
        assert!(pair[0].value < pair[1].value);
        for (lo, hi) in pair[0].trajectory.iter().zip(&pair[1].trajectory) {
            assert!(lo <= hi);
        }
    }

    // Starting at the equilibrium stays there
    let at_equilibrium = result.run_for(90.0).unwrap();
    assert!(at_equilibrium.trajectory.iter().all(|&x| x == 90.0));
}

#[test]
fn interpolated_forcing_edges() {
    let table = InterpolatedForcing::new(vec![0.0, 1.0], vec![0.0, 2.0]).unwrap();
    assert_eq!(table.value(0.5), 1.0);
    assert_eq!(table.value(-1.0), 0.0);
    assert_eq!(table.value(5.0), 2.0);
}

#[test]
fn zero_forcing_reproduces_unforced_run_exactly() {
    let config = RunConfig::forced_baseline();
    let times = config.grid.samples().unwrap();
    let model = Relaxation::from_params(&config.params).unwrap();

    let plain = solve_trajectory(&model, config.params.x0, &times, &config.solver).unwrap();
    let forced = solve_trajectory(
        &ForcedRelaxation::new(model, ZeroForcing),
        config.params.x0,
        &times,
        &config.solver,
    )
    .unwrap();
    let via_driver = run_forced(&config, ZeroForcing).unwrap();

    assert_eq!(plain, forced);
    assert_eq!(plain, via_driver);
}

#[test]
fn forced_process_reference_run() {
    let config = ForcedProcessConfig::default();
    let result = run_forced_process(&config).unwrap();

    assert_eq!(result.times.len(), 10_000);
    assert_eq!(result.uniform_noise.len(), result.times.len());
    assert_eq!(result.gaussian_noise.len(), result.times.len());

    // Noise moves the path off the deterministic one but stays bounded:
    // |x - x_unforced| <= tau * max|f| for a unit time constant.
    let max_uniform = result
        .uniform_noise
        .iter()
        .fold(0.0f64, |m, v| m.max(v.abs()));
    let deviation = result
        .uniform
        .iter()
        .zip(&result.unforced)
        .map(|(u, x)| (u - x).abs())
        .fold(0.0f64, f64::max);
    assert!(deviation > 0.0);
    assert!(deviation <= max_uniform + 1e-9, "{} > {}", deviation, max_uniform);

    let zero_run = run_forced(&config.run, ZeroForcing).unwrap();
    assert_eq!(zero_run, result.unforced);
}

#[test]
fn non_positive_tau_is_an_invalid_argument() {
    let config = RunConfig::sweep_baseline();
    for tau in [0.0, -45.0] {
        let err = run_sweep(&config, SweepParameter::Tau, &[tau]).unwrap_err();
        assert!(matches!(err, RelaxError::InvalidArgument(_)), "{}", err);
    }
}

#[test]
fn invalid_grid_is_an_invalid_argument() {
    let config = RunConfig {
        grid: TimeGrid::new(0.0, 0.1),
        ..RunConfig::sweep_baseline()
    };
    assert!(matches!(
        run_sweep(&config, SweepParameter::Tau, &[20.0]),
        Err(RelaxError::InvalidArgument(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn closed_form_holds_for_any_parameters(
        a in -100.0f64..100.0,
        tau in 0.5f64..50.0,
        x0 in -200.0f64..200.0,
    ) {
        let config = RunConfig {
            params: RelaxationParams::new(a, tau, x0),
            grid: TimeGrid::new(20.0, 0.25),
            solver: SolverSettings::default(),
        };
        let result = run_sweep(&config, SweepParameter::Tau, &[tau]).unwrap();
        let model = Relaxation::new(a, tau).unwrap();

        for (t, x) in result.times.iter().zip(&result.runs[0].trajectory) {
            prop_assert!((x - model.exact(x0, *t)).abs() < 1e-4);
        }
    }
}
