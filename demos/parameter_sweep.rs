//! Relaxation toward equilibrium under a sweep of the time constant and of
//! the initial condition.
//!
//! Run with:
//!   cargo run --example parameter_sweep [output-dir]
//!
//! With an output directory, both sweeps are also written as CSV.

use std::path::PathBuf;

use relaxode::{
    default_initial_conditions, default_tau_values, run_sweep, write_sweep_csv_file, RelaxError,
    RunConfig, SweepParameter, SweepResult,
};

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(error) = try_main() {
        eprintln!("parameter sweep failed: {}", error);
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), RelaxError> {
    let output_dir = std::env::args().nth(1).map(PathBuf::from);
    let config = RunConfig::sweep_baseline();

    println!(
        "dx/dt = (a - x)/tau with a = {}, sampled every {} over [0, {})",
        config.params.a, config.grid.time_step, config.grid.time_max
    );

    let taus = run_sweep(&config, SweepParameter::Tau, &default_tau_values())?;
    print_summary(&taus, "x0 = 200 mg/dl");

    let ics = run_sweep(
        &config,
        SweepParameter::InitialCondition,
        &default_initial_conditions(),
    )?;
    print_summary(&ics, "tau = 45 min");

    if let Some(dir) = output_dir {
        write_sweep_csv_file(&dir.join("tau_sweep.csv"), &taus)?;
        write_sweep_csv_file(&dir.join("x0_sweep.csv"), &ics)?;
        println!("CSV written to {}", dir.display());
    }
    Ok(())
}

fn print_summary(result: &SweepResult, fixed: &str) {
    let probes = [0usize, 100, 500, 1000, result.times.len() - 1];

    println!();
    println!("Sweep over {} ({})", result.parameter, fixed);
    print!("  {:>10}", result.parameter.name());
    for &i in &probes {
        print!("  t={:<8.1}", result.times[i]);
    }
    println!();
    for run in &result.runs {
        print!("  {:>10}", run.value);
        for &i in &probes {
            print!("  {:<10.4}", run.trajectory[i]);
        }
        println!();
    }
}
