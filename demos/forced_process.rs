//! Relaxation driven by interpolated uniform and Gaussian noise, compared
//! with the unforced solution.
//!
//! Run with:
//!   cargo run --example forced_process [seed] [output-dir]

use std::path::PathBuf;

use relaxode::{
    run_forced_process, write_forced_csv_file, write_json_file, ForcedProcessConfig, RelaxError,
};

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(error) = try_main() {
        eprintln!("forced process failed: {}", error);
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), RelaxError> {
    let mut args = std::env::args().skip(1);
    let mut config = ForcedProcessConfig::default();
    if let Some(seed) = args.next() {
        config.seed = seed.parse().map_err(|_| {
            RelaxError::InvalidArgument(format!("seed must be an integer, got {}", seed))
        })?;
    }
    let output_dir = args.next().map(PathBuf::from);

    let result = run_forced_process(&config)?;

    println!("Forced relaxation, seed {}", config.seed);
    println!(
        "  {:>8}  {:>10}  {:>10}  {:>10}",
        "t", "x(t)", "x_unif(t)", "x_norm(t)"
    );
    let stride = (result.times.len() / 10).max(1);
    for i in (0..result.times.len()).step_by(stride) {
        println!(
            "  {:>8.3}  {:>10.5}  {:>10.5}  {:>10.5}",
            result.times[i], result.unforced[i], result.uniform[i], result.gaussian[i]
        );
    }

    if let Some(dir) = output_dir {
        write_forced_csv_file(&dir.join("forced_process.csv"), &result)?;
        write_json_file(&dir.join("forced_process.json"), &result)?;
        println!("Results written to {}", dir.display());
    }
    Ok(())
}
