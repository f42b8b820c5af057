//! CSV and JSON export of sweep and forced-process results.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::error::{RelaxError, RelaxResult};
use crate::forced::ForcedProcessResult;
use crate::sweep::SweepResult;

fn ensure_len(context: &'static str, expected: usize, actual: usize) -> RelaxResult<()> {
    if expected == actual {
        return Ok(());
    }

    Err(RelaxError::LengthMismatch {
        context,
        expected,
        got: actual,
    })
}

fn create_file(path: &Path) -> RelaxResult<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Write a sweep as `time,<field>=<value>,...`, one row per sample time.
pub fn write_sweep_csv<W: Write>(writer: W, result: &SweepResult) -> RelaxResult<()> {
    let n = result.times.len();
    for run in &result.runs {
        ensure_len("sweep trajectory", n, run.trajectory.len())?;
    }

    let mut wtr = Writer::from_writer(writer);
    let mut header = Vec::with_capacity(result.runs.len() + 1);
    header.push("time".to_string());
    header.extend(
        result
            .runs
            .iter()
            .map(|run| format!("{}={}", result.parameter, run.value)),
    );
    wtr.write_record(&header)?;

    for (i, t) in result.times.iter().enumerate() {
        let mut row = Vec::with_capacity(result.runs.len() + 1);
        row.push(t.to_string());
        row.extend(result.runs.iter().map(|run| run.trajectory[i].to_string()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct ForcedRow {
    time: f64,
    unforced: f64,
    uniform_noise: f64,
    uniform: f64,
    gaussian_noise: f64,
    gaussian: f64,
}

/// Write a forced-process result, one row per sample time.
pub fn write_forced_csv<W: Write>(writer: W, result: &ForcedProcessResult) -> RelaxResult<()> {
    let n = result.times.len();
    ensure_len("unforced", n, result.unforced.len())?;
    ensure_len("uniform_noise", n, result.uniform_noise.len())?;
    ensure_len("uniform", n, result.uniform.len())?;
    ensure_len("gaussian_noise", n, result.gaussian_noise.len())?;
    ensure_len("gaussian", n, result.gaussian.len())?;

    let mut wtr = Writer::from_writer(writer);
    for i in 0..n {
        wtr.serialize(ForcedRow {
            time: result.times[i],
            unforced: result.unforced[i],
            uniform_noise: result.uniform_noise[i],
            uniform: result.uniform[i],
            gaussian_noise: result.gaussian_noise[i],
            gaussian: result.gaussian[i],
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Pretty-printed JSON of any serializable result.
pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> RelaxResult<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// [`write_sweep_csv`] into a file, creating parent directories.
pub fn write_sweep_csv_file(path: &Path, result: &SweepResult) -> RelaxResult<()> {
    write_sweep_csv(create_file(path)?, result)
}

/// [`write_forced_csv`] into a file, creating parent directories.
pub fn write_forced_csv_file(path: &Path, result: &ForcedProcessResult) -> RelaxResult<()> {
    write_forced_csv(create_file(path)?, result)
}

/// [`write_json`] into a file, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> RelaxResult<()> {
    write_json(create_file(path)?, value)
}
