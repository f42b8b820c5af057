//! Sample-time grids and evenly spaced value ranges.

use serde::{Deserialize, Serialize};

use crate::error::{RelaxError, RelaxResult};

/// Largest number of values a range or grid may hold.
pub const MAX_SAMPLES: usize = 100_000_000;

/// Half-open range `[start, stop)` with spacing `step`.
///
/// Holds `ceil((stop - start) / step)` values, each computed as
/// `start + i * step` so spacing errors do not accumulate. Returns an empty
/// vector when the range is empty, any argument is not finite, or the range
/// would hold more than [`MAX_SAMPLES`] values.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(start.is_finite() && stop.is_finite() && step.is_finite()) || step == 0.0 {
        return Vec::new();
    }
    let count = ((stop - start) / step).ceil();
    if count <= 0.0 || count > MAX_SAMPLES as f64 {
        return Vec::new();
    }
    (0..count as usize)
        .map(|i| start + i as f64 * step)
        .collect()
}

/// Uniform sample-time grid starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeGrid {
    /// Exclusive upper bound of the sample times.
    pub time_max: f64,
    /// Spacing between consecutive samples.
    pub time_step: f64,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            time_max: 300.0,
            time_step: 0.1,
        }
    }
}

impl TimeGrid {
    /// Grid over `[0, time_max)` with the given spacing.
    pub fn new(time_max: f64, time_step: f64) -> Self {
        Self {
            time_max,
            time_step,
        }
    }

    /// Both bounds must be finite and strictly positive, and the grid may
    /// hold at most [`MAX_SAMPLES`] samples.
    pub fn validate(&self) -> RelaxResult<()> {
        if !self.time_max.is_finite() || self.time_max <= 0.0 {
            return Err(RelaxError::invalid(format!(
                "time_max must be positive and finite, got {}",
                self.time_max
            )));
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(RelaxError::invalid(format!(
                "time_step must be positive and finite, got {}",
                self.time_step
            )));
        }
        let count = (self.time_max / self.time_step).ceil();
        if count > MAX_SAMPLES as f64 {
            return Err(RelaxError::invalid(format!(
                "grid of {} samples exceeds the limit of {}",
                count, MAX_SAMPLES
            )));
        }
        Ok(())
    }

    /// Strictly increasing sample times `0, step, 2 step, ...` below `time_max`.
    pub fn samples(&self) -> RelaxResult<Vec<f64>> {
        self.validate()?;
        Ok(arange(0.0, self.time_max, self.time_step))
    }

    /// Number of samples `samples()` yields.
    pub fn len(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        (self.time_max / self.time_step).ceil() as usize
    }

    /// True when the grid is invalid and would yield no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
