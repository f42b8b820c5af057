//! Adaptive Runge-Kutta-Fehlberg 7(8) integrator
//!
//! A 13-stage embedded RK7(8) pair with an I-controller on the step size.
//! Besides plain endpoint integration the solver can sample a solution at
//! every time of a strictly increasing grid, integrating exactly to each
//! requested time rather than interpolating between internal steps.
//!
//! Reference: NASA TR R-287, Erwin Fehlberg, 1968

use thiserror::Error;
use tracing::debug;

use crate::coefficients::{A, B, B_ERR, C, STAGES};

/// System of ordinary differential equations: dy/dt = f(t, y)
pub trait OdeSystem<const N: usize> {
    /// Evaluate the right-hand side of the ODE system
    ///
    /// # Arguments
    /// * `t` - Current time
    /// * `y` - Current state vector
    /// * `dydt` - Output: derivative dy/dt
    fn rhs(&self, t: f64, y: &[f64; N], dydt: &mut [f64; N]);
}

/// Outcome of a single attempted step
#[derive(Debug, Clone)]
pub struct StepResult<const N: usize> {
    /// State after the step (8th order solution)
    pub y: [f64; N],
    /// Time after the step
    pub t: f64,
    /// Normalized error estimate, accepted when `<= 1.0`
    pub error: f64,
    /// Suggested magnitude of the next step
    pub h_next: f64,
    /// Whether the step was accepted
    pub accepted: bool,
}

/// Counters accumulated across calls until [`Rkf78::reset_stats`]
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// Right-hand-side evaluations
    pub fn_evals: u64,
    /// Accepted steps
    pub accepted_steps: u64,
    /// Rejected steps
    pub rejected_steps: u64,
}

/// Step-size controller using an I-controller
///
/// h_new = safety * h * error^(-1/8)
#[derive(Debug, Clone)]
pub struct StepController {
    /// Safety factor
    pub safety: f64,
    /// Maximum growth factor per step
    pub max_factor: f64,
    /// Minimum reduction factor per step
    pub min_factor: f64,
    exponent: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            safety: 0.9,
            max_factor: 5.0,
            min_factor: 0.2,
            exponent: 1.0 / 8.0,
        }
    }
}

impl StepController {
    /// Step size adjustment factor for a normalized error
    pub fn compute_factor(&self, error: f64) -> f64 {
        if error == 0.0 {
            return self.max_factor;
        }

        let factor = self.safety * error.powf(-self.exponent);
        factor.clamp(self.min_factor, self.max_factor)
    }
}

/// Tolerance specification for error control
///
/// Error is computed as: |y8 - y7| / (atol + rtol * |y8|)
#[derive(Debug, Clone)]
pub struct Tolerances<const N: usize> {
    /// Absolute tolerance per component
    pub atol: [f64; N],
    /// Relative tolerance per component
    pub rtol: [f64; N],
}

impl<const N: usize> Tolerances<N> {
    /// Same tolerances for every component
    pub fn new(atol: f64, rtol: f64) -> Self {
        Self {
            atol: [atol; N],
            rtol: [rtol; N],
        }
    }

    /// Per-component tolerances
    pub fn with_components(atol: [f64; N], rtol: [f64; N]) -> Self {
        Self { atol, rtol }
    }
}

/// Runge-Kutta-Fehlberg 7(8) integrator over an `N`-dimensional state
///
/// # Example
/// ```
/// use relaxode::{OdeSystem, Rkf78, Tolerances};
///
/// struct Decay;
///
/// impl OdeSystem<1> for Decay {
///     fn rhs(&self, _t: f64, y: &[f64; 1], dydt: &mut [f64; 1]) {
///         dydt[0] = -y[0];
///     }
/// }
///
/// let mut solver = Rkf78::new(Tolerances::new(1e-12, 1e-12));
/// let samples = solver
///     .integrate_on_grid(&Decay, &[1.0], &[0.0, 0.5, 1.0], 0.1)
///     .unwrap();
/// assert_eq!(samples.len(), 3);
/// assert!((samples[2][0] - (-1.0f64).exp()).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct Rkf78<const N: usize> {
    tol: Tolerances<N>,
    controller: StepController,
    /// Minimum step size
    pub h_min: f64,
    /// Maximum step size
    pub h_max: f64,
    /// Step attempts allowed per `integrate` or `integrate_on_grid` call
    pub max_steps: u64,
    k: [[f64; N]; STAGES],
    /// Integration statistics
    pub stats: Stats,
}

impl<const N: usize> Rkf78<N> {
    /// Create a solver with the given tolerances
    pub fn new(tol: Tolerances<N>) -> Self {
        Self {
            tol,
            controller: StepController::default(),
            h_min: 1e-14,
            h_max: f64::INFINITY,
            max_steps: 10_000_000,
            k: [[0.0; N]; STAGES],
            stats: Stats::default(),
        }
    }

    /// Set minimum and maximum step sizes
    pub fn set_step_limits(&mut self, h_min: f64, h_max: f64) {
        self.h_min = h_min;
        self.h_max = h_max;
    }

    /// Perform a single integration step
    ///
    /// Computes the 13 stages, forms the 8th order solution, estimates the
    /// error against the embedded 7th order solution and decides acceptance.
    pub fn step<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        t: f64,
        y: &[f64; N],
        h: f64,
    ) -> StepResult<N> {
        let h = h.signum() * h.abs().clamp(self.h_min, self.h_max);

        self.compute_stages(sys, t, y, h);
        let y8 = self.compute_solution(y, h);
        let error = self.compute_error(&y8, h);
        let accepted = error <= 1.0;

        let factor = self.controller.compute_factor(error);
        let h_next = (h.abs() * factor).clamp(self.h_min, self.h_max);

        self.stats.fn_evals += STAGES as u64;
        if accepted {
            self.stats.accepted_steps += 1;
        } else {
            self.stats.rejected_steps += 1;
        }

        StepResult {
            y: y8,
            t: t + h,
            error,
            h_next,
            accepted,
        }
    }

    /// Integrate from `t0` to `tf`
    ///
    /// Returns the final time and state. The last step is shortened so the
    /// solution lands exactly on `tf`.
    pub fn integrate<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        t0: f64,
        y0: &[f64; N],
        tf: f64,
        h0: f64,
    ) -> Result<(f64, [f64; N]), IntegrationError> {
        if t0 == tf {
            return Ok((t0, *y0));
        }
        self.validate_inputs(t0, y0, tf, h0)?;

        let mut step_count = 0u64;
        let (t, y, _) = self.advance(sys, t0, y0, tf, h0, &mut step_count)?;
        Ok((t, y))
    }

    /// Sample the solution at every time of `times`
    ///
    /// `times` must be non-empty, finite and strictly increasing. The first
    /// sample is `y0` unchanged; every later sample is reached by integrating
    /// exactly to its time, with the step size carried from one interval to
    /// the next. `h0` is the initial step guess and must be positive.
    pub fn integrate_on_grid<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        y0: &[f64; N],
        times: &[f64],
        h0: f64,
    ) -> Result<Vec<[f64; N]>, IntegrationError> {
        validate_grid(times)?;
        let t0 = times[0];
        let tf = times[times.len() - 1];
        if h0 <= 0.0 {
            return Err(IntegrationError::InvalidInput {
                message: "h0 must be positive for an increasing grid".to_string(),
            });
        }
        self.validate_inputs(t0, y0, tf, h0)?;

        let mut samples = Vec::with_capacity(times.len());
        samples.push(*y0);

        let mut y = *y0;
        let mut h = h0;
        let mut step_count = 0u64;
        for window in times.windows(2) {
            let (_, y_next, h_next) =
                self.advance(sys, window[0], &y, window[1], h, &mut step_count)?;
            y = y_next;
            h = h_next;
            samples.push(y);
        }

        debug!(
            samples = samples.len(),
            steps = step_count,
            fn_evals = self.stats.fn_evals,
            rejected = self.stats.rejected_steps,
            "grid integration finished"
        );
        Ok(samples)
    }

    /// Adaptive loop shared by `integrate` and `integrate_on_grid`.
    ///
    /// Returns the final time, state and the step magnitude to try next.
    fn advance<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        t0: f64,
        y0: &[f64; N],
        tf: f64,
        h0: f64,
        step_count: &mut u64,
    ) -> Result<(f64, [f64; N], f64), IntegrationError> {
        let mut t = t0;
        let mut y = *y0;
        let direction = (tf - t0).signum();
        let mut h = direction * h0.abs();

        while (tf - t) * direction > self.h_min {
            h = direction * h.abs().min(self.h_max);
            let lands_on_tf = (t + h - tf) * direction >= 0.0;
            if lands_on_tf {
                h = tf - t;
            }

            let result = self.step(sys, t, &y, h);

            if result.accepted {
                // t + (tf - t) may miss tf by an ulp
                t = if lands_on_tf { tf } else { result.t };
                y = result.y;
                if !y.iter().all(|v| v.is_finite()) {
                    return Err(IntegrationError::NonFiniteState { t });
                }
            }

            h = result.h_next * direction;

            *step_count += 1;
            if *step_count > self.max_steps {
                return Err(IntegrationError::MaxStepsExceeded);
            }

            // A rejected step already at h_min cannot make progress
            if !result.accepted && result.h_next <= self.h_min && (tf - t) * direction > self.h_min
            {
                return Err(IntegrationError::StepSizeTooSmall {
                    t,
                    h: result.h_next,
                });
            }
        }

        Ok((t, y, h.abs()))
    }

    #[allow(clippy::needless_range_loop)]
    fn compute_stages<S: OdeSystem<N>>(&mut self, sys: &S, t: f64, y: &[f64; N], h: f64) {
        let mut y_temp = [0.0; N];

        sys.rhs(t, y, &mut self.k[0]);

        for i in 1..STAGES {
            for n in 0..N {
                let mut sum = 0.0;
                for j in 0..i {
                    sum += A[i][j] * self.k[j][n];
                }
                y_temp[n] = y[n] + h * sum;
            }

            sys.rhs(t + C[i] * h, &y_temp, &mut self.k[i]);
        }
    }

    #[allow(clippy::needless_range_loop)]
    fn compute_solution(&self, y: &[f64; N], h: f64) -> [f64; N] {
        let mut y_new = [0.0; N];

        for n in 0..N {
            let mut sum = 0.0;
            for i in 0..STAGES {
                sum += B[i] * self.k[i][n];
            }
            y_new[n] = y[n] + h * sum;
        }

        y_new
    }

    /// Infinity norm of the error scaled by `atol + rtol * |y8|`
    #[allow(clippy::needless_range_loop)]
    fn compute_error(&self, y8: &[f64; N], h: f64) -> f64 {
        let mut max_err: f64 = 0.0;

        for n in 0..N {
            let mut err_n = 0.0;
            for i in 0..STAGES {
                err_n += B_ERR[i] * self.k[i][n];
            }
            err_n *= h;

            let scale = self.tol.atol[n] + self.tol.rtol[n] * y8[n].abs();
            max_err = max_err.max(err_n.abs() / scale);
        }

        max_err
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
    }

    fn validate_inputs(
        &self,
        t0: f64,
        y0: &[f64; N],
        tf: f64,
        h0: f64,
    ) -> Result<(), IntegrationError> {
        if !t0.is_finite() || !tf.is_finite() || !h0.is_finite() {
            return Err(IntegrationError::InvalidInput {
                message: "t0, tf, and h0 must be finite".to_string(),
            });
        }
        if h0 == 0.0 {
            return Err(IntegrationError::InvalidInput {
                message: "h0 must be non-zero".to_string(),
            });
        }
        let direction = tf - t0;
        if direction != 0.0 && h0.signum() != direction.signum() {
            return Err(IntegrationError::InvalidInput {
                message: "h0 sign must match integration direction (tf - t0)".to_string(),
            });
        }
        for (i, &val) in y0.iter().enumerate() {
            if !val.is_finite() {
                return Err(IntegrationError::InvalidInput {
                    message: format!("y0[{}] is not finite", i),
                });
            }
        }
        for (i, (&a, &r)) in self.tol.atol.iter().zip(self.tol.rtol.iter()).enumerate() {
            if !a.is_finite() || a <= 0.0 {
                return Err(IntegrationError::InvalidInput {
                    message: format!("atol[{}] must be positive and finite", i),
                });
            }
            if !r.is_finite() || r < 0.0 {
                return Err(IntegrationError::InvalidInput {
                    message: format!("rtol[{}] must be non-negative and finite", i),
                });
            }
        }
        Ok(())
    }
}

fn validate_grid(times: &[f64]) -> Result<(), IntegrationError> {
    if times.is_empty() {
        return Err(IntegrationError::InvalidInput {
            message: "time grid is empty".to_string(),
        });
    }
    if let Some(i) = times.iter().position(|t| !t.is_finite()) {
        return Err(IntegrationError::InvalidInput {
            message: format!("times[{}] is not finite", i),
        });
    }
    if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
        return Err(IntegrationError::InvalidInput {
            message: format!(
                "time grid must be strictly increasing (times[{}] = {}, times[{}] = {})",
                i,
                times[i],
                i + 1,
                times[i + 1]
            ),
        });
    }
    Ok(())
}

/// Errors that can occur during integration
#[derive(Debug, Clone, Error)]
pub enum IntegrationError {
    /// Step size became too small
    #[error("Step size {h} too small at t = {t}")]
    StepSizeTooSmall {
        /// Time at which step size became too small
        t: f64,
        /// Step size that was too small
        h: f64,
    },
    /// Maximum number of steps exceeded
    #[error("Maximum number of integration steps exceeded")]
    MaxStepsExceeded,
    /// Invalid input parameters
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the invalid input
        message: String,
    },
    /// Non-finite state detected during integration
    #[error("Non-finite state detected at t = {t}")]
    NonFiniteState {
        /// Time at which non-finite state was detected
        t: f64,
    },
}
