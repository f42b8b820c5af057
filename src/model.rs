//! Linear relaxation equation, with and without an additive forcing term.
//!
//! `dx/dt = (a - x) / tau` decays exponentially toward the equilibrium `a`
//! with time constant `tau`. The forced variant adds `f(t)` to the
//! right-hand side, which with a noise table gives an Ornstein-Uhlenbeck
//! style process.

use crate::config::RelaxationParams;
use crate::error::RelaxResult;
use crate::forcing::Forcing;
use crate::solver::OdeSystem;

/// Autonomous relaxation toward `a` with time constant `tau`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relaxation {
    a: f64,
    tau: f64,
}

impl Relaxation {
    /// Fails with an invalid-argument error unless `a` is finite and `tau`
    /// is positive and finite.
    pub fn new(a: f64, tau: f64) -> RelaxResult<Self> {
        RelaxationParams::new(a, tau, 0.0).validate()?;
        Ok(Self { a, tau })
    }

    /// Model for a validated parameter set.
    pub fn from_params(params: &RelaxationParams) -> RelaxResult<Self> {
        params.validate()?;
        Ok(Self {
            a: params.a,
            tau: params.tau,
        })
    }

    /// Equilibrium value.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Time constant.
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Right-hand side `(a - x) / tau`; `t` is unused.
    #[inline]
    pub fn derivative(&self, x: f64, _t: f64) -> f64 {
        (self.a - x) / self.tau
    }

    /// Closed-form solution `a + (x0 - a) exp(-t / tau)`.
    pub fn exact(&self, x0: f64, t: f64) -> f64 {
        self.a + (x0 - self.a) * (-t / self.tau).exp()
    }
}

impl OdeSystem<1> for Relaxation {
    fn rhs(&self, t: f64, y: &[f64; 1], dydt: &mut [f64; 1]) {
        dydt[0] = self.derivative(y[0], t);
    }
}

/// Relaxation plus an additive forcing term `f(t)`.
#[derive(Debug, Clone)]
pub struct ForcedRelaxation<F> {
    relaxation: Relaxation,
    forcing: F,
}

impl<F: Forcing> ForcedRelaxation<F> {
    /// Attach `forcing` to a relaxation model.
    pub fn new(relaxation: Relaxation, forcing: F) -> Self {
        Self {
            relaxation,
            forcing,
        }
    }

    /// The unforced part.
    pub fn relaxation(&self) -> &Relaxation {
        &self.relaxation
    }

    /// The forcing term.
    pub fn forcing(&self) -> &F {
        &self.forcing
    }

    /// Right-hand side `(a - x) / tau + f(t)`.
    #[inline]
    pub fn derivative(&self, x: f64, t: f64) -> f64 {
        self.relaxation.derivative(x, t) + self.forcing.value(t)
    }
}

impl<F: Forcing> OdeSystem<1> for ForcedRelaxation<F> {
    fn rhs(&self, t: f64, y: &[f64; 1], dydt: &mut [f64; 1]) {
        dydt[0] = self.derivative(y[0], t);
    }
}
