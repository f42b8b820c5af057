//! Additive forcing terms for the relaxation equation.
//!
//! A forcing is any function of time added to the right-hand side. Two
//! shapes are provided: the zero function and piecewise-linear
//! interpolation over a fixed `(time, value)` table. Noise tables are drawn
//! once, before integration, and never resampled.

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::{RelaxError, RelaxResult};

/// A time-dependent additive term `f(t)`.
pub trait Forcing {
    /// Value of the forcing at time `t`.
    fn value(&self, t: f64) -> f64;
}

impl<F: Forcing + ?Sized> Forcing for &F {
    fn value(&self, t: f64) -> f64 {
        (**self).value(t)
    }
}

/// `f(t) = 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroForcing;

impl Forcing for ZeroForcing {
    fn value(&self, _t: f64) -> f64 {
        0.0
    }
}

/// Piecewise-linear interpolation over a table, constant beyond either end.
///
/// Deserialized tables go through [`InterpolatedForcing::new`] and are
/// rejected on the same conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForcingTable")]
pub struct InterpolatedForcing {
    times: Vec<f64>,
    values: Vec<f64>,
}

/// Unchecked wire form of [`InterpolatedForcing`].
#[derive(Deserialize)]
struct ForcingTable {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl TryFrom<ForcingTable> for InterpolatedForcing {
    type Error = RelaxError;

    fn try_from(table: ForcingTable) -> RelaxResult<Self> {
        InterpolatedForcing::new(table.times, table.values)
    }
}

impl InterpolatedForcing {
    /// Build a table. `times` must be non-empty, finite and strictly
    /// increasing; `values` must be finite and the same length.
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> RelaxResult<Self> {
        if times.is_empty() {
            return Err(RelaxError::invalid("forcing table is empty"));
        }
        if times.len() != values.len() {
            return Err(RelaxError::LengthMismatch {
                context: "forcing table values",
                expected: times.len(),
                got: values.len(),
            });
        }
        if times.iter().chain(values.iter()).any(|v| !v.is_finite()) {
            return Err(RelaxError::invalid("forcing table contains non-finite entries"));
        }
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(RelaxError::invalid(
                "forcing table times must be strictly increasing",
            ));
        }
        Ok(Self { times, values })
    }

    /// Table times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Table values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Forcing for InterpolatedForcing {
    fn value(&self, t: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }
        let last = self.times.len() - 1;
        if t <= self.times[0] {
            return self.values[0];
        }
        if t >= self.times[last] {
            return self.values[last];
        }

        // times[hi - 1] <= t < times[hi], with 1 <= hi <= last
        let hi = self.times.partition_point(|&x| x <= t);
        let lo = hi - 1;
        let (t0, t1) = (self.times[lo], self.times[hi]);
        let (v0, v1) = (self.values[lo], self.values[hi]);
        v0 + (v1 - v0) * (t - t0) / (t1 - t0)
    }
}

/// Distribution that noise tables are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoiseKind {
    /// Uniform on `[low, high)`.
    Uniform {
        /// Inclusive lower bound.
        low: f64,
        /// Exclusive upper bound.
        high: f64,
    },
    /// Normal with the given mean and standard deviation.
    Gaussian {
        /// Mean.
        mean: f64,
        /// Standard deviation.
        std_dev: f64,
    },
}

impl NoiseKind {
    /// Uniform on `[-0.5, 0.5)`.
    pub fn default_uniform() -> Self {
        NoiseKind::Uniform {
            low: -0.5,
            high: 0.5,
        }
    }

    /// Normal with mean 0 and standard deviation 0.3.
    pub fn default_gaussian() -> Self {
        NoiseKind::Gaussian {
            mean: 0.0,
            std_dev: 0.3,
        }
    }

    /// Draw `count` independent samples.
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> RelaxResult<Vec<f64>> {
        match *self {
            NoiseKind::Uniform { low, high } => {
                // Uniform::new panics once its scaled width overflows
                let width = high - low;
                if !(width.is_finite() && width <= f64::MAX / 2.0) || low >= high {
                    return Err(RelaxError::invalid(format!(
                        "uniform noise needs finite low < high with a finite width, got [{}, {})",
                        low, high
                    )));
                }
                let dist = Uniform::new(low, high);
                Ok((0..count).map(|_| dist.sample(rng)).collect())
            }
            NoiseKind::Gaussian { mean, std_dev } => {
                if !mean.is_finite() {
                    return Err(RelaxError::invalid("gaussian noise mean must be finite"));
                }
                if !(std_dev.is_finite() && std_dev >= 0.0) {
                    return Err(RelaxError::invalid(format!(
                        "gaussian noise std_dev must be non-negative and finite, got {}",
                        std_dev
                    )));
                }
                let dist = Normal::new(mean, std_dev).map_err(|e| {
                    RelaxError::invalid(format!("gaussian noise std_dev {}: {}", std_dev, e))
                })?;
                Ok((0..count).map(|_| dist.sample(rng)).collect())
            }
        }
    }

    /// One draw per grid time, wrapped as an interpolated forcing.
    pub fn table<R: Rng + ?Sized>(
        &self,
        times: &[f64],
        rng: &mut R,
    ) -> RelaxResult<InterpolatedForcing> {
        let values = self.sample(times.len(), rng)?;
        InterpolatedForcing::new(times.to_vec(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_point() -> InterpolatedForcing {
        InterpolatedForcing::new(vec![0.0, 1.0], vec![0.0, 2.0]).unwrap()
    }

    #[test]
    fn interpolates_between_points() {
        let f = two_point();
        assert_eq!(f.value(0.5), 1.0);
        assert_eq!(f.value(0.25), 0.5);
    }

    #[test]
    fn clamps_outside_the_table() {
        let f = two_point();
        assert_eq!(f.value(-1.0), 0.0);
        assert_eq!(f.value(0.0), 0.0);
        assert_eq!(f.value(1.0), 2.0);
        assert_eq!(f.value(5.0), 2.0);
        assert_eq!(f.value(f64::INFINITY), 2.0);
        assert!(f.value(f64::NAN).is_nan());
    }

    #[test]
    fn hits_interior_knots_exactly() {
        let f = InterpolatedForcing::new(vec![0.0, 1.0, 2.0, 4.0], vec![1.0, -1.0, 3.0, 3.0])
            .unwrap();
        assert_eq!(f.value(1.0), -1.0);
        assert_eq!(f.value(2.0), 3.0);
        assert_eq!(f.value(1.5), 1.0);
        assert_eq!(f.value(3.0), 3.0);
    }

    #[test]
    fn single_point_table_is_constant() {
        let f = InterpolatedForcing::new(vec![2.0], vec![7.5]).unwrap();
        assert_eq!(f.value(-10.0), 7.5);
        assert_eq!(f.value(2.0), 7.5);
        assert_eq!(f.value(10.0), 7.5);
    }

    #[test]
    fn malformed_tables_are_rejected() {
        assert!(InterpolatedForcing::new(vec![], vec![]).is_err());
        assert!(matches!(
            InterpolatedForcing::new(vec![0.0, 1.0], vec![0.0]),
            Err(RelaxError::LengthMismatch { .. })
        ));
        assert!(InterpolatedForcing::new(vec![0.0, 0.0], vec![0.0, 1.0]).is_err());
        assert!(InterpolatedForcing::new(vec![1.0, 0.0], vec![0.0, 1.0]).is_err());
        assert!(InterpolatedForcing::new(vec![0.0, 1.0], vec![0.0, f64::NAN]).is_err());
    }

    #[test]
    fn zero_forcing_is_zero_everywhere() {
        for t in [-1.0, 0.0, 3.5, 1e9] {
            assert_eq!(ZeroForcing.value(t), 0.0);
        }
    }

    #[test]
    fn uniform_samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws = NoiseKind::default_uniform().sample(5000, &mut rng).unwrap();
        assert_eq!(draws.len(), 5000);
        assert!(draws.iter().all(|&v| (-0.5..0.5).contains(&v)));
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        assert!(mean.abs() < 0.05, "mean {}", mean);
    }

    #[test]
    fn gaussian_samples_have_expected_spread() {
        let mut rng = StdRng::seed_from_u64(11);
        let draws = NoiseKind::default_gaussian().sample(20_000, &mut rng).unwrap();
        let n = draws.len() as f64;
        let mean = draws.iter().sum::<f64>() / n;
        let var = draws.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.02, "mean {}", mean);
        assert!((var.sqrt() - 0.3).abs() < 0.02, "std {}", var.sqrt());
    }

    #[test]
    fn same_seed_same_table() {
        let times = [0.0, 0.5, 1.0, 1.5];
        let a = NoiseKind::default_gaussian()
            .table(&times, &mut StdRng::seed_from_u64(3))
            .unwrap();
        let b = NoiseKind::default_gaussian()
            .table(&times, &mut StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.times(), &times);
        assert_eq!(a.values().len(), times.len());
    }

    #[test]
    fn invalid_distributions_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let bad = [
            NoiseKind::Uniform {
                low: 1.0,
                high: 1.0,
            },
            NoiseKind::Uniform {
                low: 0.0,
                high: f64::INFINITY,
            },
            NoiseKind::Uniform {
                low: -1e308,
                high: 1e308,
            },
            NoiseKind::Uniform {
                low: -f64::MAX / 2.0,
                high: f64::MAX / 2.0,
            },
            NoiseKind::Uniform {
                low: f64::NAN,
                high: 1.0,
            },
            NoiseKind::Gaussian {
                mean: 0.0,
                std_dev: -1.0,
            },
            NoiseKind::Gaussian {
                mean: f64::NAN,
                std_dev: 1.0,
            },
            NoiseKind::Gaussian {
                mean: 0.0,
                std_dev: f64::INFINITY,
            },
        ];
        for kind in bad {
            assert!(
                matches!(kind.sample(3, &mut rng), Err(RelaxError::InvalidArgument(_))),
                "{:?}",
                kind
            );
        }
    }

    #[test]
    fn zero_spread_gaussian_is_constant() {
        let mut rng = StdRng::seed_from_u64(5);
        let kind = NoiseKind::Gaussian {
            mean: 0.25,
            std_dev: 0.0,
        };
        assert_eq!(kind.sample(4, &mut rng).unwrap(), vec![0.25; 4]);
    }

    #[test]
    fn deserialized_tables_are_validated() {
        let table: InterpolatedForcing =
            serde_json::from_str(r#"{"times":[0.0,1.0],"values":[0.0,2.0]}"#).unwrap();
        assert_eq!(table, two_point());
        assert_eq!(table.value(0.5), 1.0);

        let round_trip: InterpolatedForcing =
            serde_json::from_str(&serde_json::to_string(&table).unwrap()).unwrap();
        assert_eq!(round_trip, table);

        for json in [
            r#"{"times":[],"values":[]}"#,
            r#"{"times":[0.0,1.0,2.0],"values":[0.0]}"#,
            r#"{"times":[1.0,0.0],"values":[0.0,1.0]}"#,
        ] {
            let err = serde_json::from_str::<InterpolatedForcing>(json).unwrap_err();
            assert!(err.to_string().contains("forcing table"), "{}: {}", json, err);
        }
    }
}
