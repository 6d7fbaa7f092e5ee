//! Service-time and inter-arrival distributions.
//!
//! A [DurationDistribution] is the declarative form held in configuration. It is
//! validated once and turned into a [DurationSampler], which draws fresh
//! non-negative durations from a caller-supplied RNG. Samplers hold no state of
//! their own, so two stations never share draws through a default instance.

use std::collections::BTreeMap;

use rand::Rng;
use rand_distr::{Distribution, Exp, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Declared distribution family and parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DurationDistribution {
    /// Exponential with the given rate (mean `1 / rate`).
    Exponential { rate: f64 },
    /// Normal; negative draws are clamped to zero.
    Normal { mean: f64, std: f64 },
    /// Uniform on `[low, high]`.
    Uniform { low: f64, high: f64 },
}

impl DurationDistribution {
    /// Exponential distribution with the given mean.
    pub fn exponential_mean(mean: f64) -> Self {
        DurationDistribution::Exponential { rate: 1.0 / mean }
    }

    /// Build from the loose `(kind, parameters)` form produced by configuration forms,
    /// e.g. `("Normal", {"mean": 5.0, "std": 1.0})`.
    pub fn from_parts(
        field: &str,
        kind: &str,
        parameters: &BTreeMap<String, f64>,
    ) -> Result<Self, ConfigError> {
        let param = |name: &'static str| {
            parameters
                .get(name)
                .copied()
                .ok_or_else(|| ConfigError::MissingParameter {
                    field: field.to_string(),
                    parameter: name,
                })
        };

        let dist = match kind.trim().to_ascii_lowercase().as_str() {
            "exponential" => DurationDistribution::Exponential {
                rate: param("rate")?,
            },
            "normal" => DurationDistribution::Normal {
                mean: param("mean")?,
                std: param("std")?,
            },
            "uniform" => DurationDistribution::Uniform {
                low: param("low")?,
                high: param("high")?,
            },
            _ => {
                return Err(ConfigError::UnknownDistribution {
                    field: field.to_string(),
                    kind: kind.to_string(),
                })
            }
        };
        dist.validate(field)?;
        Ok(dist)
    }

    /// Check parameters without building a sampler.
    pub fn validate(&self, field: &str) -> Result<(), ConfigError> {
        let invalid = |parameter: &'static str, value: f64| ConfigError::InvalidParameter {
            field: field.to_string(),
            parameter,
            value,
        };

        match *self {
            DurationDistribution::Exponential { rate } => {
                if !(rate.is_finite() && rate > 0.0) {
                    return Err(invalid("rate", rate));
                }
            }
            DurationDistribution::Normal { mean, std } => {
                if !mean.is_finite() {
                    return Err(invalid("mean", mean));
                }
                if !(std.is_finite() && std >= 0.0) {
                    return Err(invalid("std", std));
                }
            }
            DurationDistribution::Uniform { low, high } => {
                if !low.is_finite() {
                    return Err(invalid("low", low));
                }
                if !(high.is_finite() && high >= low) {
                    return Err(invalid("high", high));
                }
            }
        }
        Ok(())
    }

    /// Expected value before clamping.
    pub fn mean(&self) -> f64 {
        match *self {
            DurationDistribution::Exponential { rate } => 1.0 / rate,
            DurationDistribution::Normal { mean, .. } => mean,
            DurationDistribution::Uniform { low, high } => (low + high) / 2.0,
        }
    }

    pub fn sampler(&self, field: &str) -> Result<DurationSampler, ConfigError> {
        self.validate(field)?;
        let invalid = |parameter: &'static str, value: f64| ConfigError::InvalidParameter {
            field: field.to_string(),
            parameter,
            value,
        };

        let sampler = match *self {
            DurationDistribution::Exponential { rate } => {
                DurationSampler::Exponential(Exp::new(rate).map_err(|_| invalid("rate", rate))?)
            }
            DurationDistribution::Normal { mean, std } => {
                DurationSampler::Normal(Normal::new(mean, std).map_err(|_| invalid("std", std))?)
            }
            DurationDistribution::Uniform { low, high } => {
                DurationSampler::Uniform(Uniform::new_inclusive(low, high))
            }
        };
        Ok(sampler)
    }
}

/// Validated, ready-to-draw distribution.
#[derive(Debug, Clone)]
pub enum DurationSampler {
    Exponential(Exp<f64>),
    Normal(Normal<f64>),
    Uniform(Uniform<f64>),
}

impl DurationSampler {
    /// Draw one duration. Never negative.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let value = match self {
            DurationSampler::Exponential(d) => d.sample(rng),
            DurationSampler::Normal(d) => d.sample(rng),
            DurationSampler::Uniform(d) => d.sample(rng),
        };
        value.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn exponential_mean_converges() {
        let sampler = DurationDistribution::exponential_mean(3.0)
            .sampler("service")
            .expect("valid");
        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let mean = (0..n).map(|_| sampler.sample(&mut rng)).sum::<f64>() / n as f64;
        assert!((mean - 3.0).abs() < 0.15, "mean was {mean}");
    }

    #[test]
    fn mean_of_each_form() {
        assert_eq!(DurationDistribution::exponential_mean(4.0).mean(), 4.0);
        assert_eq!(DurationDistribution::Normal { mean: 6.0, std: 2.0 }.mean(), 6.0);
        assert_eq!(DurationDistribution::Uniform { low: 2.0, high: 8.0 }.mean(), 5.0);
    }

    #[test]
    fn normal_draws_are_clamped_at_zero() {
        let sampler = DurationDistribution::Normal {
            mean: -5.0,
            std: 1.0,
        }
        .sampler("service")
        .expect("valid");
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..100).all(|_| sampler.sample(&mut rng) == 0.0));
    }

    #[test]
    fn uniform_stays_in_bounds() {
        let sampler = DurationDistribution::Uniform {
            low: 2.0,
            high: 4.0,
        }
        .sampler("service")
        .expect("valid");
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let v = sampler.sample(&mut rng);
            assert!((2.0..=4.0).contains(&v));
        }
    }

    #[test]
    fn degenerate_uniform_is_allowed() {
        let sampler = DurationDistribution::Uniform {
            low: 1.5,
            high: 1.5,
        }
        .sampler("service")
        .expect("valid");
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(sampler.sample(&mut rng), 1.5);
    }

    #[test]
    fn same_seed_same_draws() {
        let sampler = DurationDistribution::exponential_mean(5.0)
            .sampler("service")
            .expect("valid");
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..10 {
            assert_eq!(sampler.sample(&mut a), sampler.sample(&mut b));
        }
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(matches!(
            DurationDistribution::Exponential { rate: 0.0 }.validate("x"),
            Err(ConfigError::InvalidParameter {
                parameter: "rate",
                ..
            })
        ));
        assert!(matches!(
            DurationDistribution::Normal {
                mean: 1.0,
                std: -1.0
            }
            .validate("x"),
            Err(ConfigError::InvalidParameter { parameter: "std", .. })
        ));
        assert!(matches!(
            DurationDistribution::Uniform {
                low: 3.0,
                high: 1.0
            }
            .validate("x"),
            Err(ConfigError::InvalidParameter {
                parameter: "high",
                ..
            })
        ));
    }

    #[test]
    fn from_parts_reads_form_values() {
        let dist = DurationDistribution::from_parts(
            "Main Lab 1",
            "Normal",
            &params(&[("mean", 5.0), ("std", 1.0)]),
        )
        .expect("valid");
        assert_eq!(dist, DurationDistribution::Normal { mean: 5.0, std: 1.0 });
    }

    #[test]
    fn from_parts_reports_unknown_kind_and_missing_parameter() {
        let err = DurationDistribution::from_parts("lab", "Gamma", &params(&[("rate", 1.0)]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDistribution { .. }));

        let err =
            DurationDistribution::from_parts("lab", "Uniform", &params(&[("low", 1.0)])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingParameter {
                field: "lab".to_string(),
                parameter: "high"
            }
        );
    }

    #[test]
    fn serde_uses_tagged_kind() {
        let dist: DurationDistribution =
            serde_json::from_str(r#"{"kind":"exponential","rate":0.2}"#).expect("parse");
        assert_eq!(dist, DurationDistribution::Exponential { rate: 0.2 });
    }
}
