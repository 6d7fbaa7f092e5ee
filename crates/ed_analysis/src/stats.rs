//! Batch-means summary: per-station confidence intervals across replications.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

use ed_core::SimTime;

use crate::binning::{values_from, BinnedSample};

/// One row of a statistics table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSummary {
    pub station: String,
    pub mean_of_means: f64,
    /// Sample standard deviation of the replication means.
    pub std_of_means: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    /// Every replication's own half-width was below the tolerance. When false,
    /// more replications or a longer burn-in are advisable.
    pub all_within_tolerance: bool,
    /// Post-burn-in mean of each replication, in replication order.
    pub replication_means: Vec<f64>,
}

impl StationSummary {
    pub fn half_width(&self) -> f64 {
        (self.ci_upper - self.ci_lower) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        self.ci_lower <= value && value <= self.ci_upper
    }
}

/// Two-sided Student-t critical value for `confidence_level` with `df` degrees of freedom.
///
/// `None` when `df` is zero or the level is outside `(0, 1)`.
pub fn t_critical(confidence_level: f64, df: usize) -> Option<f64> {
    if df == 0 || !(confidence_level > 0.0 && confidence_level < 1.0) {
        return None;
    }
    let dist = StudentsT::new(0.0, 1.0, df as f64).ok()?;
    Some(dist.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0))
}

/// Column label for an interval at `confidence_level`, e.g. `95% CI` or `99.5% CI`.
pub fn confidence_label(confidence_level: f64) -> String {
    let percent = (confidence_level * 1000.0).round() / 10.0;
    format!("{percent}% CI")
}

/// Summarise binned replications of one metric, station by station.
///
/// Each replication is cut to ticks `>= burn_in_period` and averaged. Across
/// replications the table reports the mean and sample standard deviation of those
/// averages with a `t(n - 1)` confidence interval on their mean. Per replication,
/// `t(len - 1) * s / sqrt(len)` is compared against `tolerance`.
///
/// Stations appear in the order of the first replication. With fewer than two
/// replications the spread and bounds are NaN.
pub fn compile_stats_table(
    replications: &[&[BinnedSample]],
    burn_in_period: SimTime,
    confidence_level: f64,
    tolerance: f64,
) -> Vec<StationSummary> {
    let mut stations: Vec<&str> = Vec::new();
    for replication in replications.iter().copied() {
        for sample in replication {
            if !stations.contains(&sample.station.as_str()) {
                stations.push(sample.station.as_str());
            }
        }
    }

    let outer_t = t_critical(confidence_level, replications.len().saturating_sub(1));
    stations
        .into_iter()
        .map(|station| {
            let mut means = Vec::with_capacity(replications.len());
            let mut all_within_tolerance = true;
            for replication in replications.iter().copied() {
                let values: Vec<f64> = values_from(replication, station, burn_in_period).collect();
                means.push(values.iter().mean());
                all_within_tolerance &= within_tolerance(&values, confidence_level, tolerance);
            }

            let mean_of_means = means.iter().mean();
            let std_of_means = means.iter().std_dev();
            let margin = match outer_t {
                Some(t) => t * std_of_means / (means.len() as f64).sqrt(),
                None => f64::NAN,
            };
            StationSummary {
                station: station.to_string(),
                mean_of_means,
                std_of_means,
                ci_lower: mean_of_means - margin,
                ci_upper: mean_of_means + margin,
                all_within_tolerance,
                replication_means: means,
            }
        })
        .collect()
}

fn within_tolerance(values: &[f64], confidence_level: f64, tolerance: f64) -> bool {
    let Some(t) = t_critical(confidence_level, values.len().saturating_sub(1)) else {
        return false;
    };
    let half_width = t * values.iter().std_dev() / (values.len() as f64).sqrt();
    half_width < tolerance
}
