//! Run-level parameters of a replication study.

use ed_core::{ConfigError, SimTime};
use serde::{Deserialize, Serialize};

use crate::binning::last_tick;

/// How many replications to run, over which horizon, and how to summarise them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Samples before this time are discarded from the statistics.
    pub burn_in_period: SimTime,
    /// Length of every replication. Defaults to four times the burn-in period.
    pub horizon: Option<SimTime>,
    pub replications: usize,
    /// Two-sided confidence level, e.g. 0.95.
    pub confidence_level: f64,
    /// Largest acceptable within-replication half-width.
    pub tolerance: f64,
    pub moving_average_windows: Vec<usize>,
    /// Replication `i` uses `base_seed + i`; without it every replication draws its own seed.
    pub base_seed: Option<u64>,
    pub num_threads: Option<usize>,
    pub show_progress: bool,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            burn_in_period: 400.0,
            horizon: None,
            replications: 5,
            confidence_level: 0.95,
            tolerance: 0.5,
            moving_average_windows: vec![5, 10],
            base_seed: None,
            num_threads: None,
            show_progress: false,
        }
    }
}

impl AnalysisParams {
    pub fn with_burn_in(mut self, burn_in_period: SimTime) -> Self {
        self.burn_in_period = burn_in_period;
        self
    }

    pub fn with_horizon(mut self, horizon: SimTime) -> Self {
        self.horizon = Some(horizon);
        self
    }

    pub fn with_replications(mut self, replications: usize) -> Self {
        self.replications = replications;
        self
    }

    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_moving_average_windows(mut self, windows: Vec<usize>) -> Self {
        self.moving_average_windows = windows;
        self
    }

    pub fn with_seed(mut self, base_seed: u64) -> Self {
        self.base_seed = Some(base_seed);
        self
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn horizon(&self) -> SimTime {
        self.horizon.unwrap_or(self.burn_in_period * 4.0)
    }

    /// Seed of replication `index`, if seeds are fixed.
    pub fn seed_for(&self, index: usize) -> Option<u64> {
        self.base_seed.map(|base| base.wrapping_add(index as u64))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: String| ConfigError::InvalidRun { field, reason };

        if !self.burn_in_period.is_finite() || self.burn_in_period < 0.0 {
            return Err(invalid(
                "burn_in_period",
                format!("must be a finite, non-negative time (got {})", self.burn_in_period),
            ));
        }
        let horizon = self.horizon();
        if !horizon.is_finite() || horizon <= self.burn_in_period {
            return Err(invalid(
                "horizon",
                format!(
                    "must be finite and later than the burn-in period {} (got {horizon})",
                    self.burn_in_period
                ),
            ));
        }
        let first_tick = self.burn_in_period.ceil() as u64;
        let measured_ticks = (last_tick(horizon) + 1).saturating_sub(first_tick);
        if measured_ticks < 2 {
            return Err(invalid(
                "horizon",
                format!(
                    "leaves {measured_ticks} whole time unit(s) after burn-in {} (got {horizon}); at least 2 are needed",
                    self.burn_in_period
                ),
            ));
        }
        if self.replications < 2 {
            return Err(invalid(
                "replications",
                format!("at least 2 are needed for a confidence interval (got {})", self.replications),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(invalid(
                "confidence_level",
                format!("must be in (0, 1) (got {})", self.confidence_level),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(invalid(
                "tolerance",
                format!("must be positive (got {})", self.tolerance),
            ));
        }
        if let Some(&window) = self.moving_average_windows.iter().find(|&&w| w == 0) {
            return Err(invalid(
                "moving_average_windows",
                format!("window sizes must be at least 1 (got {window})"),
            ));
        }
        if self.num_threads == Some(0) {
            return Err(invalid("num_threads", "must be at least 1".to_string()));
        }
        Ok(())
    }
}
