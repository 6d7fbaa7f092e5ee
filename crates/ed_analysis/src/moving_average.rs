//! Cross-replication averages smoothed with trailing moving averages.
//!
//! Plotting these against time shows where the start-up transient ends, which is
//! how a burn-in period is chosen.

use std::collections::HashMap;

use serde::Serialize;

use crate::binning::BinnedSample;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageRow {
    pub time: u64,
    pub station: String,
    /// Mean over the replications that have a value at this (time, station).
    pub average: f64,
    /// One value per entry of [MovingAverages::windows], in the same order.
    pub moving: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MovingAverages {
    pub windows: Vec<usize>,
    /// Grouped by station (first-seen order), ascending time within a station.
    pub rows: Vec<MovingAverageRow>,
}

impl MovingAverages {
    pub fn for_station<'a>(
        &'a self,
        station: &'a str,
    ) -> impl Iterator<Item = &'a MovingAverageRow> + 'a {
        self.rows.iter().filter(move |r| r.station == station)
    }
}

/// Average the binned replications point by point, then smooth each station's
/// average with a trailing window of every size in `windows`. The first ticks of
/// a station use as many points as are available.
pub fn moving_averages(replications: &[&[BinnedSample]], windows: &[usize]) -> MovingAverages {
    let mut order: Vec<(&str, Vec<u64>)> = Vec::new();
    let mut station_index: HashMap<&str, usize> = HashMap::new();
    let mut sums: HashMap<(&str, u64), (f64, usize)> = HashMap::new();

    for replication in replications.iter().copied() {
        for sample in replication {
            let key = (sample.station.as_str(), sample.time);
            let entry = sums.entry(key).or_insert((0.0, 0));
            if entry.1 == 0 {
                let idx = *station_index.entry(sample.station.as_str()).or_insert_with(|| {
                    order.push((sample.station.as_str(), Vec::new()));
                    order.len() - 1
                });
                order[idx].1.push(sample.time);
            }
            entry.0 += sample.value as f64;
            entry.1 += 1;
        }
    }

    let mut rows = Vec::with_capacity(sums.len());
    for (station, mut times) in order {
        times.sort_unstable();
        let averages: Vec<f64> = times
            .iter()
            .map(|t| {
                let (sum, count) = sums[&(station, *t)];
                sum / count as f64
            })
            .collect();
        let smoothed: Vec<Vec<f64>> = windows.iter().map(|&w| trailing_mean(&averages, w)).collect();

        for (i, (time, average)) in times.iter().zip(&averages).enumerate() {
            rows.push(MovingAverageRow {
                time: *time,
                station: station.to_string(),
                average: *average,
                moving: smoothed.iter().map(|series| series[i]).collect(),
            });
        }
    }

    MovingAverages {
        windows: windows.to_vec(),
        rows,
    }
}

/// Mean of the last `window` values at each position (fewer at the start).
fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut prefix = Vec::with_capacity(values.len() + 1);
    prefix.push(0.0);
    for v in values {
        prefix.push(prefix[prefix.len() - 1] + v);
    }
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            (prefix[i + 1] - prefix[start]) / (i + 1 - start) as f64
        })
        .collect()
}
