//! Resampling of irregular station logs onto an integer time grid.

use std::collections::BTreeMap;

use ed_core::telemetry::StationSample;
use ed_core::SimTime;
use serde::{Deserialize, Serialize};

/// Value of one station at one integer tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinnedSample {
    pub time: u64,
    pub station: String,
    pub value: usize,
}

/// Last tick of the grid `[0, until]`.
pub fn last_tick(until: SimTime) -> u64 {
    if until > 0.0 {
        until.floor() as u64
    } else {
        0
    }
}

/// Resample `samples` onto the grid `0..=floor(until)` for each of `stations`.
///
/// Event times are rounded up to the next integer tick and the last value seen
/// at a tick wins. Ticks without an event repeat the previous value; ticks before
/// a station's first event (and every tick of a station that never logged) are 0.
/// Output is grouped by station in the order given, each in ascending time.
pub fn bin_data(samples: &[StationSample], stations: &[String], until: SimTime) -> Vec<BinnedSample> {
    let end = last_tick(until);
    let mut by_station: BTreeMap<&str, BTreeMap<u64, usize>> = BTreeMap::new();
    for sample in samples {
        let tick = sample.time.max(0.0).ceil() as u64;
        if tick > end {
            continue;
        }
        by_station
            .entry(sample.station.as_str())
            .or_default()
            .insert(tick, sample.value);
    }

    let mut out = Vec::with_capacity(stations.len() * (end as usize + 1));
    for station in stations {
        let observed = by_station.get(station.as_str());
        let mut current = 0;
        for tick in 0..=end {
            if let Some(&value) = observed.and_then(|o| o.get(&tick)) {
                current = value;
            }
            out.push(BinnedSample {
                time: tick,
                station: station.clone(),
                value: current,
            });
        }
    }
    out
}

/// View a binned series as raw samples, e.g. to bin it again.
pub fn to_samples(binned: &[BinnedSample]) -> Vec<StationSample> {
    binned
        .iter()
        .map(|b| StationSample {
            station: b.station.clone(),
            time: b.time as SimTime,
            value: b.value,
        })
        .collect()
}

/// Values of `station` at ticks `>= from`, in time order.
pub fn values_from<'a>(
    binned: &'a [BinnedSample],
    station: &'a str,
    from: SimTime,
) -> impl Iterator<Item = f64> + 'a {
    binned
        .iter()
        .filter(move |b| b.station == station && b.time as SimTime >= from)
        .map(|b| b.value as f64)
}
