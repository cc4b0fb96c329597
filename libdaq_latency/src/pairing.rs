use fxhash::FxHashMap;

use super::constants::{DATA_CLOCK_PERIOD, SYSTEM_CLOCK_PERIOD};
use super::event::Timed;

/// A single latency measurement.
///
/// `latency` is in seconds. `position` is the raw system time (ns) of the ending record,
/// used to place the sample along the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySample {
    pub latency: f64,
    pub position: i64,
}

/// Pair ending records with starting records of the same data time.
///
/// Every ending record is compared against every starting record, so duplicated data
/// times produce one sample per matching pair. Samples come out ordered by ending record,
/// then by starting record. The latency is `(end.system_time - start.system_time)` in
/// seconds and keeps its sign.
pub fn pair_latencies<E: Timed, S: Timed>(ending: &[E], starting: &[S]) -> Vec<LatencySample> {
    let mut index: FxHashMap<i64, Vec<usize>> = FxHashMap::default();
    for (idx, start) in starting.iter().enumerate() {
        index.entry(start.data_time()).or_default().push(idx);
    }

    let mut samples = Vec::new();
    for end in ending.iter() {
        let Some(matches) = index.get(&end.data_time()) else {
            continue;
        };
        for idx in matches {
            samples.push(LatencySample {
                latency: span(starting[*idx].system_time(), end.system_time())
                    * SYSTEM_CLOCK_PERIOD,
                position: end.system_time(),
            });
        }
    }
    samples
}

/// Shift a sequence so the first element is zero and scale it by the clock period
pub fn shift_to_relative(values: &[i64], period: f64) -> Vec<f64> {
    let Some(first) = values.first() else {
        return Vec::new();
    };
    values
        .iter()
        .map(|value| span(*first, *value) * period)
        .collect()
}

/// `to - from` as a float. Clock values may sit anywhere in the i64 range, so the
/// difference is taken in i128 where it cannot overflow.
pub fn span(from: i64, to: i64) -> f64 {
    (to as i128 - from as i128) as f64
}

/// The sample positions as seconds since the first sample
pub fn relative_positions(samples: &[LatencySample]) -> Vec<f64> {
    let positions: Vec<i64> = samples.iter().map(|s| s.position).collect();
    shift_to_relative(&positions, SYSTEM_CLOCK_PERIOD)
}

/// Absolute difference between two relative time sequences of the same records.
///
/// The sequences must have the same length; if they don't, a warning is logged and
/// no comparison is made.
pub fn clock_drift(system_times: &[f64], data_times: &[f64]) -> Vec<f64> {
    if system_times.len() != data_times.len() {
        log::warn!(
            "Number of system times ({}) and data times ({}) don't match! Skipping comparison.",
            system_times.len(),
            data_times.len()
        );
        return Vec::new();
    }
    system_times
        .iter()
        .zip(data_times.iter())
        .map(|(system, data)| (system - data).abs())
        .collect()
}

/// Compare the system clock against the data clock for a set of records.
///
/// Returns the relative system times (s) and the drift between the clocks (s).
pub fn records_clock_drift<T: Timed>(records: &[T]) -> (Vec<f64>, Vec<f64>) {
    let system: Vec<i64> = records.iter().map(|r| r.system_time()).collect();
    let data: Vec<i64> = records.iter().map(|r| r.data_time()).collect();
    let relative_system = shift_to_relative(&system, SYSTEM_CLOCK_PERIOD);
    let relative_data = shift_to_relative(&data, DATA_CLOCK_PERIOD);
    let drift = clock_drift(&relative_system, &relative_data);
    (relative_system, drift)
}
