use std::time::{SystemTime, UNIX_EPOCH};

use crate::{composition::model::PauseSpec, foundation::rng::Mulberry32};

/// Length of one pause in seconds. Fixed pauses leave `rng` untouched.
///
/// Gaussian samples apply `min` first and `max` second, so `min > max` yields `max`;
/// the result is never negative.
pub(crate) fn sample_pause(spec: &PauseSpec, rng: &mut Mulberry32) -> f64 {
    match *spec {
        PauseSpec::Fixed { seconds } => seconds.max(0.0),
        PauseSpec::Gaussian { mean, std, min, max } => {
            let mut v = mean + std * rng.next_gaussian();
            if let Some(lo) = min {
                v = v.max(lo);
            }
            if let Some(hi) = max {
                v = v.min(hi);
            }
            v.max(0.0)
        }
    }
}

/// Seed for builds that did not specify one.
pub(crate) fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    (nanos ^ (nanos >> 32)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/pause.rs"]
mod tests;
