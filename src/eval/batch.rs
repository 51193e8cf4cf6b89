use std::collections::BTreeMap;
use std::ops::Range;

use rayon::prelude::*;

use crate::{
    animation::keyframes::{AnimatedProperties, PropertyValue, evaluate_timeline},
    foundation::error::{TimecueError, TimecueResult},
};

/// How [`sample_frames`] spreads work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EvalThreading {
    /// Evaluate on the calling thread.
    #[default]
    Sequential,
    /// Evaluate on a dedicated rayon pool. `None` uses rayon's default thread count.
    Parallel {
        /// Worker threads, `>= 1` when set.
        threads: Option<usize>,
    },
}

/// Every property of one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameSample {
    /// Frame relative to the animation's zero point.
    pub frame: i64,
    /// Property values by name.
    pub values: BTreeMap<String, PropertyValue>,
}

/// Evaluate `props` at every frame in `frames`, in frame order.
///
/// Output is identical for every [`EvalThreading`] choice.
pub fn sample_frames(
    props: &AnimatedProperties,
    frames: Range<i64>,
    threading: EvalThreading,
) -> TimecueResult<Vec<FrameSample>> {
    sample_with(frames, threading, |frame| FrameSample {
        frame,
        values: evaluate_timeline(props, frame as f64),
    })
}

/// Map `eval` over `frames`, in frame order, sequentially or on a rayon pool.
pub fn sample_with<T, F>(
    frames: Range<i64>,
    threading: EvalThreading,
    eval: F,
) -> TimecueResult<Vec<T>>
where
    T: Send,
    F: Fn(i64) -> T + Sync + Send,
{
    match threading {
        EvalThreading::Sequential => Ok(frames.map(eval).collect()),
        EvalThreading::Parallel { threads } => {
            let pool = build_thread_pool(threads)?;
            Ok(pool.install(|| frames.into_par_iter().map(&eval).collect()))
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> TimecueResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TimecueError::validation(
            "sample_frames 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TimecueError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/eval/batch.rs"]
mod tests;
