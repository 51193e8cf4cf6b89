use crate::foundation::{
    error::{TimecueError, TimecueResult},
    math::clamp01,
    rng::shuffled_indices,
};

/// Ordering rule that turns an item index into a delay multiplier.
///
/// Grid patterns lay items out row-major over `columns` columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StaggerPattern {
    /// `i`
    #[default]
    Linear,
    /// `count - 1 - i`
    Reverse,
    /// Distance from the middle item.
    FromCenter,
    /// Outer items last-to-first toward the middle.
    FromEdges,
    /// Seeded shuffle; each item waits for its shuffled rank.
    Random,
    /// Row index.
    Row {
        /// Grid width.
        columns: u32,
    },
    /// Column index.
    Column {
        /// Grid width.
        columns: u32,
    },
    /// `row + col`.
    Diagonal {
        /// Grid width.
        columns: u32,
    },
    /// Outer ring first, then inward.
    Spiral {
        /// Grid width.
        columns: u32,
    },
}

/// Fan-out of one start time into `count` item start offsets.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StaggerConfig {
    /// Number of items.
    pub count: usize,
    /// Delay between consecutive ranks, in frames.
    pub delay_frames: f64,
    /// Ordering rule.
    #[serde(default)]
    pub pattern: StaggerPattern,
    /// Seed for [`StaggerPattern::Random`]; `0` when unset.
    #[serde(default)]
    pub seed: Option<u32>,
}

impl StaggerConfig {
    /// Linear stagger of `count` items, `delay_frames` apart.
    pub fn new(count: usize, delay_frames: f64) -> Self {
        Self {
            count,
            delay_frames,
            pattern: StaggerPattern::Linear,
            seed: None,
        }
    }

    /// Replace the pattern.
    pub fn pattern(mut self, pattern: StaggerPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set the shuffle seed.
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject non-finite or negative delays and zero-width grids.
    pub fn validate(&self) -> TimecueResult<()> {
        if !self.delay_frames.is_finite() || self.delay_frames < 0.0 {
            return Err(TimecueError::validation(
                "stagger delay_frames must be finite and >= 0",
            ));
        }
        if let Some(0) = self.pattern.columns() {
            return Err(TimecueError::validation(
                "grid stagger patterns need columns > 0",
            ));
        }
        Ok(())
    }
}

impl StaggerPattern {
    fn columns(self) -> Option<u32> {
        match self {
            Self::Row { columns }
            | Self::Column { columns }
            | Self::Diagonal { columns }
            | Self::Spiral { columns } => Some(columns),
            _ => None,
        }
    }
}

/// Per-item delays in frames, indexed by item.
pub fn stagger(config: &StaggerConfig) -> TimecueResult<Vec<f64>> {
    config.validate()?;
    let n = config.count;
    let d = config.delay_frames;
    let mid = (n as f64 - 1.0) / 2.0;

    let delays = match config.pattern {
        StaggerPattern::Linear => (0..n).map(|i| i as f64 * d).collect(),
        StaggerPattern::Reverse => (0..n).map(|i| (n - 1 - i) as f64 * d).collect(),
        StaggerPattern::FromCenter => (0..n).map(|i| (i as f64 - mid).abs() * d).collect(),
        StaggerPattern::FromEdges => (0..n)
            .map(|i| (mid - (i as f64 - mid).abs()) * d)
            .collect(),
        StaggerPattern::Random => {
            let order = shuffled_indices(n, config.seed.unwrap_or(0));
            let mut out = vec![0.0; n];
            for (rank, &item) in order.iter().enumerate() {
                out[item] = rank as f64 * d;
            }
            out
        }
        StaggerPattern::Row { columns } => {
            let cols = columns as usize;
            (0..n).map(|i| (i / cols) as f64 * d).collect()
        }
        StaggerPattern::Column { columns } => {
            let cols = columns as usize;
            (0..n).map(|i| (i % cols) as f64 * d).collect()
        }
        StaggerPattern::Diagonal { columns } => {
            let cols = columns as usize;
            (0..n).map(|i| (i / cols + i % cols) as f64 * d).collect()
        }
        StaggerPattern::Spiral { columns } => spiral_delays(n, columns as usize, d),
    };
    Ok(delays)
}

fn spiral_delays(n: usize, cols: usize, d: f64) -> Vec<f64> {
    let rows = n.div_ceil(cols);
    let mut order: Vec<(usize, usize, usize)> = (0..n)
        .map(|i| {
            let (r, c) = (i / cols, i % cols);
            let edge = r.min(c).min(rows - 1 - r).min(cols - 1 - c);
            (edge, r + c, i)
        })
        .collect();
    order.sort_unstable();

    let mut out = vec![0.0; n];
    for (rank, &(_, _, i)) in order.iter().enumerate() {
        out[i] = rank as f64 * d;
    }
    out
}

/// Where an item is relative to its own delayed window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaggerPhase {
    /// Before the item's delay.
    Waiting,
    /// Inside `[delay, delay + duration)`.
    Animating,
    /// At or after `delay + duration`.
    Complete,
}

/// Snapshot of one staggered item at a frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StaggerItemState {
    /// Item index.
    pub index: usize,
    /// Start offset in frames.
    pub delay_frames: f64,
    /// Linear progress in `[0, 1]`.
    pub progress: f64,
    /// Phase classification.
    pub phase: StaggerPhase,
}

fn item_state(index: usize, delay: f64, frame: f64, duration_frames: f64) -> StaggerItemState {
    let (progress, phase) = if frame < delay {
        (0.0, StaggerPhase::Waiting)
    } else if duration_frames <= 0.0 || frame >= delay + duration_frames {
        (1.0, StaggerPhase::Complete)
    } else {
        (
            clamp01((frame - delay) / duration_frames),
            StaggerPhase::Animating,
        )
    };
    StaggerItemState {
        index,
        delay_frames: delay,
        progress,
        phase,
    }
}

/// Linear progress of item `index` at `frame` for an animation lasting `duration_frames`.
///
/// Each call recomputes every delay (including the shuffle for [`StaggerPattern::Random`]),
/// so querying all items this way is quadratic in `count`. Use [`stagger_state`] to get
/// every item of a frame in one pass.
pub fn staggered_progress(
    index: usize,
    frame: f64,
    config: &StaggerConfig,
    duration_frames: f64,
) -> TimecueResult<f64> {
    let delays = stagger(config)?;
    let delay = delays.get(index).copied().ok_or_else(|| {
        TimecueError::validation(format!(
            "stagger index {index} out of range for count {}",
            config.count
        ))
    })?;
    Ok(item_state(index, delay, frame, duration_frames).progress)
}

/// State of every item at `frame`.
pub fn stagger_state(
    frame: f64,
    config: &StaggerConfig,
    duration_frames: f64,
) -> TimecueResult<Vec<StaggerItemState>> {
    let delays = stagger(config)?;
    Ok(delays
        .into_iter()
        .enumerate()
        .map(|(i, delay)| item_state(i, delay, frame, duration_frames))
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/stagger.rs"]
mod tests;
