use crate::foundation::error::{TimecueError, TimecueResult};

pub use kurbo::{Affine, Point, Vec2};

/// Frames-per-second represented as a rational `num/den`.
///
/// Deserializes from either a bare integer (`30`) or `{ "num": 30000, "den": 1001 }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> TimecueResult<Self> {
        if den == 0 {
            return Err(TimecueError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(TimecueError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert a (possibly fractional) frame count to seconds.
    pub fn frames_to_secs(self, frames: f64) -> f64 {
        frames * f64::from(self.den) / f64::from(self.num)
    }

    /// Convert seconds to a fractional frame position.
    pub fn secs_to_frames(self, secs: f64) -> f64 {
        secs * f64::from(self.num) / f64::from(self.den)
    }

    /// Convert seconds to the nearest whole frame.
    pub fn secs_to_frames_round(self, secs: f64) -> i64 {
        self.secs_to_frames(secs).round() as i64
    }

    /// Convert seconds to a frame index using floor semantics.
    pub fn secs_to_frames_floor(self, secs: f64) -> i64 {
        self.secs_to_frames(secs).floor() as i64
    }
}

impl<'de> serde::Deserialize<'de> for Fps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Whole(u32),
            Ratio { num: u32, den: u32 },
        }

        let (num, den) = match Repr::deserialize(deserializer)? {
            Repr::Whole(num) => (num, 1),
            Repr::Ratio { num, den } => (num, den),
        };
        Fps::new(num, den).map_err(serde::de::Error::custom)
    }
}

/// Output viewport dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Canvas {
    /// Create a canvas of `width` x `height` pixels.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
