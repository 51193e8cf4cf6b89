use crate::foundation::{
    core::Fps,
    error::{TimecueError, TimecueResult},
};

/// Physical parameters of a damped spring animating from `from` to `to`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Mass of the moving body (`> 0`).
    pub mass: f64,
    /// Spring constant.
    pub stiffness: f64,
    /// Damping coefficient.
    pub damping: f64,
    /// Value at frame 0.
    pub from: f64,
    /// Rest value.
    pub to: f64,
    /// Clamp the output to the `[from, to]` span instead of overshooting.
    pub overshoot_clamping: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 100.0,
            damping: 10.0,
            from: 0.0,
            to: 1.0,
            overshoot_clamping: false,
        }
    }
}

impl SpringConfig {
    /// Spring from `0` to `1` with the given physics.
    pub fn new(mass: f64, stiffness: f64, damping: f64) -> Self {
        Self {
            mass,
            stiffness,
            damping,
            ..Self::default()
        }
    }

    /// Replace the animated span.
    pub fn with_range(mut self, from: f64, to: f64) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Reject non-finite numbers, a non-positive mass and negative stiffness or damping.
    pub fn validate(&self) -> TimecueResult<()> {
        for (name, v) in [
            ("mass", self.mass),
            ("stiffness", self.stiffness),
            ("damping", self.damping),
            ("from", self.from),
            ("to", self.to),
        ] {
            if !v.is_finite() {
                return Err(TimecueError::animation(format!(
                    "spring {name} must be finite"
                )));
            }
        }
        if self.mass <= 0.0 {
            return Err(TimecueError::animation("spring mass must be > 0"));
        }
        if self.stiffness < 0.0 || self.damping < 0.0 {
            return Err(TimecueError::animation(
                "spring stiffness and damping must be >= 0",
            ));
        }
        Ok(())
    }
}

/// Value of the spring at `frame` (frames since the spring started).
///
/// Closed form, so frames can be queried in any order. Negative frames return `from`.
pub fn spring(frame: f64, fps: Fps, config: &SpringConfig) -> f64 {
    if frame.is_nan() || frame <= 0.0 {
        return config.from;
    }
    let secs = fps.frames_to_secs(frame);
    let step = spring_step(secs, config.stiffness, config.damping, config.mass);
    let mut v = config.from + (config.to - config.from) * step;
    if config.overshoot_clamping {
        let (lo, hi) = if config.from <= config.to {
            (config.from, config.to)
        } else {
            (config.to, config.from)
        };
        v = v.clamp(lo, hi);
    }
    v
}

/// Unit step response of a damped harmonic oscillator with `x(0) = 0`, `v(0) = 0`.
pub(crate) fn spring_step(t: f64, stiffness: f64, damping: f64, mass: f64) -> f64 {
    let k = stiffness.max(0.0);
    let c = damping.max(0.0);
    let m = mass.max(1e-9);

    let w0 = (k / m).sqrt();
    if w0 == 0.0 {
        return t.clamp(0.0, 1.0);
    }
    let zeta = c / (2.0 * (k * m).sqrt()).max(1e-9);

    if (zeta - 1.0).abs() < 1e-6 {
        // Critically damped.
        let e = (-w0 * t).exp();
        1.0 - e * (1.0 + w0 * t)
    } else if zeta < 1.0 {
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let e = (-zeta * w0 * t).exp();
        let ratio = zeta / (1.0 - zeta * zeta).sqrt();
        1.0 - e * ((wd * t).cos() + ratio * (wd * t).sin())
    } else {
        let z2 = (zeta * zeta - 1.0).sqrt();
        let r1 = -w0 * (zeta - z2);
        let r2 = -w0 * (zeta + z2);
        let c2 = (zeta + z2) / (2.0 * z2);
        let c1 = (zeta - z2) / (2.0 * z2);
        1.0 - (c2 * (r1 * t).exp() - c1 * (r2 * t).exp())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
