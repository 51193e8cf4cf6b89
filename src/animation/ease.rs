use crate::animation::spring::spring_step;

/// Easing curves mapping normalized progress `t` in `[0, 1]` to eased progress.
///
/// JSON accepts the snake_case names (`"ease_in_out"`), `{"cubic_bezier": [x1, y1, x2, y2]}`
/// and `{"spring": {"stiffness": .., "damping": .., "mass": ..}}`.
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Linear interpolation.
    #[default]
    Linear,
    /// Stay at `0` until `t` reaches `1`.
    Hold,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Sinusoidal ease-in.
    InSine,
    /// Sinusoidal ease-out.
    OutSine,
    /// Sinusoidal ease-in/out.
    InOutSine,
    /// Exponential ease-in.
    InExpo,
    /// Exponential ease-out.
    OutExpo,
    /// CSS `ease-in`.
    EaseIn,
    /// CSS `ease-out`.
    EaseOut,
    /// CSS `ease-in-out`.
    EaseInOut,
    /// Overshooting elastic settle.
    ElasticOut,
    /// Bouncing settle.
    BounceOut,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier {
        /// First control point x.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
    /// Damped spring step response with `t` read as seconds.
    ///
    /// Segment progress runs from 0 to 1, so a keyframe segment only sees the first second
    /// of the response. A soft spring that has not settled by then jumps to the target at
    /// the next keyframe; pick a stiffness that settles within a second, or use
    /// [`crate::spring`] for frame-based timing.
    Spring {
        /// Spring constant.
        stiffness: f64,
        /// Damping coefficient.
        damping: f64,
        /// Mass.
        mass: f64,
    },
}

impl Ease {
    /// Apply this easing function to normalized progress `t` (clamped to `[0, 1]`).
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::Hold => {
                if t >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InSine => 1.0 - (t * std::f64::consts::FRAC_PI_2).cos(),
            Self::OutSine => (t * std::f64::consts::FRAC_PI_2).sin(),
            Self::InOutSine => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
            Self::InExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    (2f64).powf(10.0 * t - 10.0)
                }
            }
            Self::OutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - (2f64).powf(-10.0 * t)
                }
            }
            Self::EaseIn => cubic_bezier_ease(t, 0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => cubic_bezier_ease(t, 0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => cubic_bezier_ease(t, 0.42, 0.0, 0.58, 1.0),
            Self::ElasticOut => elastic_out(t),
            Self::BounceOut => bounce_out(t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier_ease(t, x1, y1, x2, y2),
            Self::Spring {
                stiffness,
                damping,
                mass,
            } => spring_step(t, stiffness, damping, mass),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Ease {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            CubicBezier { cubic_bezier: [f64; 4] },
            Spring { spring: SpringParams },
        }

        #[derive(serde::Deserialize)]
        struct SpringParams {
            stiffness: f64,
            damping: f64,
            #[serde(default = "default_mass")]
            mass: f64,
        }

        fn default_mass() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => match s.as_str() {
                "linear" => Ok(Self::Linear),
                "hold" => Ok(Self::Hold),
                "in_quad" => Ok(Self::InQuad),
                "out_quad" => Ok(Self::OutQuad),
                "in_out_quad" => Ok(Self::InOutQuad),
                "in_cubic" => Ok(Self::InCubic),
                "out_cubic" => Ok(Self::OutCubic),
                "in_out_cubic" => Ok(Self::InOutCubic),
                "in_sine" => Ok(Self::InSine),
                "out_sine" => Ok(Self::OutSine),
                "in_out_sine" => Ok(Self::InOutSine),
                "in_expo" => Ok(Self::InExpo),
                "out_expo" => Ok(Self::OutExpo),
                "ease_in" => Ok(Self::EaseIn),
                "ease_out" => Ok(Self::EaseOut),
                "ease_in_out" => Ok(Self::EaseInOut),
                "elastic_out" => Ok(Self::ElasticOut),
                "bounce_out" => Ok(Self::BounceOut),
                other => Err(serde::de::Error::custom(format!(
                    "unknown easing \"{other}\""
                ))),
            },
            Repr::CubicBezier {
                cubic_bezier: [x1, y1, x2, y2],
            } => Ok(Self::CubicBezier { x1, y1, x2, y2 }),
            Repr::Spring { spring } => Ok(Self::Spring {
                stiffness: spring.stiffness,
                damping: spring.damping,
                mass: spring.mass,
            }),
        }
    }
}

pub(crate) fn cubic_bezier_ease(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    // Solve bx(u) = x for u, then return by(u).
    fn sample_curve(a1: f64, a2: f64, t: f64) -> f64 {
        let omt = 1.0 - t;
        3.0 * omt * omt * t * a1 + 3.0 * omt * t * t * a2 + t * t * t
    }
    fn sample_curve_derivative(a1: f64, a2: f64, t: f64) -> f64 {
        let omt = 1.0 - t;
        3.0 * omt * omt * a1 + 6.0 * omt * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    // Fixed iteration counts keep the result identical across callers.
    let mut t = x;
    for _ in 0..8 {
        let x_t = sample_curve(x1, x2, t) - x;
        let d = sample_curve_derivative(x1, x2, t);
        if d.abs() < 1e-7 {
            break;
        }
        t = (t - x_t / d).clamp(0.0, 1.0);
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..8 {
        let x_t = sample_curve(x1, x2, t);
        if (x_t - x).abs() < 1e-9 {
            break;
        }
        if x_t < x {
            lo = t;
        } else {
            hi = t;
        }
        t = 0.5 * (lo + hi);
    }

    sample_curve(y1, y2, t)
}

fn elastic_out(t: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let p = 0.3;
    (2f64).powf(-10.0 * t) * ((t - p / 4.0) * (2.0 * std::f64::consts::PI) / p).sin() + 1.0
}

fn bounce_out(t: f64) -> f64 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
