use crate::{
    animation::{
        ease::Ease,
        spring::{SpringConfig, spring},
    },
    foundation::{
        core::{Affine, Canvas, Fps, Point, Vec2},
        error::{TimecueError, TimecueResult},
        math::clamp01,
    },
};

/// Edge a slide enters from (or exits toward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideDirection {
    /// Left edge.
    #[default]
    Left,
    /// Right edge.
    Right,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
}

impl SlideDirection {
    fn unit(self) -> Vec2 {
        match self {
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Top => Vec2::new(0.0, -1.0),
            Self::Bottom => Vec2::new(0.0, 1.0),
        }
    }

    fn viewport_extent(self, viewport: Canvas) -> f64 {
        match self {
            Self::Left | Self::Right => viewport.width,
            Self::Top | Self::Bottom => viewport.height,
        }
    }
}

/// What a transition animates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionKind {
    /// Opacity ramp.
    Fade,
    /// Translation from off-screen; `distance` defaults to the viewport extent.
    Slide {
        /// Edge to slide from.
        #[serde(default)]
        direction: SlideDirection,
        /// Travel in pixels.
        #[serde(default)]
        distance: Option<f64>,
    },
    /// Uniform scale about the viewport center.
    Scale {
        /// Scale at progress 0.
        from: f64,
        /// Scale at progress 1.
        to: f64,
    },
    /// Physically driven scale and opacity. The closed-form response keeps running past
    /// `duration_frames` until it settles on its own, so there is no jump at the boundary.
    Spring {
        /// Mass.
        mass: f64,
        /// Spring constant.
        stiffness: f64,
        /// Damping coefficient.
        damping: f64,
    },
}

/// Whether the transition brings an element in or takes it out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    /// Hidden to visible.
    #[default]
    Enter,
    /// Visible to hidden.
    Exit,
}

/// A declarative transition evaluated relative to its element's start frame.
///
/// ```json
/// { "type": "slide", "direction": "right", "duration_frames": 15, "easing": "ease_out" }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionConfig {
    /// Effect kind and its parameters.
    #[serde(flatten)]
    pub kind: TransitionKind,
    /// Length of the animated window. Springs only use it for validation.
    pub duration_frames: f64,
    /// Frames to wait before starting.
    #[serde(default)]
    pub delay_frames: f64,
    /// Curve applied to linear progress. Springs ignore it.
    #[serde(default)]
    pub easing: Ease,
    /// Enter or exit.
    #[serde(default)]
    pub mode: TransitionMode,
}

impl TransitionConfig {
    /// Enter transition with linear easing and no delay.
    pub fn new(kind: TransitionKind, duration_frames: f64) -> Self {
        Self {
            kind,
            duration_frames,
            delay_frames: 0.0,
            easing: Ease::Linear,
            mode: TransitionMode::Enter,
        }
    }

    /// Set the delay.
    pub fn delay(mut self, frames: f64) -> Self {
        self.delay_frames = frames;
        self
    }

    /// Set the easing curve.
    pub fn easing(mut self, easing: Ease) -> Self {
        self.easing = easing;
        self
    }

    /// Play as an exit.
    pub fn exit(mut self) -> Self {
        self.mode = TransitionMode::Exit;
        self
    }

    /// Check durations and kind parameters.
    pub fn validate(&self) -> TimecueResult<()> {
        if !self.duration_frames.is_finite() || self.duration_frames < 0.0 {
            return Err(TimecueError::validation(
                "transition duration_frames must be finite and >= 0",
            ));
        }
        if !self.delay_frames.is_finite() || self.delay_frames < 0.0 {
            return Err(TimecueError::validation(
                "transition delay_frames must be finite and >= 0",
            ));
        }
        match self.kind {
            TransitionKind::Fade => Ok(()),
            TransitionKind::Slide { distance, .. } => match distance {
                Some(d) if !d.is_finite() => Err(TimecueError::validation(
                    "slide distance must be finite when set",
                )),
                _ => Ok(()),
            },
            TransitionKind::Scale { from, to } => {
                if !from.is_finite() || !to.is_finite() {
                    return Err(TimecueError::validation("scale from/to must be finite"));
                }
                Ok(())
            }
            TransitionKind::Spring {
                mass,
                stiffness,
                damping,
            } => SpringConfig::new(mass, stiffness, damping).validate(),
        }
    }
}

/// Translation plus uniform scale about `origin`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StyleTransform {
    /// Offset applied after scaling.
    pub translate: Vec2,
    /// Uniform scale factor.
    pub scale: f64,
    /// Fixed point of the scale.
    pub origin: Point,
}

impl StyleTransform {
    /// The equivalent affine matrix.
    pub fn to_affine(&self) -> Affine {
        let o = self.origin.to_vec2();
        Affine::translate(self.translate)
            * Affine::translate(o)
            * Affine::scale(self.scale)
            * Affine::translate(-o)
    }
}

/// Style overrides produced by a transition at one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct TransitionStyle {
    /// Opacity in `[0, 1]`, when the transition drives it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Transform, when the transition drives one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<StyleTransform>,
}

/// Evaluate `config` at `relative_frame` (frames since the element started).
pub fn apply_transition(
    config: &TransitionConfig,
    relative_frame: f64,
    viewport: Canvas,
    fps: Fps,
) -> TimecueResult<TransitionStyle> {
    config.validate()?;

    let elapsed = relative_frame - config.delay_frames;
    let linear = if config.duration_frames <= 0.0 {
        if elapsed >= 0.0 { 1.0 } else { 0.0 }
    } else {
        clamp01(elapsed / config.duration_frames)
    };
    let eased = config.easing.apply(linear);
    let amount = match config.mode {
        TransitionMode::Enter => eased,
        TransitionMode::Exit => 1.0 - eased,
    };
    let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);

    let style = match config.kind {
        TransitionKind::Fade => TransitionStyle {
            opacity: Some(amount),
            transform: None,
        },
        TransitionKind::Slide {
            direction,
            distance,
        } => {
            let distance = distance.unwrap_or_else(|| direction.viewport_extent(viewport));
            TransitionStyle {
                opacity: None,
                transform: Some(StyleTransform {
                    translate: direction.unit() * (distance * (1.0 - amount)),
                    scale: 1.0,
                    origin: center,
                }),
            }
        }
        TransitionKind::Scale { from, to } => TransitionStyle {
            opacity: None,
            transform: Some(StyleTransform {
                translate: Vec2::ZERO,
                scale: from + (to - from) * amount,
                origin: center,
            }),
        },
        TransitionKind::Spring {
            mass,
            stiffness,
            damping,
        } => {
            let settled = spring(elapsed, fps, &SpringConfig::new(mass, stiffness, damping));
            let amount = match config.mode {
                TransitionMode::Enter => settled,
                TransitionMode::Exit => 1.0 - settled,
            };
            TransitionStyle {
                opacity: Some(clamp01(amount)),
                transform: Some(StyleTransform {
                    translate: Vec2::ZERO,
                    scale: amount,
                    origin: center,
                }),
            }
        }
    };
    Ok(style)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
