use std::collections::BTreeSet;

use crate::{
    effects::transitions::TransitionConfig,
    expression::eval::TimeExpr,
    foundation::core::Fps,
    foundation::error::{TimecueError, TimecueResult},
};

/// A declarative timeline: scenes holding cues and pauses, marks and transitions.
///
/// A composition is a pure data model that can be:
/// - built programmatically (see [`crate::CompositionBuilder`])
/// - deserialized from JSON (see [`Composition::from_json_str`])
///
/// Absolute times are produced by [`crate::resolve()`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Composition {
    /// Timeline frame rate; also the rate used by the `f` unit suffix.
    pub fps: Fps,
    /// Seed for Gaussian pauses. Unseeded builds pick one and record it.
    #[serde(default)]
    pub seed: Option<u32>,
    /// Pause inserted between consecutive cues of a scene.
    #[serde(default)]
    pub pause_between_items: Option<PauseSpec>,
    /// Scenes in playback order.
    pub scenes: Vec<Scene>,
    /// Named points in absolute time.
    #[serde(default)]
    pub marks: Vec<Mark>,
    /// Scene-to-scene transitions.
    #[serde(default)]
    pub transitions: Vec<TransitionSpec>,
}

/// A top-level timeline segment.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    /// Unique id.
    pub id: String,
    /// Explicit start/end; unset fields fall back to sequential placement.
    #[serde(default)]
    pub range: Option<TimeRange>,
    /// Length used when `range.end` is unset.
    #[serde(default)]
    pub duration: Option<TimeValue>,
    /// Cues and pauses in order.
    #[serde(default)]
    pub items: Vec<SceneItem>,
}

/// Entry of a scene's item list.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneItem {
    /// A timed cue.
    Cue(Cue),
    /// Explicit silence before the next item.
    Pause(PauseSpec),
}

/// A timed unit inside a scene (a voiceover line, a caption, an effect hit).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cue {
    /// Unique id.
    pub id: String,
    /// Explicit start/end.
    #[serde(default)]
    pub range: Option<TimeRange>,
    /// Length used when `range.end` is unset. Without either, the cue is zero-length.
    #[serde(default)]
    pub duration: Option<TimeValue>,
}

/// A zero-duration named point.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Mark {
    /// Unique id.
    pub id: String,
    /// Absolute time.
    pub at: TimeValue,
}

/// Transition overlapping the tail of `after` and the head of the next scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionSpec {
    /// Unique id.
    pub id: String,
    /// Scene this transition leaves.
    pub after: String,
    /// Length.
    pub duration: TimeValue,
    /// Start; defaults to `scene(after).end`.
    #[serde(default)]
    pub start: Option<TimeValue>,
    /// Visual effect evaluated per frame by the renderer.
    #[serde(default)]
    pub effect: Option<TransitionConfig>,
}

/// Seconds or a time expression such as `"scene(intro).end + 0.5s"`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    /// Plain seconds.
    Seconds(f64),
    /// Expression source.
    Expr(String),
}

impl From<f64> for TimeValue {
    fn from(v: f64) -> Self {
        Self::Seconds(v)
    }
}

impl From<&str> for TimeValue {
    fn from(v: &str) -> Self {
        Self::Expr(v.to_owned())
    }
}

impl From<String> for TimeValue {
    fn from(v: String) -> Self {
        Self::Expr(v)
    }
}

impl TimeValue {
    pub(crate) fn validate(&self, what: &str) -> TimecueResult<()> {
        match self {
            Self::Seconds(v) if !v.is_finite() => Err(TimecueError::validation(format!(
                "{what} must be finite"
            ))),
            Self::Seconds(_) => Ok(()),
            Self::Expr(src) => TimeExpr::parse(src).map(|_| ()),
        }
    }
}

/// Explicit start and end. Relative fields are offsets from the previous item's end.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimeRange {
    /// Start time.
    pub start: Option<TimeValue>,
    /// End time.
    pub end: Option<TimeValue>,
    /// `start` is an offset from the previous resolved end.
    pub start_is_relative: bool,
    /// `end` is an offset from the previous resolved end.
    pub end_is_relative: bool,
}

impl TimeRange {
    /// Range with both fields unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute start.
    pub fn start(mut self, v: impl Into<TimeValue>) -> Self {
        self.start = Some(v.into());
        self.start_is_relative = false;
        self
    }

    /// Absolute end.
    pub fn end(mut self, v: impl Into<TimeValue>) -> Self {
        self.end = Some(v.into());
        self.end_is_relative = false;
        self
    }

    /// Start as an offset from the previous resolved end.
    pub fn start_after(mut self, v: impl Into<TimeValue>) -> Self {
        self.start = Some(v.into());
        self.start_is_relative = true;
        self
    }

    /// End as an offset from the previous resolved end.
    pub fn end_after(mut self, v: impl Into<TimeValue>) -> Self {
        self.end = Some(v.into());
        self.end_is_relative = true;
        self
    }
}

/// Length of a pause, fixed or sampled once per build.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PauseSpec {
    /// Constant pause.
    Fixed {
        /// Seconds.
        seconds: f64,
    },
    /// Normally distributed pause, clamped to `[min, max]` and never negative.
    Gaussian {
        /// Mean seconds.
        mean: f64,
        /// Standard deviation in seconds.
        std: f64,
        /// Lower clamp.
        #[serde(default)]
        min: Option<f64>,
        /// Upper clamp.
        #[serde(default)]
        max: Option<f64>,
    },
}

impl PauseSpec {
    /// Fixed pause of `seconds`.
    pub fn fixed(seconds: f64) -> Self {
        Self::Fixed { seconds }
    }

    /// Unclamped Gaussian pause.
    pub fn gaussian(mean: f64, std: f64) -> Self {
        Self::Gaussian {
            mean,
            std,
            min: None,
            max: None,
        }
    }

    /// Check that every number is finite and lengths are non-negative.
    pub fn validate(&self) -> TimecueResult<()> {
        match *self {
            Self::Fixed { seconds } => {
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(TimecueError::validation(
                        "fixed pause seconds must be finite and >= 0",
                    ));
                }
            }
            Self::Gaussian { mean, std, min, max } => {
                if !mean.is_finite() || !std.is_finite() || std < 0.0 {
                    return Err(TimecueError::validation(
                        "gaussian pause needs finite mean and finite std >= 0",
                    ));
                }
                if min.is_some_and(|v| !v.is_finite()) || max.is_some_and(|v| !v.is_finite()) {
                    return Err(TimecueError::validation(
                        "gaussian pause min/max must be finite when set",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Composition {
    /// Parse JSON and validate the result.
    pub fn from_json_str(s: &str) -> TimecueResult<Self> {
        let comp: Self =
            serde_json::from_str(s).map_err(|e| TimecueError::serde(e.to_string()))?;
        comp.validate()?;
        Ok(comp)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string_pretty(&self) -> TimecueResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TimecueError::serde(e.to_string()))
    }

    /// Every cue of every scene, in declaration order.
    pub fn cues(&self) -> impl Iterator<Item = &Cue> {
        self.scenes.iter().flat_map(|s| s.cues())
    }

    /// Structural checks that do not need resolution: unique ids, finite numbers,
    /// well-formed expressions and known transition targets.
    pub fn validate(&self) -> TimecueResult<()> {
        let mut ids = BTreeSet::new();
        let mut claim = |id: &str, what: &str| -> TimecueResult<()> {
            if id.trim().is_empty() {
                return Err(TimecueError::validation(format!("{what} id must be non-empty")));
            }
            if !ids.insert(id.to_owned()) {
                return Err(TimecueError::validation(format!("duplicate id '{id}'")));
            }
            Ok(())
        };

        if let Some(p) = &self.pause_between_items {
            p.validate()?;
        }

        for scene in &self.scenes {
            claim(&scene.id, "scene")?;
            validate_timing(&scene.id, scene.range.as_ref(), scene.duration.as_ref())?;
            for item in &scene.items {
                match item {
                    SceneItem::Cue(cue) => {
                        claim(&cue.id, "cue")?;
                        validate_timing(&cue.id, cue.range.as_ref(), cue.duration.as_ref())?;
                    }
                    SceneItem::Pause(p) => p.validate()?,
                }
            }
        }

        for mark in &self.marks {
            claim(&mark.id, "mark")?;
            mark.at.validate(&format!("mark '{}' at", mark.id))?;
        }

        for tr in &self.transitions {
            claim(&tr.id, "transition")?;
            if !self.scenes.iter().any(|s| s.id == tr.after) {
                return Err(TimecueError::validation(format!(
                    "transition '{}' follows unknown scene '{}'",
                    tr.id, tr.after
                )));
            }
            tr.duration
                .validate(&format!("transition '{}' duration", tr.id))?;
            if let Some(start) = &tr.start {
                start.validate(&format!("transition '{}' start", tr.id))?;
            }
            if let Some(effect) = &tr.effect {
                effect.validate()?;
            }
        }

        Ok(())
    }
}

fn validate_timing(
    id: &str,
    range: Option<&TimeRange>,
    duration: Option<&TimeValue>,
) -> TimecueResult<()> {
    if let Some(range) = range {
        if let Some(start) = &range.start {
            start.validate(&format!("'{id}' range.start"))?;
        }
        if let Some(end) = &range.end {
            end.validate(&format!("'{id}' range.end"))?;
            if duration.is_some() {
                return Err(TimecueError::validation(format!(
                    "'{id}' sets both range.end and duration"
                )));
            }
        }
    }
    if let Some(d) = duration {
        d.validate(&format!("'{id}' duration"))?;
    }
    Ok(())
}

impl Scene {
    /// Cues of this scene, skipping pauses.
    pub fn cues(&self) -> impl Iterator<Item = &Cue> {
        self.items.iter().filter_map(|item| match item {
            SceneItem::Cue(c) => Some(c),
            SceneItem::Pause(_) => None,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
