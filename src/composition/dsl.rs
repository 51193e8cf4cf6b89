use crate::{
    composition::model::{
        Composition, Cue, Mark, PauseSpec, Scene, SceneItem, TimeRange, TimeValue, TransitionSpec,
    },
    effects::transitions::TransitionConfig,
    foundation::core::Fps,
    foundation::error::{TimecueError, TimecueResult},
};

/// Programmatic alternative to JSON for building a [`Composition`].
pub struct CompositionBuilder {
    fps: Fps,
    seed: Option<u32>,
    pause_between_items: Option<PauseSpec>,
    scenes: Vec<Scene>,
    marks: Vec<Mark>,
    transitions: Vec<TransitionSpec>,
}

impl CompositionBuilder {
    /// Start an empty composition at `fps`.
    pub fn new(fps: Fps) -> Self {
        Self {
            fps,
            seed: None,
            pause_between_items: None,
            scenes: Vec::new(),
            marks: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Fix the seed used for Gaussian pauses.
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Pause inserted between consecutive cues.
    pub fn pause_between_items(mut self, pause: PauseSpec) -> Self {
        self.pause_between_items = Some(pause);
        self
    }

    /// Append a scene.
    pub fn scene(mut self, scene: Scene) -> Self {
        self.scenes.push(scene);
        self
    }

    /// Add a mark at `at`.
    pub fn mark(mut self, id: impl Into<String>, at: impl Into<TimeValue>) -> Self {
        self.marks.push(Mark {
            id: id.into(),
            at: at.into(),
        });
        self
    }

    /// Add a transition of `duration` leaving scene `after`.
    pub fn transition(
        mut self,
        id: impl Into<String>,
        after: impl Into<String>,
        duration: impl Into<TimeValue>,
        effect: Option<TransitionConfig>,
    ) -> Self {
        self.transitions.push(TransitionSpec {
            id: id.into(),
            after: after.into(),
            duration: duration.into(),
            start: None,
            effect,
        });
        self
    }

    /// Assemble and validate.
    pub fn build(self) -> TimecueResult<Composition> {
        let comp = Composition {
            fps: self.fps,
            seed: self.seed,
            pause_between_items: self.pause_between_items,
            scenes: self.scenes,
            marks: self.marks,
            transitions: self.transitions,
        };
        comp.validate()?;
        Ok(comp)
    }
}

/// Builder for a [`Scene`].
pub struct SceneBuilder {
    id: String,
    range: TimeRange,
    duration: Option<TimeValue>,
    items: Vec<SceneItem>,
}

impl SceneBuilder {
    /// Start a scene with sequential placement and no items.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            range: TimeRange::default(),
            duration: None,
            items: Vec::new(),
        }
    }

    /// Explicit start.
    pub fn start(mut self, v: impl Into<TimeValue>) -> Self {
        self.range = self.range.start(v);
        self
    }

    /// Explicit end.
    pub fn end(mut self, v: impl Into<TimeValue>) -> Self {
        self.range = self.range.end(v);
        self
    }

    /// Length when no end is given.
    pub fn duration(mut self, v: impl Into<TimeValue>) -> Self {
        self.duration = Some(v.into());
        self
    }

    /// Append a zero-length cue or one built with [`CueBuilder`].
    pub fn cue(mut self, cue: impl Into<Cue>) -> Self {
        self.items.push(SceneItem::Cue(cue.into()));
        self
    }

    /// Append a pause.
    pub fn pause(mut self, pause: PauseSpec) -> Self {
        self.items.push(SceneItem::Pause(pause));
        self
    }

    /// Finish the scene.
    pub fn build(self) -> TimecueResult<Scene> {
        if self.id.trim().is_empty() {
            return Err(TimecueError::validation("scene id must be non-empty"));
        }
        let range = (self.range != TimeRange::default()).then_some(self.range);
        Ok(Scene {
            id: self.id,
            range,
            duration: self.duration,
            items: self.items,
        })
    }
}

/// Builder for a [`Cue`].
pub struct CueBuilder {
    cue: Cue,
}

impl CueBuilder {
    /// Zero-length cue placed after its predecessor.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            cue: Cue {
                id: id.into(),
                range: None,
                duration: None,
            },
        }
    }

    /// Length of the cue.
    pub fn duration(mut self, v: impl Into<TimeValue>) -> Self {
        self.cue.duration = Some(v.into());
        self
    }

    /// Explicit range.
    pub fn range(mut self, range: TimeRange) -> Self {
        self.cue.range = Some(range);
        self
    }

    /// Explicit start.
    pub fn start(mut self, v: impl Into<TimeValue>) -> Self {
        self.cue.range = Some(self.cue.range.take().unwrap_or_default().start(v));
        self
    }

    /// Finish the cue.
    pub fn build(self) -> Cue {
        self.cue
    }
}

impl From<CueBuilder> for Cue {
    fn from(b: CueBuilder) -> Self {
        b.build()
    }
}

impl From<&str> for Cue {
    fn from(id: &str) -> Self {
        CueBuilder::new(id).build()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/dsl.rs"]
mod tests;
