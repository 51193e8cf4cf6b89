use std::collections::BTreeMap;

use crate::{
    expression::{ast::TimeAnchor, eval::AnchorResolver},
    foundation::{
        core::Fps,
        error::{TimecueError, TimecueResult},
    },
    resolve::fingerprint::{TimelineFingerprint, fingerprint_timeline},
};

/// What a timeline entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Top-level scene.
    Scene,
    /// Cue inside a scene.
    Cue,
    /// Zero-length mark.
    Mark,
    /// Scene-to-scene transition.
    Transition,
}

/// One entity with absolute times.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineEntry {
    /// Entity kind.
    pub kind: EntryKind,
    /// Entity id.
    pub id: String,
    /// Absolute start in seconds.
    pub start_sec: f64,
    /// Absolute end in seconds, `>= start_sec`.
    pub end_sec: f64,
    /// Owning scene for cues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl TimelineEntry {
    /// `end_sec - start_sec`.
    pub fn duration_sec(&self) -> f64 {
        self.end_sec - self.start_sec
    }

    /// Half-open containment; zero-length entries contain only their own instant.
    pub fn contains(&self, sec: f64) -> bool {
        if self.start_sec == self.end_sec {
            return sec == self.start_sec;
        }
        self.start_sec <= sec && sec < self.end_sec
    }
}

/// Flat, start-ordered output of [`crate::resolve()`].
///
/// Doubles as an [`AnchorResolver`], so expressions written after the build
/// (`cue(vo1).end + 0.25s`) evaluate against the final times. Relative anchors
/// (`prev.*`, `next.*`) have no meaning here and stay unresolved.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ResolvedTimeline {
    fps: Fps,
    seed: u32,
    entries: Vec<TimelineEntry>,
    #[serde(skip)]
    index: BTreeMap<String, usize>,
}

impl ResolvedTimeline {
    pub(crate) fn new(fps: Fps, seed: u32, entries: Vec<TimelineEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        Self {
            fps,
            seed,
            entries,
            index,
        }
    }

    /// Frame rate of the source composition.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Seed used for pause sampling; pass it back through [`crate::ResolveOpts`] to reproduce.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// All entries, sorted by start time with ties in declaration order.
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Entry with `id`.
    pub fn get(&self, id: &str) -> Option<&TimelineEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Scenes in start order.
    pub fn scenes(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.entries.iter().filter(|e| e.kind == EntryKind::Scene)
    }

    /// Cues of `scene_id` in start order.
    pub fn cues_of<'a>(&'a self, scene_id: &'a str) -> impl Iterator<Item = &'a TimelineEntry> {
        self.entries
            .iter()
            .filter(move |e| e.kind == EntryKind::Cue && e.parent.as_deref() == Some(scene_id))
    }

    /// Entries covering `sec`.
    pub fn active_at(&self, sec: f64) -> Vec<&TimelineEntry> {
        self.entries.iter().filter(|e| e.contains(sec)).collect()
    }

    /// Entries covering the start of `frame`.
    pub fn active_at_frame(&self, frame: i64) -> Vec<&TimelineEntry> {
        self.active_at(self.fps.frames_to_secs(frame as f64))
    }

    /// Start of `id` rounded to the nearest frame; the zero point for per-frame evaluation.
    pub fn start_frame(&self, id: &str) -> Option<i64> {
        self.get(id)
            .map(|e| self.fps.secs_to_frames_round(e.start_sec))
    }

    /// End of `id` rounded to the nearest frame.
    pub fn end_frame(&self, id: &str) -> Option<i64> {
        self.get(id).map(|e| self.fps.secs_to_frames_round(e.end_sec))
    }

    /// Latest end over all entries; `0` for an empty timeline.
    pub fn duration_sec(&self) -> f64 {
        self.entries.iter().map(|e| e.end_sec).fold(0.0, f64::max)
    }

    /// [`Self::duration_sec`] rounded up to whole frames.
    pub fn duration_frames(&self) -> i64 {
        self.fps.secs_to_frames(self.duration_sec()).ceil() as i64
    }

    /// Stable 128-bit hash of the fps, seed and every entry.
    pub fn fingerprint(&self) -> TimelineFingerprint {
        fingerprint_timeline(self)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string_pretty(&self) -> TimecueResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TimecueError::serde(e.to_string()))
    }

    fn edge(&self, kind: EntryKind, id: &str, end: bool) -> Option<f64> {
        let e = self.get(id).filter(|e| e.kind == kind)?;
        Some(if end { e.end_sec } else { e.start_sec })
    }
}

impl AnchorResolver for ResolvedTimeline {
    fn resolve_anchor(&self, anchor: &TimeAnchor) -> Option<f64> {
        match anchor {
            TimeAnchor::SceneStart(id) => self.edge(EntryKind::Scene, id, false),
            TimeAnchor::SceneEnd(id) => self.edge(EntryKind::Scene, id, true),
            TimeAnchor::CueStart(id) => self.edge(EntryKind::Cue, id, false),
            TimeAnchor::CueEnd(id) => self.edge(EntryKind::Cue, id, true),
            TimeAnchor::MarkStart(id) => self.edge(EntryKind::Mark, id, false),
            TimeAnchor::TimelineStart => Some(0.0),
            TimeAnchor::PrevStart | TimeAnchor::PrevEnd | TimeAnchor::NextStart => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/timeline.rs"]
mod tests;
