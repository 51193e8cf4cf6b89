use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{
    composition::model::{Composition, PauseSpec, SceneItem, TimeRange, TimeValue},
    expression::{
        ast::TimeAnchor,
        eval::{AnchorResolver, TimeEvalContext, TimeExpr},
    },
    foundation::{
        core::Fps,
        error::{TimecueError, TimecueResult},
        rng::Mulberry32,
    },
    resolve::{
        pause::{clock_seed, sample_pause},
        timeline::{EntryKind, ResolvedTimeline, TimelineEntry},
    },
};

/// Overrides for a single [`resolve`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveOpts {
    /// Seed for Gaussian pauses; takes precedence over [`Composition::seed`].
    pub seed: Option<u32>,
    /// Cap on fixed-point passes. Defaults to `2 * entities + 1`, which is always enough
    /// for an acyclic composition.
    pub max_passes: Option<usize>,
}

impl ResolveOpts {
    /// Options with `seed` set.
    pub fn seeded(seed: u32) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// Resolve every scene, cue, mark and transition of `comp` to absolute seconds.
///
/// Pauses are sampled once in declaration order, then start/end fields are evaluated in
/// repeated passes until every field is known. A pass that makes no progress ends the build
/// with [`TimecueError::MissingReference`] or [`TimecueError::CircularReference`].
#[tracing::instrument(skip(comp), fields(scenes = comp.scenes.len()))]
pub fn resolve(comp: &Composition, opts: ResolveOpts) -> TimecueResult<ResolvedTimeline> {
    comp.validate()?;

    let seed = match opts.seed.or(comp.seed) {
        Some(seed) => seed,
        None if uses_randomness(comp) => {
            let seed = clock_seed();
            tracing::info!(seed, "no seed given; sampled pauses use a clock-derived seed");
            seed
        }
        None => 0,
    };

    let graph = Graph::build(comp, seed)?;
    let max_passes = opts.max_passes.unwrap_or(2 * graph.nodes.len() + 1);
    let values = graph.fixed_point(max_passes)?;
    let entries = graph.entries(&values)?;
    Ok(ResolvedTimeline::new(comp.fps, seed, entries))
}

fn uses_randomness(comp: &Composition) -> bool {
    let gaussian = |p: &PauseSpec| matches!(p, PauseSpec::Gaussian { .. });
    comp.pause_between_items.as_ref().is_some_and(gaussian)
        || comp.scenes.iter().any(|s| {
            s.items.iter().any(|item| match item {
                SceneItem::Pause(p) => gaussian(p),
                SceneItem::Cue(_) => false,
            })
        })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Edge {
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FieldId {
    node: usize,
    edge: Edge,
}

enum Time {
    Secs(f64),
    Expr(TimeExpr),
}

impl Time {
    fn compile(v: &TimeValue) -> TimecueResult<Self> {
        Ok(match v {
            TimeValue::Seconds(s) => Self::Secs(*s),
            TimeValue::Expr(src) => Self::Expr(TimeExpr::parse(src)?),
        })
    }
}

#[derive(Clone, Copy)]
enum Base {
    Zero,
    Start(usize),
    End(usize),
}

enum Rule {
    /// `time`, shifted by `base + offset` when relative.
    Explicit {
        time: Time,
        relative_to: Option<(Base, f64)>,
    },
    /// Sequential placement: `base + offset`.
    Follow { base: Base, offset: f64 },
    /// Own start plus a duration.
    Span(Time),
    /// Same as own start.
    Instant,
    /// Latest child end (own start when childless) plus trailing pauses.
    Children { cues: Vec<usize>, trailing: f64 },
}

struct Node {
    kind: EntryKind,
    id: String,
    parent: Option<usize>,
    prev: Option<usize>,
    next: Option<usize>,
    start: Rule,
    end: Rule,
}

struct Blocker {
    anchor: String,
    target: Option<FieldId>,
}

enum Step {
    Done(f64),
    Blocked(Blocker),
}

enum Lookup {
    Fixed(f64),
    Field(FieldId),
    Missing,
}

type Values = Vec<[Option<f64>; 2]>;

fn get(values: &Values, f: FieldId) -> Option<f64> {
    values[f.node][f.edge as usize]
}

struct Graph {
    fps: Fps,
    nodes: Vec<Node>,
    by_id: HashMap<String, usize>,
}

impl Graph {
    fn build(comp: &Composition, seed: u32) -> TimecueResult<Self> {
        let mut rng = Mulberry32::new(seed);
        let mut nodes: Vec<Node> = Vec::new();
        let mut prev_scene: Option<usize> = None;

        for scene in &comp.scenes {
            let si = nodes.len();
            let scene_base = prev_scene.map_or(Base::Zero, Base::End);
            if let Some(p) = prev_scene {
                nodes[p].next = Some(si);
            }
            let start = match range_start(scene.range.as_ref()) {
                Some((v, relative)) => Rule::Explicit {
                    time: Time::compile(v)?,
                    relative_to: relative.then_some((scene_base, 0.0)),
                },
                None => Rule::Follow {
                    base: scene_base,
                    offset: 0.0,
                },
            };
            nodes.push(Node {
                kind: EntryKind::Scene,
                id: scene.id.clone(),
                parent: None,
                prev: prev_scene,
                next: None,
                start,
                end: Rule::Instant,
            });

            let mut cues = Vec::new();
            let mut prev_cue: Option<usize> = None;
            let mut pending = 0.0;
            let mut explicit_pause = false;
            for item in &scene.items {
                let cue = match item {
                    SceneItem::Pause(p) => {
                        let secs = sample_pause(p, &mut rng);
                        tracing::trace!(scene = %scene.id, secs, "sampled pause item");
                        pending += secs;
                        explicit_pause = true;
                        continue;
                    }
                    SceneItem::Cue(cue) => cue,
                };

                let ci = nodes.len();
                let base = prev_cue.map_or(Base::Start(si), Base::End);
                let mut auto = 0.0;
                if prev_cue.is_some()
                    && !explicit_pause
                    && cue.range.is_none()
                    && let Some(p) = &comp.pause_between_items
                {
                    auto = sample_pause(p, &mut rng);
                    tracing::trace!(cue = %cue.id, secs = auto, "sampled pause between items");
                }

                let start = match range_start(cue.range.as_ref()) {
                    Some((v, relative)) => Rule::Explicit {
                        time: Time::compile(v)?,
                        relative_to: relative.then_some((base, pending)),
                    },
                    None => Rule::Follow {
                        base,
                        offset: pending + auto,
                    },
                };
                let end = match (range_end(cue.range.as_ref()), &cue.duration) {
                    (Some((v, relative)), _) => Rule::Explicit {
                        time: Time::compile(v)?,
                        relative_to: relative.then_some((base, pending)),
                    },
                    (None, Some(d)) => Rule::Span(Time::compile(d)?),
                    (None, None) => Rule::Instant,
                };

                if let Some(p) = prev_cue {
                    nodes[p].next = Some(ci);
                }
                nodes.push(Node {
                    kind: EntryKind::Cue,
                    id: cue.id.clone(),
                    parent: Some(si),
                    prev: prev_cue,
                    next: None,
                    start,
                    end,
                });
                cues.push(ci);
                prev_cue = Some(ci);
                pending = 0.0;
                explicit_pause = false;
            }

            nodes[si].end = match (range_end(scene.range.as_ref()), &scene.duration) {
                (Some((v, relative)), _) => Rule::Explicit {
                    time: Time::compile(v)?,
                    relative_to: relative.then_some((scene_base, 0.0)),
                },
                (None, Some(d)) => Rule::Span(Time::compile(d)?),
                (None, None) => Rule::Children {
                    cues,
                    trailing: pending,
                },
            };
            prev_scene = Some(si);
        }

        for mark in &comp.marks {
            nodes.push(Node {
                kind: EntryKind::Mark,
                id: mark.id.clone(),
                parent: None,
                prev: None,
                next: None,
                start: Rule::Explicit {
                    time: Time::compile(&mark.at)?,
                    relative_to: None,
                },
                end: Rule::Instant,
            });
        }

        for tr in &comp.transitions {
            let after = nodes
                .iter()
                .position(|n| n.kind == EntryKind::Scene && n.id == tr.after)
                .ok_or_else(|| {
                    TimecueError::validation(format!(
                        "transition '{}' follows unknown scene '{}'",
                        tr.id, tr.after
                    ))
                })?;
            let start = match &tr.start {
                Some(v) => Rule::Explicit {
                    time: Time::compile(v)?,
                    relative_to: None,
                },
                None => Rule::Follow {
                    base: Base::End(after),
                    offset: 0.0,
                },
            };
            nodes.push(Node {
                kind: EntryKind::Transition,
                id: tr.id.clone(),
                parent: None,
                prev: Some(after),
                next: nodes[after].next,
                start,
                end: Rule::Span(Time::compile(&tr.duration)?),
            });
        }

        let by_id = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        Ok(Self {
            fps: comp.fps,
            nodes,
            by_id,
        })
    }

    fn fixed_point(&self, max_passes: usize) -> TimecueResult<Values> {
        let total = self.nodes.len() * 2;
        let mut values: Values = vec![[None; 2]; self.nodes.len()];
        let mut resolved = 0usize;
        let mut pass = 0usize;

        while resolved < total {
            if pass >= max_passes {
                return Err(TimecueError::evaluation(format!(
                    "timeline did not converge after {max_passes} passes ({} of {total} fields unresolved)",
                    total - resolved
                )));
            }
            pass += 1;

            let mut blocked: BTreeMap<FieldId, Blocker> = BTreeMap::new();
            let before = resolved;
            for node in 0..self.nodes.len() {
                for edge in [Edge::Start, Edge::End] {
                    let field = FieldId { node, edge };
                    if get(&values, field).is_some() {
                        continue;
                    }
                    match self.try_field(field, &values)? {
                        Step::Done(v) if !v.is_finite() => {
                            return Err(TimecueError::evaluation(format!(
                                "{} resolved to a non-finite time ({v})",
                                self.label(field)
                            )));
                        }
                        Step::Done(v) => {
                            // `+ 0.0` folds -0.0 into 0.0 for the total_cmp sort.
                            values[node][edge as usize] = Some(v + 0.0);
                            resolved += 1;
                        }
                        Step::Blocked(b) => {
                            blocked.insert(field, b);
                        }
                    }
                }
            }
            tracing::debug!(
                pass,
                resolved,
                pending = total - resolved,
                "resolver pass"
            );
            if resolved == before {
                return Err(self.diagnose(&blocked));
            }
        }
        Ok(values)
    }

    fn try_field(&self, field: FieldId, values: &Values) -> TimecueResult<Step> {
        let node = &self.nodes[field.node];
        let own_start = FieldId {
            node: field.node,
            edge: Edge::Start,
        };
        let rule = match field.edge {
            Edge::Start => &node.start,
            Edge::End => &node.end,
        };

        match rule {
            Rule::Explicit { time, relative_to } => {
                let shift = match relative_to {
                    None => 0.0,
                    Some((base, offset)) => match self.base_value(*base, values) {
                        Step::Done(v) => v + offset,
                        blocked => return Ok(blocked),
                    },
                };
                Ok(match self.eval_time(field.node, time, values)? {
                    Step::Done(v) => Step::Done(shift + v),
                    blocked => blocked,
                })
            }
            Rule::Follow { base, offset } => {
                Ok(match self.base_value(*base, values) {
                    Step::Done(v) => Step::Done(v + offset),
                    blocked => blocked,
                })
            }
            Rule::Span(duration) => {
                let Some(start) = get(values, own_start) else {
                    return Ok(self.blocked_on(own_start));
                };
                Ok(match self.eval_time(field.node, duration, values)? {
                    Step::Done(d) => Step::Done(start + d),
                    blocked => blocked,
                })
            }
            Rule::Instant => Ok(match get(values, own_start) {
                Some(v) => Step::Done(v),
                None => self.blocked_on(own_start),
            }),
            Rule::Children { cues, trailing } => {
                let Some(mut latest) = get(values, own_start) else {
                    return Ok(self.blocked_on(own_start));
                };
                for &cue in cues {
                    let end = FieldId {
                        node: cue,
                        edge: Edge::End,
                    };
                    match get(values, end) {
                        Some(v) => latest = latest.max(v),
                        None => return Ok(self.blocked_on(end)),
                    }
                }
                Ok(Step::Done(latest + trailing))
            }
        }
    }

    fn base_value(&self, base: Base, values: &Values) -> Step {
        let field = match base {
            Base::Zero => return Step::Done(0.0),
            Base::Start(n) => FieldId {
                node: n,
                edge: Edge::Start,
            },
            Base::End(n) => FieldId {
                node: n,
                edge: Edge::End,
            },
        };
        match get(values, field) {
            Some(v) => Step::Done(v),
            None => self.blocked_on(field),
        }
    }

    fn blocked_on(&self, field: FieldId) -> Step {
        Step::Blocked(Blocker {
            anchor: self.label(field),
            target: Some(field),
        })
    }

    fn eval_time(&self, node: usize, time: &Time, values: &Values) -> TimecueResult<Step> {
        let expr = match time {
            Time::Secs(v) => return Ok(Step::Done(*v)),
            Time::Expr(expr) => expr,
        };
        for anchor in expr.anchors() {
            match self.lookup(node, anchor) {
                Lookup::Fixed(_) => {}
                Lookup::Field(f) if get(values, f).is_some() => {}
                Lookup::Field(f) => {
                    return Ok(Step::Blocked(Blocker {
                        anchor: anchor.to_string(),
                        target: Some(f),
                    }));
                }
                Lookup::Missing => {
                    return Ok(Step::Blocked(Blocker {
                        anchor: anchor.to_string(),
                        target: None,
                    }));
                }
            }
        }

        let view = PassView {
            graph: self,
            node,
            values,
        };
        let ctx = TimeEvalContext::new(self.fps, &view);
        let v = expr
            .eval(&ctx)
            .map_err(|e| e.with_entity(&self.nodes[node].id))?;
        Ok(Step::Done(v))
    }

    fn lookup(&self, node: usize, anchor: &TimeAnchor) -> Lookup {
        let by_kind = |id: &str, kind: EntryKind, edge: Edge| match self.by_id.get(id) {
            Some(&n) if self.nodes[n].kind == kind => Lookup::Field(FieldId { node: n, edge }),
            _ => Lookup::Missing,
        };
        let sibling = |n: Option<usize>, edge: Edge| match n {
            Some(node) => Lookup::Field(FieldId { node, edge }),
            None => Lookup::Missing,
        };
        let here = &self.nodes[node];
        match anchor {
            TimeAnchor::SceneStart(id) => by_kind(id, EntryKind::Scene, Edge::Start),
            TimeAnchor::SceneEnd(id) => by_kind(id, EntryKind::Scene, Edge::End),
            TimeAnchor::CueStart(id) => by_kind(id, EntryKind::Cue, Edge::Start),
            TimeAnchor::CueEnd(id) => by_kind(id, EntryKind::Cue, Edge::End),
            TimeAnchor::MarkStart(id) => by_kind(id, EntryKind::Mark, Edge::Start),
            TimeAnchor::PrevStart => sibling(here.prev, Edge::Start),
            TimeAnchor::PrevEnd => sibling(here.prev, Edge::End),
            TimeAnchor::NextStart => sibling(here.next, Edge::Start),
            TimeAnchor::TimelineStart => Lookup::Fixed(0.0),
        }
    }

    fn label(&self, field: FieldId) -> String {
        let node = &self.nodes[field.node];
        let edge = match field.edge {
            Edge::Start => "start",
            Edge::End => "end",
        };
        match node.kind {
            EntryKind::Scene => format!("scene({}).{edge}", node.id),
            EntryKind::Cue => format!("cue({}).{edge}", node.id),
            EntryKind::Mark => format!("mark({})", node.id),
            EntryKind::Transition => format!("transition({}).{edge}", node.id),
        }
    }

    /// Explain a stalled pass: a dependency on something that does not exist, or a loop.
    fn diagnose(&self, blocked: &BTreeMap<FieldId, Blocker>) -> TimecueError {
        if let Some((field, b)) = blocked.iter().find(|(_, b)| b.target.is_none()) {
            return TimecueError::missing(b.anchor.clone()).with_entity(&self.nodes[field.node].id);
        }

        // Every blocked field waits on exactly one other blocked field, so following the
        // chain from any of them must revisit a field already on the path.
        let Some((&first, _)) = blocked.iter().next() else {
            return TimecueError::evaluation("resolver stalled without blocked fields");
        };
        let mut path: Vec<FieldId> = Vec::new();
        let mut in_progress: BTreeSet<FieldId> = BTreeSet::new();
        let mut cur = first;
        loop {
            if in_progress.contains(&cur) {
                let from = path.iter().position(|f| *f == cur).unwrap_or(0);
                let mut labels: Vec<String> =
                    path[from..].iter().map(|f| self.label(*f)).collect();
                labels.push(self.label(cur));
                return TimecueError::CircularReference { path: labels };
            }
            in_progress.insert(cur);
            path.push(cur);
            match blocked.get(&cur).and_then(|b| b.target) {
                Some(next) => cur = next,
                None => {
                    return TimecueError::evaluation(format!(
                        "resolver stalled on {}",
                        self.label(cur)
                    ));
                }
            }
        }
    }

    fn entries(&self, values: &Values) -> TimecueResult<Vec<TimelineEntry>> {
        let mut entries = Vec::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            let (Some(start_sec), Some(end_sec)) = (values[i][0], values[i][1]) else {
                return Err(TimecueError::evaluation(format!(
                    "'{}' left unresolved",
                    node.id
                )));
            };
            if end_sec < start_sec {
                return Err(TimecueError::validation(format!(
                    "'{}' ends before it starts (start {start_sec}s, end {end_sec}s)",
                    node.id
                )));
            }
            entries.push(TimelineEntry {
                kind: node.kind,
                id: node.id.clone(),
                start_sec,
                end_sec,
                parent: node.parent.map(|p| self.nodes[p].id.clone()),
            });
        }

        entries.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));

        // Scenes must not overlap; transitions may span a scene boundary.
        let mut last_scene: Option<&TimelineEntry> = None;
        for e in entries.iter().filter(|e| e.kind == EntryKind::Scene) {
            if let Some(prev) = last_scene
                && e.start_sec < prev.end_sec
            {
                return Err(TimecueError::validation(format!(
                    "scene '{}' starts {}s before scene '{}' ends",
                    e.id,
                    prev.end_sec - e.start_sec,
                    prev.id
                )));
            }
            last_scene = Some(e);
        }

        Ok(entries)
    }
}

struct PassView<'a> {
    graph: &'a Graph,
    node: usize,
    values: &'a Values,
}

impl AnchorResolver for PassView<'_> {
    fn resolve_anchor(&self, anchor: &TimeAnchor) -> Option<f64> {
        match self.graph.lookup(self.node, anchor) {
            Lookup::Fixed(v) => Some(v),
            Lookup::Field(f) => get(self.values, f),
            Lookup::Missing => None,
        }
    }
}

fn range_start(range: Option<&TimeRange>) -> Option<(&TimeValue, bool)> {
    let r = range?;
    r.start.as_ref().map(|v| (v, r.start_is_relative))
}

fn range_end(range: Option<&TimeRange>) -> Option<(&TimeValue, bool)> {
    let r = range?;
    r.end.as_ref().map(|v| (v, r.end_is_relative))
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/resolver.rs"]
mod tests;
