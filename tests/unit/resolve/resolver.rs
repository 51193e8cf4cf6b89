use super::*;
use crate::composition::dsl::{CompositionBuilder, CueBuilder, SceneBuilder};
use crate::composition::model::Scene;

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

fn scene(id: &str, duration: impl Into<TimeValue>) -> Scene {
    SceneBuilder::new(id).duration(duration).build().unwrap()
}

fn span(tl: &ResolvedTimeline, id: &str) -> (f64, f64) {
    let e = tl.get(id).unwrap();
    (e.start_sec, e.end_sec)
}

#[test]
fn sequential_scenes() {
    let comp = CompositionBuilder::new(fps30())
        .scene(scene("a", 5.0))
        .scene(scene("b", 3.0))
        .build()
        .unwrap();
    let tl = resolve(&comp, ResolveOpts::default()).unwrap();
    assert_eq!(span(&tl, "a"), (0.0, 5.0));
    assert_eq!(span(&tl, "b"), (5.0, 8.0));
    assert_eq!(tl.seed(), 0);
}

#[test]
fn cues_follow_each_other_with_pauses() {
    let comp = CompositionBuilder::new(fps30())
        .pause_between_items(PauseSpec::fixed(0.5))
        .scene(scene("intro", 2.0))
        .scene(
            SceneBuilder::new("body")
                .cue(CueBuilder::new("a").duration(1.0))
                .cue(CueBuilder::new("b").duration(2.0))
                .pause(PauseSpec::fixed(0.25))
                .cue(CueBuilder::new("c").duration("15f"))
                .pause(PauseSpec::fixed(1.0))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let tl = resolve(&comp, ResolveOpts::default()).unwrap();
    assert_eq!(span(&tl, "a"), (2.0, 3.0));
    assert_eq!(span(&tl, "b"), (3.5, 5.5));
    // Explicit pause replaces the automatic one.
    assert_eq!(span(&tl, "c"), (5.75, 6.25));
    // Trailing pause extends a scene sized by its cues.
    assert_eq!(span(&tl, "body"), (2.0, 7.25));
    assert_eq!(tl.get("b").unwrap().parent.as_deref(), Some("body"));
}

#[test]
fn explicitly_timed_cue_skips_automatic_pause() {
    let comp = CompositionBuilder::new(fps30())
        .pause_between_items(PauseSpec::fixed(0.5))
        .scene(
            SceneBuilder::new("s")
                .cue(CueBuilder::new("a").duration(1.0))
                .cue(CueBuilder::new("b").start("prev.end").duration(1.0))
                .cue("c")
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let tl = resolve(&comp, ResolveOpts::default()).unwrap();
    assert_eq!(span(&tl, "b"), (1.0, 2.0));
    assert_eq!(span(&tl, "c"), (2.5, 2.5));
}

#[test]
fn forward_references_converge() {
    let comp = CompositionBuilder::new(fps30())
        .scene(scene("intro", "scene(outro).end - scene(outro).start"))
        .scene(SceneBuilder::new("outro").start(10.0).duration(3.0).build().unwrap())
        .mark("beat", "scene(outro).start + 250ms")
        .build()
        .unwrap();
    let tl = resolve(&comp, ResolveOpts::default()).unwrap();
    assert_eq!(span(&tl, "intro"), (0.0, 3.0));
    assert_eq!(span(&tl, "outro"), (10.0, 13.0));
    assert_eq!(span(&tl, "beat"), (10.25, 10.25));
}

#[test]
fn pass_cap_reports_non_convergence() {
    let comp = CompositionBuilder::new(fps30())
        .scene(scene("intro", "scene(outro).end - scene(outro).start"))
        .scene(SceneBuilder::new("outro").start(10.0).duration(3.0).build().unwrap())
        .build()
        .unwrap();
    let opts = ResolveOpts {
        max_passes: Some(1),
        ..ResolveOpts::default()
    };
    let err = resolve(&comp, opts).unwrap_err();
    assert!(matches!(err, TimecueError::Evaluation(_)));
    assert!(err.to_string().contains("did not converge"));
}

#[test]
fn cycles_report_their_path() {
    let comp = CompositionBuilder::new(fps30())
        .scene(SceneBuilder::new("a").start("scene(b).start").duration(1.0).build().unwrap())
        .scene(SceneBuilder::new("b").start("scene(a).start").duration(1.0).build().unwrap())
        .build()
        .unwrap();
    match resolve(&comp, ResolveOpts::default()).unwrap_err() {
        TimecueError::CircularReference { path } => {
            assert_eq!(path, vec!["scene(a).start", "scene(b).start", "scene(a).start"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn self_reference_is_a_cycle() {
    let comp = CompositionBuilder::new(fps30())
        .scene(SceneBuilder::new("a").duration("scene(a).end").build().unwrap())
        .build()
        .unwrap();
    let err = resolve(&comp, ResolveOpts::default()).unwrap_err();
    assert!(matches!(err, TimecueError::CircularReference { .. }));
}

#[test]
fn missing_reference_names_the_dependent_entity() {
    let comp = CompositionBuilder::new(fps30())
        .scene(
            SceneBuilder::new("s")
                .cue(CueBuilder::new("vo").start("cue(ghost).end").duration(1.0))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    match resolve(&comp, ResolveOpts::default()).unwrap_err() {
        TimecueError::MissingReference { anchor, entity } => {
            assert_eq!(anchor, "cue(ghost).end");
            assert_eq!(entity.as_deref(), Some("vo"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn prev_of_first_cue_is_missing() {
    let comp = CompositionBuilder::new(fps30())
        .scene(
            SceneBuilder::new("s")
                .cue(CueBuilder::new("first").start("prev.end"))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let err = resolve(&comp, ResolveOpts::default()).unwrap_err();
    assert!(err.is_missing_reference());
}

#[test]
fn relative_ranges_offset_from_previous_end() {
    let mut b = scene("b", 2.0);
    b.range = Some(TimeRange::new().start_after(1.5));
    let comp = CompositionBuilder::new(fps30())
        .scene(scene("a", 4.0))
        .scene(b)
        .build()
        .unwrap();
    let tl = resolve(&comp, ResolveOpts::default()).unwrap();
    assert_eq!(span(&tl, "b"), (5.5, 7.5));
}

#[test]
fn transitions_overlap_the_next_scene() {
    let comp = CompositionBuilder::new(fps30())
        .scene(scene("a", 4.0))
        .scene(scene("b", 4.0))
        .transition("ab", "a", "15f", None)
        .build()
        .unwrap();
    let tl = resolve(&comp, ResolveOpts::default()).unwrap();
    assert_eq!(span(&tl, "ab"), (4.0, 4.5));

    let mut comp = comp;
    comp.transitions[0].start = Some(TimeValue::from("next.start - 0.25s"));
    let tl = resolve(&comp, ResolveOpts::default()).unwrap();
    assert_eq!(span(&tl, "ab"), (3.75, 4.25));
}

#[test]
fn end_before_start_is_rejected() {
    let comp = CompositionBuilder::new(fps30())
        .scene(scene("a", -1.0))
        .build()
        .unwrap();
    let err = resolve(&comp, ResolveOpts::default()).unwrap_err();
    assert!(matches!(err, TimecueError::Validation(_)));
}

#[test]
fn ties_keep_declaration_order() {
    let comp = CompositionBuilder::new(fps30())
        .scene(
            SceneBuilder::new("s")
                .cue(CueBuilder::new("c").duration(1.0))
                .build()
                .unwrap(),
        )
        .mark("m", 0.0)
        .build()
        .unwrap();
    let tl = resolve(&comp, ResolveOpts::default()).unwrap();
    let ids: Vec<&str> = tl.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["s", "c", "m"]);
}

#[test]
fn seed_precedence_and_recording() {
    let comp = CompositionBuilder::new(fps30())
        .seed(11)
        .pause_between_items(PauseSpec::gaussian(0.5, 0.2))
        .scene(
            SceneBuilder::new("s")
                .cue(CueBuilder::new("a").duration(1.0))
                .cue(CueBuilder::new("b").duration(1.0))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let from_comp = resolve(&comp, ResolveOpts::default()).unwrap();
    assert_eq!(from_comp.seed(), 11);
    assert_eq!(from_comp, resolve(&comp, ResolveOpts::seeded(11)).unwrap());

    let overridden = resolve(&comp, ResolveOpts::seeded(12)).unwrap();
    assert_eq!(overridden.seed(), 12);
    assert_ne!(
        from_comp.get("b").unwrap().start_sec,
        overridden.get("b").unwrap().start_sec
    );
}

#[test]
fn unseeded_gaussian_build_is_reproducible_from_recorded_seed() {
    let mut comp = CompositionBuilder::new(fps30())
        .pause_between_items(PauseSpec::gaussian(0.5, 0.2))
        .scene(
            SceneBuilder::new("s")
                .cue(CueBuilder::new("a").duration(1.0))
                .cue(CueBuilder::new("b").duration(1.0))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let first = resolve(&comp, ResolveOpts::default()).unwrap();
    comp.seed = Some(first.seed());
    assert_eq!(resolve(&comp, ResolveOpts::default()).unwrap(), first);
}
