//! timecue resolves symbolic timing into a frame-accurate timeline and evaluates
//! animations deterministically per frame.
//!
//! # Pipeline overview
//!
//! 1. **Author**: a [`Composition`] of scenes, cues, pauses, marks and transitions, built with
//!    [`CompositionBuilder`] or loaded with [`Composition::from_json_str`]. Times may be plain
//!    seconds or expressions such as `scene(intro).end + 0.5s`.
//! 2. **Resolve**: [`resolve()`] turns the composition into a [`ResolvedTimeline`] of absolute
//!    `{ start_sec, end_sec }` entries, handling forward references by fixed-point iteration
//!    and rejecting cycles.
//! 3. **Evaluate**: keyframes, springs, transitions and staggers are pure functions of a frame
//!    number, using resolved start frames as zero points. [`sample_frames`] batches this on
//!    rayon.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: randomness (Gaussian pauses, random staggers) comes from a seeded
//!   mulberry32 generator created per call; the same input and seed produce a byte-identical
//!   timeline (see [`ResolvedTimeline::fingerprint`]).
//! - **Stateless evaluators**: every per-frame function can be called from any thread in any
//!   frame order.
//!
//! # Example
//!
//! ```
//! use timecue::{CompositionBuilder, CueBuilder, Fps, PauseSpec, ResolveOpts, SceneBuilder, resolve};
//!
//! let comp = CompositionBuilder::new(Fps::new(30, 1)?)
//!     .pause_between_items(PauseSpec::fixed(0.25))
//!     .scene(SceneBuilder::new("intro").duration(2.0).build()?)
//!     .scene(
//!         SceneBuilder::new("body")
//!             .cue(CueBuilder::new("vo1").duration("45f"))
//!             .cue(CueBuilder::new("vo2").duration(1.0))
//!             .build()?,
//!     )
//!     .mark("drop", "cue(vo2).start")
//!     .build()?;
//!
//! let timeline = resolve(&comp, ResolveOpts::default())?;
//! assert_eq!(timeline.get("vo2").map(|e| e.start_sec), Some(3.75));
//! assert_eq!(timeline.start_frame("drop"), Some(113));
//! # Ok::<(), timecue::TimecueError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod composition;
mod effects;
mod eval;
mod expression;
mod foundation;
mod resolve;

pub use animation::ease::Ease;
pub use animation::keyframes::{
    AnimatedProperties, Keyframe, Lerp, PropertyTimeline, PropertyTrack, PropertyValue,
    evaluate_keyframes, evaluate_property, evaluate_timeline,
};
pub use animation::spring::{SpringConfig, spring};
pub use animation::stagger::{
    StaggerConfig, StaggerItemState, StaggerPattern, StaggerPhase, stagger, stagger_state,
    staggered_progress,
};
pub use composition::dsl::{CompositionBuilder, CueBuilder, SceneBuilder};
pub use composition::model::{
    Composition, Cue, Mark, PauseSpec, Scene, SceneItem, TimeRange, TimeValue, TransitionSpec,
};
pub use effects::transitions::{
    SlideDirection, StyleTransform, TransitionConfig, TransitionKind, TransitionMode,
    TransitionStyle, apply_transition,
};
pub use eval::batch::{EvalThreading, FrameSample, sample_frames, sample_with};
pub use expression::ast::TimeAnchor;
pub use expression::error::ExprError;
pub use expression::eval::{
    AnchorResolver, AnchorTable, TimeEvalContext, TimeExpr, parse_time_value, snap,
};
pub use foundation::core::{Affine, Canvas, Fps, Point, Vec2};
pub use foundation::error::{TimecueError, TimecueResult};
pub use foundation::math::{clamp01, inverse_lerp, lerp, remap_clamped};
pub use foundation::rng::Mulberry32;
pub use resolve::fingerprint::TimelineFingerprint;
pub use resolve::resolver::{ResolveOpts, resolve};
pub use resolve::timeline::{EntryKind, ResolvedTimeline, TimelineEntry};
