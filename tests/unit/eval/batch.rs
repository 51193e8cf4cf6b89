use super::*;
use crate::animation::keyframes::{Keyframe, PropertyTimeline};
use crate::foundation::core::Point;

fn props() -> AnimatedProperties {
    AnimatedProperties::new()
        .with(
            "opacity",
            PropertyTimeline::new(vec![Keyframe::new(0.0, 0.0), Keyframe::new(20.0, 1.0)]).unwrap(),
        )
        .with(
            "position",
            PropertyTimeline::new(vec![
                Keyframe::new(5.0, Point::new(0.0, 0.0)),
                Keyframe::new(25.0, Point::new(100.0, 50.0)),
            ])
            .unwrap(),
        )
}

#[test]
fn parallel_matches_sequential() {
    let p = props();
    let seq = sample_frames(&p, -5..40, EvalThreading::Sequential).unwrap();
    let par = sample_frames(&p, -5..40, EvalThreading::Parallel { threads: Some(3) }).unwrap();
    assert_eq!(seq, par);
    assert_eq!(seq.len(), 45);
    assert_eq!(seq[0].frame, -5);
    assert_eq!(seq[15].values["opacity"], PropertyValue::Number(0.5));
}

#[test]
fn zero_threads_is_rejected() {
    let err = sample_frames(&props(), 0..2, EvalThreading::Parallel { threads: Some(0) })
        .unwrap_err();
    assert!(matches!(err, TimecueError::Validation(_)));
}

#[test]
fn empty_range_yields_nothing() {
    assert!(
        sample_with(3..3, EvalThreading::default(), |f| f)
            .unwrap()
            .is_empty()
    );
}
