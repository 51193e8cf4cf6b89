use super::*;

fn ramp() -> PropertyTimeline<f64> {
    PropertyTimeline::new(vec![Keyframe::new(0.0, 0.0), Keyframe::new(30.0, 100.0)]).unwrap()
}

#[test]
fn linear_ramp_interpolates_and_clamps() {
    let tl = ramp();
    assert_eq!(evaluate_property(&tl, 15.0), 50.0);
    assert_eq!(evaluate_property(&tl, -10.0), 0.0);
    assert_eq!(evaluate_property(&tl, 1000.0), 100.0);
    assert_eq!(evaluate_property(&tl, 30.0), 100.0);
}

#[test]
fn easing_comes_from_the_next_keyframe() {
    let keys = vec![
        Keyframe::new(0.0, 0.0).eased(Ease::OutCubic),
        Keyframe::new(10.0, 10.0).eased(Ease::InQuad),
    ];
    // InQuad at t = 0.5 is 0.25.
    assert_eq!(evaluate_keyframes(&keys, 5.0), Some(2.5));
}

#[test]
fn empty_keyframes_yield_none() {
    let keys: Vec<Keyframe<f64>> = Vec::new();
    assert_eq!(evaluate_keyframes(&keys, 3.0), None);
    assert!(PropertyTimeline::new(keys).is_err());
}

#[test]
fn duplicate_frames_jump_to_later_value() {
    let keys = vec![
        Keyframe::new(0.0, 0.0),
        Keyframe::new(10.0, 1.0),
        Keyframe::new(10.0, 5.0),
        Keyframe::new(20.0, 7.0),
    ];
    assert_eq!(evaluate_keyframes(&keys, 10.0), Some(5.0));
    assert_eq!(evaluate_keyframes(&keys, 5.0), Some(0.5));
    assert_eq!(evaluate_keyframes(&keys, 15.0), Some(6.0));
}

#[test]
fn strings_snap_at_half_progress() {
    let keys = vec![
        Keyframe::new(0.0, "hello".to_owned()),
        Keyframe::new(10.0, "world".to_owned()),
    ];
    assert_eq!(evaluate_keyframes(&keys, 4.9).as_deref(), Some("hello"));
    assert_eq!(evaluate_keyframes(&keys, 5.0).as_deref(), Some("world"));
}

#[test]
fn points_interpolate_componentwise() {
    let keys = vec![
        Keyframe::new(0.0, Point::new(0.0, 100.0)),
        Keyframe::new(4.0, Point::new(40.0, 0.0)),
    ];
    assert_eq!(evaluate_keyframes(&keys, 1.0), Some(Point::new(10.0, 75.0)));
}

#[test]
fn unsorted_timeline_is_rejected() {
    let err = PropertyTimeline::new(vec![Keyframe::new(5.0, 1.0), Keyframe::new(0.0, 0.0)])
        .unwrap_err();
    assert!(matches!(err, TimecueError::Animation(_)));
}

#[test]
fn evaluate_timeline_reports_every_property() {
    let props = AnimatedProperties::new()
        .with("opacity", ramp())
        .with(
            "position",
            PropertyTimeline::new(vec![
                Keyframe::new(0.0, Point::new(0.0, 0.0)),
                Keyframe::new(30.0, Point::new(300.0, 60.0)),
            ])
            .unwrap(),
        )
        .with(
            "label",
            PropertyTimeline::new(vec![
                Keyframe::new(0.0, "a".to_owned()),
                Keyframe::new(30.0, "b".to_owned()),
            ])
            .unwrap(),
        );

    let out = evaluate_timeline(&props, 15.0);
    assert_eq!(out.len(), 3);
    assert_eq!(out["opacity"], PropertyValue::Number(50.0));
    assert_eq!(out["position"].as_point(), Some(Point::new(150.0, 30.0)));
    assert_eq!(out["label"].as_text(), Some("b"));
}

#[test]
fn properties_deserialize_and_validate() {
    let json = r#"{
        "opacity": {"type": "number", "keyframes": [
            {"frame": 0, "value": 0},
            {"frame": 30, "value": 1, "easing": "ease_out"}
        ]},
        "title": {"type": "text", "keyframes": [{"frame": 0, "value": "Hi"}]}
    }"#;
    let props: AnimatedProperties = serde_json::from_str(json).unwrap();
    assert_eq!(props.len(), 2);
    assert_eq!(
        evaluate_timeline(&props, 0.0)["title"],
        PropertyValue::Text("Hi".to_owned())
    );

    let bad = r#"{"opacity": {"type": "number", "keyframes": []}}"#;
    assert!(serde_json::from_str::<AnimatedProperties>(bad).is_err());
}
