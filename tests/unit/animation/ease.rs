use super::*;

const NAMED: [Ease; 18] = [
    Ease::Linear,
    Ease::Hold,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::InSine,
    Ease::OutSine,
    Ease::InOutSine,
    Ease::InExpo,
    Ease::OutExpo,
    Ease::EaseIn,
    Ease::EaseOut,
    Ease::EaseInOut,
    Ease::ElasticOut,
    Ease::BounceOut,
];

#[test]
fn named_curves_hit_endpoints() {
    for ease in NAMED {
        assert!(ease.apply(0.0).abs() < 1e-9, "{ease:?} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{ease:?} at 1");
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::Linear.apply(-3.0), 0.0);
    assert_eq!(Ease::Linear.apply(7.0), 1.0);
    assert_eq!(Ease::InQuad.apply(f64::NAN), 0.0);
}

#[test]
fn hold_steps_at_the_end() {
    assert_eq!(Ease::Hold.apply(0.99), 0.0);
    assert_eq!(Ease::Hold.apply(1.0), 1.0);
}

#[test]
fn symmetric_curves_pass_through_midpoint() {
    for ease in [Ease::InOutQuad, Ease::InOutCubic, Ease::InOutSine, Ease::EaseInOut] {
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-4, "{ease:?}");
    }
}

#[test]
fn cubic_bezier_matches_named_css_curve() {
    let custom = Ease::CubicBezier {
        x1: 0.42,
        y1: 0.0,
        x2: 0.58,
        y2: 1.0,
    };
    for i in 0..=10 {
        let t = f64::from(i) / 10.0;
        assert_eq!(custom.apply(t), Ease::EaseInOut.apply(t));
    }
}

#[test]
fn deserializes_string_and_object_forms() {
    let e: Ease = serde_json::from_str("\"ease_in_out\"").unwrap();
    assert_eq!(e, Ease::EaseInOut);

    let e: Ease = serde_json::from_str(r#"{"cubic_bezier": [0.1, 0.2, 0.3, 0.4]}"#).unwrap();
    assert_eq!(
        e,
        Ease::CubicBezier {
            x1: 0.1,
            y1: 0.2,
            x2: 0.3,
            y2: 0.4
        }
    );

    let e: Ease =
        serde_json::from_str(r#"{"spring": {"stiffness": 100, "damping": 20}}"#).unwrap();
    assert_eq!(
        e,
        Ease::Spring {
            stiffness: 100.0,
            damping: 20.0,
            mass: 1.0
        }
    );

    assert!(serde_json::from_str::<Ease>("\"wobble\"").is_err());
}

#[test]
fn spring_ease_starts_at_zero() {
    let e = Ease::Spring {
        stiffness: 100.0,
        damping: 20.0,
        mass: 1.0,
    };
    assert_eq!(e.apply(0.0), 0.0);
    assert!(e.apply(1.0) > 0.99);
}

#[test]
fn spring_ease_reads_progress_as_seconds() {
    let soft = Ease::Spring {
        stiffness: 10.0,
        damping: 1.0,
        mass: 1.0,
    };
    // Still far from rest one second in.
    assert!((soft.apply(1.0) - 1.0).abs() > 0.1);

    let stiff = Ease::Spring {
        stiffness: 400.0,
        damping: 40.0,
        mass: 1.0,
    };
    assert!((stiff.apply(1.0) - 1.0).abs() < 1e-6);
}
