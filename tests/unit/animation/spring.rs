use super::*;

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn starts_at_from_and_settles_at_to() {
    let cfg = SpringConfig::default().with_range(10.0, 20.0);
    assert_eq!(spring(0.0, fps30(), &cfg), 10.0);
    assert_eq!(spring(-5.0, fps30(), &cfg), 10.0);
    assert!((spring(300.0, fps30(), &cfg) - 20.0).abs() < 1e-6);
}

#[test]
fn independent_calls_are_identical() {
    let cfg = SpringConfig::new(1.0, 170.0, 26.0);
    let forward: Vec<u64> = (0..60)
        .map(|f| spring(f64::from(f), fps30(), &cfg).to_bits())
        .collect();
    let backward: Vec<u64> = (0..60)
        .rev()
        .map(|f| spring(f64::from(f), fps30(), &cfg).to_bits())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    assert_eq!(forward, backward);
}

#[test]
fn underdamped_spring_overshoots_unless_clamped() {
    let cfg = SpringConfig::default();
    let peak = (0..60)
        .map(|f| spring(f64::from(f), fps30(), &cfg))
        .fold(f64::NEG_INFINITY, f64::max);
    assert!(peak > 1.1);

    let clamped = SpringConfig {
        overshoot_clamping: true,
        ..cfg
    };
    for f in 0..60 {
        let v = spring(f64::from(f), fps30(), &clamped);
        assert!((0.0..=1.0).contains(&v));
    }
}

#[test]
fn critically_and_over_damped_springs_are_monotonic() {
    // zeta = 1 and zeta = 2.
    for damping in [20.0, 40.0] {
        let cfg = SpringConfig::new(1.0, 100.0, damping);
        let mut last = 0.0;
        for f in 0..90 {
            let v = spring(f64::from(f), fps30(), &cfg);
            assert!(v >= last - 1e-12);
            assert!(v <= 1.0 + 1e-12);
            last = v;
        }
    }
}

#[test]
fn validate_rejects_bad_physics() {
    assert!(SpringConfig::default().validate().is_ok());
    assert!(SpringConfig::new(0.0, 100.0, 10.0).validate().is_err());
    assert!(SpringConfig::new(1.0, -1.0, 10.0).validate().is_err());
    assert!(SpringConfig::new(1.0, 100.0, f64::NAN).validate().is_err());
}
