use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frames_secs_roundtrip_round() {
    let fps = Fps::new(30000, 1001).unwrap();
    let secs = fps.frames_to_secs(123.0);
    assert_eq!(fps.secs_to_frames_round(secs), 123);
}

#[test]
fn fps_whole_rate_is_exact() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frames_to_secs(30.0), 1.0);
    assert_eq!(fps.secs_to_frames(2.5), 75.0);
    assert_eq!(fps.secs_to_frames_floor(0.99), 29);
}

#[test]
fn fps_deserializes_number_and_ratio() {
    let a: Fps = serde_json::from_str("24").unwrap();
    assert_eq!(a, Fps::new(24, 1).unwrap());

    let b: Fps = serde_json::from_str(r#"{"num": 30000, "den": 1001}"#).unwrap();
    assert_eq!(b.num, 30000);
    assert_eq!(b.den, 1001);

    assert!(serde_json::from_str::<Fps>(r#"{"num": 30, "den": 0}"#).is_err());
}
