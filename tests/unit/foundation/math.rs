use super::*;

#[test]
fn clamp01_handles_nan_and_bounds() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(-3.0), 0.0);
    assert_eq!(clamp01(0.25), 0.25);
    assert_eq!(clamp01(7.0), 1.0);
}

#[test]
fn lerp_and_inverse_agree() {
    assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
    assert_eq!(inverse_lerp(10.0, 20.0, 15.0), 0.5);
    assert_eq!(lerp(0.0, 100.0, 1.5), 150.0);
}

#[test]
fn inverse_lerp_degenerate_span_steps() {
    assert_eq!(inverse_lerp(5.0, 5.0, 4.0), 0.0);
    assert_eq!(inverse_lerp(5.0, 5.0, 5.0), 1.0);
}

#[test]
fn remap_clamps_output() {
    assert_eq!(remap_clamped(15.0, 10.0, 20.0, 0.0, 1.0), 0.5);
    assert_eq!(remap_clamped(-5.0, 10.0, 20.0, 0.0, 1.0), 0.0);
    assert_eq!(remap_clamped(50.0, 10.0, 20.0, 0.0, 1.0), 1.0);
}

#[test]
fn round_half_up_matches_floor_plus_half() {
    assert_eq!(round_half_up(1.5), 2.0);
    assert_eq!(round_half_up(-1.5), -1.0);
    assert_eq!(round_half_up(1.49), 1.0);
}
