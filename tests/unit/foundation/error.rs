use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TimecueError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TimecueError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        TimecueError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        TimecueError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn parse_error_quotes_expression_and_offset() {
    let err = TimecueError::parse("1 + $", ExprError::new(4, "unexpected character '$'"));
    let s = err.to_string();
    assert!(s.contains("`1 + $`"));
    assert!(s.contains("byte 4"));
}

#[test]
fn missing_reference_names_anchor_and_entity() {
    let err = TimecueError::missing("scene(outro).end");
    assert!(err.is_missing_reference());
    assert_eq!(err.to_string(), "missing time reference `scene(outro).end`");

    let err = err.with_entity("credits");
    assert!(err.to_string().contains("required by 'credits'"));
}

#[test]
fn circular_reference_prints_path() {
    let err = TimecueError::CircularReference {
        path: vec![
            "scene(a).start".to_owned(),
            "scene(b).start".to_owned(),
            "scene(a).start".to_owned(),
        ],
    };
    assert_eq!(
        err.to_string(),
        "circular time reference: scene(a).start -> scene(b).start -> scene(a).start"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TimecueError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
