use super::*;

#[test]
fn lifecycle_states_are_ordered() {
    assert!(LifecycleState::Destroyed < LifecycleState::Initialized);
    assert!(LifecycleState::Created < LifecycleState::Started);
    assert!(LifecycleState::Started < LifecycleState::Resumed);
    assert_eq!(LifecycleState::default(), LifecycleState::Initialized);
}

#[test]
fn tags_compare_by_text() {
    let a = MediaTag::new("clip-1");
    let b: MediaTag = "clip-1".into();
    let c: MediaTag = String::from("clip-2").into();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.as_str(), "clip-1");
    assert_eq!(format!("{a:?}"), "Tag(clip-1)");
}

#[test]
fn handles_debug_with_kind_label() {
    assert_eq!(format!("{:?}", BindingId(7)), "Binding#7");
    assert_eq!(format!("{:?}", TopScopeId(1)), "Top#1");
    assert_eq!(MediaId(3).as_u64(), 3);
}

#[test]
fn lifecycle_state_serializes_snake_case() {
    let json = serde_json::to_string(&LifecycleState::Resumed).unwrap();
    assert_eq!(json, "\"resumed\"");
    let back: Orientation = serde_json::from_str("\"both_axis\"").unwrap();
    assert_eq!(back, Orientation::BothAxis);
}
