use super::*;

fn action(to: u32, mode: MemoryMode) -> ResourceAction {
    action_for_priority(to, mode, &EvictionThresholds::default())
}

#[test]
fn auto_follows_memory_pressure() {
    assert_eq!(MemoryMode::Auto.resolve(true), MemoryMode::Low);
    assert_eq!(MemoryMode::Auto.resolve(false), MemoryMode::Balanced);
    assert_eq!(MemoryMode::High.resolve(true), MemoryMode::High);
}

#[test]
fn selected_binding_is_prepared_in_every_mode() {
    for mode in [
        MemoryMode::Low,
        MemoryMode::Normal,
        MemoryMode::Balanced,
        MemoryMode::High,
        MemoryMode::Infinite,
    ] {
        assert_eq!(action(0, mode), ResourceAction::Prepare);
    }
}

#[test]
fn low_releases_direct_neighbours() {
    assert_eq!(action(1, MemoryMode::Low), ResourceAction::Release);
}

#[test]
fn normal_resets_neighbours_and_releases_the_rest() {
    assert_eq!(action(1, MemoryMode::Normal), ResourceAction::Reset);
    assert_eq!(action(2, MemoryMode::Normal), ResourceAction::Release);
}

#[test]
fn balanced_keeps_neighbours_untouched() {
    assert_eq!(action(1, MemoryMode::Balanced), ResourceAction::Keep);
    assert_eq!(action(2, MemoryMode::Balanced), ResourceAction::Release);
}

#[test]
fn high_releases_only_far_bindings() {
    assert_eq!(action(7, MemoryMode::High), ResourceAction::Reset);
    assert_eq!(action(8, MemoryMode::High), ResourceAction::Release);
}

#[test]
fn infinite_never_releases_on_distance() {
    assert_eq!(action(u32::MAX, MemoryMode::Infinite), ResourceAction::Reset);
}

#[test]
fn thresholds_are_configurable() {
    let t = EvictionThresholds {
        low: 3,
        ..EvictionThresholds::default()
    };
    assert_eq!(action_for_priority(2, MemoryMode::Low, &t), ResourceAction::Reset);
    assert_eq!(action_for_priority(3, MemoryMode::Low, &t), ResourceAction::Release);
}

#[test]
fn thresholds_deserialize_with_defaults() {
    let t: EvictionThresholds = serde_json::from_str(r#"{"high": 16}"#).unwrap();
    assert_eq!(t.high, 16);
    assert_eq!(t.low, 1);
}
