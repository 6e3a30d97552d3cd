use super::*;
use crate::foundation::arena::Handle;

fn binding() -> Binding {
    Binding::new(
        BindingId::from_raw(1),
        MediaId::from_raw(1),
        SlotId(1),
        SelectionScopeId::from_raw(1),
        SchedulerScopeId::from_raw(1),
        BindingConfig {
            threshold: 0.65,
            delay_ms: 0,
            preload: false,
            repeat_mode: RepeatMode::Off,
            controller: None,
        },
    )
}

#[test]
fn state_order_drives_attached_and_active() {
    use BindingState::*;
    assert!(Created < Removed && Removed < Added && Added < Detached);
    assert!(Detached < Attached && Attached < Inactive && Inactive < Active);
    assert!(!Detached.is_attached());
    assert!(Attached.is_attached() && Inactive.is_attached() && Active.is_attached());
    assert!(!Inactive.is_active());
    assert!(Active.is_active());
    assert!(!Removed.is_attached());
}

#[test]
fn full_lifecycle_is_accepted() {
    let mut b = binding();
    for to in [
        BindingState::Added,
        BindingState::Attached,
        BindingState::Active,
        BindingState::Inactive,
        BindingState::Active,
        BindingState::Inactive,
        BindingState::Detached,
        BindingState::Attached,
        BindingState::Detached,
        BindingState::Removed,
    ] {
        assert!(b.transition(to), "rejected {to:?}");
    }
    assert_eq!(b.state, BindingState::Removed);
}

#[test]
fn repeated_transition_is_a_no_op() {
    let mut b = binding();
    assert!(b.transition(BindingState::Added));
    assert!(!b.transition(BindingState::Added));
}

#[test]
fn removed_is_terminal() {
    assert!(!BindingState::Removed.can_become(BindingState::Added));
    assert!(!BindingState::Removed.can_become(BindingState::Attached));
    assert!(!BindingState::Active.can_become(BindingState::Removed));
}

#[test]
fn fresh_binding_is_unranked_and_hidden() {
    let b = binding();
    assert_eq!(b.priority, PRIORITY_UNRANKED);
    assert!(!b.token.should_prepare());
    assert!(!b.is_manual());
}

#[test]
fn clearing_registrations_drops_controller() {
    struct Manual;
    impl ManualController for Manual {}
    let mut b = binding();
    b.config.controller = Some(Rc::new(Manual));
    assert!(b.is_manual());
    b.clear_registrations();
    assert!(!b.is_manual());
    assert!(b.callbacks().is_empty());
}
