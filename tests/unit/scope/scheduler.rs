use super::*;
use crate::foundation::arena::Handle;
use crate::foundation::core::{MediaId, Rect};
use crate::scope::selection::SelectionScopeOpts;
use crate::visibility::token::Token;

fn sel(raw: u64) -> SelectionScopeId {
    SelectionScopeId::from_raw(raw)
}

fn bid(raw: u64) -> BindingId {
    BindingId::from_raw(raw)
}

fn selection_scope(raw: u64) -> SelectionScope {
    SelectionScope::new(
        sel(raw),
        SchedulerScopeId::from_raw(1),
        SelectionScopeOpts::default(),
        false,
    )
}

fn scoped(scope: u64, raw: u64, y: f64, offset: f64) -> ScopedCandidate {
    let rect = Rect::new(0.0, y, 100.0, y + 100.0);
    ScopedCandidate {
        scope: sel(scope),
        candidate: Candidate {
            binding: bid(raw),
            media: MediaId::from_raw(raw),
            slot: SlotId(raw),
            token: Token::new(offset, rect, 100.0, 100.0, 0.65),
            attached: true,
            manual: false,
            user_started: false,
        },
        pinned: false,
    }
}

fn scheduler() -> SchedulerScope {
    SchedulerScope::new(
        SchedulerScopeId::from_raw(1),
        TopScopeId::from_raw(1),
        SchedulerScopeOpts::default(),
        LifecycleState::Resumed,
        false,
    )
}

#[test]
fn first_non_empty_scope_wins() {
    let (a, b) = (selection_scope(1), selection_scope(2));
    let cands = [scoped(1, 1, 0.0, 0.2), scoped(2, 2, 0.0, 1.0), scoped(2, 3, 200.0, 1.0)];
    let split = split_bindings(&[&a, &b], &cands, true);
    assert_eq!(split.to_play, vec![bid(2)]);
    assert_eq!(split.to_pause, vec![bid(1), bid(3)]);
}

#[test]
fn closed_gate_pauses_everything() {
    let a = selection_scope(1);
    let cands = [scoped(1, 1, 0.0, 1.0), scoped(1, 2, 100.0, 1.0)];
    let split = split_bindings(&[&a], &cands, false);
    assert!(split.to_play.is_empty());
    assert_eq!(split.to_pause.len(), 2);
    assert!(split.to_pause.contains(&bid(1)));
}

#[test]
fn detached_bindings_are_not_paused_again() {
    let a = selection_scope(1);
    let mut detached = scoped(1, 2, 100.0, -1.0);
    detached.candidate.attached = false;
    let split = split_bindings(&[&a], &[scoped(1, 1, 0.0, 1.0), detached], true);
    assert_eq!(split.to_play, vec![bid(1)]);
    assert!(split.to_pause.is_empty());
}

#[test]
fn pinned_binding_is_admitted_off_screen() {
    let a = selection_scope(1);
    let mut pinned = scoped(1, 2, 900.0, -1.0);
    pinned.candidate.manual = true;
    pinned.candidate.user_started = true;
    pinned.pinned = true;
    let split = split_bindings(&[&a], &[scoped(1, 1, 0.0, 1.0), pinned], true);
    assert_eq!(split.to_play, vec![bid(2)]);
    assert_eq!(split.to_pause, vec![bid(1)]);
}

#[test]
fn sticky_scope_is_evaluated_first_and_restored_on_unstick() {
    let mut s = scheduler();
    s.add_selection(sel(1));
    s.add_selection(sel(2));
    s.stick(sel(2));
    assert_eq!(s.selection_order(), vec![sel(2), sel(1)]);
    assert_eq!(s.sticky(), Some(sel(2)));
    s.unstick(Some(sel(1)));
    assert_eq!(s.sticky(), Some(sel(2)));
    s.unstick(None);
    assert_eq!(s.selection_order(), vec![sel(1), sel(2)]);
}

#[test]
fn restick_replaces_previous_sticky() {
    let mut s = scheduler();
    s.add_selection(sel(1));
    s.add_selection(sel(2));
    s.add_selection(sel(3));
    s.stick(sel(3));
    s.stick(sel(2));
    assert_eq!(s.selection_order(), vec![sel(2), sel(1), sel(3)]);
}

#[test]
fn removing_sticky_scope_clears_it() {
    let mut s = scheduler();
    s.add_selection(sel(1));
    s.stick(sel(1));
    s.remove_selection(sel(1));
    assert_eq!(s.sticky(), None);
    assert!(s.selection_order().is_empty());
}

#[test]
fn lifecycle_gates() {
    let mut s = scheduler();
    assert!(s.can_play() && s.is_started());
    s.lifecycle = LifecycleState::Created;
    assert!(!s.can_play() && !s.is_started());
    s.lifecycle = LifecycleState::Started;
    s.opts.active_lifecycle = LifecycleState::Resumed;
    assert!(s.is_started());
    assert!(!s.can_play());
    s.lifecycle = LifecycleState::Resumed;
    s.lock = true;
    assert!(!s.can_play());
}
