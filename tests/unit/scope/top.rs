use super::*;
use crate::foundation::arena::Handle;

fn sid(raw: u64) -> SchedulerScopeId {
    SchedulerScopeId::from_raw(raw)
}

fn top() -> TopScope {
    TopScope::new(TopScopeId::from_raw(1), LifecycleState::Resumed, false)
}

#[test]
fn unprioritized_scopes_keep_insertion_order() {
    let mut t = top();
    for raw in [3, 1, 2] {
        t.add_scheduler(sid(raw), |_| None);
    }
    assert_eq!(t.scheduler_order(), vec![sid(3), sid(1), sid(2)]);
}

#[test]
fn prioritized_scopes_go_first_by_descending_priority() {
    let priority = |s: SchedulerScopeId| match s.as_u64() {
        2 => Some(1),
        3 => Some(5),
        _ => None,
    };
    let mut t = top();
    for raw in [1, 2, 4, 3] {
        t.add_scheduler(sid(raw), priority);
    }
    assert_eq!(t.scheduler_order(), vec![sid(3), sid(2), sid(1), sid(4)]);
}

#[test]
fn sticky_scope_stays_at_head_across_insertions() {
    let mut t = top();
    t.add_scheduler(sid(1), |_| None);
    t.add_scheduler(sid(2), |_| None);
    t.stick(sid(2));
    t.add_scheduler(sid(3), |s| (s == sid(3)).then_some(10));
    assert_eq!(t.scheduler_order(), vec![sid(2), sid(3), sid(1)]);
    t.unstick(None);
    assert_eq!(t.sticky(), None);
    assert_eq!(t.scheduler_order(), vec![sid(3), sid(1), sid(2)]);
}

#[test]
fn removing_a_scope_forgets_it() {
    let mut t = top();
    t.add_scheduler(sid(1), |_| None);
    t.stick(sid(1));
    t.remove_scheduler(sid(1));
    assert!(t.scheduler_order().is_empty());
    assert_eq!(t.sticky(), None);
}
