use std::cmp::Reverse;
use std::collections::VecDeque;

use crate::foundation::core::{BindingId, LifecycleState, SchedulerScopeId, TopScopeId};

/// Result of one refresh cycle of a top scope.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Bindings the scheduler scopes wanted to play, in evaluation order.
    pub to_play: Vec<BindingId>,
    /// Attached bindings the scheduler scopes wanted paused.
    pub to_pause: Vec<BindingId>,
    /// Bindings that actually received `play()`.
    pub selection: Vec<BindingId>,
}

#[derive(Debug)]
pub(crate) struct TopScope {
    pub(crate) id: TopScopeId,
    schedulers: VecDeque<SchedulerScopeId>,
    sticky: Option<SchedulerScopeId>,
    pub(crate) selection: Vec<BindingId>,
    pub(crate) lock: bool,
    pub(crate) lifecycle: LifecycleState,
    pub(crate) last_refresh: Option<RefreshOutcome>,
}

impl TopScope {
    pub(crate) fn new(id: TopScopeId, lifecycle: LifecycleState, lock: bool) -> Self {
        Self {
            id,
            schedulers: VecDeque::new(),
            sticky: None,
            selection: Vec::new(),
            lock,
            lifecycle,
            last_refresh: None,
        }
    }

    /// Insert a scheduler scope, keeping prioritized scopes first (highest priority first) and
    /// the sticky scope at the head.
    pub(crate) fn add_scheduler(
        &mut self,
        scope: SchedulerScopeId,
        priority_of: impl Fn(SchedulerScopeId) -> Option<i32>,
    ) {
        if self.schedulers.contains(&scope) {
            return;
        }
        let sticky_head = match self.sticky {
            Some(s) if self.schedulers.front() == Some(&s) => self.schedulers.pop_front(),
            _ => None,
        };
        self.schedulers.push_back(scope);
        if priority_of(scope).is_some() {
            self.schedulers
                .make_contiguous()
                .sort_by_key(|s| Reverse(priority_of(*s)));
        }
        if let Some(s) = sticky_head {
            self.schedulers.push_front(s);
        }
    }

    pub(crate) fn remove_scheduler(&mut self, scope: SchedulerScopeId) {
        if self.sticky == Some(scope) {
            self.unstick(Some(scope));
        }
        self.schedulers.retain(|s| *s != scope);
    }

    pub(crate) fn stick(&mut self, scope: SchedulerScopeId) {
        if self.sticky == Some(scope) {
            return;
        }
        self.unstick(None);
        self.sticky = Some(scope);
        self.schedulers.push_front(scope);
    }

    pub(crate) fn unstick(&mut self, scope: Option<SchedulerScopeId>) {
        let Some(current) = self.sticky else {
            return;
        };
        if scope.is_some_and(|s| s != current) {
            return;
        }
        self.sticky = None;
        if self.schedulers.front() == Some(&current) {
            self.schedulers.pop_front();
        }
    }

    pub(crate) fn sticky(&self) -> Option<SchedulerScopeId> {
        self.sticky
    }

    pub(crate) fn scheduler_order(&self) -> Vec<SchedulerScopeId> {
        let mut out: Vec<SchedulerScopeId> = Vec::with_capacity(self.schedulers.len());
        for s in &self.schedulers {
            if !out.contains(s) {
                out.push(*s);
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scope/top.rs"]
mod tests;
