use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use crate::binding::listener::SelectionObserver;
use crate::foundation::core::{
    BindingId, LifecycleState, SchedulerScopeId, SelectionScopeId, SlotId, TopScopeId,
};
use crate::policy::memory::MemoryMode;

use super::selection::{Candidate, SelectionScope};

/// Options of a scheduler scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SchedulerScopeOpts {
    /// Eviction policy for media bound under this scope.
    pub memory_mode: MemoryMode,
    /// Lowest lifecycle state in which bindings of this scope may play.
    pub active_lifecycle: LifecycleState,
    /// Ordering among sibling scopes; higher goes first, unprioritized scopes come last.
    pub priority: Option<i32>,
}

impl Default for SchedulerScopeOpts {
    fn default() -> Self {
        Self {
            memory_mode: MemoryMode::Auto,
            active_lifecycle: LifecycleState::Started,
            priority: None,
        }
    }
}

pub(crate) struct SchedulerScope {
    pub(crate) id: SchedulerScopeId,
    pub(crate) top: TopScopeId,
    pub(crate) opts: SchedulerScopeOpts,
    // Queue and stack at once: new scopes go to the back, a sticky scope is pushed to the front
    // and popped again on unstick.
    selections: VecDeque<SelectionScopeId>,
    sticky: Option<SelectionScopeId>,
    pub(crate) bindings: BTreeMap<SlotId, BindingId>,
    pub(crate) lifecycle: LifecycleState,
    pub(crate) lock: bool,
    pub(crate) observers: Vec<Rc<dyn SelectionObserver>>,
}

impl SchedulerScope {
    pub(crate) fn new(
        id: SchedulerScopeId,
        top: TopScopeId,
        opts: SchedulerScopeOpts,
        lifecycle: LifecycleState,
        lock: bool,
    ) -> Self {
        Self {
            id,
            top,
            opts,
            selections: VecDeque::new(),
            sticky: None,
            bindings: BTreeMap::new(),
            lifecycle,
            lock,
            observers: Vec::new(),
        }
    }

    pub(crate) fn add_selection(&mut self, scope: SelectionScopeId) {
        if !self.selections.contains(&scope) {
            self.selections.push_back(scope);
        }
    }

    pub(crate) fn remove_selection(&mut self, scope: SelectionScopeId) {
        if self.sticky == Some(scope) {
            self.unstick(Some(scope));
        }
        self.selections.retain(|s| *s != scope);
    }

    pub(crate) fn stick(&mut self, scope: SelectionScopeId) {
        if self.sticky == Some(scope) {
            return;
        }
        self.unstick(None);
        self.sticky = Some(scope);
        self.selections.push_front(scope);
    }

    /// `None` unsticks whatever is sticky.
    pub(crate) fn unstick(&mut self, scope: Option<SelectionScopeId>) {
        let Some(current) = self.sticky else {
            return;
        };
        if scope.is_some_and(|s| s != current) {
            return;
        }
        self.sticky = None;
        if self.selections.front() == Some(&current) {
            self.selections.pop_front();
        }
    }

    pub(crate) fn sticky(&self) -> Option<SelectionScopeId> {
        self.sticky
    }

    /// Selection scopes in evaluation order, sticky first, without duplicates.
    pub(crate) fn selection_order(&self) -> Vec<SelectionScopeId> {
        let mut out: Vec<SelectionScopeId> = Vec::with_capacity(self.selections.len());
        for s in &self.selections {
            if !out.contains(s) {
                out.push(*s);
            }
        }
        out
    }

    /// Whether tokens of this scope may be preparable at all.
    pub(crate) fn is_started(&self) -> bool {
        self.lifecycle >= LifecycleState::Started
    }

    /// Whether bindings of this scope may be selected.
    pub(crate) fn can_play(&self) -> bool {
        !self.lock && self.lifecycle >= self.opts.active_lifecycle
    }
}

impl std::fmt::Debug for SchedulerScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerScope")
            .field("id", &self.id)
            .field("top", &self.top)
            .field("opts", &self.opts)
            .field("selections", &self.selections)
            .field("sticky", &self.sticky)
            .field("bindings", &self.bindings)
            .field("lifecycle", &self.lifecycle)
            .field("lock", &self.lock)
            .finish()
    }
}

/// A binding ready for partitioning, tagged with its selection scope.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScopedCandidate {
    pub(crate) scope: SelectionScopeId,
    pub(crate) candidate: Candidate,
    /// Started by the user with a controller that forbids automatic pauses.
    pub(crate) pinned: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Split {
    pub(crate) to_play: Vec<BindingId>,
    pub(crate) to_pause: Vec<BindingId>,
}

/// Partition the bindings of one scheduler scope into what should play and what should pause.
///
/// Selection scopes are asked in `order`; the first non-empty answer wins. Every other attached
/// binding pauses. When `can_play` is false nothing plays.
pub(crate) fn split_bindings(
    order: &[&SelectionScope],
    candidates: &[ScopedCandidate],
    can_play: bool,
) -> Split {
    let mut to_play: Vec<BindingId> = Vec::new();
    for scope in order {
        let own: Vec<&ScopedCandidate> = candidates.iter().filter(|c| c.scope == scope.id).collect();
        if own.is_empty() {
            continue;
        }
        let admitted: Vec<Candidate> = own
            .into_iter()
            .filter(|c| (c.pinned && c.candidate.attached) || scope.allow_to_play(&c.candidate))
            .map(|c| c.candidate)
            .collect();
        let picked = scope.select_to_play(&admitted);
        if !picked.is_empty() {
            to_play.extend(picked);
            break;
        }
    }

    let mut to_pause: Vec<BindingId> = candidates
        .iter()
        .filter(|c| c.candidate.attached && !to_play.contains(&c.candidate.binding))
        .map(|c| c.candidate.binding)
        .collect();

    if !can_play {
        to_pause.extend(to_play.drain(..));
    }
    Split { to_play, to_pause }
}

#[cfg(test)]
#[path = "../../tests/unit/scope/scheduler.rs"]
mod tests;
