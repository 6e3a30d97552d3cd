//! Scope locks.
//!
//! Locks nest `Global ⊃ Top ⊃ Scheduler ⊃ Selection ⊃ Binding`. Locking a scope locks everything
//! under it; unlocking is refused while any ancestor is still locked.

use tracing::{debug, info};

use crate::foundation::core::{BindingId, SchedulerScopeId, SelectionScopeId, TopScopeId};
use crate::foundation::error::{AutoplayError, AutoplayResult};

use super::context::Registry;

/// What a lock or unlock call applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LockTarget {
    /// Every scope of the registry.
    Global,
    /// One top scope and everything under it.
    Top(TopScopeId),
    /// One scheduler scope and everything under it.
    Scheduler(SchedulerScopeId),
    /// One selection scope and its bindings.
    Selection(SelectionScopeId),
    /// One binding.
    Binding(BindingId),
}

impl Registry {
    /// Lock `target` and everything nested under it.
    pub fn lock(&mut self, target: LockTarget) -> AutoplayResult<()> {
        self.check_target(target)?;
        info!(?target, "lock");
        self.set_lock(target, true);
        self.refresh_for(target);
        Ok(())
    }

    /// Unlock `target` and everything nested under it.
    ///
    /// Returns `false`, changing nothing, while an enclosing scope is still locked.
    pub fn unlock(&mut self, target: LockTarget) -> AutoplayResult<bool> {
        self.check_target(target)?;
        if self.ancestor_locked(target) {
            debug!(?target, "unlock refused: enclosing scope is locked");
            return Ok(false);
        }
        info!(?target, "unlock");
        self.set_lock(target, false);
        self.refresh_for(target);
        Ok(true)
    }

    /// Current lock flag of `target`.
    pub fn is_locked(&self, target: LockTarget) -> AutoplayResult<bool> {
        Ok(match target {
            LockTarget::Global => self.global_lock,
            LockTarget::Top(id) => self.top(id)?.lock,
            LockTarget::Scheduler(id) => self.scheduler(id)?.lock,
            LockTarget::Selection(id) => self.selection_scope(id)?.lock,
            LockTarget::Binding(id) => {
                self.bindings
                    .get(id)
                    .ok_or_else(|| AutoplayError::unknown_scope(format!("{id:?}")))?
                    .lock
            }
        })
    }

    fn check_target(&self, target: LockTarget) -> AutoplayResult<()> {
        self.is_locked(target).map(|_| ())
    }

    fn parent(&self, target: LockTarget) -> Option<LockTarget> {
        match target {
            LockTarget::Global => None,
            LockTarget::Top(_) => Some(LockTarget::Global),
            LockTarget::Scheduler(id) => self.schedulers.get(id).map(|s| LockTarget::Top(s.top)),
            LockTarget::Selection(id) => self
                .selections
                .get(id)
                .map(|s| LockTarget::Scheduler(s.scheduler)),
            LockTarget::Binding(id) => self
                .bindings
                .get(id)
                .map(|b| LockTarget::Selection(b.selection)),
        }
    }

    fn ancestor_locked(&self, target: LockTarget) -> bool {
        let mut cursor = self.parent(target);
        while let Some(t) = cursor {
            if self.is_locked(t).unwrap_or(false) {
                return true;
            }
            cursor = self.parent(t);
        }
        false
    }

    fn set_lock(&mut self, target: LockTarget, lock: bool) {
        match target {
            LockTarget::Global => {
                self.global_lock = lock;
                for top in self.tops.ids() {
                    self.set_lock(LockTarget::Top(top), lock);
                }
            }
            LockTarget::Top(id) => {
                let Some(top) = self.tops.get_mut(id) else {
                    return;
                };
                top.lock = lock;
                for s in top.scheduler_order() {
                    self.set_lock(LockTarget::Scheduler(s), lock);
                }
            }
            LockTarget::Scheduler(id) => {
                let Some(scheduler) = self.schedulers.get_mut(id) else {
                    return;
                };
                scheduler.lock = lock;
                for s in scheduler.selection_order() {
                    self.set_lock(LockTarget::Selection(s), lock);
                }
            }
            LockTarget::Selection(id) => {
                let Some(selection) = self.selections.get_mut(id) else {
                    return;
                };
                selection.lock = lock;
                let scheduler = selection.scheduler;
                let bound: Vec<BindingId> = self
                    .schedulers
                    .get(scheduler)
                    .map(|s| s.bindings.values().copied().collect())
                    .unwrap_or_default();
                for b in bound {
                    if let Some(binding) = self.bindings.get_mut(b)
                        && binding.selection == id
                    {
                        binding.lock = lock;
                    }
                }
            }
            LockTarget::Binding(id) => {
                if let Some(binding) = self.bindings.get_mut(id) {
                    binding.lock = lock;
                }
            }
        }
    }

    fn refresh_for(&mut self, target: LockTarget) {
        let top = match target {
            LockTarget::Global => None,
            LockTarget::Top(id) => Some(id),
            LockTarget::Scheduler(id) => self.schedulers.get(id).map(|s| s.top),
            LockTarget::Selection(id) => self
                .selections
                .get(id)
                .and_then(|s| self.schedulers.get(s.scheduler))
                .map(|s| s.top),
            LockTarget::Binding(id) => self.top_of_binding(id),
        };
        match top {
            Some(top) => self.request_refresh(top),
            None => self.request_refresh_all(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/lock.rs"]
mod tests;
