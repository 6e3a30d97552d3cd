use std::rc::Rc;

use crate::foundation::core::{BindingId, MediaId, SchedulerScopeId, SelectionScopeId, SlotId};
use crate::media::engine::RepeatMode;
use crate::visibility::token::Token;

use super::listener::{BindingCallback, ManualController, PlaybackListener};

/// Priority of a selected binding.
pub const PRIORITY_SELECTED: u32 = 0;
/// Priority of a binding that is detached or has never been ranked.
pub const PRIORITY_UNRANKED: u32 = u32::MAX;

/// Lifecycle state of a binding.
///
/// The declaration order is the state order: `is_attached` and `is_active` are threshold checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingState {
    /// Constructed, not yet part of a scheduler scope.
    Created,
    /// Terminal.
    Removed,
    /// Part of a scheduler scope, slot not attached yet.
    Added,
    /// Slot detached from the active surface.
    Detached,
    /// Slot attached.
    Attached,
    /// Attached but not preparable.
    Inactive,
    /// Preparable.
    Active,
}

impl BindingState {
    /// `true` from [`BindingState::Attached`] upwards.
    pub fn is_attached(self) -> bool {
        self >= Self::Attached
    }

    /// `true` for [`BindingState::Active`].
    pub fn is_active(self) -> bool {
        self >= Self::Active
    }

    pub(crate) fn can_become(self, to: Self) -> bool {
        use BindingState::*;
        matches!(
            (self, to),
            (Created, Added)
                | (Added, Attached | Detached | Removed)
                | (Detached, Attached | Removed)
                | (Attached, Active | Inactive | Detached)
                | (Active, Inactive)
                | (Inactive, Active | Detached)
        )
    }
}

#[derive(Clone)]
pub(crate) struct BindingConfig {
    pub(crate) threshold: f64,
    pub(crate) delay_ms: u64,
    pub(crate) preload: bool,
    pub(crate) repeat_mode: RepeatMode,
    pub(crate) controller: Option<Rc<dyn ManualController>>,
}

pub(crate) struct Binding {
    pub(crate) id: BindingId,
    pub(crate) media: MediaId,
    pub(crate) slot: SlotId,
    pub(crate) selection: SelectionScopeId,
    pub(crate) scheduler: SchedulerScopeId,
    pub(crate) config: BindingConfig,
    pub(crate) token: Token,
    pub(crate) priority: u32,
    pub(crate) state: BindingState,
    pub(crate) lock: bool,
    callbacks: Vec<Rc<dyn BindingCallback>>,
    listeners: Vec<Rc<dyn PlaybackListener>>,
}

impl Binding {
    pub(crate) fn new(
        id: BindingId,
        media: MediaId,
        slot: SlotId,
        selection: SelectionScopeId,
        scheduler: SchedulerScopeId,
        config: BindingConfig,
    ) -> Self {
        let token = Token::hidden(config.threshold);
        Self {
            id,
            media,
            slot,
            selection,
            scheduler,
            config,
            token,
            priority: PRIORITY_UNRANKED,
            state: BindingState::Created,
            lock: false,
            callbacks: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub(crate) fn is_manual(&self) -> bool {
        self.config.controller.is_some()
    }

    pub(crate) fn add_callbacks(&mut self, callbacks: impl IntoIterator<Item = Rc<dyn BindingCallback>>) {
        self.callbacks.extend(callbacks);
    }

    pub(crate) fn add_listeners(&mut self, listeners: impl IntoIterator<Item = Rc<dyn PlaybackListener>>) {
        self.listeners.extend(listeners);
    }

    /// Move to `to`. Returns `false`, leaving the state untouched, for a repeated or illegal move.
    pub(crate) fn transition(&mut self, to: BindingState) -> bool {
        if self.state == to {
            return false;
        }
        if !self.state.can_become(to) {
            debug_assert!(false, "{:?}: illegal transition {:?} -> {:?}", self.id, self.state, to);
            tracing::warn!(binding = ?self.id, from = ?self.state, to = ?to, "illegal binding transition ignored");
            return false;
        }
        tracing::debug!(binding = ?self.id, from = ?self.state, to = ?to, "binding transition");
        self.state = to;
        true
    }

    /// Snapshot of the lifecycle callbacks, safe to iterate while the binding changes.
    pub(crate) fn callbacks(&self) -> Vec<Rc<dyn BindingCallback>> {
        self.callbacks.clone()
    }

    /// Snapshot of the playback listeners.
    pub(crate) fn listeners(&self) -> Vec<Rc<dyn PlaybackListener>> {
        self.listeners.clone()
    }

    /// Drop every registration. Called once the binding is removed.
    pub(crate) fn clear_registrations(&mut self) {
        self.callbacks.clear();
        self.listeners.clear();
        self.config.controller = None;
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("media", &self.media)
            .field("slot", &self.slot)
            .field("state", &self.state)
            .field("priority", &self.priority)
            .field("token", &self.token)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binding/state.rs"]
mod tests;
