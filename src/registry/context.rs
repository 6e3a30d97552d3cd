use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{debug, info};

use crate::binding::listener::SelectionObserver;
use crate::binding::options::BindOptions;
use crate::binding::state::{Binding, BindingState, PRIORITY_UNRANKED};
use crate::foundation::arena::Arena;
use crate::foundation::core::{
    BindingId, LifecycleState, MediaId, MediaTag, SchedulerScopeId, SelectionScopeId, SlotId,
    TopScopeId,
};
use crate::foundation::error::{AutoplayError, AutoplayResult};
use crate::media::engine::{MediaEngine, MediaPlayer};
use crate::media::item::{MediaItem, MediaKind, MediaOwner, PlaybackInfo};
use crate::pool::renderer::{RendererHandle, RendererHost, RendererKey, SlotKind};
use crate::pool::resource::{PoolStats, ResourcePool};
use crate::scope::scheduler::{SchedulerScope, SchedulerScopeOpts};
use crate::scope::selection::{SelectionScope, SelectionScopeOpts};
use crate::scope::top::{RefreshOutcome, TopScope};
use crate::visibility::token::{SlotGeometry, Token};

use super::dispatch::{Task, TaskQueue};
use super::opts::RegistryOpts;
use super::resume::{ResumeSnapshot, ResumeStore};

/// Scope whose host lifecycle changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleScope {
    /// A top scope (window).
    Top(TopScopeId),
    /// A scheduler scope (screen).
    Scheduler(SchedulerScopeId),
}

impl From<TopScopeId> for LifecycleScope {
    fn from(value: TopScopeId) -> Self {
        Self::Top(value)
    }
}

impl From<SchedulerScopeId> for LifecycleScope {
    fn from(value: SchedulerScopeId) -> Self {
        Self::Scheduler(value)
    }
}

#[derive(Debug)]
pub(crate) struct SlotEntry {
    pub(crate) selection: SelectionScopeId,
    pub(crate) kind: SlotKind,
    pub(crate) geometry: SlotGeometry,
}

#[derive(Debug)]
pub(crate) struct BindRequest {
    pub(crate) media: MediaId,
    pub(crate) options: BindOptions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UserAction {
    Play,
    Pause,
}

/// Process-wide playback scheduler state.
///
/// The registry is single-threaded and driven by the host: geometry, attach and lifecycle events
/// go in through the `on_*` methods, time goes in through [`Registry::advance_by`]. All deferred
/// work (debounced refreshes, bind requests waiting for their slot, delayed release and
/// destruction, delayed play) runs from inside `advance_by`.
pub struct Registry {
    pub(crate) opts: RegistryOpts,
    pub(crate) engine: Box<dyn MediaEngine>,
    pub(crate) renderers: Box<dyn RendererHost>,

    pub(crate) tops: Arena<TopScopeId, TopScope>,
    pub(crate) schedulers: Arena<SchedulerScopeId, SchedulerScope>,
    pub(crate) selections: Arena<SelectionScopeId, SelectionScope>,
    pub(crate) bindings: Arena<BindingId, Binding>,
    pub(crate) media: Arena<MediaId, MediaItem>,

    pub(crate) slots: BTreeMap<SlotId, SlotEntry>,
    pub(crate) tags: BTreeMap<MediaTag, MediaId>,
    pub(crate) requests: BTreeMap<SlotId, BindRequest>,
    pub(crate) pending_actions: BTreeMap<MediaTag, UserAction>,
    pub(crate) manually_started: Option<MediaId>,

    pub(crate) resume: ResumeStore,
    pub(crate) tasks: TaskQueue,
    pub(crate) player_pool: ResourcePool<MediaKind, Box<dyn MediaPlayer>>,
    pub(crate) renderer_pool: ResourcePool<RendererKey, RendererHandle>,

    pub(crate) memory_pressure: bool,
    pub(crate) global_lock: bool,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("opts", &self.opts)
            .field("now_ms", &self.tasks.now_ms())
            .field("tops", &self.tops.len())
            .field("schedulers", &self.schedulers.len())
            .field("selections", &self.selections.len())
            .field("bindings", &self.bindings.len())
            .field("media", &self.media.len())
            .field("pending_tasks", &self.tasks.len())
            .finish()
    }
}

impl Registry {
    /// Build a registry around a media engine and a renderer host.
    pub fn new(
        opts: RegistryOpts,
        engine: Box<dyn MediaEngine>,
        renderers: Box<dyn RendererHost>,
    ) -> AutoplayResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            engine,
            renderers,
            tops: Arena::new(),
            schedulers: Arena::new(),
            selections: Arena::new(),
            bindings: Arena::new(),
            media: Arena::new(),
            slots: BTreeMap::new(),
            tags: BTreeMap::new(),
            requests: BTreeMap::new(),
            pending_actions: BTreeMap::new(),
            manually_started: None,
            resume: ResumeStore::default(),
            tasks: TaskQueue::new(),
            player_pool: ResourcePool::new(opts.player_pool),
            renderer_pool: ResourcePool::new(opts.renderer_pool),
            memory_pressure: false,
            global_lock: false,
        })
    }

    /// Options the registry was built with.
    pub fn opts(&self) -> &RegistryOpts {
        &self.opts
    }

    // ---------------------------------------------------------------------------------------------
    // Time

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.tasks.now_ms()
    }

    /// Advance virtual time, running every task that becomes due on the way.
    pub fn advance_by(&mut self, delta_ms: u64) {
        let target = self.tasks.now_ms().saturating_add(delta_ms);
        self.advance_to(target);
    }

    /// Advance virtual time to `target_ms`. Moving backwards is a no-op.
    pub fn advance_to(&mut self, target_ms: u64) {
        while let Some(task) = self.tasks.pop_due(target_ms) {
            self.run_task(task);
        }
        self.tasks.set_now(target_ms);
    }

    /// Run tasks that are due now without moving the clock.
    pub fn run_pending(&mut self) {
        self.advance_by(0);
    }

    /// Number of deferred tasks waiting to run.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    fn run_task(&mut self, task: Task) {
        debug!(?task, now_ms = self.tasks.now_ms(), "run task");
        match task {
            Task::Refresh(top) => self.refresh_now(top),
            Task::Bind(slot) => self.run_bind_request(slot),
            Task::Release(media) => self.release_media_now(media),
            Task::Destroy(media) => self.destroy_media_now(media),
            Task::Play(media) => {
                if let Some(item) = self.media.get_mut(media) {
                    item.play();
                }
            }
            Task::Cleanup => self.cleanup_registry_owned(),
        }
    }

    /// Schedule a debounced refresh of `top`.
    pub(crate) fn request_refresh(&mut self, top: TopScopeId) {
        if self.tops.contains(top) {
            self.tasks.post(Task::Refresh(top), self.opts.refresh_delay_ms);
        }
    }

    pub(crate) fn request_refresh_all(&mut self) {
        for top in self.tops.ids() {
            self.request_refresh(top);
        }
    }

    /// Ask for a refresh of the top scope owning `scope`.
    pub fn refresh(&mut self, scope: impl Into<LifecycleScope>) -> AutoplayResult<()> {
        let top = match scope.into() {
            LifecycleScope::Top(top) => {
                self.top(top)?;
                top
            }
            LifecycleScope::Scheduler(s) => self.scheduler(s)?.top,
        };
        self.request_refresh(top);
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // Scope registration

    /// Register a top scope (one window).
    pub fn register_top_scope(&mut self, lifecycle: LifecycleState) -> TopScopeId {
        let lock = self.global_lock;
        let id = self
            .tops
            .insert_with(|id| TopScope::new(id, lifecycle, lock));
        info!(top = ?id, ?lifecycle, "top scope registered");
        self.tasks.post(Task::Cleanup, 0);
        self.request_refresh_all();
        id
    }

    /// Register a scheduler scope (one screen) under `top`.
    pub fn register_scheduler_scope(
        &mut self,
        top: TopScopeId,
        opts: SchedulerScopeOpts,
    ) -> AutoplayResult<SchedulerScopeId> {
        let (lifecycle, lock) = {
            let t = self.top(top)?;
            (t.lifecycle, t.lock)
        };
        let id = self
            .schedulers
            .insert_with(|id| SchedulerScope::new(id, top, opts, lifecycle, lock));
        let schedulers = &self.schedulers;
        if let Some(t) = self.tops.get_mut(top) {
            t.add_scheduler(id, |s| schedulers.get(s).and_then(|s| s.opts.priority));
        }
        info!(scheduler = ?id, ?top, ?opts, "scheduler scope registered");
        self.request_refresh(top);
        Ok(id)
    }

    /// Register a selection scope (one scrollable container) under `scheduler`.
    pub fn register_selection_scope(
        &mut self,
        scheduler: SchedulerScopeId,
        opts: SelectionScopeOpts,
    ) -> AutoplayResult<SelectionScopeId> {
        let (top, lock) = {
            let s = self.scheduler(scheduler)?;
            (s.top, s.lock)
        };
        let id = self
            .selections
            .insert_with(|id| SelectionScope::new(id, scheduler, opts, lock));
        if let Some(s) = self.schedulers.get_mut(scheduler) {
            s.add_selection(id);
        }
        debug!(selection = ?id, ?scheduler, "selection scope registered");
        self.request_refresh(top);
        Ok(id)
    }

    /// Register a slot inside `selection`. A slot id can only be registered once.
    pub fn register_slot(
        &mut self,
        selection: SelectionScopeId,
        slot: SlotId,
        kind: SlotKind,
        geometry: SlotGeometry,
    ) -> AutoplayResult<()> {
        self.selection_scope(selection)?;
        if let Some(existing) = self.slots.get(&slot) {
            return Err(AutoplayError::validation(format!(
                "{slot:?} is already registered in {:?}",
                existing.selection
            )));
        }
        self.slots.insert(
            slot,
            SlotEntry {
                selection,
                kind,
                geometry,
            },
        );
        if let Some(s) = self.selections.get_mut(selection) {
            s.add_slot(slot);
        }
        debug!(?slot, ?selection, ?kind, "slot registered");
        if geometry.attached {
            self.on_attached(slot)?;
        }
        Ok(())
    }

    /// Forget a slot, dropping its pending request and its binding.
    pub fn unregister_slot(&mut self, slot: SlotId) -> AutoplayResult<()> {
        if !self.slots.contains_key(&slot) {
            return Err(AutoplayError::unknown_scope(format!("{slot:?}")));
        }
        self.unbind_slot(slot)?;
        if let Some(entry) = self.slots.remove(&slot)
            && let Some(s) = self.selections.get_mut(entry.selection)
        {
            s.remove_slot(slot);
        }
        debug!(?slot, "slot unregistered");
        Ok(())
    }

    /// Forget a selection scope and every slot in it.
    pub fn unregister_selection_scope(&mut self, selection: SelectionScopeId) -> AutoplayResult<()> {
        let (scheduler, slots) = {
            let s = self.selection_scope(selection)?;
            (s.scheduler, s.slots.clone())
        };
        for slot in slots {
            self.unregister_slot(slot)?;
        }
        if let Some(s) = self.schedulers.get_mut(scheduler) {
            s.remove_selection(selection);
        }
        self.selections.remove(selection);
        debug!(?selection, "selection scope unregistered");
        if let Some(top) = self.schedulers.get(scheduler).map(|s| s.top) {
            self.request_refresh(top);
        }
        Ok(())
    }

    /// Forget a scheduler scope and everything under it.
    pub fn unregister_scheduler_scope(&mut self, scheduler: SchedulerScopeId) -> AutoplayResult<()> {
        let (top, selections) = {
            let s = self.scheduler(scheduler)?;
            (s.top, s.selection_order())
        };
        // Bindings first, so no binding outlives its selection scope.
        let bound: Vec<BindingId> = self
            .scheduler(scheduler)?
            .bindings
            .values()
            .copied()
            .collect();
        for b in bound {
            self.remove_binding(b);
        }
        for selection in selections {
            self.unregister_selection_scope(selection)?;
        }
        if let Some(t) = self.tops.get_mut(top) {
            t.remove_scheduler(scheduler);
        }
        self.schedulers.remove(scheduler);
        info!(?scheduler, "scheduler scope unregistered");
        self.request_refresh(top);
        Ok(())
    }

    /// Forget a top scope and everything under it.
    pub fn unregister_top_scope(&mut self, top: TopScopeId) -> AutoplayResult<()> {
        let schedulers = self.top(top)?.scheduler_order();
        for s in schedulers {
            self.unregister_scheduler_scope(s)?;
        }
        self.tasks.cancel(Task::Refresh(top));
        self.tops.remove(top);
        info!(?top, "top scope unregistered");
        if self.tops.is_empty()
            && let Some(media) = self.manually_started
            && let Some(item) = self.media.get(media)
            && item.binding.is_none()
        {
            // Last window gone: nothing may keep the user-started item alive.
            self.manually_started = None;
            self.set_media_owner(media, MediaOwner::None);
        }
        self.request_refresh_all();
        Ok(())
    }

    /// Register an observer notified with the bindings selected under `scheduler`.
    pub fn add_selection_observer(
        &mut self,
        scheduler: SchedulerScopeId,
        observer: Rc<dyn SelectionObserver>,
    ) -> AutoplayResult<()> {
        self.scheduler_mut(scheduler)?.observers.push(observer);
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // Sticky scopes

    /// Promote a selection scope to the head of its scheduler scope.
    pub fn stick_selection_scope(&mut self, selection: SelectionScopeId) -> AutoplayResult<()> {
        let scheduler = self.selection_scope(selection)?.scheduler;
        let s = self.scheduler_mut(scheduler)?;
        s.stick(selection);
        let top = s.top;
        self.request_refresh(top);
        Ok(())
    }

    /// Demote the sticky selection scope of `scheduler`. `None` demotes whichever is sticky.
    pub fn unstick_selection_scope(
        &mut self,
        scheduler: SchedulerScopeId,
        selection: Option<SelectionScopeId>,
    ) -> AutoplayResult<()> {
        let s = self.scheduler_mut(scheduler)?;
        s.unstick(selection);
        let top = s.top;
        self.request_refresh(top);
        Ok(())
    }

    /// Make `scheduler` the only scheduler scope its top scope considers.
    pub fn stick_scheduler_scope(&mut self, scheduler: SchedulerScopeId) -> AutoplayResult<()> {
        let top = self.scheduler(scheduler)?.top;
        self.top_mut(top)?.stick(scheduler);
        self.request_refresh(top);
        Ok(())
    }

    /// Demote the sticky scheduler scope of `top`. `None` demotes whichever is sticky.
    pub fn unstick_scheduler_scope(
        &mut self,
        top: TopScopeId,
        scheduler: Option<SchedulerScopeId>,
    ) -> AutoplayResult<()> {
        self.top_mut(top)?.unstick(scheduler);
        self.request_refresh(top);
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // Memory

    /// Report system memory pressure; [`crate::MemoryMode::Auto`] resolves to `Low` while set.
    pub fn set_memory_pressure(&mut self, pressure: bool) {
        if self.memory_pressure == pressure {
            return;
        }
        info!(pressure, "memory pressure changed");
        self.memory_pressure = pressure;
        // Forget the ranks so the next cycle applies the new mode to every binding.
        for id in self.bindings.ids() {
            if let Some(binding) = self.bindings.get_mut(id) {
                binding.priority = PRIORITY_UNRANKED;
            }
        }
        self.request_refresh_all();
    }

    // ---------------------------------------------------------------------------------------------
    // Queries

    /// Live binding of `slot`, if any.
    pub fn binding_for_slot(&self, slot: SlotId) -> Option<BindingId> {
        let entry = self.slots.get(&slot)?;
        let scheduler = self.selections.get(entry.selection)?.scheduler;
        self.schedulers.get(scheduler)?.bindings.get(&slot).copied()
    }

    /// State of a live binding.
    pub fn binding_state(&self, binding: BindingId) -> Option<BindingState> {
        self.bindings.get(binding).map(|b| b.state)
    }

    /// Eviction priority of a live binding.
    pub fn binding_priority(&self, binding: BindingId) -> Option<u32> {
        self.bindings.get(binding).map(|b| b.priority)
    }

    /// Token computed for a live binding in the last refresh cycle.
    pub fn binding_token(&self, binding: BindingId) -> Option<Token> {
        self.bindings.get(binding).map(|b| b.token)
    }

    /// Media item of a live binding.
    pub fn binding_media(&self, binding: BindingId) -> Option<MediaId> {
        self.bindings.get(binding).map(|b| b.media)
    }

    /// Live binding of a media item.
    pub fn media_binding(&self, media: MediaId) -> Option<BindingId> {
        self.media.get(media).and_then(|m| m.binding)
    }

    /// Media item currently registered for `tag`.
    pub fn media_for_tag(&self, tag: &MediaTag) -> Option<MediaId> {
        self.tags.get(tag).copied()
    }

    /// Whether the media item exists.
    pub fn has_media(&self, media: MediaId) -> bool {
        self.media.contains(media)
    }

    /// Whether the media item currently holds a player.
    pub fn has_player(&self, media: MediaId) -> bool {
        self.media.get(media).is_some_and(|m| m.player.is_some())
    }

    /// Resume state of the media item: from its player, or the one cached while it has none.
    pub fn playback_info(&self, media: MediaId) -> Option<PlaybackInfo> {
        self.media.get(media).map(|m| m.playback_info())
    }

    /// Whether the media item is playing.
    pub fn is_playing(&self, media: MediaId) -> bool {
        self.media.get(media).is_some_and(|m| m.is_playing())
    }

    /// Bindings currently selected in `top`.
    pub fn selection(&self, top: TopScopeId) -> AutoplayResult<&[BindingId]> {
        Ok(self.top(top)?.selection.as_slice())
    }

    /// Outcome of the last refresh cycle of `top`.
    pub fn last_refresh(&self, top: TopScopeId) -> AutoplayResult<Option<&RefreshOutcome>> {
        Ok(self.top(top)?.last_refresh.as_ref())
    }

    /// Player pool counters.
    pub fn player_pool_stats(&self) -> PoolStats {
        self.player_pool.stats()
    }

    /// Renderer pool counters.
    pub fn renderer_pool_stats(&self) -> PoolStats {
        self.renderer_pool.stats()
    }

    /// Tag-keyed resume states saved so far.
    pub fn resume_snapshot(&self) -> ResumeSnapshot {
        self.resume.snapshot()
    }

    /// Import resume states, e.g. from a previous session. Existing entries win.
    pub fn seed_resume_state(&mut self, snapshot: ResumeSnapshot) -> usize {
        self.resume.seed(snapshot)
    }

    /// Drop every idle pooled player and renderer.
    pub fn clear_pools(&mut self) {
        for player in self.player_pool.drain() {
            self.engine.destroy_player(player);
        }
        for renderer in self.renderer_pool.drain() {
            self.renderers.destroy_renderer(renderer);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Lookups

    pub(crate) fn top(&self, id: TopScopeId) -> AutoplayResult<&TopScope> {
        self.tops
            .get(id)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{id:?}")))
    }

    pub(crate) fn top_mut(&mut self, id: TopScopeId) -> AutoplayResult<&mut TopScope> {
        self.tops
            .get_mut(id)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{id:?}")))
    }

    pub(crate) fn scheduler(&self, id: SchedulerScopeId) -> AutoplayResult<&SchedulerScope> {
        self.schedulers
            .get(id)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{id:?}")))
    }

    pub(crate) fn scheduler_mut(
        &mut self,
        id: SchedulerScopeId,
    ) -> AutoplayResult<&mut SchedulerScope> {
        self.schedulers
            .get_mut(id)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{id:?}")))
    }

    pub(crate) fn selection_scope(&self, id: SelectionScopeId) -> AutoplayResult<&SelectionScope> {
        self.selections
            .get(id)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{id:?}")))
    }

    pub(crate) fn top_of_binding(&self, binding: BindingId) -> Option<TopScopeId> {
        let scheduler = self.bindings.get(binding)?.scheduler;
        self.schedulers.get(scheduler).map(|s| s.top)
    }

    pub(crate) fn top_of_slot(&self, slot: SlotId) -> Option<TopScopeId> {
        let selection = self.slots.get(&slot)?.selection;
        let scheduler = self.selections.get(selection)?.scheduler;
        self.schedulers.get(scheduler).map(|s| s.top)
    }

    /// Highest lifecycle state among all top scopes.
    pub(crate) fn max_top_lifecycle(&self) -> LifecycleState {
        self.tops
            .values()
            .map(|t| t.lifecycle)
            .max()
            .unwrap_or(LifecycleState::Destroyed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/context.rs"]
mod tests;
