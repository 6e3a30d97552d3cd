//! Bind requests and binding creation/removal.

use tracing::{debug, info, warn};

use crate::binding::options::BindOptions;
use crate::binding::state::{Binding, BindingConfig, BindingState};
use crate::foundation::core::{
    BindingId, MediaId, MediaTag, SchedulerScopeId, SelectionScopeId, SlotId,
};
use crate::foundation::error::{AutoplayError, AutoplayResult};
use crate::media::engine::PlayerState;
use crate::media::item::{MediaConfig, MediaDescriptor, MediaItem};
use crate::pool::renderer::plan_renderer;

use super::context::{BindRequest, Registry};
use super::dispatch::Task;

impl Registry {
    /// Request that `descriptor` plays in `slot`.
    ///
    /// The request is validated immediately and applied once the slot is attached. Binding a tag
    /// that already has a media item reuses it (and its player and resume state) as long as the
    /// descriptor and config are unchanged. A later request for the same slot or the same tag
    /// supersedes a pending one.
    pub fn bind(
        &mut self,
        descriptor: MediaDescriptor,
        config: MediaConfig,
        slot: SlotId,
        options: BindOptions,
    ) -> AutoplayResult<MediaId> {
        options.validate()?;
        let kind = self
            .slots
            .get(&slot)
            .map(|e| e.kind)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{slot:?}")))?;
        plan_renderer(kind, descriptor.kind, config.renderer)?;

        let media = self.resolve_media(options.tag.clone(), descriptor, config);
        self.tasks.cancel(Task::Release(media));
        self.tasks.cancel(Task::Destroy(media));

        let superseded: Vec<SlotId> = self
            .requests
            .iter()
            .filter(|(s, r)| **s != slot && r.media == media)
            .map(|(s, _)| *s)
            .collect();
        for s in superseded {
            debug!(slot = ?s, ?media, "bind request superseded by another slot");
            self.requests.remove(&s);
            self.tasks.cancel(Task::Bind(s));
        }
        if let Some(old) = self.requests.remove(&slot)
            && old.media != media
        {
            debug!(?slot, old = ?old.media, "bind request superseded");
            self.schedule_destroy_orphan(old.media);
        }

        info!(?slot, ?media, ?options, "bind requested");
        self.requests.insert(slot, BindRequest { media, options });
        self.tasks.post(Task::Bind(slot), 0);
        Ok(media)
    }

    /// Remove a binding. Its media item is destroyed unless it is rebound or user-started.
    pub fn unbind(&mut self, binding: BindingId) -> AutoplayResult<()> {
        if !self.bindings.contains(binding) {
            return Err(AutoplayError::unknown_scope(format!("{binding:?}")));
        }
        self.remove_binding(binding);
        Ok(())
    }

    /// Drop the pending request and the binding of `slot`, if any.
    pub fn unbind_slot(&mut self, slot: SlotId) -> AutoplayResult<()> {
        if !self.slots.contains_key(&slot) {
            return Err(AutoplayError::unknown_scope(format!("{slot:?}")));
        }
        self.tasks.cancel(Task::Bind(slot));
        if let Some(request) = self.requests.remove(&slot) {
            self.schedule_destroy_orphan(request.media);
        }
        if let Some(binding) = self.binding_for_slot(slot) {
            self.remove_binding(binding);
        }
        Ok(())
    }

    fn resolve_media(
        &mut self,
        tag: Option<MediaTag>,
        descriptor: MediaDescriptor,
        config: MediaConfig,
    ) -> MediaId {
        if let Some(tag) = &tag
            && let Some(&existing) = self.tags.get(tag)
        {
            if self
                .media
                .get(existing)
                .is_some_and(|m| m.descriptor == descriptor && m.config == config)
            {
                return existing;
            }
            info!(?tag, media = ?existing, "tag rebound to different content");
            self.retire_media(existing);
        }
        let id = self
            .media
            .insert_with(|_| MediaItem::new(tag.clone(), descriptor, config));
        if let Some(tag) = tag {
            self.tags.insert(tag, id);
        }
        debug!(media = ?id, "media created");
        id
    }

    fn retire_media(&mut self, media: MediaId) {
        let stale: Vec<SlotId> = self
            .requests
            .iter()
            .filter(|(_, r)| r.media == media)
            .map(|(s, _)| *s)
            .collect();
        for slot in stale {
            self.requests.remove(&slot);
            self.tasks.cancel(Task::Bind(slot));
        }
        if let Some(binding) = self.media_binding(media) {
            self.remove_binding(binding);
        }
        self.teardown(media);
    }

    fn schedule_destroy_orphan(&mut self, media: MediaId) {
        let orphan = self
            .media
            .get(media)
            .is_some_and(|m| m.binding.is_none());
        if orphan && !self.requests.values().any(|r| r.media == media) {
            self.schedule_destroy(media);
        }
    }

    /// Apply the pending request of `slot` if the slot is attached.
    pub(crate) fn run_bind_request(&mut self, slot: SlotId) {
        let attached = self.slots.get(&slot).is_some_and(|e| e.geometry.attached);
        if !attached {
            debug!(?slot, "bind request waits for its slot");
            return;
        }
        let Some(request) = self.requests.remove(&slot) else {
            return;
        };
        self.on_bind(slot, request);
    }

    fn on_bind(&mut self, slot: SlotId, request: BindRequest) {
        let BindRequest { media, options } = request;
        if !self.media.contains(media) {
            return;
        }
        let Some(selection) = self.slots.get(&slot).map(|e| e.selection) else {
            return;
        };
        let Some(scheduler) = self.selections.get(selection).map(|s| s.scheduler) else {
            return;
        };
        self.tasks.cancel(Task::Release(media));
        self.tasks.cancel(Task::Destroy(media));

        let by_media = self.media_binding(media);
        let by_slot = self.binding_for_slot(slot);
        if by_media.is_some() && by_media == by_slot {
            debug!(?slot, ?media, "already bound");
            if let Some(top) = self.top_of_slot(slot) {
                self.request_refresh(top);
            }
            return;
        }
        for stale in [by_media, by_slot].into_iter().flatten() {
            self.remove_binding(stale);
        }
        self.create_binding(media, slot, selection, scheduler, options);
    }

    fn create_binding(
        &mut self,
        media: MediaId,
        slot: SlotId,
        selection: SelectionScopeId,
        scheduler: SchedulerScopeId,
        options: BindOptions,
    ) {
        let previous = self
            .schedulers
            .get(scheduler)
            .and_then(|s| s.bindings.get(&slot).copied());
        if let Some(previous) = previous {
            debug_assert!(false, "{slot:?} already bound by {previous:?}");
            warn!(?slot, ?previous, "slot already bound; removing the older binding");
            self.remove_binding(previous);
        }

        let config = BindingConfig {
            threshold: options.threshold,
            delay_ms: options.delay_ms,
            preload: options.preload,
            repeat_mode: options.repeat_mode,
            controller: options.controller,
        };
        let lock = self.selections.get(selection).is_some_and(|s| s.lock);
        let id = self
            .bindings
            .insert_with(|id| Binding::new(id, media, slot, selection, scheduler, config));
        let Some(binding) = self.bindings.get_mut(id) else {
            return;
        };
        binding.lock = lock;
        binding.add_callbacks(options.callbacks);
        binding.add_listeners(options.listeners);
        binding.transition(BindingState::Added);
        let repeat_mode = binding.config.repeat_mode;
        let callbacks = binding.callbacks();
        if let Some(s) = self.schedulers.get_mut(scheduler) {
            s.bindings.insert(slot, id);
        }

        if let Some(item) = self.media.get_mut(media) {
            // Seeded before the owner change so a saved resume state still wins.
            if let Some(info) = options.initial_resume_state
                && item.state() <= PlayerState::Idle
            {
                item.set_playback_info(info);
            }
            if let Some(player) = item.player.as_mut() {
                player.set_repeat_mode(repeat_mode);
            }
        }
        self.set_media_binding(media, Some(id));
        // Leaving the previous slot scheduled a release that this binding makes moot.
        self.tasks.cancel(Task::Release(media));
        info!(binding = ?id, ?media, ?slot, "binding created");

        for cb in callbacks {
            cb.on_added(id);
        }
        if self.slots.get(&slot).is_some_and(|e| e.geometry.attached) {
            self.attach_binding(id);
        }
        if let Some(top) = self.top_of_slot(slot) {
            self.request_refresh(top);
        }
    }

    /// Tear a binding down through every remaining state and forget it.
    pub(crate) fn remove_binding(&mut self, id: BindingId) {
        let Some(binding) = self.bindings.get(id) else {
            return;
        };
        let (media, slot, scheduler, state) =
            (binding.media, binding.slot, binding.scheduler, binding.state);
        let top = self.top_of_binding(id);

        if let Some(s) = self.schedulers.get_mut(scheduler)
            && s.bindings.get(&slot) == Some(&id)
        {
            s.bindings.remove(&slot);
        }
        if state.is_attached() {
            self.detach_binding(id);
        }

        if let Some(binding) = self.bindings.get_mut(id) {
            binding.transition(BindingState::Removed);
            for cb in binding.callbacks() {
                cb.on_removed(id);
            }
            binding.clear_registrations();
        }
        if let Some(t) = top.and_then(|t| self.tops.get_mut(t)) {
            t.selection.retain(|b| *b != id);
        }
        self.bindings.remove(id);
        if self.media_binding(media) == Some(id) {
            self.set_media_binding(media, None);
        }
        info!(binding = ?id, ?media, ?slot, "binding removed");
        if let Some(top) = top {
            self.request_refresh(top);
        }
    }
}
