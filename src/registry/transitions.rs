//! Binding state transitions and the media-item operations they trigger.

use tracing::{debug, warn};

use crate::binding::state::{BindingState, PRIORITY_UNRANKED};
use crate::foundation::core::{BindingId, MediaId};
use crate::media::engine::{PlayerState, RepeatMode};
use crate::media::item::MediaOwner;
use crate::policy::memory::{MemoryMode, ResourceAction, action_for_priority};
use crate::pool::renderer::{HeldRenderer, Renderer, RendererPlan, plan_renderer};

use super::context::Registry;
use super::dispatch::Task;
use super::resume::ResumeKey;

impl Registry {
    // ---------------------------------------------------------------------------------------------
    // Binding transitions

    pub(crate) fn attach_binding(&mut self, id: BindingId) {
        let Some(binding) = self.bindings.get_mut(id) else {
            return;
        };
        // Hosts may report the same attach twice.
        if binding.state.is_attached() {
            return;
        }
        if !binding.transition(BindingState::Attached) {
            return;
        }
        for cb in binding.callbacks() {
            cb.on_attached(id);
        }
    }

    pub(crate) fn activate_binding(&mut self, id: BindingId) {
        let Some(binding) = self.bindings.get_mut(id) else {
            return;
        };
        if !binding.transition(BindingState::Active) {
            return;
        }
        let media = binding.media;
        let preload = binding.config.preload;
        let callbacks = binding.callbacks();

        self.request_renderer(id);
        self.try_restore(media);
        self.prepare_media(media, preload);
        for cb in callbacks {
            cb.on_active(id);
        }
    }

    pub(crate) fn inactivate_binding(&mut self, id: BindingId) {
        let Some(binding) = self.bindings.get_mut(id) else {
            return;
        };
        if !binding.transition(BindingState::Inactive) {
            return;
        }
        let media = binding.media;
        let callbacks = binding.callbacks();

        self.release_renderer(media);
        for cb in callbacks {
            cb.on_inactive(id);
        }
        // A user-started item keeps its player while it plays off-screen.
        if self.manually_started == Some(media) && self.is_playing(media) {
            return;
        }
        self.try_save(media);
        self.schedule_release(media);
    }

    pub(crate) fn detach_binding(&mut self, id: BindingId) {
        if self.binding_state(id).is_some_and(BindingState::is_active) {
            self.inactivate_binding(id);
        }
        let Some(binding) = self.bindings.get_mut(id) else {
            return;
        };
        if !binding.transition(BindingState::Detached) {
            return;
        }
        binding.priority = PRIORITY_UNRANKED;
        for cb in binding.callbacks() {
            cb.on_detached(id);
        }
        // Untagged state only lives as long as the slot stays attached.
        self.resume.take(&ResumeKey::Binding(id));
    }

    // ---------------------------------------------------------------------------------------------
    // Priority

    /// Store a new eviction priority and apply the resource action it implies.
    pub(crate) fn set_priority(&mut self, id: BindingId, to: u32) {
        let Some(binding) = self.bindings.get_mut(id) else {
            return;
        };
        let from = binding.priority;
        if from == to {
            return;
        }
        binding.priority = to;
        let media = binding.media;
        let preload = binding.config.preload;
        let mode = self
            .schedulers
            .get(binding.scheduler)
            .map_or(MemoryMode::Auto, |s| s.opts.memory_mode)
            .resolve(self.memory_pressure);

        let action = action_for_priority(to, mode, &self.opts.thresholds);
        debug!(binding = ?id, from, to, ?mode, ?action, "priority changed");
        match action {
            ResourceAction::Prepare => {
                self.try_restore(media);
                self.prepare_media(media, preload);
            }
            ResourceAction::Release => {
                if self.manually_started == Some(media) && self.is_playing(media) {
                    return;
                }
                self.try_save(media);
                self.schedule_release(media);
            }
            ResourceAction::Reset => self.reset_media(media, false),
            ResourceAction::Keep => {}
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Players

    /// Make sure `media` holds a player, taking one from the pool or the engine.
    pub(crate) fn ensure_player(&mut self, media: MediaId, load_source: bool) {
        let Some(item) = self.media.get_mut(media) else {
            return;
        };
        if let Some(player) = item.player.as_mut() {
            if load_source {
                player.prepare(&item.descriptor, true);
            }
            return;
        }

        let engine = &mut self.engine;
        let descriptor = &item.descriptor;
        let mut player = self
            .player_pool
            .acquire_or_else(&descriptor.kind, || engine.create_player(descriptor));

        let repeat = item
            .binding
            .and_then(|b| self.bindings.get(b))
            .map_or(RepeatMode::Off, |b| b.config.repeat_mode);
        player.set_repeat_mode(repeat);
        player.set_playback_info(item.cached_info);
        player.attach_renderer(item.renderer.map(|h| h.renderer));
        player.prepare(&item.descriptor, load_source);
        item.player = Some(player);
        debug!(?media, load_source, "player acquired");
    }

    pub(crate) fn prepare_media(&mut self, media: MediaId, preload: bool) {
        self.tasks.cancel(Task::Release(media));
        if preload {
            self.ensure_player(media, true);
        }
    }

    pub(crate) fn ready_media(&mut self, media: MediaId) {
        self.tasks.cancel(Task::Release(media));
        self.ensure_player(media, false);
        if let Some(player) = self.media.get_mut(media).and_then(|m| m.player.as_mut()) {
            player.ready();
        }
    }

    pub(crate) fn reset_media(&mut self, media: MediaId, full: bool) {
        if let Some(item) = self.media.get_mut(media) {
            item.reset(full);
        }
    }

    pub(crate) fn schedule_release(&mut self, media: MediaId) {
        if self.media.contains(media) {
            self.tasks
                .post(Task::Release(media), self.opts.release_delay_ms);
        }
    }

    /// Hand the player of `media` back to the pool, destroying it if the pool refuses.
    pub(crate) fn release_media_now(&mut self, media: MediaId) {
        self.tasks.cancel(Task::Release(media));
        self.release_renderer(media);
        let Some(item) = self.media.get_mut(media) else {
            return;
        };
        let Some(player) = item.take_player() else {
            return;
        };
        let recyclable = self.engine.recycle_player_for(&item.descriptor);
        let pooled = match self
            .player_pool
            .release(&item.descriptor.kind, player, recyclable)
        {
            Some(refused) => {
                self.engine.destroy_player(refused);
                false
            }
            None => true,
        };
        debug!(?media, pooled, "player released");
    }

    pub(crate) fn schedule_destroy(&mut self, media: MediaId) {
        if self.media.contains(media) {
            self.tasks
                .post(Task::Destroy(media), self.opts.destroy_delay_ms);
        }
    }

    /// Destroy `media` unless it found a new binding, owner or bind request meanwhile.
    pub(crate) fn destroy_media_now(&mut self, media: MediaId) {
        let Some(item) = self.media.get(media) else {
            return;
        };
        if item.binding.is_some() || item.owner != MediaOwner::None {
            return;
        }
        if self.requests.values().any(|r| r.media == media) {
            return;
        }
        self.teardown(media);
    }

    /// Stop, save, release and forget a media item.
    pub(crate) fn teardown(&mut self, media: MediaId) {
        for task in [Task::Release(media), Task::Destroy(media), Task::Play(media)] {
            self.tasks.cancel(task);
        }
        if let Some(item) = self.media.get_mut(media) {
            item.pause();
        }
        self.try_save(media);
        self.release_media_now(media);
        let Some(item) = self.media.remove(media) else {
            return;
        };
        if let Some(tag) = &item.tag
            && self.tags.get(tag) == Some(&media)
        {
            self.tags.remove(tag);
            self.pending_actions.remove(tag);
        }
        if self.manually_started == Some(media) {
            self.manually_started = None;
        }
        debug!(?media, tag = ?item.tag, "media destroyed");
    }

    // ---------------------------------------------------------------------------------------------
    // Ownership

    pub(crate) fn set_media_binding(&mut self, media: MediaId, binding: Option<BindingId>) {
        let Some(item) = self.media.get_mut(media) else {
            return;
        };
        item.binding = binding;
        let owner = match binding.and_then(|b| self.bindings.get(b)) {
            Some(b) => MediaOwner::Scheduler(b.scheduler),
            None if self.manually_started == Some(media) && item.is_playing() => {
                MediaOwner::Registry
            }
            None => MediaOwner::None,
        };
        self.set_media_owner(media, owner);
    }

    pub(crate) fn set_media_owner(&mut self, media: MediaId, owner: MediaOwner) {
        let Some(item) = self.media.get_mut(media) else {
            return;
        };
        let old = item.owner;
        if old == owner {
            return;
        }
        item.owner = owner;
        debug!(?media, ?old, new = ?owner, "media owner changed");
        match (old, owner) {
            (_, MediaOwner::None) => {
                self.try_save(media);
                self.schedule_destroy(media);
            }
            (MediaOwner::None, _) => {
                self.tasks.cancel(Task::Destroy(media));
                self.try_restore(media);
            }
            _ => {}
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Resume state

    fn resume_key(&self, media: MediaId, require_attached: bool) -> Option<ResumeKey> {
        let item = self.media.get(media)?;
        if let Some(tag) = &item.tag {
            return Some(ResumeKey::Tag(tag.clone()));
        }
        let binding = item.binding?;
        let attached = self
            .bindings
            .get(binding)
            .is_some_and(|b| b.state.is_attached());
        (attached || !require_attached).then_some(ResumeKey::Binding(binding))
    }

    /// Remember the resume state of `media` unless an entry already exists.
    pub(crate) fn try_save(&mut self, media: MediaId) {
        let Some(key) = self.resume_key(media, true) else {
            return;
        };
        let Some(info) = self.media.get(media).map(|m| m.playback_info()) else {
            return;
        };
        if self.resume.try_save(key.clone(), info) {
            debug!(?media, ?key, ?info, "resume state saved");
        }
    }

    /// Consume the saved resume state of `media`, applying it while the player is still idle.
    pub(crate) fn try_restore(&mut self, media: MediaId) {
        let Some(key) = self.resume_key(media, false) else {
            return;
        };
        let Some(info) = self.resume.take(&key) else {
            return;
        };
        let Some(item) = self.media.get_mut(media) else {
            return;
        };
        if item.state() <= PlayerState::Idle {
            item.set_playback_info(info);
            debug!(?media, ?key, ?info, "resume state restored");
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Renderers

    pub(crate) fn request_renderer(&mut self, id: BindingId) {
        let Some(binding) = self.bindings.get(id) else {
            return;
        };
        let (media, slot) = (binding.media, binding.slot);
        let Some(item) = self.media.get(media) else {
            return;
        };
        if item.renderer.is_some() {
            return;
        }
        let Some(entry) = self.slots.get(&slot) else {
            return;
        };
        let plan = match plan_renderer(entry.kind, item.descriptor.kind, item.config.renderer) {
            Ok(plan) => plan,
            Err(err) => {
                warn!(binding = ?id, %err, "no renderer for binding");
                return;
            }
        };

        let held = match plan {
            RendererPlan::None => return,
            RendererPlan::Slot => HeldRenderer {
                slot,
                renderer: Renderer::Slot(slot),
                key: None,
            },
            RendererPlan::Pooled(key) => {
                let host = &mut self.renderers;
                let Some(handle) = self
                    .renderer_pool
                    .acquire_with(&key, || host.create_renderer(&key))
                else {
                    debug!(binding = ?id, ?key, "renderer host declined");
                    return;
                };
                self.renderers.on_renderer_attached(slot, handle);
                HeldRenderer {
                    slot,
                    renderer: Renderer::Pooled(handle),
                    key: Some(key),
                }
            }
        };

        if let Some(item) = self.media.get_mut(media) {
            item.renderer = Some(held);
            if let Some(player) = item.player.as_mut() {
                player.attach_renderer(Some(held.renderer));
            }
        }
        debug!(binding = ?id, renderer = ?held.renderer, "renderer attached");
    }

    pub(crate) fn release_renderer(&mut self, media: MediaId) {
        let Some(item) = self.media.get_mut(media) else {
            return;
        };
        let Some(held) = item.renderer.take() else {
            return;
        };
        if let Some(player) = item.player.as_mut() {
            player.attach_renderer(None);
        }
        if let (Renderer::Pooled(handle), Some(key)) = (held.renderer, held.key) {
            self.renderers.on_renderer_detached(held.slot, handle);
            if let Some(refused) = self.renderer_pool.release(&key, handle, true) {
                self.renderers.destroy_renderer(refused);
            }
        }
        debug!(?media, renderer = ?held.renderer, "renderer released");
    }
}
