//! Entry points for host, engine and user events.

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::binding::listener::PlaybackListener;
use crate::foundation::core::{BindingId, LifecycleState, MediaId, SlotId};
use crate::foundation::error::{AutoplayError, AutoplayResult};
use crate::media::engine::PlayerState;
use crate::media::item::MediaOwner;
use crate::visibility::token::SlotGeometry;

use super::context::{LifecycleScope, Registry, UserAction};
use super::dispatch::Task;
use super::resume::ResumeKey;

impl Registry {
    // ---------------------------------------------------------------------------------------------
    // Host framework

    /// New geometry for `slot`: scrolling, layout or an attach flip.
    pub fn on_geometry_changed(&mut self, slot: SlotId, geometry: SlotGeometry) -> AutoplayResult<()> {
        let entry = self
            .slots
            .get_mut(&slot)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{slot:?}")))?;
        let was_attached = entry.geometry.attached;
        entry.geometry = geometry;
        match (was_attached, geometry.attached) {
            (false, true) => self.on_attached(slot),
            (true, false) => self.on_detached(slot),
            _ => {
                if let Some(top) = self.top_of_slot(slot) {
                    self.request_refresh(top);
                }
                Ok(())
            }
        }
    }

    /// `slot` joined the active surface.
    pub fn on_attached(&mut self, slot: SlotId) -> AutoplayResult<()> {
        let entry = self
            .slots
            .get_mut(&slot)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{slot:?}")))?;
        entry.geometry.attached = true;
        debug!(?slot, "slot attached");
        if self.requests.contains_key(&slot) {
            self.tasks.cancel(Task::Bind(slot));
            self.run_bind_request(slot);
        } else if let Some(binding) = self.binding_for_slot(slot) {
            self.attach_binding(binding);
        }
        if let Some(top) = self.top_of_slot(slot) {
            self.request_refresh(top);
        }
        Ok(())
    }

    /// `slot` left the active surface. Its binding stays, detached.
    pub fn on_detached(&mut self, slot: SlotId) -> AutoplayResult<()> {
        let entry = self
            .slots
            .get_mut(&slot)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{slot:?}")))?;
        entry.geometry.attached = false;
        debug!(?slot, "slot detached");
        if let Some(binding) = self.binding_for_slot(slot) {
            self.detach_binding(binding);
        }
        if let Some(top) = self.top_of_slot(slot) {
            self.request_refresh(top);
        }
        Ok(())
    }

    /// Host lifecycle change of a top or scheduler scope. `Destroyed` unregisters the scope.
    pub fn on_lifecycle_state_changed(
        &mut self,
        scope: impl Into<LifecycleScope>,
        state: LifecycleState,
    ) -> AutoplayResult<()> {
        let scope = scope.into();
        info!(?scope, ?state, "lifecycle changed");
        match scope {
            LifecycleScope::Top(top) => {
                if state == LifecycleState::Destroyed {
                    return self.unregister_top_scope(top);
                }
                self.top_mut(top)?.lifecycle = state;
                // Another window may have lost or won the foreground.
                self.request_refresh_all();
            }
            LifecycleScope::Scheduler(id) => {
                if state == LifecycleState::Destroyed {
                    return self.unregister_scheduler_scope(id);
                }
                let s = self
                    .schedulers
                    .get_mut(id)
                    .ok_or_else(|| AutoplayError::unknown_scope(format!("{id:?}")))?;
                s.lifecycle = state;
                let top = s.top;
                if state < LifecycleState::Started {
                    let active: Vec<BindingId> = s
                        .bindings
                        .values()
                        .copied()
                        .filter(|b| self.bindings.get(*b).is_some_and(|b| b.state.is_active()))
                        .collect();
                    for b in active {
                        self.inactivate_binding(b);
                    }
                }
                self.request_refresh(top);
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // Media engine

    /// Engine state change of the player held by `media`.
    pub fn on_player_state_changed(
        &mut self,
        media: MediaId,
        play_when_ready: bool,
        state: PlayerState,
    ) {
        let Some((binding, listeners)) = self.listeners_of(media) else {
            debug!(?media, ?state, "player state for unbound media");
            return;
        };
        debug!(?media, ?binding, play_when_ready, ?state, "player state changed");
        for l in listeners {
            match state {
                PlayerState::Idle => {}
                PlayerState::Buffering => l.on_buffering(binding, play_when_ready),
                PlayerState::Ready if play_when_ready => l.on_playing(binding),
                PlayerState::Ready => l.on_paused(binding),
                PlayerState::Ended => l.on_ended(binding),
            }
        }
    }

    /// Engine error. Delivered to the playback listeners of the binding; never retried.
    pub fn on_player_error(&mut self, media: MediaId, error: &anyhow::Error) {
        warn!(?media, error = %error, "player error");
        if let Some((binding, listeners)) = self.listeners_of(media) {
            for l in listeners {
                l.on_error(binding, error);
            }
        }
    }

    /// The video size of `media` changed.
    pub fn on_video_size_changed(&mut self, media: MediaId, width: u32, height: u32) {
        if let Some((binding, listeners)) = self.listeners_of(media) {
            for l in listeners {
                l.on_video_size_changed(binding, width, height);
            }
        }
    }

    /// The first frame of `media` was rendered.
    pub fn on_rendered_first_frame(&mut self, media: MediaId) {
        if let Some((binding, listeners)) = self.listeners_of(media) {
            for l in listeners {
                l.on_rendered_first_frame(binding);
            }
        }
    }

    fn listeners_of(
        &self,
        media: MediaId,
    ) -> Option<(BindingId, Vec<Rc<dyn PlaybackListener>>)> {
        let binding = self.media.get(media)?.binding?;
        Some((binding, self.bindings.get(binding)?.listeners()))
    }

    // ---------------------------------------------------------------------------------------------
    // User control

    /// User asked `media` to play.
    ///
    /// Only tagged media bound with a [`crate::ManualController`] are affected. When the
    /// controller forbids automatic pauses the item becomes the manually started one and stays
    /// selected even off-screen.
    pub fn play(&mut self, media: MediaId) -> AutoplayResult<()> {
        let item = self
            .media
            .get(media)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{media:?}")))?;
        let Some(tag) = item.tag.clone() else {
            debug!(?media, "play ignored for untagged media");
            return Ok(());
        };
        let binding = item.binding;
        let controller = binding
            .and_then(|b| self.bindings.get(b))
            .and_then(|b| b.config.controller.clone());
        if let Some(controller) = controller {
            if !controller.can_pause() {
                self.manually_started = Some(media);
            }
            self.pending_actions.insert(tag, UserAction::Play);
            info!(?media, "manual play");
        }
        if let Some(top) = binding.and_then(|b| self.top_of_binding(b)) {
            self.request_refresh(top);
        }
        Ok(())
    }

    /// User asked `media` to pause.
    pub fn pause(&mut self, media: MediaId) -> AutoplayResult<()> {
        let item = self
            .media
            .get(media)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{media:?}")))?;
        let Some(tag) = item.tag.clone() else {
            debug!(?media, "pause ignored for untagged media");
            return Ok(());
        };
        let Some(binding) = item.binding else {
            // A user-started item playing past its binding.
            if self.manually_started == Some(media) {
                self.manually_started = None;
                if let Some(item) = self.media.get_mut(media) {
                    item.pause();
                }
                self.set_media_owner(media, MediaOwner::None);
                info!(?media, "manual pause of unbound media");
            }
            return Ok(());
        };
        let manual = self.bindings.get(binding).is_some_and(|b| b.is_manual());
        if manual {
            self.pending_actions.insert(tag, UserAction::Pause);
            if self.manually_started == Some(media) {
                self.manually_started = None;
            }
            info!(?media, "manual pause");
        }
        if let Some(top) = self.top_of_binding(binding) {
            self.request_refresh(top);
        }
        Ok(())
    }

    /// Restart the media of `binding` from the beginning.
    pub fn rewind(&mut self, binding: BindingId) -> AutoplayResult<()> {
        let media = self
            .binding_media(binding)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{binding:?}")))?;
        if let Some(tag) = self.media.get(media).and_then(|m| m.tag.clone()) {
            self.resume.take(&ResumeKey::Tag(tag));
        }
        self.resume.take(&ResumeKey::Binding(binding));
        self.reset_media(media, true);
        debug!(?binding, ?media, "rewind");
        if let Some(top) = self.top_of_binding(binding) {
            self.request_refresh(top);
        }
        Ok(())
    }

    /// Seek `media` to `position_ms`, or remember the position when it holds no player.
    pub fn seek(&mut self, media: MediaId, position_ms: u64) -> AutoplayResult<()> {
        let item = self
            .media
            .get_mut(media)
            .ok_or_else(|| AutoplayError::unknown_scope(format!("{media:?}")))?;
        match item.player.as_mut() {
            Some(player) => player.seek(position_ms),
            None => item.cached_info.resume_position_ms = position_ms,
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // Housekeeping

    /// Destroy media the registry kept alive for the user but that stopped playing.
    pub(crate) fn cleanup_registry_owned(&mut self) {
        let stale: Vec<MediaId> = self
            .media
            .iter()
            .filter(|&(&id, item)| {
                item.owner == MediaOwner::Registry
                    && !(self.manually_started == Some(id) && item.is_playing())
            })
            .map(|(&id, _)| id)
            .collect();
        for media in stale {
            debug!(?media, "cleanup of registry-owned media");
            self.set_media_owner(media, MediaOwner::None);
        }
    }
}
