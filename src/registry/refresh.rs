//! The refresh cycle of a top scope and the play/pause dispatch that follows it.

use tracing::{debug, info};

use crate::foundation::core::{
    BindingId, LifecycleState, MediaId, Rect, SchedulerScopeId, TopScopeId,
};
use crate::policy::priority::{RankInput, rank_priorities};
use crate::scope::scheduler::{ScopedCandidate, Split, split_bindings};
use crate::scope::selection::{Candidate, SelectionScope};
use crate::scope::top::RefreshOutcome;
use crate::visibility::token::{Token, compute_token};

use super::context::{Registry, UserAction};
use super::dispatch::Task;

impl Registry {
    /// Run one refresh cycle of `top` right away.
    ///
    /// Tokens are recomputed, binding states follow the tokens, every scheduler scope splits its
    /// bindings, the new selection is ranked and finally pause is dispatched before play.
    #[tracing::instrument(level = "debug", skip(self))]
    pub(crate) fn refresh_now(&mut self, top: TopScopeId) {
        self.tasks.cancel(Task::Refresh(top));
        let Some(t) = self.tops.get(top) else {
            return;
        };
        let schedulers = t.scheduler_order();
        let targets = match t.sticky() {
            Some(sticky) => vec![sticky],
            None => schedulers.clone(),
        };
        let gate_open = !self.global_lock
            && !t.lock
            && t.lifecycle >= LifecycleState::Started
            && t.lifecycle >= self.max_top_lifecycle();
        let old_selection = t.selection.clone();

        for s in &schedulers {
            self.update_tokens(*s);
            self.update_binding_states(*s);
        }

        let mut to_play: Vec<BindingId> = Vec::new();
        let mut to_pause: Vec<BindingId> = Vec::new();
        for s in &targets {
            let split = self.split_scheduler(*s);
            push_unique(&mut to_play, split.to_play);
            push_unique(&mut to_pause, split.to_pause);
        }

        let selection: Vec<BindingId> = if gate_open {
            to_play
                .iter()
                .copied()
                .filter(|b| self.bindings.get(*b).is_some_and(|b| !b.lock))
                .collect()
        } else {
            Vec::new()
        };
        if let Some(t) = self.tops.get_mut(top) {
            t.selection = selection.clone();
        }

        self.update_priorities(&schedulers, &selection);

        let mut paused: Vec<BindingId> = Vec::new();
        push_unique(&mut paused, to_pause.iter().copied());
        push_unique(&mut paused, to_play.iter().copied());
        push_unique(&mut paused, old_selection);
        paused.retain(|b| !selection.contains(b));
        for b in &paused {
            if let Some(media) = self.binding_media(*b) {
                self.dispatch_pause(media);
            }
        }
        for b in &selection {
            if let Some(media) = self.binding_media(*b) {
                self.dispatch_play(media);
            }
        }

        if !selection.is_empty() {
            for s in &schedulers {
                let Some(scope) = self.schedulers.get(*s) else {
                    continue;
                };
                let own: Vec<BindingId> = selection
                    .iter()
                    .copied()
                    .filter(|b| self.bindings.get(*b).is_some_and(|b| b.scheduler == *s))
                    .collect();
                for observer in scope.observers.clone() {
                    observer.on_selection(*s, &own);
                }
            }
        }

        let outcome = RefreshOutcome {
            to_play,
            to_pause,
            selection,
        };
        if self
            .tops
            .get(top)
            .and_then(|t| t.last_refresh.as_ref())
            .is_none_or(|last| last.selection != outcome.selection)
        {
            info!(?top, selection = ?outcome.selection, "selection changed");
        }
        debug!(?top, ?outcome, "refresh done");
        if let Some(t) = self.tops.get_mut(top) {
            t.last_refresh = Some(outcome);
        }
    }

    fn update_tokens(&mut self, scheduler: SchedulerScopeId) {
        let Some(s) = self.schedulers.get(scheduler) else {
            return;
        };
        let started = s.is_started();
        for (slot, id) in &s.bindings {
            let Some(binding) = self.bindings.get_mut(*id) else {
                continue;
            };
            binding.token = match self.slots.get(slot) {
                Some(entry) => compute_token(&entry.geometry, binding.config.threshold, started),
                None => Token::hidden(binding.config.threshold),
            };
        }
    }

    fn update_binding_states(&mut self, scheduler: SchedulerScopeId) {
        let Some(s) = self.schedulers.get(scheduler) else {
            return;
        };
        let ids: Vec<BindingId> = s.bindings.values().copied().collect();
        for id in ids {
            let Some(binding) = self.bindings.get(id) else {
                continue;
            };
            if !binding.state.is_attached() {
                continue;
            }
            let prepare = binding.token.should_prepare();
            if prepare && !binding.state.is_active() {
                self.activate_binding(id);
            } else if !prepare && binding.state.is_active() {
                self.inactivate_binding(id);
            }
        }
    }

    fn split_scheduler(&self, scheduler: SchedulerScopeId) -> Split {
        let Some(s) = self.schedulers.get(scheduler) else {
            return Split::default();
        };
        let order: Vec<&SelectionScope> = s
            .selection_order()
            .into_iter()
            .filter_map(|id| self.selections.get(id))
            .collect();
        let candidates: Vec<ScopedCandidate> = s
            .bindings
            .values()
            .filter_map(|b| self.candidate(*b))
            .collect();
        split_bindings(&order, &candidates, s.can_play())
    }

    fn candidate(&self, id: BindingId) -> Option<ScopedCandidate> {
        let binding = self.bindings.get(id)?;
        let item = self.media.get(binding.media)?;
        let manual = binding.is_manual() && item.tag.is_some();
        let started = self.manually_started == Some(binding.media);
        let pending_play = item
            .tag
            .as_ref()
            .is_some_and(|t| self.pending_actions.get(t) == Some(&UserAction::Play));
        Some(ScopedCandidate {
            scope: binding.selection,
            candidate: Candidate {
                binding: id,
                media: binding.media,
                slot: binding.slot,
                token: binding.token,
                attached: binding.state.is_attached(),
                manual,
                user_started: started || pending_play,
            },
            pinned: manual && started,
        })
    }

    fn update_priorities(&mut self, schedulers: &[SchedulerScopeId], selection: &[BindingId]) {
        let selected: Vec<(BindingId, Rect)> = selection
            .iter()
            .filter_map(|b| self.bindings.get(*b).map(|x| (*b, x.token.rect)))
            .collect();
        let others: Vec<RankInput> = schedulers
            .iter()
            .filter_map(|s| self.schedulers.get(*s))
            .flat_map(|s| s.bindings.values().copied())
            .filter(|b| !selection.contains(b))
            .filter_map(|b| {
                let binding = self.bindings.get(b)?;
                Some(RankInput {
                    binding: b,
                    attached: binding.state.is_attached(),
                    rect: binding.token.rect,
                    previous: binding.priority,
                })
            })
            .collect();
        for (binding, priority) in rank_priorities(&selected, &others) {
            self.set_priority(binding, priority);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Dispatch

    pub(crate) fn dispatch_play(&mut self, media: MediaId) {
        self.ready_media(media);
        let Some(item) = self.media.get(media) else {
            return;
        };
        let controller = item
            .binding
            .and_then(|b| self.bindings.get(b))
            .and_then(|b| b.config.controller.clone());
        let (Some(tag), Some(controller)) = (item.tag.clone(), controller) else {
            self.just_play(media);
            return;
        };
        if self.manually_started.is_some_and(|m| m != media) {
            self.just_pause(media);
            return;
        }
        match self.pending_actions.get(&tag) {
            Some(UserAction::Play) => self.just_play(media),
            Some(UserAction::Pause) => self.just_pause(media),
            None if controller.can_start() => self.just_play(media),
            None => {}
        }
    }

    pub(crate) fn dispatch_pause(&mut self, media: MediaId) {
        if self.tops.values().any(|t| !t.selection.is_empty()) {
            self.just_pause(media);
            return;
        }
        let Some(item) = self.media.get(media) else {
            return;
        };
        let controller = item
            .binding
            .and_then(|b| self.bindings.get(b))
            .and_then(|b| b.config.controller.clone());
        let (Some(tag), Some(controller)) = (item.tag.clone(), controller) else {
            self.just_pause(media);
            return;
        };
        let other_started = self.manually_started.is_some_and(|m| m != media);
        let pending_pause = self.pending_actions.get(&tag) == Some(&UserAction::Pause);
        if other_started || pending_pause || controller.can_pause() {
            self.just_pause(media);
        }
    }

    fn just_play(&mut self, media: MediaId) {
        self.tasks.cancel(Task::Play(media));
        let Some(item) = self.media.get_mut(media) else {
            return;
        };
        let delay_ms = item
            .binding
            .and_then(|b| self.bindings.get(b))
            .map_or(0, |b| b.config.delay_ms);
        if delay_ms > 0 && !item.is_playing() {
            debug!(?media, delay_ms, "play delayed");
            self.tasks.post(Task::Play(media), delay_ms);
        } else {
            item.play();
        }
    }

    fn just_pause(&mut self, media: MediaId) {
        self.tasks.cancel(Task::Play(media));
        if let Some(item) = self.media.get_mut(media) {
            item.pause();
        }
    }
}

fn push_unique(out: &mut Vec<BindingId>, items: impl IntoIterator<Item = BindingId>) {
    for b in items {
        if !out.contains(&b) {
            out.push(b);
        }
    }
}
