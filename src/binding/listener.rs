use crate::foundation::core::{BindingId, SchedulerScopeId};

/// Lifecycle callbacks of one binding. Every method defaults to a no-op.
///
/// Callbacks run synchronously inside registry calls and must not call back into the registry.
pub trait BindingCallback {
    /// The binding joined its scheduler scope.
    fn on_added(&self, binding: BindingId) {
        let _ = binding;
    }
    /// The slot was attached.
    fn on_attached(&self, binding: BindingId) {
        let _ = binding;
    }
    /// The slot became preparable.
    fn on_active(&self, binding: BindingId) {
        let _ = binding;
    }
    /// The slot stopped being preparable.
    fn on_inactive(&self, binding: BindingId) {
        let _ = binding;
    }
    /// The slot was detached.
    fn on_detached(&self, binding: BindingId) {
        let _ = binding;
    }
    /// The binding is gone. No further callback is delivered.
    fn on_removed(&self, binding: BindingId) {
        let _ = binding;
    }
}

/// Playback events forwarded from the media engine.
pub trait PlaybackListener {
    /// The player is loading data.
    fn on_buffering(&self, binding: BindingId, play_when_ready: bool) {
        let _ = (binding, play_when_ready);
    }
    /// Playback is running.
    fn on_playing(&self, binding: BindingId) {
        let _ = binding;
    }
    /// Playback is paused while ready.
    fn on_paused(&self, binding: BindingId) {
        let _ = binding;
    }
    /// Playback reached the end.
    fn on_ended(&self, binding: BindingId) {
        let _ = binding;
    }
    /// The decoded video size changed.
    fn on_video_size_changed(&self, binding: BindingId, width: u32, height: u32) {
        let _ = (binding, width, height);
    }
    /// The first frame reached the renderer.
    fn on_rendered_first_frame(&self, binding: BindingId) {
        let _ = binding;
    }
    /// The engine failed. The scheduler never retries on its own.
    fn on_error(&self, binding: BindingId, error: &anyhow::Error) {
        let _ = (binding, error);
    }
}

/// Marks a binding as user-controlled and decides how much the scheduler may do on its own.
///
/// With the defaults the binding is fully manual: it only starts after [`crate::Registry::play`]
/// and the scheduler may still pause it when it scrolls away.
pub trait ManualController {
    /// Whether the scheduler may start playback without a user action.
    fn can_start(&self) -> bool {
        false
    }

    /// Whether the scheduler may pause playback the user started.
    fn can_pause(&self) -> bool {
        true
    }
}

/// Receives the bindings selected under one scheduler scope after each dispatch.
pub trait SelectionObserver {
    /// `selection` may be empty when another scope holds the selection.
    fn on_selection(&self, scope: SchedulerScopeId, selection: &[BindingId]);
}
