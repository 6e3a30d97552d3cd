use std::fmt;
use std::rc::Rc;

use crate::foundation::core::MediaTag;
use crate::foundation::error::{AutoplayError, AutoplayResult};
use crate::media::engine::RepeatMode;
use crate::media::item::PlaybackInfo;
use crate::visibility::token::DEFAULT_THRESHOLD;

use super::listener::{BindingCallback, ManualController, PlaybackListener};

/// Request consumed by one [`crate::Registry::bind`] call.
///
/// ```
/// use autoplay::BindOptions;
///
/// let opts = BindOptions::new().tag("intro").threshold(0.5).preload(true);
/// assert_eq!(opts.threshold, 0.5);
/// ```
#[derive(Clone)]
pub struct BindOptions {
    /// Stable identity. Items without a tag are never shared between binds.
    pub tag: Option<MediaTag>,
    /// Visible fraction required to play.
    pub threshold: f64,
    /// Delay before a selected binding actually starts, in milliseconds.
    pub delay_ms: u64,
    /// Start loading data as soon as the binding is preparable.
    pub preload: bool,
    /// Repeat mode applied when the binding is added.
    pub repeat_mode: RepeatMode,
    /// Makes the binding user-controlled.
    pub controller: Option<Rc<dyn ManualController>>,
    /// Resume state applied when the item has not started yet.
    pub initial_resume_state: Option<PlaybackInfo>,
    /// Lifecycle callbacks registered on the new binding.
    pub callbacks: Vec<Rc<dyn BindingCallback>>,
    /// Playback listeners registered on the new binding.
    pub listeners: Vec<Rc<dyn PlaybackListener>>,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            tag: None,
            threshold: DEFAULT_THRESHOLD,
            delay_ms: 0,
            preload: false,
            repeat_mode: RepeatMode::Off,
            controller: None,
            initial_resume_state: None,
            callbacks: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

impl fmt::Debug for BindOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindOptions")
            .field("tag", &self.tag)
            .field("threshold", &self.threshold)
            .field("delay_ms", &self.delay_ms)
            .field("preload", &self.preload)
            .field("repeat_mode", &self.repeat_mode)
            .field("manual", &self.controller.is_some())
            .field("initial_resume_state", &self.initial_resume_state)
            .field("callbacks", &self.callbacks.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl BindOptions {
    /// Options with every default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stable tag.
    pub fn tag(mut self, tag: impl Into<MediaTag>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the play threshold.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the play delay.
    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Enable or disable preloading.
    pub fn preload(mut self, preload: bool) -> Self {
        self.preload = preload;
        self
    }

    /// Set the repeat mode.
    pub fn repeat_mode(mut self, mode: RepeatMode) -> Self {
        self.repeat_mode = mode;
        self
    }

    /// Make the binding user-controlled.
    pub fn controller(mut self, controller: Rc<dyn ManualController>) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Seed the resume state.
    pub fn initial_resume_state(mut self, info: PlaybackInfo) -> Self {
        self.initial_resume_state = Some(info);
        self
    }

    /// Register a lifecycle callback.
    pub fn callback(mut self, callback: Rc<dyn BindingCallback>) -> Self {
        self.callbacks.push(callback);
        self
    }

    /// Register a playback listener.
    pub fn listener(mut self, listener: Rc<dyn PlaybackListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub(crate) fn validate(&self) -> AutoplayResult<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(AutoplayError::validation(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if let Some(tag) = &self.tag
            && tag.as_str().is_empty()
        {
            return Err(AutoplayError::validation("tag must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binding/options.rs"]
mod tests;
