use crate::foundation::core::{BindingId, MediaTag, SchedulerScopeId};
use crate::pool::renderer::HeldRenderer;

use super::engine::{MediaPlayer, PlayerState};

/// Broad media family. Players are pooled per kind.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Video with an audio track.
    #[default]
    Video,
    /// Audio only.
    Audio,
}

/// What to play.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct MediaDescriptor {
    /// Location of the media, opaque to the scheduler.
    pub uri: String,
    /// Media family.
    #[serde(default)]
    pub kind: MediaKind,
}

impl MediaDescriptor {
    /// Video descriptor for `uri`.
    pub fn video(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            kind: MediaKind::Video,
        }
    }

    /// Audio descriptor for `uri`.
    pub fn audio(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            kind: MediaKind::Audio,
        }
    }
}

/// Render target type a media item needs.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    /// A surface; a surface slot can render it directly.
    #[default]
    Surface,
    /// An offscreen texture that must be placed inside a container slot.
    Texture,
    /// Nothing to render (audio).
    None,
}

/// Capability config of a media item. Rebinding a tag with a different config recreates the item.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct MediaConfig {
    /// Render target type.
    pub renderer: RendererKind,
}

/// Resume state of a media item.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PlaybackInfo {
    /// Index of the item in a playlist.
    pub resume_window: u32,
    /// Position inside that item, in milliseconds.
    pub resume_position_ms: u64,
}

impl PlaybackInfo {
    /// Resume state at `position_ms` of the first window.
    pub fn at(position_ms: u64) -> Self {
        Self {
            resume_window: 0,
            resume_position_ms: position_ms,
        }
    }
}

/// Who keeps a media item alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MediaOwner {
    /// Nobody: the item is scheduled for destruction.
    None,
    /// The scheduler scope of its current binding.
    Scheduler(SchedulerScopeId),
    /// The registry itself, for a manually started item that outlived its binding.
    Registry,
}

pub(crate) struct MediaItem {
    pub(crate) tag: Option<MediaTag>,
    pub(crate) descriptor: MediaDescriptor,
    pub(crate) config: MediaConfig,
    pub(crate) player: Option<Box<dyn MediaPlayer>>,
    pub(crate) renderer: Option<HeldRenderer>,
    pub(crate) binding: Option<BindingId>,
    pub(crate) owner: MediaOwner,
    pub(crate) play_requested: bool,
    /// Resume state kept while no player is held.
    pub(crate) cached_info: PlaybackInfo,
}

impl MediaItem {
    pub(crate) fn new(
        tag: Option<MediaTag>,
        descriptor: MediaDescriptor,
        config: MediaConfig,
    ) -> Self {
        Self {
            tag,
            descriptor,
            config,
            player: None,
            renderer: None,
            binding: None,
            owner: MediaOwner::None,
            play_requested: false,
            cached_info: PlaybackInfo::default(),
        }
    }

    pub(crate) fn state(&self) -> PlayerState {
        self.player
            .as_ref()
            .map_or(PlayerState::Idle, |player| player.state())
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.player.as_ref().is_some_and(|player| player.is_playing())
    }

    pub(crate) fn playback_info(&self) -> PlaybackInfo {
        self.player
            .as_ref()
            .map_or(self.cached_info, |player| player.playback_info())
    }

    pub(crate) fn set_playback_info(&mut self, info: PlaybackInfo) {
        self.cached_info = info;
        if let Some(player) = self.player.as_mut() {
            player.set_playback_info(info);
        }
    }

    /// Start playback unless it is already running.
    pub(crate) fn play(&mut self) {
        let playing = self.is_playing();
        if let Some(player) = self.player.as_mut()
            && (!self.play_requested || !playing)
        {
            self.play_requested = true;
            player.play();
        }
    }

    /// Pause playback if it was requested or is running.
    pub(crate) fn pause(&mut self) {
        let playing = self.is_playing();
        if let Some(player) = self.player.as_mut()
            && (self.play_requested || playing)
        {
            self.play_requested = false;
            player.pause();
        }
    }

    pub(crate) fn reset(&mut self, full: bool) {
        if full {
            self.cached_info = PlaybackInfo::default();
        }
        if let Some(player) = self.player.as_mut() {
            player.reset(full);
        }
    }

    /// Detach the player so the caller can pool it. The resume state is kept in the item.
    pub(crate) fn take_player(&mut self) -> Option<Box<dyn MediaPlayer>> {
        let mut player = self.player.take()?;
        self.cached_info = player.playback_info();
        self.play_requested = false;
        player.attach_renderer(None);
        player.release();
        Some(player)
    }
}

impl std::fmt::Debug for MediaItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaItem")
            .field("tag", &self.tag)
            .field("uri", &self.descriptor.uri)
            .field("binding", &self.binding)
            .field("owner", &self.owner)
            .field("has_player", &self.player.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/item.rs"]
mod tests;
