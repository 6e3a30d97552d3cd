use crate::media::item::{MediaDescriptor, PlaybackInfo};
use crate::pool::renderer::Renderer;

/// Coarse engine state, ordered by playback progress.
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
pub enum PlayerState {
    /// Nothing loaded, or released.
    #[default]
    Idle,
    /// Loading data.
    Buffering,
    /// Able to render immediately.
    Ready,
    /// Reached the end of the media.
    Ended,
}

/// Repeat behaviour applied to a player when a binding is added.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// Play once.
    #[default]
    Off,
    /// Loop the current item.
    One,
    /// Loop the whole playlist.
    All,
}

/// One decoder/player instance owned by the engine.
///
/// Instances are pooled by media kind: [`MediaPlayer::release`] must leave the player reusable for
/// another descriptor of the same kind.
pub trait MediaPlayer {
    /// Prepare for `media`. `load_source` asks the player to start fetching data right away.
    fn prepare(&mut self, media: &MediaDescriptor, load_source: bool);
    /// Make sure the player is fully prepared and able to start.
    fn ready(&mut self);
    /// Start or resume playback.
    fn play(&mut self);
    /// Pause playback.
    fn pause(&mut self);
    /// Drop buffers. A full reset also forgets the playback position.
    fn reset(&mut self, full: bool);
    /// Free the loaded media so the player can go back to the pool.
    fn release(&mut self);
    /// Jump to `position_ms`.
    fn seek(&mut self, position_ms: u64);
    /// Current resume position.
    fn playback_info(&self) -> PlaybackInfo;
    /// Restore a resume position.
    fn set_playback_info(&mut self, info: PlaybackInfo);
    /// Current engine state.
    fn state(&self) -> PlayerState;
    /// Whether the player is currently playing.
    fn is_playing(&self) -> bool;
    /// Apply a repeat mode.
    fn set_repeat_mode(&mut self, mode: RepeatMode);
    /// Attach or detach the render target.
    fn attach_renderer(&mut self, renderer: Option<Renderer>);
}

/// Factory for players. Implemented by the media-engine integration.
pub trait MediaEngine {
    /// Build a new player able to handle `media`.
    fn create_player(&mut self, media: &MediaDescriptor) -> Box<dyn MediaPlayer>;

    /// Dispose of a player that could not be returned to the pool.
    fn destroy_player(&mut self, player: Box<dyn MediaPlayer>) {
        drop(player);
    }

    /// Whether a player that served `media` may be reused for other items.
    fn recycle_player_for(&self, media: &MediaDescriptor) -> bool {
        let _ = media;
        true
    }
}
