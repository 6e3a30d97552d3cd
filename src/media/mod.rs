//! Media items and the media-engine boundary.

pub(crate) mod engine;
pub(crate) mod item;

pub use engine::{MediaEngine, MediaPlayer, PlayerState, RepeatMode};
pub use item::{MediaConfig, MediaDescriptor, MediaKind, PlaybackInfo, RendererKind};
