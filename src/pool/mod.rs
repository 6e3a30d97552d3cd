//! Bounded pools for players and renderers.

pub(crate) mod renderer;
pub(crate) mod resource;

pub use renderer::{Renderer, RendererHandle, RendererHost, RendererKey, SlotKind};
pub use resource::{PoolOpts, PoolStats};
