use crate::foundation::core::SlotId;
use crate::foundation::error::{AutoplayError, AutoplayResult};
use crate::media::item::{MediaKind, RendererKind};

/// What a slot is, as far as rendering goes.
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
pub enum SlotKind {
    /// The slot is itself a render surface.
    Surface,
    /// An empty container; a renderer has to be placed inside it.
    #[default]
    Container,
}

/// Host-side identity of a renderer instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RendererHandle(pub u64);

/// Pool key for renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RendererKey {
    /// Kind of the slot the renderer goes into.
    pub slot: SlotKind,
    /// Kind of the media it renders.
    pub media: MediaKind,
    /// Render target type.
    pub renderer: RendererKind,
}

/// Render target handed to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Renderer {
    /// The slot renders directly; nothing was pooled.
    Slot(SlotId),
    /// A pooled renderer placed inside the slot.
    Pooled(RendererHandle),
}

/// Host side of renderer management.
pub trait RendererHost {
    /// Build a renderer for `key`. Returning `None` leaves the binding without one.
    fn create_renderer(&mut self, key: &RendererKey) -> Option<RendererHandle>;

    /// Dispose of a renderer the pool refused.
    fn destroy_renderer(&mut self, handle: RendererHandle) {
        let _ = handle;
    }

    /// A pooled renderer was placed into `slot`.
    fn on_renderer_attached(&mut self, slot: SlotId, handle: RendererHandle) {
        let _ = (slot, handle);
    }

    /// A pooled renderer was taken out of `slot`.
    fn on_renderer_detached(&mut self, slot: SlotId, handle: RendererHandle) {
        let _ = (slot, handle);
    }
}

/// A renderer currently held by a media item, with what is needed to hand it back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HeldRenderer {
    pub(crate) slot: SlotId,
    pub(crate) renderer: Renderer,
    /// Pool key for pooled renderers; `None` when the slot renders directly.
    pub(crate) key: Option<RendererKey>,
}

/// How a binding obtains its render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RendererPlan {
    /// No render target.
    None,
    /// Fast path: the slot itself.
    Slot,
    /// Go through the renderer pool.
    Pooled(RendererKey),
}

pub(crate) fn plan_renderer(
    slot: SlotKind,
    media: MediaKind,
    renderer: RendererKind,
) -> AutoplayResult<RendererPlan> {
    match (slot, renderer) {
        (_, RendererKind::None) => Ok(RendererPlan::None),
        (SlotKind::Surface, RendererKind::Surface) => Ok(RendererPlan::Slot),
        (SlotKind::Surface, RendererKind::Texture) => Err(AutoplayError::unsupported_renderer(
            format!("{renderer:?} cannot be placed into a {slot:?} slot"),
        )),
        (SlotKind::Container, _) => Ok(RendererPlan::Pooled(RendererKey {
            slot,
            media,
            renderer,
        })),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pool/renderer.rs"]
mod tests;
