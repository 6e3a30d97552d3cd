use crate::foundation::core::Rect;

/// Fraction of a slot that must be visible before it may play, unless a binding overrides it.
pub const DEFAULT_THRESHOLD: f64 = 0.65;

/// Raw geometry of one slot as reported by the host framework.
///
/// `visible_rect` is the slot's visible rectangle in global coordinates (already intersected with
/// the viewport); `None` means the intersection is empty. `drawable` is the full area the slot
/// would paint if nothing clipped it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlotGeometry {
    /// Whether the slot is attached to the active surface.
    pub attached: bool,
    /// Whether the slot has been laid out at least once.
    pub laid_out: bool,
    /// Visible part of the slot, in global coordinates.
    pub visible_rect: Option<Rect>,
    /// Full drawable rectangle of the slot.
    pub drawable: Rect,
}

impl SlotGeometry {
    /// Geometry of a detached slot.
    pub fn detached() -> Self {
        Self {
            attached: false,
            laid_out: false,
            visible_rect: None,
            drawable: Rect::ZERO,
        }
    }

    /// Geometry of an attached, laid-out slot with the given drawable and visible rectangles.
    pub fn visible(drawable: Rect, visible_rect: Rect) -> Self {
        Self {
            attached: true,
            laid_out: true,
            visible_rect: Some(visible_rect),
            drawable,
        }
    }
}

impl Default for SlotGeometry {
    fn default() -> Self {
        Self::detached()
    }
}

/// Snapshot of a slot's visibility, recomputed at the start of every refresh cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token {
    /// Visible fraction in `[0, 1]`, or a negative value when the slot cannot be prepared.
    pub area_offset: f64,
    /// Visible rectangle used for ordering and eviction distance.
    pub rect: Rect,
    /// Slot width.
    pub width: f64,
    /// Slot height.
    pub height: f64,
    threshold: f64,
}

impl Token {
    /// Token of a slot that is not preparable.
    pub fn hidden(threshold: f64) -> Self {
        Self {
            area_offset: -1.0,
            rect: Rect::ZERO,
            width: 0.0,
            height: 0.0,
            threshold,
        }
    }

    /// Build a token from its parts.
    pub fn new(area_offset: f64, rect: Rect, width: f64, height: f64, threshold: f64) -> Self {
        Self {
            area_offset,
            rect,
            width,
            height,
            threshold,
        }
    }

    /// Threshold this token was computed against.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether the slot is at least partly visible and may hold prepared resources.
    pub fn should_prepare(&self) -> bool {
        self.area_offset >= 0.0
    }

    /// Whether enough of the slot is visible for it to play.
    pub fn should_play(&self) -> bool {
        self.area_offset >= self.threshold
    }
}

/// Turn raw slot geometry into a [`Token`].
///
/// `scope_started` is false when the owning scheduler scope is below its activation lifecycle
/// state; such slots are never preparable regardless of geometry.
pub fn compute_token(geometry: &SlotGeometry, threshold: f64, scope_started: bool) -> Token {
    let width = geometry.drawable.width();
    let height = geometry.drawable.height();
    if !scope_started || !geometry.attached || !geometry.laid_out {
        return Token::hidden(threshold);
    }
    let Some(visible) = geometry.visible_rect else {
        return Token::hidden(threshold);
    };
    let visible_area = visible.area();
    if visible_area <= 0.0 {
        return Token::hidden(threshold);
    }

    let drawable_area = geometry.drawable.area();
    let area_offset = if drawable_area > 0.0 {
        (visible_area / drawable_area).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Token::new(area_offset, visible, width, height, threshold)
}

#[cfg(test)]
#[path = "../../tests/unit/visibility/token.rs"]
mod tests;
