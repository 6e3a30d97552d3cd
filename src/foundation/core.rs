use std::fmt;

pub use kurbo::{Point, Rect, Size};

/// Identity of a slot, as assigned by the host framework.
///
/// The scheduler never interprets the value; it only needs to be unique among live slots.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SlotId(pub u64);

/// Handle of a top scope (one top-level lifecycle unit, e.g. a window).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TopScopeId(pub(crate) u64);

/// Handle of a scheduler scope (one lifecycle unit, e.g. a screen).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchedulerScopeId(pub(crate) u64);

/// Handle of a selection scope (one scrollable container).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionScopeId(pub(crate) u64);

/// Handle of a live binding between a media item and a slot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingId(pub(crate) u64);

/// Handle of a media item.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaId(pub(crate) u64);

macro_rules! debug_handle {
    ($($ty:ident => $label:literal),* $(,)?) => {
        $(
            impl fmt::Debug for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!($label, "#{}"), self.0)
                }
            }

            impl $ty {
                /// Raw handle value (for diagnostics only).
                pub fn as_u64(self) -> u64 {
                    self.0
                }
            }

            impl crate::foundation::arena::Handle for $ty {
                fn from_raw(raw: u64) -> Self {
                    Self(raw)
                }
            }
        )*
    };
}

debug_handle! {
    TopScopeId => "Top",
    SchedulerScopeId => "Scheduler",
    SelectionScopeId => "Selection",
    BindingId => "Binding",
    MediaId => "Media",
}

/// Stable, caller-chosen identity of a media item.
///
/// At most one media item exists per tag at a time. Items bound without a tag are anonymous and
/// never shared.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct MediaTag(String);

impl MediaTag {
    /// Create a tag from any string-like value.
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().to_owned())
    }

    /// Borrow the tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MediaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

impl From<&str> for MediaTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MediaTag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Host lifecycle state of a scope, ordered from dead to fully interactive.
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
pub enum LifecycleState {
    /// The scope is gone; registering it again creates a new scope.
    Destroyed,
    /// Constructed but not yet created by the host.
    #[default]
    Initialized,
    /// Created but not visible.
    Created,
    /// Visible.
    Started,
    /// Visible and in the foreground.
    Resumed,
}

/// Orientation used to compare the visibility tokens of sibling slots.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Compare by the vertical center: top-most wins.
    #[default]
    Vertical,
    /// Compare by the horizontal center: left-most wins.
    Horizontal,
    /// Take the stronger of the two directional comparisons.
    BothAxis,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
