use crate::binding::state::PRIORITY_SELECTED;

/// How aggressively unselected bindings give up engine resources.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MemoryMode {
    /// [`MemoryMode::Low`] under memory pressure, [`MemoryMode::Balanced`] otherwise.
    #[default]
    Auto,
    /// Release everything that is not selected.
    Low,
    /// Reset direct neighbours of the selection, release the rest.
    Normal,
    /// Keep direct neighbours untouched, release the rest.
    Balanced,
    /// Reset anything close to the selection, release far away items.
    ///
    /// Items below the threshold are reset, not kept: only [`MemoryMode::Balanced`] keeps
    /// neighbours untouched.
    High,
    /// Never release because of distance. Inactive bindings are still released.
    Infinite,
}

impl MemoryMode {
    /// Resolve [`MemoryMode::Auto`] against the current memory pressure.
    pub fn resolve(self, memory_pressure: bool) -> Self {
        match self {
            Self::Auto if memory_pressure => Self::Low,
            Self::Auto => Self::Balanced,
            other => other,
        }
    }
}

/// Release thresholds per memory mode: a binding whose priority reaches the threshold of the
/// active mode loses its engine resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EvictionThresholds {
    /// Threshold for [`MemoryMode::Low`].
    pub low: u32,
    /// Threshold for [`MemoryMode::Normal`].
    pub normal: u32,
    /// Threshold for [`MemoryMode::Balanced`].
    pub balanced: u32,
    /// Threshold for [`MemoryMode::High`].
    pub high: u32,
}

impl Default for EvictionThresholds {
    fn default() -> Self {
        Self {
            low: 1,
            normal: 2,
            balanced: 2,
            high: 8,
        }
    }
}

impl EvictionThresholds {
    /// Release threshold of a resolved mode. `None` means "never".
    pub fn release_at(&self, mode: MemoryMode) -> Option<u32> {
        match mode {
            MemoryMode::Auto | MemoryMode::Low => Some(self.low),
            MemoryMode::Normal => Some(self.normal),
            MemoryMode::Balanced => Some(self.balanced),
            MemoryMode::High => Some(self.high),
            MemoryMode::Infinite => None,
        }
    }
}

/// What to do with a media item after its binding's priority changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceAction {
    /// Restore its resume state and prepare it.
    Prepare,
    /// Save its resume state and release the engine resources.
    Release,
    /// Drop buffers but keep the player.
    Reset,
    /// Leave it alone.
    Keep,
}

/// Decide the resource action for a priority change to `to` under the resolved `mode`.
pub fn action_for_priority(
    to: u32,
    mode: MemoryMode,
    thresholds: &EvictionThresholds,
) -> ResourceAction {
    if to == PRIORITY_SELECTED {
        return ResourceAction::Prepare;
    }
    match thresholds.release_at(mode) {
        Some(limit) if to >= limit => ResourceAction::Release,
        _ if mode == MemoryMode::Balanced => ResourceAction::Keep,
        _ => ResourceAction::Reset,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/policy/memory.rs"]
mod tests;
