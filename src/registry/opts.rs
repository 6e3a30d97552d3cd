use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{AutoplayError, AutoplayResult};
use crate::policy::memory::EvictionThresholds;
use crate::pool::resource::PoolOpts;

/// Registry-wide tuning knobs.
///
/// Every field has a default, so a JSON document only needs the keys it overrides:
///
/// ```
/// let opts = autoplay::RegistryOpts::from_json_str(r#"{ "refresh_delay_ms": 50 }"#).unwrap();
/// assert_eq!(opts.refresh_delay_ms, 50);
/// assert_eq!(opts.thresholds.high, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RegistryOpts {
    /// Debounce window of the refresh cycle. Requests inside the window collapse into one.
    pub refresh_delay_ms: u64,
    /// Delay before a released media item gives its player back.
    pub release_delay_ms: u64,
    /// Delay before an unbound media item is destroyed.
    pub destroy_delay_ms: u64,
    /// Player pool bounds.
    pub player_pool: PoolOpts,
    /// Renderer pool bounds.
    pub renderer_pool: PoolOpts,
    /// Release thresholds per memory mode.
    pub thresholds: EvictionThresholds,
}

impl Default for RegistryOpts {
    fn default() -> Self {
        Self {
            // About two frames at 60 Hz.
            refresh_delay_ms: 33,
            release_delay_ms: 0,
            destroy_delay_ms: 0,
            player_pool: PoolOpts::default(),
            renderer_pool: PoolOpts::default(),
            thresholds: EvictionThresholds::default(),
        }
    }
}

impl RegistryOpts {
    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> AutoplayResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| AutoplayError::serde(format!("parse registry options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON string.
    pub fn from_json_str(s: &str) -> AutoplayResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Load options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> AutoplayResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open registry options '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check internal consistency.
    pub fn validate(&self) -> AutoplayResult<()> {
        let t = &self.thresholds;
        if [t.low, t.normal, t.balanced, t.high].contains(&0) {
            return Err(AutoplayError::validation(
                "eviction thresholds must be at least 1",
            ));
        }
        for (name, pool) in [("player_pool", self.player_pool), ("renderer_pool", self.renderer_pool)] {
            if pool.per_key > pool.capacity {
                return Err(AutoplayError::validation(format!(
                    "{name}: per_key ({}) exceeds capacity ({})",
                    pool.per_key, pool.capacity
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/opts.rs"]
mod tests;
