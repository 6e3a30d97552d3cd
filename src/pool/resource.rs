use std::collections::BTreeMap;

/// Pool configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PoolOpts {
    /// Maximum number of idle instances retained across all keys.
    pub capacity: usize,
    /// Maximum number of idle instances retained per key.
    pub per_key: usize,
}

impl Default for PoolOpts {
    fn default() -> Self {
        Self {
            capacity: 4,
            per_key: 2,
        }
    }
}

/// Counters describing pool behaviour.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Idle instances currently held.
    pub retained: usize,
    /// Instances built because the pool had none for the key.
    pub created: u64,
    /// Acquisitions served from the pool.
    pub reused: u64,
    /// Releases that were handed back for destruction.
    pub dropped_on_release: u64,
}

/// Bounded keyed pool of idle instances.
///
/// Acquisition never fails: a miss falls back to building a fresh instance. A release that would
/// exceed a bound, or of an instance flagged non-recyclable, hands the instance back to the caller
/// for destruction.
pub(crate) struct ResourcePool<K, T> {
    opts: PoolOpts,
    stats: PoolStats,
    idle: BTreeMap<K, Vec<T>>,
}

impl<K: Ord + Clone, T> ResourcePool<K, T> {
    pub(crate) fn new(opts: PoolOpts) -> Self {
        Self {
            opts,
            stats: PoolStats::default(),
            idle: BTreeMap::new(),
        }
    }

    pub(crate) fn stats(&self) -> PoolStats {
        self.stats
    }

    fn take_idle(&mut self, key: &K) -> Option<T> {
        let item = self.idle.get_mut(key)?.pop()?;
        self.stats.retained = self.stats.retained.saturating_sub(1);
        self.stats.reused = self.stats.reused.saturating_add(1);
        Some(item)
    }

    /// Take an idle instance for `key`, or build one with `create`.
    ///
    /// `create` may decline by returning `None`.
    pub(crate) fn acquire_with(
        &mut self,
        key: &K,
        create: impl FnOnce() -> Option<T>,
    ) -> Option<T> {
        if let Some(item) = self.take_idle(key) {
            return Some(item);
        }
        let item = create()?;
        self.stats.created = self.stats.created.saturating_add(1);
        Some(item)
    }

    pub(crate) fn acquire_or_else(&mut self, key: &K, create: impl FnOnce() -> T) -> T {
        if let Some(item) = self.take_idle(key) {
            return item;
        }
        self.stats.created = self.stats.created.saturating_add(1);
        create()
    }

    /// Return an instance. `Some` means the pool refused it and the caller must destroy it.
    #[must_use = "a refused instance must be destroyed"]
    pub(crate) fn release(&mut self, key: &K, item: T, recyclable: bool) -> Option<T> {
        let per_key_full = self
            .idle
            .get(key)
            .is_some_and(|items| items.len() >= self.opts.per_key);
        if !recyclable
            || self.opts.per_key == 0
            || self.stats.retained >= self.opts.capacity
            || per_key_full
        {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return Some(item);
        }

        self.idle.entry(key.clone()).or_default().push(item);
        self.stats.retained = self.stats.retained.saturating_add(1);
        None
    }

    /// Empty the pool, returning every idle instance for destruction.
    pub(crate) fn drain(&mut self) -> Vec<T> {
        let out: Vec<T> = std::mem::take(&mut self.idle)
            .into_values()
            .flatten()
            .collect();
        self.stats.retained = 0;
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pool/resource.rs"]
mod tests;
