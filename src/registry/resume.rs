use std::collections::BTreeMap;

use crate::foundation::core::{BindingId, MediaTag};
use crate::foundation::error::{AutoplayError, AutoplayResult};
use crate::media::item::PlaybackInfo;

/// Key of a saved resume state: the media tag, or the binding for anonymous media.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum ResumeKey {
    Tag(MediaTag),
    Binding(BindingId),
}

#[derive(Debug, Default)]
pub(crate) struct ResumeStore {
    entries: BTreeMap<ResumeKey, PlaybackInfo>,
}

impl ResumeStore {
    /// Store `info` unless the key already holds a state. First writer wins.
    pub(crate) fn try_save(&mut self, key: ResumeKey, info: PlaybackInfo) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, info);
        true
    }

    pub(crate) fn take(&mut self, key: &ResumeKey) -> Option<PlaybackInfo> {
        self.entries.remove(key)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, key: &ResumeKey) -> Option<PlaybackInfo> {
        self.entries.get(key).copied()
    }

    pub(crate) fn snapshot(&self) -> ResumeSnapshot {
        let entries = self
            .entries
            .iter()
            .filter_map(|(k, v)| match k {
                ResumeKey::Tag(tag) => Some((tag.clone(), *v)),
                ResumeKey::Binding(_) => None,
            })
            .collect();
        ResumeSnapshot { entries }
    }

    /// Import tag-keyed states. Existing entries win.
    pub(crate) fn seed(&mut self, snapshot: ResumeSnapshot) -> usize {
        snapshot
            .entries
            .into_iter()
            .filter(|(tag, info)| self.try_save(ResumeKey::Tag(tag.clone()), *info))
            .count()
    }
}

/// Tag-keyed resume states, in a form an external store can persist.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResumeSnapshot {
    /// Saved state per tag.
    pub entries: BTreeMap<MediaTag, PlaybackInfo>,
}

impl ResumeSnapshot {
    /// Serialize to JSON.
    pub fn to_json(&self) -> AutoplayResult<String> {
        serde_json::to_string(self)
            .map_err(|e| AutoplayError::serde(format!("encode resume snapshot: {e}")))
    }

    /// Parse from JSON.
    pub fn from_json(s: &str) -> AutoplayResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| AutoplayError::serde(format!("parse resume snapshot: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/resume.rs"]
mod tests;
