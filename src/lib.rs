//! Autoplay is a visibility-driven playback scheduler.
//!
//! Hosts register scopes (windows, screens, scrollable containers) and slots, bind media items
//! to slots, and report geometry and lifecycle changes. The [`Registry`] decides, once per
//! debounced refresh cycle, which bound items play, which pause, and which give their engine
//! resources back to the pools.
//!
//! - Build a [`Registry`] around a [`MediaEngine`] and a [`RendererHost`]
//! - Register a top scope, scheduler scopes, selection scopes and slots
//! - [`Registry::bind`] media to slots and feed [`Registry::on_geometry_changed`]
//! - Drive virtual time with [`Registry::advance_by`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod binding;
pub(crate) mod media;
pub(crate) mod policy;
pub(crate) mod pool;
pub(crate) mod registry;
pub(crate) mod scope;
pub(crate) mod visibility;

pub use crate::foundation::core::{
    BindingId, LifecycleState, MediaId, MediaTag, Orientation, Point, Rect, SchedulerScopeId,
    SelectionScopeId, Size, SlotId, TopScopeId,
};
pub use crate::foundation::error::{AutoplayError, AutoplayResult};

pub use crate::binding::{
    BindOptions, BindingCallback, BindingState, ManualController, PRIORITY_SELECTED,
    PRIORITY_UNRANKED, PlaybackListener, SelectionObserver,
};
pub use crate::media::{
    MediaConfig, MediaDescriptor, MediaEngine, MediaKind, MediaPlayer, PlaybackInfo, PlayerState,
    RendererKind, RepeatMode,
};
pub use crate::policy::{
    EvictionThresholds, MemoryMode, ResourceAction, action_for_priority,
};
pub use crate::pool::{
    PoolOpts, PoolStats, Renderer, RendererHandle, RendererHost, RendererKey, SlotKind,
};
pub use crate::registry::{LifecycleScope, LockTarget, Registry, RegistryOpts, ResumeSnapshot};
pub use crate::scope::{
    Candidate, ContainerKind, RefreshOutcome, SchedulerScopeOpts, SelectionScopeOpts, Selector,
    Strategy,
};
pub use crate::visibility::{DEFAULT_THRESHOLD, SlotGeometry, Token, compute_token};
