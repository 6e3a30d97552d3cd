//! The registry: one context object owning every scope, binding and media item.

mod bind;
pub(crate) mod context;
pub(crate) mod dispatch;
mod events;
pub(crate) mod lock;
pub(crate) mod opts;
mod refresh;
pub(crate) mod resume;
mod transitions;

pub use context::{LifecycleScope, Registry};
pub use lock::LockTarget;
pub use opts::RegistryOpts;
pub use resume::ResumeSnapshot;
