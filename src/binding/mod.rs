//! Bindings between media items and slots.

pub(crate) mod listener;
pub(crate) mod options;
pub(crate) mod state;

pub use listener::{BindingCallback, ManualController, PlaybackListener, SelectionObserver};
pub use options::BindOptions;
pub use state::{BindingState, PRIORITY_SELECTED, PRIORITY_UNRANKED};
