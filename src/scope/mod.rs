//! Scope hierarchy: selection scopes inside scheduler scopes inside top scopes.

pub(crate) mod scheduler;
pub(crate) mod selection;
pub(crate) mod top;

pub use scheduler::SchedulerScopeOpts;
pub use selection::{Candidate, ContainerKind, SelectionScopeOpts, Selector, Strategy};
pub use top::RefreshOutcome;
