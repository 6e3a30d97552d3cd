pub(crate) mod token;

pub use token::{DEFAULT_THRESHOLD, SlotGeometry, Token, compute_token};
