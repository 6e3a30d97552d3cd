pub(crate) mod arena;
pub(crate) mod core;
pub(crate) mod error;
