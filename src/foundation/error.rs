/// Convenience result type used across the scheduler.
pub type AutoplayResult<T> = Result<T, AutoplayError>;

/// Top-level error taxonomy used by registry APIs.
///
/// Only configuration mistakes surface here. Media-engine failures are delivered to
/// [`PlaybackListener`](crate::PlaybackListener)s and never abort a refresh cycle.
#[derive(thiserror::Error, Debug)]
pub enum AutoplayError {
    /// Invalid caller-provided data (bad threshold, duplicate slot registration, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// A request referenced a scope, slot, binding or media item that is not registered.
    #[error("unknown scope: {0}")]
    UnknownScope(String),

    /// The slot kind cannot host the renderer kind required by the media item.
    #[error("unsupported renderer: {0}")]
    UnsupportedRenderer(String),

    /// Errors when serializing or deserializing options or resume state.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AutoplayError {
    /// Build a [`AutoplayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`AutoplayError::UnknownScope`] value.
    pub fn unknown_scope(msg: impl Into<String>) -> Self {
        Self::UnknownScope(msg.into())
    }

    /// Build a [`AutoplayError::UnsupportedRenderer`] value.
    pub fn unsupported_renderer(msg: impl Into<String>) -> Self {
        Self::UnsupportedRenderer(msg.into())
    }

    /// Build a [`AutoplayError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
