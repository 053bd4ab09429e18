//! Error types for visibility passes.

use thiserror::Error;

/// Errors raised by a [`SceneStore`](crate::scene::SceneStore) implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The scene is not loaded yet.
    #[error("scene is not ready")]
    NotReady,

    /// An update or delete referenced an item the store does not hold.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// The backing store rejected the request.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Errors that abort a visibility pass.
///
/// A failed pass writes nothing to the store; the next evaluation starts
/// from scratch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VisionError {
    /// Shadow composition for an observer produced an empty or non-finite
    /// region.
    #[error("shadow composition failed for observer {observer}")]
    CompositionFailed {
        /// Id of the observer whose region could not be built.
        observer: String,
    },

    /// Scene state could not be serialized into change keys.
    #[error("failed to serialize scene state: {0}")]
    Serialization(String),

    /// Reading from or writing to the scene store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for VisionError {
    fn from(err: serde_json::Error) -> Self {
        VisionError::Serialization(err.to_string())
    }
}
