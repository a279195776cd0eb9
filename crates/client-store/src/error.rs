//! Error types for the client store.

use thiserror::Error;

/// Failures raised while merging server data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A realtime frame was not valid JSON or had an unknown shape.
    #[error("malformed realtime frame: {message}")]
    MalformedFrame {
        /// Parser description of the problem.
        message: String,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::MalformedFrame {
            message: value.to_string(),
        }
    }
}
