//! Storage error type for the catalog repository.

use derive_more::{Display, Error};
use tracing::instrument;

/// Failure raised by the persistence layer, with caller location attached.
///
/// Carries the underlying cause as text for diagnostics; callers treat it
/// as an opaque infrastructure failure and must not surface the message to
/// clients.
#[derive(Debug, Clone, Display, Error)]
#[display("Storage failure: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Diagnostic message describing the underlying cause.
    pub message: String,
    /// Line number where the failure was raised.
    pub line: u32,
    /// Source file where the failure was raised.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new storage error recording the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("query failed: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("connection failed: {}", err))
    }
}
