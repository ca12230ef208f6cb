//! Error types for collaborator calls made by fetch tasks.
//!
//! The dispatch layer never propagates these to the submitting caller:
//! submission is fire-and-forget, and a failed task still reaches Finished
//! so its concurrency slot is released. Failures surface only through
//! [`EventKind::TaskFailed`](crate::EventKind::TaskFailed) events.

use thiserror::Error;

/// # Errors produced by collaborator calls.
///
/// These represent outcomes of the external network/cache collaborators
/// invoked by a task body. Retry and timeout policy belong to the
/// collaborator, not to this layer.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The remote resource matches the supplied version tag.
    ///
    /// Not a failure in the usual sense: tasks that pass a cached version
    /// tag use this as a short-circuit (avatar tasks additionally confirm
    /// the cached entry).
    #[error("resource not modified")]
    NotModified,

    /// The collaborator call failed (network error, backend error, bad
    /// payload). Swallowed by the dispatcher after event publishing.
    #[error("fetch failed: {reason}")]
    Failed {
        /// The underlying error message.
        reason: String,
    },

    /// The task was cancelled before it started; no external work ran.
    #[error("canceled before start")]
    Canceled,
}

impl FetchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fetchvisor::FetchError;
    ///
    /// let err = FetchError::NotModified;
    /// assert_eq!(err.as_label(), "fetch_not_modified");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FetchError::NotModified => "fetch_not_modified",
            FetchError::Failed { .. } => "fetch_failed",
            FetchError::Canceled => "fetch_canceled",
        }
    }

    /// Shorthand for [`FetchError::Failed`] from any displayable reason.
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        FetchError::Failed {
            reason: reason.to_string(),
        }
    }
}
