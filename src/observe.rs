//! Presentation collaborator boundaries.
//!
//! [`Observer`] receives fetched images; [`SearchSink`] receives
//! unified-search batches. Both are fire-and-forget, assumed idempotent
//! and cheap, and are **only ever invoked on the presentation context**
//! (task bodies post the calls through
//! [`PresentationHandle`](crate::PresentationHandle)).
//!
//! ## Stale observers
//! By the time a result arrives, the observer may already represent
//! different data (a recycled list cell). Tasks compare
//! [`Observer::identity`] against the key they fetched for: on a match the
//! image is applied directly, otherwise the hosting view is refreshed
//! wholesale rather than applying a possibly-wrong image.

use crate::model::{Image, SearchBatch};

/// # Image observer (a list cell and its hosting view).
pub trait Observer: Send + Sync + 'static {
    /// The key the observer currently represents, if any.
    ///
    /// Tasks compare this against their own target key; a mismatch means
    /// the observer was recycled while the fetch was in flight.
    fn identity(&self) -> Option<String>;

    /// Applies a fetched image directly (the matched-identity path).
    fn apply(&self, image: Image);

    /// Requests a full refresh of the hosting view (the stale path).
    fn refresh(&self);
}

/// # Unified-search result sink (the hosting view's backing data).
pub trait SearchSink: Send + Sync + 'static {
    /// Appends one batch to the backing data source and result list.
    fn append(&self, batch: &SearchBatch);

    /// Reloads the hosting view. The dispatch layer treats the return of
    /// this call as the refresh acknowledgement that gates task finish.
    fn refresh(&self);
}
