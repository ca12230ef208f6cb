//! Unified-search batch task.
//!
//! Appends one batch of search results into the hosting view's backing
//! data, waits a short settle delay, then triggers a view refresh — and
//! finishes only once that refresh has actually executed on the
//! presentation context. Gating Finished on the refresh acknowledgement
//! is what makes the ceiling-1 search dispatcher render batches in strict
//! arrival order: batch N+1 cannot start appending until batch N's
//! refresh has been acknowledged.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::core::PresentationHandle;
use crate::error::FetchError;
use crate::model::SearchBatch;
use crate::observe::SearchSink;
use crate::tasks::FetchTask;

/// Appends one search batch and refreshes the hosting view. Search tasks
/// are never deduplicated; the key is the provider id, for diagnostics.
pub(crate) struct UnifiedSearchTask {
    batch: SearchBatch,
    sink: Arc<dyn SearchSink>,
    presentation: PresentationHandle,
    settle: Duration,
}

impl UnifiedSearchTask {
    pub(crate) fn new(
        batch: SearchBatch,
        sink: Arc<dyn SearchSink>,
        presentation: PresentationHandle,
        settle: Duration,
    ) -> Self {
        Self {
            batch,
            sink,
            presentation,
            settle,
        }
    }
}

#[async_trait]
impl FetchTask for UnifiedSearchTask {
    fn key(&self) -> &str {
        &self.batch.provider
    }

    async fn run(&self, _ctx: CancellationToken) -> Result<(), FetchError> {
        let sink = Arc::clone(&self.sink);
        let batch = self.batch.clone();
        self.presentation.run(move || sink.append(&batch)).await;

        // Let layout settle before the reload.
        time::sleep(self.settle).await;

        let sink = Arc::clone(&self.sink);
        self.presentation.run(move || sink.refresh()).await;
        Ok(())
    }
}
