//! Activity-feed thumbnail task.
//!
//! A slimmer cousin of the thumbnail task: the preview is fetched without
//! a dimension bound and without a content-version check, and nothing is
//! written to the cache — the feed only wants an image on screen. The
//! identity-check-or-refresh pattern is the same.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::FetchClient;
use crate::core::PresentationHandle;
use crate::error::FetchError;
use crate::observe::Observer;
use crate::tasks::FetchTask;

/// Fetches an unbounded preview for one activity entry. Keyed by the
/// external file identifier.
pub(crate) struct ActivityThumbnailTask {
    file_id: String,
    /// Server path or file identifier the preview endpoint accepts.
    source: String,
    observer: Arc<dyn Observer>,
    client: Arc<dyn FetchClient>,
    presentation: PresentationHandle,
    icon_size: u32,
}

impl ActivityThumbnailTask {
    pub(crate) fn new(
        file_id: String,
        source: String,
        observer: Arc<dyn Observer>,
        client: Arc<dyn FetchClient>,
        presentation: PresentationHandle,
        icon_size: u32,
    ) -> Self {
        Self {
            file_id,
            source,
            observer,
            client,
            presentation,
            icon_size,
        }
    }
}

#[async_trait]
impl FetchTask for ActivityThumbnailTask {
    fn key(&self) -> &str {
        &self.file_id
    }

    async fn run(&self, _ctx: CancellationToken) -> Result<(), FetchError> {
        let payload = self
            .client
            .download_preview(&self.source, None, self.icon_size, None)
            .await?;

        let file_id = self.file_id.clone();
        let observer = Arc::clone(&self.observer);
        self.presentation.post(move || {
            if observer.identity().as_deref() == Some(file_id.as_str()) {
                observer.apply(payload.preview);
            } else {
                observer.refresh();
            }
        });
        Ok(())
    }
}
