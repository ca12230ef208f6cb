//! Thumbnail fetch task.
//!
//! Fetches a preview+icon pair for an item, with a not-modified
//! short-circuit: if the cached pair still exists when the task runs, the
//! stored version tag is passed so the server can skip the payload.
//!
//! On a fresh payload the new version tag is persisted and the observer is
//! notified — both on the presentation context, in one posted job. A stale
//! observer (identity mismatch) gets a full view refresh instead of a
//! possibly-wrong image. The `ThumbnailFetched` broadcast is published
//! regardless of which of the two paths ran.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::FetchClient;
use crate::core::PresentationHandle;
use crate::error::FetchError;
use crate::events::{Bus, Event, EventKind};
use crate::model::ItemRecord;
use crate::observe::Observer;
use crate::store::CacheStore;
use crate::tasks::FetchTask;

/// Fetches the preview+icon pair for one item. Keyed by the object
/// identifier.
pub(crate) struct ThumbnailTask {
    item: ItemRecord,
    observer: Arc<dyn Observer>,
    client: Arc<dyn FetchClient>,
    store: Arc<dyn CacheStore>,
    presentation: PresentationHandle,
    bus: Bus,
    preview_size: u32,
    icon_size: u32,
}

impl ThumbnailTask {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        item: ItemRecord,
        observer: Arc<dyn Observer>,
        client: Arc<dyn FetchClient>,
        store: Arc<dyn CacheStore>,
        presentation: PresentationHandle,
        bus: Bus,
        preview_size: u32,
        icon_size: u32,
    ) -> Self {
        Self {
            item,
            observer,
            client,
            store,
            presentation,
            bus,
            preview_size,
            icon_size,
        }
    }
}

#[async_trait]
impl FetchTask for ThumbnailTask {
    fn key(&self) -> &str {
        &self.item.item_id
    }

    async fn run(&self, _ctx: CancellationToken) -> Result<(), FetchError> {
        // The pair may have appeared between submit and start; only then is
        // the stored tag worth sending for a not-modified short-circuit.
        let version_tag = if self.store.preview_cached(&self.item.item_id, &self.item.etag) {
            self.store.preview_tag(&self.item.item_id)
        } else {
            None
        };

        let fetched = self
            .client
            .download_preview(
                &self.item.server_path(),
                Some((self.preview_size, self.preview_size)),
                self.icon_size,
                version_tag.as_deref(),
            )
            .await;

        match fetched {
            Ok(payload) => {
                let item_id = self.item.item_id.clone();
                let store = Arc::clone(&self.store);
                let observer = Arc::clone(&self.observer);
                let bus = self.bus.clone();

                self.presentation.post(move || {
                    if let Some(tag) = &payload.version_tag {
                        store.store_preview_tag(&item_id, tag);
                    }
                    if observer.identity().as_deref() == Some(item_id.as_str()) {
                        observer.apply(payload.icon);
                    } else {
                        observer.refresh();
                    }
                    bus.publish(Event::now(EventKind::ThumbnailFetched).with_task(item_id));
                });
                Ok(())
            }
            // Cached pair is current: nothing to mutate, nothing to notify.
            Err(FetchError::NotModified) => Ok(()),
            Err(err) => Err(err),
        }
    }
}
