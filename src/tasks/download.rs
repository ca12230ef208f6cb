//! File download task.
//!
//! The thinnest of the six bodies: it exists for lifecycle management and
//! slot release only. The transfer collaborator owns all persistence side
//! effects; this task just keys the download for deduplication and
//! finishes when the transfer resolves, successfully or not.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::FetchClient;
use crate::error::FetchError;
use crate::model::ItemRecord;
use crate::tasks::FetchTask;

/// Downloads one item's content. Keyed by the object identifier.
pub(crate) struct DownloadTask {
    item: ItemRecord,
    selector: String,
    client: Arc<dyn FetchClient>,
}

impl DownloadTask {
    pub(crate) fn new(item: ItemRecord, selector: String, client: Arc<dyn FetchClient>) -> Self {
        Self {
            item,
            selector,
            client,
        }
    }
}

#[async_trait]
impl FetchTask for DownloadTask {
    fn key(&self) -> &str {
        &self.item.item_id
    }

    async fn run(&self, _ctx: CancellationToken) -> Result<(), FetchError> {
        self.client.download(&self.item, &self.selector).await
    }
}
