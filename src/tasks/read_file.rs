//! Metadata read task.
//!
//! Reads the metadata record for a composed server path and persists it;
//! directories additionally get a directory record. A `FileRead`
//! broadcast carries the object identifier to interested subscribers.
//! The store is thread-safe by contract and nothing here feeds a cell
//! observer, so persistence happens directly on the worker.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::FetchClient;
use crate::error::FetchError;
use crate::events::{Bus, Event, EventKind};
use crate::store::CacheStore;
use crate::tasks::FetchTask;

/// Reads one metadata record. Keyed by the composed server path.
pub(crate) struct ReadFileTask {
    server_path: String,
    client: Arc<dyn FetchClient>,
    store: Arc<dyn CacheStore>,
    bus: Bus,
}

impl ReadFileTask {
    pub(crate) fn new(
        server_path: String,
        client: Arc<dyn FetchClient>,
        store: Arc<dyn CacheStore>,
        bus: Bus,
    ) -> Self {
        Self {
            server_path,
            client,
            store,
            bus,
        }
    }
}

#[async_trait]
impl FetchTask for ReadFileTask {
    fn key(&self) -> &str {
        &self.server_path
    }

    async fn run(&self, _ctx: CancellationToken) -> Result<(), FetchError> {
        let item = self.client.read_file(&self.server_path).await?;

        self.store.store_item(&item);
        if item.directory {
            self.store.store_directory(&item);
        }
        self.bus
            .publish(Event::now(EventKind::FileRead).with_task(item.item_id));
        Ok(())
    }
}
