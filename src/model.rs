//! Data records exchanged with collaborators.
//!
//! These are plain snapshots: tasks hold their own copy of an
//! [`ItemRecord`] taken at submit time, so later mutations of the caller's
//! record never race with a running task.

use std::sync::Arc;

/// Transfer/lifecycle status of an item.
///
/// Only [`ItemStatus::Normal`] items are eligible for thumbnail fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemStatus {
    /// At rest; no transfer in progress.
    #[default]
    Normal,
    /// Upload/download or another mutation in progress.
    Busy,
}

/// Metadata record for a remote item (file or directory).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemRecord {
    /// Stable object identifier (dedup key for download/thumbnail tasks).
    pub item_id: String,
    /// Server-side file identifier (dedup key for activity-feed previews).
    pub file_id: String,
    /// File name within `server_url`.
    pub file_name: String,
    /// Parent URL on the server.
    pub server_url: String,
    /// Content version of the item itself.
    pub etag: String,
    /// Whether the server can render a preview for this item.
    pub has_preview: bool,
    /// Transfer status; thumbnails are fetched only for `Normal` items.
    pub status: ItemStatus,
    /// True if the record represents a directory.
    pub directory: bool,
    /// User favorite flag (carried through to the directory record).
    pub favorite: bool,
    /// Server-reported permission string.
    pub permissions: String,
}

impl ItemRecord {
    /// Composes the server path of this item (`server_url/file_name`).
    pub fn server_path(&self) -> String {
        format!("{}/{}", self.server_url, self.file_name)
    }
}

/// Opaque image payload, cheap to clone and share across contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image(Arc<[u8]>);

impl Image {
    /// Wraps raw encoded image bytes.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Image {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

/// One incremental batch of unified-search results.
///
/// Batches must be appended and rendered in strict arrival order; the
/// unified-search dispatcher is serialized (ceiling 1) to guarantee it.
#[derive(Debug, Clone, Default)]
pub struct SearchBatch {
    /// Identifier of the search provider that produced this batch.
    pub provider: String,
    /// Result records, in provider order.
    pub entries: Vec<ItemRecord>,
}

/// Cached avatar state for a display file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarRecord {
    /// Version tag of the cached avatar image.
    pub version_tag: String,
    /// True once the cached image has been validated against the server.
    pub loaded: bool,
    /// The cached image, if one has been stored.
    pub image: Option<Image>,
}
