//! Registry: per-category submission with deduplication and guards.
//!
//! The [`Registry`] owns one [`Dispatcher`] per task category and applies
//! each category's deduplication policy and pre-submit guards before
//! anything reaches a dispatcher. Submission is fire-and-forget: a
//! duplicate or guarded-out submit is a silent no-op, and no error ever
//! returns to the caller.
//!
//! ## Dedup policy
//! ```text
//! category             key                       extra pre-submit guard
//! ─────────────────    ──────────────────────    ─────────────────────────────
//! download             object identifier         —
//! thumbnail            object identifier         has_preview ∧ status Normal
//!                                                ∧ pair not cached for etag
//! activity thumbnail   external file identifier  no local preview cached
//! avatar               display file name         cached+validated avatar →
//!                                                apply directly, no task
//! unified-search       (none, always submitted)  —
//! read-file            server_url/file_name      —
//! ```
//!
//! ## Rules
//! - The dedup check and the enqueue are atomic (one lock acquisition in
//!   [`Dispatcher::submit_unique`]); racing submits cannot double-enqueue.
//! - The avatar cached-image path never touches the dispatcher's live set;
//!   it posts the apply straight to the presentation context.
//! - `cancel_all` fans out to all six dispatchers and is idempotent.

use std::sync::Arc;

use crate::client::FetchClient;
use crate::core::builder::RegistryBuilder;
use crate::core::config::Config;
use crate::core::dispatcher::Dispatcher;
use crate::core::presentation::PresentationHandle;
use crate::events::Bus;
use crate::model::{ItemRecord, ItemStatus, SearchBatch};
use crate::observe::{Observer, SearchSink};
use crate::store::CacheStore;
use crate::tasks::{
    ActivityThumbnailTask, AvatarTask, DownloadTask, ReadFileTask, TaskRef, ThumbnailTask,
    UnifiedSearchTask,
};

/// Coordinates the six category dispatchers and their dedup policies.
///
/// Built once via [`Registry::builder`] and shared as `Arc<Registry>` for
/// the process lifetime; there is no teardown beyond a best-effort
/// [`cancel_all`](Registry::cancel_all).
pub struct Registry {
    cfg: Config,
    bus: Bus,
    presentation: PresentationHandle,
    client: Arc<dyn FetchClient>,
    store: Arc<dyn CacheStore>,

    downloads: Dispatcher,
    thumbnails: Dispatcher,
    activities: Dispatcher,
    avatars: Dispatcher,
    searches: Dispatcher,
    read_files: Dispatcher,
}

impl Registry {
    /// Returns a builder for constructing the registry.
    pub fn builder(cfg: Config) -> RegistryBuilder {
        RegistryBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        presentation: PresentationHandle,
        client: Arc<dyn FetchClient>,
        store: Arc<dyn CacheStore>,
    ) -> Self {
        let downloads = Dispatcher::new("download", cfg.download_limit, bus.clone());
        let thumbnails = Dispatcher::new("thumbnail", cfg.thumbnail_limit, bus.clone());
        let activities = Dispatcher::new("thumbnail-activity", cfg.activity_limit, bus.clone());
        let avatars = Dispatcher::new("avatar", cfg.avatar_limit, bus.clone());
        let searches = Dispatcher::new("unified-search", cfg.search_limit, bus.clone());
        let read_files = Dispatcher::new("read-file", cfg.read_file_limit, bus.clone());

        Self {
            cfg,
            bus,
            presentation,
            client,
            store,
            downloads,
            thumbnails,
            activities,
            avatars,
            searches,
            read_files,
        }
    }

    /// Returns the event bus (subscribe for lifecycle events and domain
    /// broadcasts).
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Diagnostic handle to the download dispatcher.
    pub fn downloads(&self) -> &Dispatcher {
        &self.downloads
    }

    /// Diagnostic handle to the thumbnail dispatcher.
    pub fn thumbnails(&self) -> &Dispatcher {
        &self.thumbnails
    }

    /// Diagnostic handle to the activity-feed thumbnail dispatcher.
    pub fn activities(&self) -> &Dispatcher {
        &self.activities
    }

    /// Diagnostic handle to the avatar dispatcher.
    pub fn avatars(&self) -> &Dispatcher {
        &self.avatars
    }

    /// Diagnostic handle to the unified-search dispatcher.
    pub fn searches(&self) -> &Dispatcher {
        &self.searches
    }

    /// Diagnostic handle to the read-file dispatcher.
    pub fn read_files(&self) -> &Dispatcher {
        &self.read_files
    }

    /// Sets the cancellation flag on every live task in every dispatcher.
    pub async fn cancel_all(&self) {
        self.downloads.cancel_all().await;
        self.thumbnails.cancel_all().await;
        self.activities.cancel_all().await;
        self.avatars.cancel_all().await;
        self.searches.cancel_all().await;
        self.read_files.cancel_all().await;
    }

    // ---------------------------
    // Download
    // ---------------------------

    /// Queues a content download for `item`, unless one is already live
    /// for the same object identifier.
    pub async fn download(&self, item: &ItemRecord, selector: &str) {
        let task: TaskRef = Arc::new(DownloadTask::new(
            item.clone(),
            selector.to_string(),
            Arc::clone(&self.client),
        ));
        self.downloads.submit_unique(task).await;
    }

    /// Returns true if a download is live for this object identifier.
    pub async fn download_exists(&self, item_id: &str) -> bool {
        self.downloads.contains(item_id).await
    }

    /// Returns the number of live download tasks.
    pub async fn download_count(&self) -> usize {
        self.downloads.count().await
    }

    /// Cancels all live downloads.
    pub async fn cancel_downloads(&self) {
        self.downloads.cancel_all().await;
    }

    // ---------------------------
    // Thumbnail
    // ---------------------------

    /// Queues a thumbnail fetch for `item`.
    ///
    /// No-op unless the item declares a preview, is at rest, and no
    /// preview+icon pair is cached for its current content version — and
    /// no thumbnail task is already live for the same object identifier.
    pub async fn thumbnail(&self, item: &ItemRecord, observer: Arc<dyn Observer>) {
        let eligible = item.has_preview
            && item.status == ItemStatus::Normal
            && !self.store.preview_cached(&item.item_id, &item.etag);
        if !eligible {
            return;
        }

        let task: TaskRef = Arc::new(ThumbnailTask::new(
            item.clone(),
            observer,
            Arc::clone(&self.client),
            Arc::clone(&self.store),
            self.presentation.clone(),
            self.bus.clone(),
            self.cfg.preview_size,
            self.cfg.icon_size,
        ));
        self.thumbnails.submit_unique(task).await;
    }

    /// Cancels any live thumbnail task for this object identifier.
    pub async fn cancel_thumbnail(&self, item_id: &str) {
        self.thumbnails.cancel_matching(item_id).await;
    }

    /// Cancels all live thumbnail tasks.
    pub async fn cancel_thumbnails(&self) {
        self.thumbnails.cancel_all().await;
    }

    // ---------------------------
    // Activity-feed thumbnail
    // ---------------------------

    /// Queues an activity-feed preview fetch.
    ///
    /// No-op when a local preview is already cached for `file_id`, or a
    /// task for the same file identifier is live.
    pub async fn activity_thumbnail(
        &self,
        file_id: &str,
        source: &str,
        observer: Arc<dyn Observer>,
    ) {
        if self.store.activity_preview_cached(file_id) {
            return;
        }

        let task: TaskRef = Arc::new(ActivityThumbnailTask::new(
            file_id.to_string(),
            source.to_string(),
            observer,
            Arc::clone(&self.client),
            self.presentation.clone(),
            self.cfg.icon_size,
        ));
        self.activities.submit_unique(task).await;
    }

    /// Cancels any live activity-feed preview task for this file identifier.
    pub async fn cancel_activity_thumbnail(&self, file_id: &str) {
        self.activities.cancel_matching(file_id).await;
    }

    /// Cancels all live activity-feed preview tasks.
    pub async fn cancel_activity_thumbnails(&self) {
        self.activities.cancel_all().await;
    }

    // ---------------------------
    // Avatar
    // ---------------------------

    /// Queues an avatar fetch for `user`, cached under `file_name`.
    ///
    /// When a validated avatar image is already cached, it is applied to
    /// the observer directly (on the presentation context) and no task is
    /// created. Otherwise a fetch is queued — carrying the cached version
    /// tag, if any — unless one is already live for the same file name.
    pub async fn avatar(&self, user: &str, file_name: &str, observer: Arc<dyn Observer>) {
        let cached = self.store.avatar(file_name);

        if let Some(record) = &cached {
            if record.loaded {
                if let Some(image) = record.image.clone() {
                    let observer = Arc::clone(&observer);
                    self.presentation.post(move || observer.apply(image));
                    return;
                }
            }
        }

        let task: TaskRef = Arc::new(AvatarTask::new(
            user.to_string(),
            file_name.to_string(),
            cached.map(|r| r.version_tag),
            observer,
            Arc::clone(&self.client),
            Arc::clone(&self.store),
            self.presentation.clone(),
            self.cfg.avatar_size,
        ));
        self.avatars.submit_unique(task).await;
    }

    /// Cancels any live avatar task for this file name.
    pub async fn cancel_avatar(&self, file_name: &str) {
        self.avatars.cancel_matching(file_name).await;
    }

    /// Cancels all live avatar tasks.
    pub async fn cancel_avatars(&self) {
        self.avatars.cancel_all().await;
    }

    // ---------------------------
    // Unified search
    // ---------------------------

    /// Queues one search-result batch for insertion into `sink`.
    ///
    /// Never deduplicated: every batch is work. The search dispatcher's
    /// ceiling of 1 serializes batches so they land in submission order.
    pub async fn unified_search(&self, batch: SearchBatch, sink: Arc<dyn SearchSink>) {
        let task: TaskRef = Arc::new(UnifiedSearchTask::new(
            batch,
            sink,
            self.presentation.clone(),
            self.cfg.refresh_settle,
        ));
        self.searches.submit(task).await;
    }

    /// Cancels all pending search-batch tasks.
    pub async fn cancel_searches(&self) {
        self.searches.cancel_all().await;
    }

    // ---------------------------
    // Read file
    // ---------------------------

    /// Queues a metadata read for `server_url/file_name`, unless one is
    /// already live for the same composed path.
    pub async fn read_file(&self, server_url: &str, file_name: &str) {
        let server_path = format!("{server_url}/{file_name}");
        let task: TaskRef = Arc::new(ReadFileTask::new(
            server_path,
            Arc::clone(&self.client),
            Arc::clone(&self.store),
            self.bus.clone(),
        ));
        self.read_files.submit_unique(task).await;
    }

    /// Cancels all live metadata reads.
    pub async fn cancel_read_files(&self) {
        self.read_files.cancel_all().await;
    }
}
