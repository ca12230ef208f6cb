//! Shared test doubles and helpers for the inline unit tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Semaphore, broadcast};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::client::{AvatarPayload, FetchClient, PreviewPayload};
use crate::core::{Presentation, PresentationHandle};
use crate::error::FetchError;
use crate::events::Event;
use crate::model::{AvatarRecord, Image, ItemRecord, SearchBatch};
use crate::observe::{Observer, SearchSink};
use crate::store::CacheStore;
use crate::tasks::FetchTask;

// ---------------------------
// Generic helpers
// ---------------------------

/// Spawns a presentation worker for task-body tests.
pub(crate) fn presentation() -> PresentationHandle {
    Presentation::spawn(64)
}

/// Barrier: resolves once every previously posted presentation job ran.
pub(crate) async fn flush(handle: &PresentationHandle) {
    handle.run(|| {}).await;
}

/// Polls `cond` until it holds, panicking after two seconds.
pub(crate) async fn wait_for<F, Fut>(cond: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within 2s");
}

/// Collects terminal lifecycle events from `rx`.
///
/// Returns once `want` terminal events arrived, or after 200ms of silence
/// (`want = 0` just drains whatever shows up in that window).
pub(crate) async fn drain_terminal(
    rx: &mut broadcast::Receiver<Event>,
    want: usize,
) -> Vec<Event> {
    let mut out = Vec::new();
    loop {
        if want > 0 && out.len() >= want {
            break;
        }
        match tokio::time::timeout(Duration::from_millis(200), rx.recv()).await {
            Ok(Ok(ev)) => {
                if ev.is_terminal() {
                    out.push(ev);
                }
            }
            Ok(Err(_)) | Err(_) => break,
        }
    }
    out
}

// ---------------------------
// GateTask: a controllable FetchTask
// ---------------------------

/// Task whose body blocks on a gate until released; records starts.
pub(crate) struct GateTask {
    key: String,
    fail: bool,
    started: AtomicUsize,
    gate: Semaphore,
}

impl GateTask {
    pub(crate) fn arc(key: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            key: key.into(),
            fail: false,
            started: AtomicUsize::new(0),
            gate: Semaphore::new(0),
        })
    }

    pub(crate) fn arc_failing(key: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            key: key.into(),
            fail: true,
            started: AtomicUsize::new(0),
            gate: Semaphore::new(0),
        })
    }

    /// Lets one pending `run` proceed (or the next one to arrive).
    pub(crate) fn release(&self) {
        self.gate.add_permits(1);
    }

    /// Number of times the body was entered.
    pub(crate) fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchTask for GateTask {
    fn key(&self) -> &str {
        &self.key
    }

    async fn run(&self, _ctx: CancellationToken) -> Result<(), FetchError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| FetchError::failed("gate closed"))?;
        permit.forget();
        if self.fail {
            Err(FetchError::failed("scripted failure"))
        } else {
            Ok(())
        }
    }
}

// ---------------------------
// FakeClient
// ---------------------------

enum Mode {
    /// Resolve with the scripted payloads.
    Normal,
    /// Resolve every call with `Err(NotModified)`.
    NotModified,
    /// Resolve every call with `Err(Failed)`.
    Fail(String),
}

/// Scripted [`FetchClient`] that records how it was called.
pub(crate) struct FakeClient {
    mode: Mode,
    /// When set, every call waits on this gate before resolving.
    gate: Option<Semaphore>,
    preview: Option<PreviewPayload>,
    avatar: Option<AvatarPayload>,
    metadata: Option<ItemRecord>,

    downloads_seen: Mutex<Vec<(String, String)>>,
    preview_dims_seen: Mutex<Vec<Option<(u32, u32)>>>,
    preview_tags_seen: Mutex<Vec<Option<String>>>,
    avatar_tags_seen: Mutex<Vec<Option<String>>>,
    reads_seen: Mutex<Vec<String>>,
}

impl FakeClient {
    fn base(mode: Mode) -> Self {
        Self {
            mode,
            gate: None,
            preview: None,
            avatar: None,
            metadata: None,
            downloads_seen: Mutex::new(Vec::new()),
            preview_dims_seen: Mutex::new(Vec::new()),
            preview_tags_seen: Mutex::new(Vec::new()),
            avatar_tags_seen: Mutex::new(Vec::new()),
            reads_seen: Mutex::new(Vec::new()),
        }
    }

    /// Every call succeeds with empty payloads, but blocks until
    /// [`release`](Self::release) grants it a permit.
    pub(crate) fn gated() -> Arc<Self> {
        let mut c = Self::base(Mode::Normal);
        c.gate = Some(Semaphore::new(0));
        c.preview = Some(PreviewPayload {
            preview: Image::from(vec![0]),
            icon: Image::from(vec![0]),
            version_tag: None,
        });
        c.avatar = Some(AvatarPayload {
            image: Image::from(vec![0]),
            version_tag: "etag".into(),
        });
        c.metadata = Some(ItemRecord::default());
        Arc::new(c)
    }

    /// Preview calls resolve with this image (as both renditions).
    pub(crate) fn with_preview(image: Image, version_tag: Option<&str>) -> Arc<Self> {
        let mut c = Self::base(Mode::Normal);
        c.preview = Some(PreviewPayload {
            preview: image.clone(),
            icon: image,
            version_tag: version_tag.map(str::to_string),
        });
        Arc::new(c)
    }

    /// Avatar calls resolve with this image and tag.
    pub(crate) fn with_avatar(image: Image, version_tag: &str) -> Arc<Self> {
        let mut c = Self::base(Mode::Normal);
        c.avatar = Some(AvatarPayload {
            image,
            version_tag: version_tag.into(),
        });
        Arc::new(c)
    }

    /// Read-file calls resolve with this record.
    pub(crate) fn with_metadata(record: ItemRecord) -> Arc<Self> {
        let mut c = Self::base(Mode::Normal);
        c.metadata = Some(record);
        Arc::new(c)
    }

    /// Every call resolves with `Err(NotModified)`.
    pub(crate) fn not_modified() -> Arc<Self> {
        Arc::new(Self::base(Mode::NotModified))
    }

    /// Every call resolves with `Err(Failed)`.
    pub(crate) fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self::base(Mode::Fail(reason.into())))
    }

    /// Lets `n` gated calls resolve.
    pub(crate) fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub(crate) fn downloads_seen(&self) -> Vec<(String, String)> {
        self.downloads_seen.lock().unwrap().clone()
    }

    pub(crate) fn preview_dims_seen(&self) -> Vec<Option<(u32, u32)>> {
        self.preview_dims_seen.lock().unwrap().clone()
    }

    pub(crate) fn preview_tags_seen(&self) -> Vec<Option<String>> {
        self.preview_tags_seen.lock().unwrap().clone()
    }

    pub(crate) fn avatar_tags_seen(&self) -> Vec<Option<String>> {
        self.avatar_tags_seen.lock().unwrap().clone()
    }

    pub(crate) fn avatar_calls(&self) -> usize {
        self.avatar_tags_seen.lock().unwrap().len()
    }

    pub(crate) fn reads_seen(&self) -> Vec<String> {
        self.reads_seen.lock().unwrap().clone()
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }

    fn outcome<T>(&self, payload: &Option<T>) -> Result<T, FetchError>
    where
        T: Clone,
    {
        match &self.mode {
            Mode::NotModified => Err(FetchError::NotModified),
            Mode::Fail(reason) => Err(FetchError::Failed {
                reason: reason.clone(),
            }),
            Mode::Normal => payload
                .clone()
                .ok_or_else(|| FetchError::failed("no payload scripted")),
        }
    }
}

#[async_trait]
impl FetchClient for FakeClient {
    async fn download(&self, item: &ItemRecord, selector: &str) -> Result<(), FetchError> {
        self.downloads_seen
            .lock()
            .unwrap()
            .push((item.item_id.clone(), selector.to_string()));
        self.pass_gate().await;
        match &self.mode {
            Mode::Normal => Ok(()),
            Mode::NotModified => Err(FetchError::NotModified),
            Mode::Fail(reason) => Err(FetchError::Failed {
                reason: reason.clone(),
            }),
        }
    }

    async fn download_preview(
        &self,
        _path: &str,
        dims: Option<(u32, u32)>,
        _icon_size: u32,
        version_tag: Option<&str>,
    ) -> Result<PreviewPayload, FetchError> {
        self.preview_dims_seen.lock().unwrap().push(dims);
        self.preview_tags_seen
            .lock()
            .unwrap()
            .push(version_tag.map(str::to_string));
        self.pass_gate().await;
        self.outcome(&self.preview)
    }

    async fn download_avatar(
        &self,
        _user: &str,
        _size: u32,
        version_tag: Option<&str>,
    ) -> Result<AvatarPayload, FetchError> {
        self.avatar_tags_seen
            .lock()
            .unwrap()
            .push(version_tag.map(str::to_string));
        self.pass_gate().await;
        self.outcome(&self.avatar)
    }

    async fn read_file(&self, server_path: &str) -> Result<ItemRecord, FetchError> {
        self.reads_seen.lock().unwrap().push(server_path.to_string());
        self.pass_gate().await;
        self.outcome(&self.metadata)
    }
}

// ---------------------------
// MemoryStore
// ---------------------------

#[derive(Default)]
struct StoreInner {
    preview_tags: HashMap<String, String>,
    preview_pairs: HashSet<(String, String)>,
    preview_writes: usize,
    activity_cached: HashSet<String>,
    avatars: HashMap<String, AvatarRecord>,
    items: HashMap<String, ItemRecord>,
    directories: HashMap<String, ItemRecord>,
}

/// In-memory [`CacheStore`] with inspection helpers.
#[derive(Default)]
pub(crate) struct MemoryStore {
    inner: Mutex<StoreInner>,
}

impl MemoryStore {
    pub(crate) fn arc() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Marks the preview+icon pair as present for `(item_id, etag)`.
    pub(crate) fn set_preview_cached(&self, item_id: &str, etag: &str) {
        self.inner
            .lock()
            .unwrap()
            .preview_pairs
            .insert((item_id.to_string(), etag.to_string()));
    }

    /// Marks a local activity preview as present for `file_id`.
    pub(crate) fn set_activity_cached(&self, file_id: &str) {
        self.inner
            .lock()
            .unwrap()
            .activity_cached
            .insert(file_id.to_string());
    }

    /// Number of preview-tag writes, including test seeding.
    pub(crate) fn preview_writes(&self) -> usize {
        self.inner.lock().unwrap().preview_writes
    }

    pub(crate) fn item(&self, item_id: &str) -> Option<ItemRecord> {
        self.inner.lock().unwrap().items.get(item_id).cloned()
    }

    pub(crate) fn directory(&self, item_id: &str) -> Option<ItemRecord> {
        self.inner.lock().unwrap().directories.get(item_id).cloned()
    }
}

impl CacheStore for MemoryStore {
    fn preview_cached(&self, item_id: &str, etag: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .preview_pairs
            .contains(&(item_id.to_string(), etag.to_string()))
    }

    fn preview_tag(&self, item_id: &str) -> Option<String> {
        self.inner.lock().unwrap().preview_tags.get(item_id).cloned()
    }

    fn store_preview_tag(&self, item_id: &str, version_tag: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .preview_tags
            .insert(item_id.to_string(), version_tag.to_string());
        inner.preview_writes += 1;
    }

    fn activity_preview_cached(&self, file_id: &str) -> bool {
        self.inner.lock().unwrap().activity_cached.contains(file_id)
    }

    fn avatar(&self, file_name: &str) -> Option<AvatarRecord> {
        self.inner.lock().unwrap().avatars.get(file_name).cloned()
    }

    fn store_avatar(&self, file_name: &str, record: AvatarRecord) {
        self.inner
            .lock()
            .unwrap()
            .avatars
            .insert(file_name.to_string(), record);
    }

    fn confirm_avatar(&self, file_name: &str) {
        if let Some(record) = self.inner.lock().unwrap().avatars.get_mut(file_name) {
            record.loaded = true;
        }
    }

    fn store_item(&self, item: &ItemRecord) {
        self.inner
            .lock()
            .unwrap()
            .items
            .insert(item.item_id.clone(), item.clone());
    }

    fn store_directory(&self, item: &ItemRecord) {
        self.inner
            .lock()
            .unwrap()
            .directories
            .insert(item.item_id.clone(), item.clone());
    }
}

// ---------------------------
// TestObserver
// ---------------------------

/// Recording [`Observer`] with a settable identity.
pub(crate) struct TestObserver {
    identity: Mutex<Option<String>>,
    applied: Mutex<Vec<Image>>,
    refreshes: AtomicUsize,
}

impl TestObserver {
    pub(crate) fn arc(identity: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            identity: Mutex::new(identity.map(str::to_string)),
            applied: Mutex::new(Vec::new()),
            refreshes: AtomicUsize::new(0),
        })
    }

    pub(crate) fn applied(&self) -> Vec<Image> {
        self.applied.lock().unwrap().clone()
    }

    pub(crate) fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl Observer for TestObserver {
    fn identity(&self) -> Option<String> {
        self.identity.lock().unwrap().clone()
    }

    fn apply(&self, image: Image) {
        self.applied.lock().unwrap().push(image);
    }

    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------
// TestSink
// ---------------------------

/// Recording [`SearchSink`] that logs the order of appends and refreshes.
#[derive(Default)]
pub(crate) struct TestSink {
    log: Mutex<Vec<String>>,
    entries: AtomicUsize,
}

impl TestSink {
    pub(crate) fn arc() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Full call log: `append:<provider>` and `refresh` entries in order.
    pub(crate) fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Providers appended so far, in order.
    pub(crate) fn appended(&self) -> Vec<String> {
        self.log()
            .iter()
            .filter_map(|l| l.strip_prefix("append:").map(str::to_string))
            .collect()
    }

    /// Number of refreshes so far.
    pub(crate) fn refreshes(&self) -> usize {
        self.log().iter().filter(|l| *l == "refresh").count()
    }

    /// Total result entries appended.
    pub(crate) fn entries(&self) -> usize {
        self.entries.load(Ordering::SeqCst)
    }
}

impl SearchSink for TestSink {
    fn append(&self, batch: &SearchBatch) {
        self.entries.fetch_add(batch.entries.len(), Ordering::SeqCst);
        self.log
            .lock()
            .unwrap()
            .push(format!("append:{}", batch.provider));
    }

    fn refresh(&self) {
        self.log.lock().unwrap().push("refresh".to_string());
    }
}
