//! # fetchvisor
//!
//! **Fetchvisor** is a bounded-concurrency dispatch layer for asynchronous
//! fetch operations (file downloads, thumbnail/preview fetches, avatar
//! fetches, metadata reads, incremental search-result batches).
//!
//! It guarantees **at most one in-flight task per logical key** within each
//! category, runs up to a fixed per-category ceiling of tasks concurrently,
//! and supports selective or bulk cooperative cancellation. The actual
//! network transfer, the cache store, and the presentation layer are
//! collaborators behind traits; this crate owns only scheduling,
//! deduplication, and cancellation semantics.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!           caller (UI / sync engine)
//!                     │ submit(key, params)
//!                     ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Registry                                                         │
//! │  - per-category dedup + pre-submit guards                         │
//! │  - Bus (broadcast events)                                         │
//! │  - PresentationHandle (single presentation worker)                │
//! └───┬──────────┬──────────┬──────────┬──────────┬──────────┬────────┘
//!     ▼          ▼          ▼          ▼          ▼          ▼
//! ┌────────┐ ┌────────┐ ┌────────┐ ┌────────┐ ┌────────┐ ┌────────┐
//! │download│ │thumb-  │ │activity│ │ avatar │ │unified-│ │ read-  │
//! │  (5)   │ │nail(10)│ │  (10)  │ │  (10)  │ │search 1│ │file(10)│
//! └───┬────┘ └───┬────┘ └───┬────┘ └───┬────┘ └───┬────┘ └───┬────┘
//!     │   Dispatcher: FIFO pending, ≤ ceiling running,        │
//!     │   one live entry per key, exactly one finish per task │
//!     ▼          ▼          ▼          ▼          ▼          ▼
//!   FetchTask bodies ──► FetchClient / CacheStore / Observer
//!     │
//!     │ publish(Event)
//!     ▼
//!   Bus ──► subscriber listener ──► Subscriber::on_event (LogWriter, ...)
//! ```
//!
//! ### Task lifecycle
//! ```text
//! submit ──► Pending ──(slot free, FIFO)──► Running ──► Finished (removed)
//!               │                              │
//!               │ cancel(): token set          │ body runs one collaborator
//!               ▼                              │ call; result → side effects
//!        start observes the token,             │ (cache write, observer
//!        finishes without external work        ▼  notify on presentation ctx)
//!                                    exactly one terminal event:
//!                                    TaskFinished | TaskFailed | TaskCanceled
//! ```
//!
//! ## Rules
//! - Cancellation is **cooperative and non-preemptive**: the flag is checked
//!   once at the pending→running transition. A task whose collaborator call
//!   is already in flight completes normally; cancellation only suppresses
//!   future starts.
//! - Collaborator failures are swallowed at this layer (published as
//!   [`EventKind::TaskFailed`], never propagated); the task still finishes
//!   so its concurrency slot is released.
//! - Observer-visible state (cache version tags, image applies, view
//!   refreshes) mutates only on the presentation context.
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use fetchvisor::{CacheStore, Config, FetchClient, Registry};
//!
//! # async fn demo(client: Arc<dyn FetchClient>, store: Arc<dyn CacheStore>) {
//! let registry: Arc<Registry> = Registry::builder(Config::default())
//!     .with_client(client)
//!     .with_store(store)
//!     .build();
//!
//! // Fire-and-forget submission; duplicates for a live key are no-ops.
//! registry.read_file("https://host/remote.php/dav", "photo.jpg").await;
//! registry.cancel_all().await;
//! # }
//! ```

mod core;
mod error;
mod events;
mod subscribers;
mod tasks;

pub mod client;
pub mod model;
pub mod observe;
pub mod store;

// ---- Public re-exports ----

pub use client::{AvatarPayload, FetchClient, PreviewPayload};
pub use crate::core::{Config, Dispatcher, PresentationHandle, Registry, RegistryBuilder, TaskState};
pub use error::FetchError;
pub use events::{Bus, Event, EventKind};
pub use model::{AvatarRecord, Image, ItemRecord, ItemStatus, SearchBatch};
pub use observe::{Observer, SearchSink};
pub use store::CacheStore;
pub use subscribers::Subscriber;
pub use tasks::{FetchTask, TaskRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

#[cfg(test)]
pub(crate) mod testutil;
