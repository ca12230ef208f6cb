//! Runtime events emitted by dispatchers and task bodies.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Lifecycle events**: per-task dispatch flow (queued, starting, and
//!   exactly one terminal kind per task)
//! - **Domain broadcasts**: process-wide notifications carrying an object
//!   identifier, for any interested subscriber
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! the owning queue name, the task key, and failure reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Dispatch lifecycle events ===
    /// Task accepted into a dispatcher's pending set.
    ///
    /// Sets:
    /// - `queue`: dispatcher name
    /// - `task`: task key
    TaskQueued,

    /// Task promoted to running (published before the cancel-at-start check).
    ///
    /// Sets:
    /// - `queue`: dispatcher name
    /// - `task`: task key
    TaskStarting,

    /// Task finished successfully and was removed from the live set.
    ///
    /// Sets:
    /// - `queue`: dispatcher name
    /// - `task`: task key
    TaskFinished,

    /// Task body reported a collaborator failure; the task was still
    /// removed from the live set (failures are swallowed, never retried
    /// at this layer).
    ///
    /// Sets:
    /// - `queue`: dispatcher name
    /// - `task`: task key
    /// - `reason`: failure message
    TaskFailed,

    /// Task observed its cancellation flag at start and finished without
    /// performing any external work.
    ///
    /// Sets:
    /// - `queue`: dispatcher name
    /// - `task`: task key
    TaskCanceled,

    // === Domain broadcasts ===
    /// A thumbnail was fetched and handed to the presentation context.
    /// Published regardless of whether the image was applied directly or
    /// the hosting view was refreshed.
    ///
    /// Sets:
    /// - `task`: object identifier
    ThumbnailFetched,

    /// A metadata record was read and persisted.
    ///
    /// Sets:
    /// - `task`: object identifier
    FileRead,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the owning dispatcher, if applicable.
    pub queue: Option<&'static str>,
    /// Task key or object identifier, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable failure reason, if applicable.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp
    /// and the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            queue: None,
            task: None,
            reason: None,
        }
    }

    /// Attaches the owning dispatcher name.
    #[inline]
    pub fn with_queue(mut self, queue: &'static str) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Attaches a task key or object identifier.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable failure reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns true for the three terminal lifecycle kinds.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::TaskFinished | EventKind::TaskFailed | EventKind::TaskCanceled
        )
    }
}
