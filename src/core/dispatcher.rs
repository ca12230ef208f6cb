//! Bounded task dispatcher.
//!
//! [`Dispatcher`] is a named worker pool with a fixed concurrency ceiling.
//! It accepts tasks, runs up to `ceiling` of them concurrently, queues the
//! rest in submission order, and exposes key-based lookup and cancellation
//! over its live set.
//!
//! ## Architecture
//! ```text
//! submit / submit_unique
//!     │ (live-set lock: dedup check + append, atomic)
//!     ▼
//! [ live set: Pending*, Running* ]  insertion order preserved
//!     │ promote while running < ceiling (FIFO over Pending)
//!     ▼
//! tokio::spawn(run_entry)
//!     ├─► publish TaskStarting
//!     ├─► token cancelled? ──► yes ──► no external work
//!     ├─► task.run(token)
//!     └─► remove entry ──► publish exactly one terminal event
//!                      └─► promote next pending (FIFO)
//! ```
//!
//! ## Rules
//! - `running count ≤ ceiling` at all times; promotion happens only under
//!   the live-set lock.
//! - An entry leaves the live set **only** through its own `run_entry`
//!   completion — `cancel_all` marks tokens but removes nothing, so every
//!   task finishes exactly once on every path.
//! - The cancellation flag is observed once, at the pending→running
//!   transition. Cancelling a task that is already mid-flight is advisory:
//!   the collaborator call completes and the task finishes normally.
//! - Key lookup (`contains`) is a linear scan of the live set; per-category
//!   live counts stay small (ceiling plus a short backlog).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::events::{Bus, Event, EventKind};
use crate::tasks::TaskRef;

/// Global entry id counter; ids distinguish entries whose keys collide.
static ENTRY_SEQ: AtomicU64 = AtomicU64::new(0);

/// Lifecycle state of a live dispatcher entry.
///
/// `Finished` is not represented: finishing removes the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Accepted, waiting for a concurrency slot (FIFO).
    Pending,
    /// Promoted; its body is executing (or about to observe cancellation).
    Running,
}

/// One live task plus its dispatch bookkeeping.
struct Entry {
    id: u64,
    task: TaskRef,
    token: CancellationToken,
    state: TaskState,
}

/// Work promoted under the lock, to be spawned after it is released.
type Promoted = Vec<(u64, TaskRef, CancellationToken)>;

/// Named worker pool with a fixed concurrency ceiling.
///
/// The live set is shared with the spawned task workers; the `Dispatcher`
/// handle itself is plain data owned by the registry.
pub struct Dispatcher {
    inner: Arc<Inner>,
}

struct Inner {
    name: &'static str,
    ceiling: usize,
    live: Mutex<Vec<Entry>>,
    bus: Bus,
}

impl Dispatcher {
    /// Creates a dispatcher. The ceiling is clamped to a minimum of 1.
    pub(crate) fn new(name: &'static str, ceiling: usize, bus: Bus) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                ceiling: ceiling.max(1),
                live: Mutex::new(Vec::new()),
                bus,
            }),
        }
    }

    /// Returns the diagnostic name.
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Returns the concurrency ceiling.
    pub fn ceiling(&self) -> usize {
        self.inner.ceiling
    }

    /// Appends a task to the live set and starts it if a slot is free.
    pub async fn submit(&self, task: TaskRef) {
        let promoted = {
            let mut live = self.inner.live.lock().await;
            self.inner.enqueue_locked(&mut live, task);
            self.inner.promote_locked(&mut live)
        };
        Inner::spawn_promoted(&self.inner, promoted);
    }

    /// Like [`submit`](Self::submit), but a no-op when a live task with the
    /// same key exists.
    ///
    /// The check and the append happen under one lock acquisition, so two
    /// racing submissions for the same key can never both enqueue.
    ///
    /// Returns true if the task was accepted.
    pub async fn submit_unique(&self, task: TaskRef) -> bool {
        let promoted = {
            let mut live = self.inner.live.lock().await;
            if live.iter().any(|e| e.task.key() == task.key()) {
                return false;
            }
            self.inner.enqueue_locked(&mut live, task);
            self.inner.promote_locked(&mut live)
        };
        Inner::spawn_promoted(&self.inner, promoted);
        true
    }

    /// Sets the cancellation flag on every live task.
    ///
    /// Entries are not removed here: pending tasks observe the flag when
    /// their turn comes, running tasks complete normally. Idempotent and
    /// safe to call on an empty dispatcher.
    pub async fn cancel_all(&self) {
        let live = self.inner.live.lock().await;
        for entry in live.iter() {
            entry.token.cancel();
        }
    }

    /// Sets the cancellation flag on every live task with the given key.
    pub async fn cancel_matching(&self, key: &str) {
        let live = self.inner.live.lock().await;
        for entry in live.iter().filter(|e| e.task.key() == key) {
            entry.token.cancel();
        }
    }

    /// Returns true if a live (pending or running) task has the given key.
    pub async fn contains(&self, key: &str) -> bool {
        let live = self.inner.live.lock().await;
        live.iter().any(|e| e.task.key() == key)
    }

    /// Returns the number of live tasks.
    pub async fn count(&self) -> usize {
        self.inner.live.lock().await.len()
    }

    /// Returns the number of currently running tasks.
    pub async fn running(&self) -> usize {
        let live = self.inner.live.lock().await;
        live.iter().filter(|e| e.state == TaskState::Running).count()
    }

    /// Returns true if the live set is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.live.lock().await.is_empty()
    }

    /// Returns the live set as `(key, state)` pairs, in insertion order.
    ///
    /// Diagnostic only; the set may change the moment the lock is released.
    pub async fn snapshot(&self) -> Vec<(String, TaskState)> {
        let live = self.inner.live.lock().await;
        live.iter()
            .map(|e| (e.task.key().to_string(), e.state))
            .collect()
    }
}

impl Inner {
    /// Appends a pending entry and publishes `TaskQueued`.
    fn enqueue_locked(&self, live: &mut Vec<Entry>, task: TaskRef) {
        self.bus.publish(
            Event::now(EventKind::TaskQueued)
                .with_queue(self.name)
                .with_task(task.key()),
        );
        live.push(Entry {
            id: ENTRY_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            task,
            token: CancellationToken::new(),
            state: TaskState::Pending,
        });
    }

    /// Marks pending entries Running, in insertion order, while the
    /// running count is below the ceiling. Must run under the lock.
    fn promote_locked(&self, live: &mut Vec<Entry>) -> Promoted {
        let mut running = live
            .iter()
            .filter(|e| e.state == TaskState::Running)
            .count();
        let mut promoted = Promoted::new();

        for entry in live.iter_mut() {
            if running >= self.ceiling {
                break;
            }
            if entry.state == TaskState::Pending {
                entry.state = TaskState::Running;
                running += 1;
                promoted.push((entry.id, entry.task.clone(), entry.token.clone()));
            }
        }
        promoted
    }

    /// Spawns one worker per promoted entry (outside the lock).
    fn spawn_promoted(this: &Arc<Self>, promoted: Promoted) {
        for (id, task, token) in promoted {
            let me = Arc::clone(this);
            tokio::spawn(async move { me.run_entry(id, task, token).await });
        }
    }

    /// Runs one entry to completion and releases its slot.
    ///
    /// Publishes `TaskStarting`, observes the cancellation flag exactly
    /// once, executes the body, removes the entry, publishes exactly one
    /// terminal event, and promotes the next pending entries.
    async fn run_entry(self: Arc<Self>, id: u64, task: TaskRef, token: CancellationToken) {
        self.bus.publish(
            Event::now(EventKind::TaskStarting)
                .with_queue(self.name)
                .with_task(task.key()),
        );

        let outcome = if token.is_cancelled() {
            Err(FetchError::Canceled)
        } else {
            task.run(token.clone()).await
        };

        let promoted = {
            let mut live = self.live.lock().await;
            live.retain(|e| e.id != id);
            self.promote_locked(&mut live)
        };

        let terminal = match outcome {
            Ok(()) => Event::now(EventKind::TaskFinished),
            Err(FetchError::Canceled) => Event::now(EventKind::TaskCanceled),
            Err(err) => Event::now(EventKind::TaskFailed).with_reason(err.to_string()),
        };
        self.bus
            .publish(terminal.with_queue(self.name).with_task(task.key()));

        Self::spawn_promoted(&self, promoted);
    }
}
