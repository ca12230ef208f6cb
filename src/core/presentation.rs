//! The presentation execution context.
//!
//! All observer-visible state (image applies, view refreshes, cache
//! version tags that feed them) must mutate on a single designated
//! context. [`Presentation`] models that context explicitly: a bounded
//! work channel drained by one dedicated worker, so "run this on the
//! presentation context" is a message post, not an ad-hoc context switch.
//!
//! ## Architecture
//! ```text
//! task body ── post(job) ──► [bounded mpsc] ──► worker ──► job()
//!            ── run(job) ──►       "        ──►   "    ──► job() ──► ack
//! ```
//!
//! ## Rules
//! - Jobs execute **sequentially in post order** (single worker, FIFO).
//! - `post()` never blocks; when the channel is full the job is dropped
//!   (observers are idempotent, a dropped apply degrades to the next
//!   full refresh).
//! - `run()` resolves only after the job has executed — used where a
//!   task's finish is gated on a refresh acknowledgement.

use tokio::sync::{mpsc, oneshot};

/// A unit of presentation work.
type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle for posting work onto the presentation context.
///
/// Cheap to clone; all clones feed the same single worker.
#[derive(Clone)]
pub struct PresentationHandle {
    tx: mpsc::Sender<Job>,
}

impl PresentationHandle {
    /// Posts a job, fire-and-forget.
    ///
    /// Returns immediately. The job is dropped if the channel is full or
    /// the worker has shut down.
    pub fn post(&self, job: impl FnOnce() + Send + 'static) {
        let _ = self.tx.try_send(Box::new(job));
    }

    /// Posts a job and resolves once it has executed.
    ///
    /// Unlike [`post`](Self::post), this waits for channel capacity, so
    /// the job is never dropped while the worker is alive. Resolves
    /// immediately if the worker has shut down.
    pub async fn run(&self, job: impl FnOnce() + Send + 'static) {
        let (ack_tx, ack_rx) = oneshot::channel::<()>();
        let sent = self
            .tx
            .send(Box::new(move || {
                job();
                let _ = ack_tx.send(());
            }))
            .await;
        if sent.is_ok() {
            let _ = ack_rx.await;
        }
    }
}

/// The presentation context: spawns the worker and hands out its handle.
pub(crate) struct Presentation;

impl Presentation {
    /// Spawns the worker draining the work channel and returns the handle.
    ///
    /// The worker exits when every handle clone has been dropped.
    pub(crate) fn spawn(capacity: usize) -> PresentationHandle {
        let (tx, mut rx) = mpsc::channel::<Job>(capacity.max(1));

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                job();
            }
        });

        PresentationHandle { tx }
    }
}
