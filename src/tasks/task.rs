//! Fetch task abstraction.
//!
//! This module defines the [`FetchTask`] trait (async, keyed, cancelable).
//! The common handle type is [`TaskRef`], an `Arc<dyn FetchTask>` suitable
//! for sharing between a dispatcher's live set and its spawned workers.
//!
//! A task's cancellation flag is owned by the dispatcher and observed once
//! at the pending→running transition; `run` is only invoked when the flag
//! was clear at that point.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;

/// Shared handle to a fetch task.
pub type TaskRef = Arc<dyn FetchTask>;

/// # Keyed, cancelable unit of fetch work.
///
/// A `FetchTask` has a stable [`key`](FetchTask::key) used for
/// deduplication and targeted cancellation, and an async
/// [`run`](FetchTask::run) method that performs exactly one collaborator
/// call and applies its side effects.
///
/// The dispatcher checks the cancellation token **before** invoking `run`;
/// bodies are not expected to poll it mid-flight — collaborator calls have
/// no cancellation hook, so an in-flight call always completes.
#[async_trait]
pub trait FetchTask: Send + Sync + 'static {
    /// Returns the task's logical key (semantics vary per category:
    /// object identifier, file identifier, display file name, or a
    /// composed server path).
    fn key(&self) -> &str;

    /// Executes the task body until its collaborator call resolves.
    ///
    /// Errors are swallowed by the dispatcher (published as
    /// [`EventKind::TaskFailed`](crate::EventKind::TaskFailed), never
    /// propagated); the task finishes on every path.
    async fn run(&self, ctx: CancellationToken) -> Result<(), FetchError>;
}
