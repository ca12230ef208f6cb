//! Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [queued] queue=thumbnail key=oc-123
//! [starting] queue=thumbnail key=oc-123
//! [finished] queue=thumbnail key=oc-123
//! [failed] queue=download key=oc-9 reason="fetch failed: 503"
//! [canceled] queue=avatar key=alice-128.png
//! [thumbnail] id=oc-123
//! [read-file] id=oc-123
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscriber;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscriber`]
/// for structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscriber for LogWriter {
    async fn on_event(&self, e: &Event) {
        let queue = e.queue.unwrap_or("-");
        match e.kind {
            EventKind::TaskQueued => {
                println!("[queued] queue={queue} key={:?}", e.task);
            }
            EventKind::TaskStarting => {
                println!("[starting] queue={queue} key={:?}", e.task);
            }
            EventKind::TaskFinished => {
                println!("[finished] queue={queue} key={:?}", e.task);
            }
            EventKind::TaskFailed => {
                println!(
                    "[failed] queue={queue} key={:?} reason={:?}",
                    e.task, e.reason
                );
            }
            EventKind::TaskCanceled => {
                println!("[canceled] queue={queue} key={:?}", e.task);
            }
            EventKind::ThumbnailFetched => {
                println!("[thumbnail] id={:?}", e.task);
            }
            EventKind::FileRead => {
                println!("[read-file] id={:?}", e.task);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
