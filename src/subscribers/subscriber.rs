//! Event subscriber trait.
//!
//! Provides [`Subscriber`], an extension point for plugging custom event
//! handlers (logging, metrics, alerting) into the runtime.
//!
//! Subscribers registered through
//! [`RegistryBuilder::with_subscribers`](crate::RegistryBuilder::with_subscribers)
//! are driven by a single listener task that receives from the bus and
//! calls each subscriber sequentially, in registration order.
//!
//! ## Rules
//! - Events are delivered in bus order, FIFO.
//! - A slow subscriber delays the others on the shared listener; use async
//!   I/O and keep handlers cheap.
//! - If the listener lags behind the bus ring buffer it skips the missed
//!   events and continues (best-effort delivery).

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for runtime observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscriber: Send + Sync + 'static {
    /// Processes a single event.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs/diagnostics.
    ///
    /// Prefer short, descriptive names (e.g., "metrics", "audit").
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
