//! Event subscribers for the fetchvisor runtime.
//!
//! This module provides the [`Subscriber`] trait for handling runtime
//! events broadcast through the [`Bus`](crate::events::Bus), and a simple
//! built-in [`LogWriter`] implementation behind the `logging` feature.
//!
//! ## Architecture
//! ```text
//! Dispatcher / task bodies ── publish(Event) ──► Bus
//!                                                 │
//!                                                 ▼
//!                              registry's subscriber listener
//!                                                 │
//!                                     ┌───────────┼───────────┐
//!                                     ▼           ▼           ▼
//!                                LogWriter     Metrics     Custom
//!                              (on_event, sequential, in listener task)
//! ```

mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use subscriber::Subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
