//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by dispatchers and task bodies.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Dispatcher` (lifecycle events), thumbnail and
//!   read-file task bodies (domain broadcasts).
//! - **Consumers**: the registry's subscriber listener (fans out to
//!   [`Subscriber`](crate::Subscriber)s) and any caller holding a
//!   [`Bus`] handle (`subscribe()`).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
