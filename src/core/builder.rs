//! Registry construction.
//!
//! [`RegistryBuilder`] wires the collaborators and spawns the runtime's
//! background pieces (presentation worker, subscriber listener). The
//! registry is built exactly once and shared as `Arc<Registry>`; if a
//! process-wide instance is wanted, construct it at startup and pass the
//! `Arc` down — there is no global, and no teardown beyond
//! [`Registry::cancel_all`].

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;

use crate::client::FetchClient;
use crate::core::config::Config;
use crate::core::presentation::Presentation;
use crate::core::registry::Registry;
use crate::events::Bus;
use crate::store::CacheStore;
use crate::subscribers::Subscriber;

/// Builder for constructing a [`Registry`].
pub struct RegistryBuilder {
    cfg: Config,
    client: Option<Arc<dyn FetchClient>>,
    store: Option<Arc<dyn CacheStore>>,
    subscribers: Vec<Arc<dyn Subscriber>>,
}

impl RegistryBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            client: None,
            store: None,
            subscribers: Vec::new(),
        }
    }

    /// Sets the network collaborator. Required.
    pub fn with_client(mut self, client: Arc<dyn FetchClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the cache/metadata store collaborator. Required.
    pub fn with_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (task lifecycle, domain
    /// broadcasts) from a shared listener task, sequentially, in
    /// registration order.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscriber>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the registry, spawning the presentation worker and (when
    /// subscribers are registered) the subscriber listener.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Panics
    /// Panics if the client or store collaborator was not provided.
    pub fn build(self) -> Arc<Registry> {
        let client = self.client.expect("RegistryBuilder: FetchClient is required");
        let store = self.store.expect("RegistryBuilder: CacheStore is required");

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let presentation = Presentation::spawn(self.cfg.presentation_capacity_clamped());

        if !self.subscribers.is_empty() {
            spawn_subscriber_listener(&bus, self.subscribers);
        }

        Arc::new(Registry::new_internal(
            self.cfg,
            bus,
            presentation,
            client,
            store,
        ))
    }
}

/// Forwards bus events to the subscribers, sequentially, until the bus
/// closes. Lagged receivers skip the missed events and continue.
fn spawn_subscriber_listener(bus: &Bus, subscribers: Vec<Arc<dyn Subscriber>>) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    for sub in &subscribers {
                        sub.on_event(&ev).await;
                    }
                }
                Err(RecvError::Closed) => break,
                Err(RecvError::Lagged(_)) => continue,
            }
        }
    });
}
