//! Observer: binds collection-change notifications to the dispatch engine

use crate::command::Action;
use crate::dispatch::Dispatcher;
use crate::error::SetupError;
use crate::registry::HandlerRegistry;
use crate::transport::{CollectionEvent, CommandTransport, DeviceManager};
use crate::{COMMAND_COLLECTION_NAME, COMMAND_PUBLICATION_NAME, META_DOMAIN};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Names the observer binds to on the transport
#[derive(Debug, Clone)]
pub struct ObserverConfig {
    /// Publication carrying the command collection
    pub publication: String,
    /// Collection to observe
    pub collection: String,
    /// Domain handled by the built-in pseudo-handler
    pub meta_domain: String,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            publication: COMMAND_PUBLICATION_NAME.into(),
            collection: COMMAND_COLLECTION_NAME.into(),
            meta_domain: META_DOMAIN.into(),
        }
    }
}

/// Builder for [`Observer`]
///
/// The transport collaborator is required; construction fails fast without
/// it. The device manager is only needed by deployments registering
/// delegated actions.
#[derive(Default)]
pub struct ObserverBuilder {
    transport: Option<Arc<dyn CommandTransport>>,
    device_manager: Option<Arc<dyn DeviceManager>>,
    config: Option<ObserverConfig>,
}

impl ObserverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transport(mut self, transport: Arc<dyn CommandTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn device_manager(mut self, manager: Arc<dyn DeviceManager>) -> Self {
        self.device_manager = Some(manager);
        self
    }

    pub fn config(mut self, config: ObserverConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<Observer, SetupError> {
        let transport = self.transport.ok_or(SetupError::MissingTransport)?;
        let config = self.config.unwrap_or_default();
        let registry = Arc::new(RwLock::new(HandlerRegistry::new()));
        let dispatcher = Arc::new(Dispatcher::new(
            transport.clone(),
            registry.clone(),
            self.device_manager,
            config.meta_domain.clone(),
        ));

        Ok(Observer {
            transport,
            registry,
            dispatcher,
            config,
        })
    }
}

/// Long-lived bridge between collection-change notifications and the
/// dispatch engine. One per process; owns the handler registry for its
/// lifetime.
pub struct Observer {
    transport: Arc<dyn CommandTransport>,
    registry: Arc<RwLock<HandlerRegistry>>,
    dispatcher: Arc<Dispatcher>,
    config: ObserverConfig,
}

impl Observer {
    pub fn builder() -> ObserverBuilder {
        ObserverBuilder::new()
    }

    /// Register (or replace) the action set for a handler label.
    ///
    /// Callable any time after construction; the last registration for a
    /// label wins.
    pub async fn register_handler(&self, label: impl Into<String>, actions: HashMap<String, Action>) {
        self.registry.write().await.register(label, actions);
    }

    /// Subscribe to the command publication and pump collection events until
    /// the transport closes the channel.
    ///
    /// Each added command is dispatched on its own task, so in-flight
    /// commands interleave freely; changed and removed events are diagnostic
    /// only.
    pub async fn run(&self) -> Result<()> {
        self.transport.subscribe(&self.config.publication).await?;
        let mut events = self.transport.observe(&self.config.collection).await?;

        info!("Observing {} for commands", self.config.collection);

        while let Some(event) = events.recv().await {
            match event {
                CollectionEvent::Added { id } => {
                    let dispatcher = self.dispatcher.clone();
                    tokio::spawn(async move {
                        if let Err(e) = dispatcher.on_added(&id).await {
                            error!("Dispatch failed for command ID {}: {:#}", id, e);
                        }
                    });
                }
                CollectionEvent::Changed {
                    id,
                    old_fields,
                    cleared_fields,
                    new_fields,
                } => {
                    debug!(
                        "[CHANGED] [{}] old: {} cleared: {} new: {}",
                        id, old_fields, cleared_fields, new_fields
                    );
                }
                CollectionEvent::Removed { id, old_value } => {
                    debug!("[REMOVED] [{}] {}", id, old_value);
                }
            }
        }

        info!("Command collection observer stopped");
        Ok(())
    }
}
