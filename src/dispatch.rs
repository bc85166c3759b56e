//! Dispatch engine: drives one command from added to a terminal status
//!
//! The lifecycle for a command id:
//! - fetch the raw record from the collection
//! - decode the text; malformed commands fail immediately and are never acked
//! - acknowledge, unconditionally, before any dispatch attempt
//! - the meta domain completes directly, bypassing the registry
//! - resolve the handler action and invoke it, normalizing whichever
//!   invocation style it uses to one status
//! - exactly one status report per normalized outcome
//!
//! No outcome is retried here; a retry is the origin re-issuing a command.

use crate::command::{
    decode, Action, AsyncActionFn, CallbackActionFn, CommandId, CommandRef, DispatchStatus,
};
use crate::registry::HandlerRegistry;
use crate::status::StatusReporter;
use crate::transport::{CommandTransport, DeviceManager};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info, warn};

/// Drives the ack -> execute -> terminal-status state machine for observed
/// commands
pub struct Dispatcher {
    transport: Arc<dyn CommandTransport>,
    reporter: StatusReporter,
    registry: Arc<RwLock<HandlerRegistry>>,
    device_manager: Option<Arc<dyn DeviceManager>>,
    meta_domain: String,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn CommandTransport>,
        registry: Arc<RwLock<HandlerRegistry>>,
        device_manager: Option<Arc<dyn DeviceManager>>,
        meta_domain: impl Into<String>,
    ) -> Self {
        Self {
            reporter: StatusReporter::new(transport.clone()),
            transport,
            registry,
            device_manager,
            meta_domain: meta_domain.into(),
        }
    }

    /// Process one added command.
    ///
    /// Errors only when the command record cannot be fetched; every
    /// per-command failure after that point is converted into a status
    /// report instead of propagating.
    pub async fn on_added(&self, id: &CommandId) -> Result<()> {
        let command = self.transport.command(id).await?;

        info!("[ADDED] {} [{}]", command.text, id);

        let command_ref = match decode(&command.text) {
            Ok(command_ref) => command_ref,
            Err(e) => {
                // malformed commands are never acknowledged
                error!("[ADDED] {} [{}]", e, id);
                self.reporter.mark_failed(id).await;
                return Ok(());
            }
        };

        // the origin must see the ack even if dispatch fails below
        self.reporter.acknowledge(id).await;

        if command_ref.domain == self.meta_domain {
            // built-in pseudo-handler; the registry is never consulted
            info!("Meta command {} [{}]", command.text, id);
            self.reporter.mark_complete(id).await;
            return Ok(());
        }

        self.execute(id, &command_ref).await;
        Ok(())
    }

    async fn execute(&self, id: &CommandId, command: &CommandRef) {
        let action = {
            let registry = self.registry.read().await;
            match registry.resolve(&command.handler, &command.action) {
                Some(action) => action.clone(),
                None => {
                    warn!(
                        "No handler registered for {}.{} [{}]",
                        command.handler, command.action, id
                    );
                    self.reporter.mark_failed(id).await;
                    return;
                }
            }
        };

        let status = match action {
            Action::Callback(f) => self.invoke_callback(&f).await,
            Action::Async(f) => self.invoke_async(&f).await,
            Action::Delegated => {
                self.delegate(id, command).await;
                return;
            }
        };

        self.reporter.report(id, status).await;
    }

    /// Bridge a one-shot result callback onto a channel the engine can await
    async fn invoke_callback(&self, f: &CallbackActionFn) -> DispatchStatus {
        let (tx, rx) = oneshot::channel::<String>();

        f(Box::new(move |code: &str| {
            let _ = tx.send(code.to_string());
        }));

        match rx.await {
            Ok(code) => DispatchStatus::from_code(&code),
            // handler dropped the callback without ever reporting
            Err(_) => DispatchStatus::Failed,
        }
    }

    async fn invoke_async(&self, f: &AsyncActionFn) -> DispatchStatus {
        match f().await {
            Ok(code) => DispatchStatus::from_code(&code),
            Err(e) => {
                warn!("Action failed: {:#}", e);
                DispatchStatus::Failed
            }
        }
    }

    /// Hand the command to the device manager, which owns all further status
    /// reporting. The engine only reports when the handoff itself is
    /// impossible or fails.
    async fn delegate(&self, id: &CommandId, command: &CommandRef) {
        match &self.device_manager {
            Some(manager) => {
                if let Err(e) = manager.trigger(id, command).await {
                    error!(
                        "Delegating {}.{} failed [{}]: {:#}",
                        command.handler, command.action, id, e
                    );
                    self.reporter.mark_failed(id).await;
                }
            }
            None => {
                error!(
                    "Delegated action {}.{} but no device manager is wired [{}]",
                    command.handler, command.action, id
                );
                self.reporter.mark_failed(id).await;
            }
        }
    }
}
