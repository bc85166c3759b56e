//! Collaborator traits at the pub/sub boundary
//!
//! The transport owns the wire protocol, reconnection, and the command
//! collection itself; this crate only consumes the contract below. The
//! device manager is the optional collaborator that executes delegated
//! actions and owns their status reporting.

use crate::command::{Command, CommandId, CommandRef};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

/// Change notifications for the observed collection
#[derive(Debug, Clone)]
pub enum CollectionEvent {
    /// A command record was added; drives one dispatch
    Added { id: CommandId },
    /// A record changed; diagnostic only, no state change
    Changed {
        id: CommandId,
        old_fields: Value,
        cleared_fields: Value,
        new_fields: Value,
    },
    /// A record was removed; diagnostic only, no state change
    Removed { id: CommandId, old_value: Value },
}

/// Client for the pub/sub transport that owns the command collection
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Subscribe to a publication by name
    async fn subscribe(&self, publication: &str) -> Result<()>;

    /// Establish a live view of a collection; events arrive on the returned
    /// channel until the transport closes it
    async fn observe(&self, collection: &str) -> Result<mpsc::Receiver<CollectionEvent>>;

    /// Look up a command record by id.
    ///
    /// Errors if the id is absent. The transport guarantees presence for an
    /// id it just announced as added, so an absence here is a contract
    /// violation, not a per-command failure.
    async fn command(&self, id: &CommandId) -> Result<Command>;

    /// Invoke a named RPC on the origin with the command id as its argument
    async fn call(&self, method: &str, id: &CommandId) -> Result<()>;
}

/// Executes delegated actions; solely responsible for their status reporting
#[async_trait]
pub trait DeviceManager: Send + Sync {
    /// Take over execution of a decoded command
    async fn trigger(&self, id: &CommandId, command: &CommandRef) -> Result<()>;
}
