//! Command observer
//!
//! Watches a live collection of commands published by a remote origin,
//! decodes each command's `domain.handler.action` text, dispatches it to a
//! registered handler, and reports lifecycle status back over the origin's
//! RPC surface.
//!
//! The flow for one command:
//! ```text
//! added(id) -> lookup record -> decode text -> ack -> resolve handler
//!           -> invoke action -> report EXECUTING | COMPLETE | FAIL
//! ```
//!
//! The pub/sub transport itself (wire protocol, reconnection, the collection
//! store) lives behind the [`transport::CommandTransport`] trait and is owned
//! by the embedding process.

pub mod command;
pub mod dispatch;
pub mod error;
pub mod observer;
pub mod registry;
pub mod status;
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

pub use command::{decode, Action, Command, CommandId, CommandRef, DispatchStatus, StatusCallback};
pub use dispatch::Dispatcher;
pub use error::{MalformedCommand, SetupError};
pub use observer::{Observer, ObserverBuilder, ObserverConfig};
pub use registry::HandlerRegistry;
pub use status::StatusReporter;
pub use transport::{CollectionEvent, CommandTransport, DeviceManager};

/// Publication carrying the live command collection
pub const COMMAND_PUBLICATION_NAME: &str = "pub_commands";

/// Collection observed by default
pub const COMMAND_COLLECTION_NAME: &str = "commands";

/// Domain handled by the built-in pseudo-handler, bypassing the registry
pub const META_DOMAIN: &str = "sonumi";

/// RPC method names understood by the command origin
pub mod rpc {
    /// Acknowledge receipt of a well-formed command
    pub const ACKNOWLEDGE: &str = "acknowledgeCommand";
    /// The handler started long-running work
    pub const EXECUTING: &str = "alreadyRunningCommand";
    /// The command completed successfully
    pub const SUCCESS: &str = "successCommand";
    /// The command failed
    pub const FAILED: &str = "failedCommand";
}
