//! Command types and the text decoder

mod decoder;

pub use decoder::decode;

use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Opaque identifier of a command record in the observed collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandId(String);

impl CommandId {
    /// Create an id from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommandId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CommandId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Raw command record as stored in the collection.
///
/// Owned by the transport collaborator; fetched by id for the duration of
/// one dispatch and never persisted here.
#[derive(Debug, Clone)]
pub struct Command {
    pub id: CommandId,
    pub text: String,
}

/// Decoded command reference: the three segments of `domain.handler.action`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRef {
    pub domain: String,
    pub handler: String,
    pub action: String,
}

/// Status codes a handler reports over its result channel
pub mod code {
    pub const EXECUTING: &str = "EXECUTING";
    pub const COMPLETE: &str = "COMPLETE";
    pub const FAIL: &str = "FAIL";
}

/// Normalized outcome of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    /// Handler started long-running work; a terminal status follows out of band
    Executing,
    /// Command completed successfully
    Complete,
    /// Command failed
    Failed,
}

impl DispatchStatus {
    /// Parse a status code reported by a handler.
    ///
    /// Anything other than the recognized codes maps to `Failed`; a status is
    /// never silently dropped.
    pub fn from_code(code: &str) -> Self {
        match code {
            code::EXECUTING => Self::Executing,
            code::COMPLETE => Self::Complete,
            _ => Self::Failed,
        }
    }
}

/// Result callback handed to a callback-style action; invoked exactly once
/// with a status code
pub type StatusCallback = Box<dyn FnOnce(&str) + Send>;

/// Body of a callback-style action
pub type CallbackActionFn = Arc<dyn Fn(StatusCallback) + Send + Sync>;

/// Body of an async action; settles to a status code or an error
pub type AsyncActionFn =
    Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<String>> + Send + Sync>;

/// A unit of work a handler exposes under one action name.
///
/// The three variants cover the three invocation styles handlers use; the
/// dispatch engine normalizes all of them to one [`DispatchStatus`] before
/// reporting, so the choice of variant is invisible to the origin.
#[derive(Clone)]
pub enum Action {
    /// Accepts a result callback and invokes it exactly once with a status code
    Callback(CallbackActionFn),
    /// Returns a future settling to a status code; errors always map to `Failed`
    Async(AsyncActionFn),
    /// Not invoked by the engine: the decoded reference is handed to the
    /// device manager, which owns all further status reporting
    Delegated,
}

impl Action {
    /// Wrap a callback-style closure as an action
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(StatusCallback) + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(f))
    }

    /// Wrap an async closure as an action
    pub fn async_fn<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        Self::Async(Arc::new(move || -> BoxFuture<'static, anyhow::Result<String>> {
            Box::pin(f())
        }))
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Action::Callback"),
            Self::Async(_) => f.write_str("Action::Async"),
            Self::Delegated => f.write_str("Action::Delegated"),
        }
    }
}
