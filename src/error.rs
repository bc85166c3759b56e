//! Error taxonomy
//!
//! Per-command failures (malformed text, unknown handlers, action failures)
//! are converted into status reports and never surface as errors; the types
//! here cover the two cases that do: a command whose text cannot be decoded,
//! and a missing collaborator at construction time.

use thiserror::Error;

/// Command text that does not split into exactly three non-empty segments.
///
/// This is an expected, common case: it is reported to the origin as a
/// failure, never raised past the dispatch engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed command text {text:?}, expected domain.handler.action")]
pub struct MalformedCommand {
    /// The offending command text
    pub text: String,
}

/// A required collaborator was missing at construction time.
///
/// Fatal at startup only; nothing after construction produces this.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("a transport client is required to build an observer")]
    MissingTransport,
}
