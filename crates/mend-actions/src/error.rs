use crate::command::CommandError;
use crate::host::HostError;
use thiserror::Error;

/// Failures surfaced to callers of the code-action operations.
///
/// Individual provider failures never appear here; they are logged and the
/// provider simply contributes no actions. A cancelled interactive pick is
/// reported as "no action chosen" (`Ok(None)`), not as an error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CodeActionError {
    #[error("no matching code action found")]
    NotFound,
    #[error("code action is disabled: {reason}")]
    Disabled { reason: String },
    #[error("code action flow was cancelled")]
    Cancelled,
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Command(#[from] CommandError),
}
