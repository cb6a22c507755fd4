use crate::document::Document;
use lsp_types::{Position, Range, WorkspaceEdit};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("no active document")]
    NoActiveDocument,
    #[error("failed to apply workspace edit: {0}")]
    ApplyEdit(String),
}

/// The editor state a flow operates on: the focused document plus the cursor
/// and visual selection used to compute ranges for the `current` operations.
pub trait DocumentView: Send + Sync {
    fn active_document(&self) -> Result<Document, HostError>;
    fn cursor(&self) -> Position;
    fn selection(&self) -> Range;
}

/// Applies a workspace edit as one logical operation, atomically per
/// document. The edit-application primitive itself lives in the host.
pub trait EditSink: Send + Sync {
    fn apply_workspace_edit(&self, edit: &WorkspaceEdit) -> Result<(), HostError>;
}
