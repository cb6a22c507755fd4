//! Text model shared by the Mend pipeline.
//!
//! This crate is intentionally small: a [`LineIndex`] for converting between
//! LSP positions (zero-based line / UTF-16 code unit) and byte offsets, and
//! deterministic application of text edits onto document snapshots.

mod edit;
mod text;

pub use edit::{apply_text_edits, apply_workspace_changes, EditError, WorkspaceEditError};
pub use text::LineIndex;
