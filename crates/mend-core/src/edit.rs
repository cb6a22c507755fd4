//! Deterministic application of text edits.

use crate::LineIndex;
use lsp_types::{Range, TextEdit, Uri, WorkspaceEdit};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("edit range {0:?} does not resolve to valid offsets")]
    InvalidRange(Range),
    #[error("overlapping edits: {first:?} overlaps {second:?}")]
    OverlappingEdits { first: Range, second: Range },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorkspaceEditError {
    #[error("unknown document: {0}")]
    UnknownDocument(String),
    #[error("invalid edit in {uri}: {source}")]
    Document { uri: String, source: EditError },
    #[error("document_changes are not supported; use the changes map")]
    UnsupportedDocumentChanges,
}

/// Apply a list of edits to a text snapshot.
///
/// The function is deterministic: edits are sorted by `(start, end)` and
/// spliced from the end of the text backwards, so the caller-supplied order
/// does not matter. Ranges must be well-formed and non-overlapping; multiple
/// inserts at the same position are applied in their sorted (stable) order.
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let index = LineIndex::new(text);

    let mut resolved = Vec::with_capacity(edits.len());
    for edit in edits {
        let start = index
            .offset_at(text, edit.range.start)
            .ok_or(EditError::InvalidRange(edit.range))?;
        let end = index
            .offset_at(text, edit.range.end)
            .ok_or(EditError::InvalidRange(edit.range))?;
        if start > end {
            return Err(EditError::InvalidRange(edit.range));
        }
        resolved.push((start, end, edit));
    }
    resolved.sort_by_key(|(start, end, _)| (*start, *end));

    for pair in resolved.windows(2) {
        let (_, first_end, first) = pair[0];
        let (second_start, _, second) = pair[1];
        if first_end > second_start {
            return Err(EditError::OverlappingEdits {
                first: first.range,
                second: second.range,
            });
        }
    }

    let mut out = text.to_string();
    for (start, end, edit) in resolved.into_iter().rev() {
        out.replace_range(start..end, &edit.new_text);
    }
    Ok(out)
}

/// Apply a workspace edit's `changes` map to an in-memory document store.
///
/// New contents for every touched document are computed before any document
/// is updated, so a failing edit leaves the store untouched.
pub fn apply_workspace_changes(
    documents: &mut HashMap<Uri, String>,
    edit: &WorkspaceEdit,
) -> Result<(), WorkspaceEditError> {
    if edit.document_changes.is_some() {
        return Err(WorkspaceEditError::UnsupportedDocumentChanges);
    }
    let Some(changes) = &edit.changes else {
        return Ok(());
    };

    let mut updated = Vec::with_capacity(changes.len());
    for (uri, edits) in changes {
        let text = documents
            .get(uri)
            .ok_or_else(|| WorkspaceEditError::UnknownDocument(uri.to_string()))?;
        let new_text =
            apply_text_edits(text, edits).map_err(|source| WorkspaceEditError::Document {
                uri: uri.to_string(),
                source,
            })?;
        updated.push((uri.clone(), new_text));
    }

    for (uri, text) in updated {
        documents.insert(uri, text);
    }
    Ok(())
}
