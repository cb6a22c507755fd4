use crate::action::SourcedAction;
use crate::command::CommandRegistry;
use crate::document::Document;
use crate::engine::CodeActionEngine;
use crate::error::CodeActionError;
use crate::filter::filter_actions;
use crate::host::{DocumentView, EditSink};
use crate::select::{organize_imports_action, preferred_quickfix, select_action};
use crate::select::{ActionIdentifier, ActionPicker};
use lsp_types::{
    CodeAction, CodeActionContext, CodeActionKind, CodeActionTriggerKind, Range,
};
use mend_core::LineIndex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// How the span of interest is derived from the current editor state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeMode {
    /// Zero-width range at the cursor.
    Cursor,
    /// The full current line, from its start to the start of the next line.
    Line,
    /// The visual selection.
    Selection,
}

/// Caller-facing entry point for the whole pipeline.
///
/// Wires the aggregation engine to the host: the active document view, the
/// edit-application sink, the interactive picker, and the command registry.
/// One cancellation token is threaded through each flow.
pub struct CodeActionHandler {
    engine: CodeActionEngine,
    view: Arc<dyn DocumentView>,
    edits: Arc<dyn EditSink>,
    picker: Arc<dyn ActionPicker>,
    commands: Arc<CommandRegistry>,
}

impl CodeActionHandler {
    pub fn new(
        engine: CodeActionEngine,
        view: Arc<dyn DocumentView>,
        edits: Arc<dyn EditSink>,
        picker: Arc<dyn ActionPicker>,
        commands: Arc<CommandRegistry>,
    ) -> Self {
        Self {
            engine,
            view,
            edits,
            picker,
            commands,
        }
    }

    pub fn commands(&self) -> &Arc<CommandRegistry> {
        &self.commands
    }

    /// Aggregate and filter the actions available for `range` (defaulting to
    /// the whole document).
    pub fn get_code_actions(
        &self,
        document: &Document,
        range: Option<Range>,
        kinds: Option<&[CodeActionKind]>,
        cancel: &CancellationToken,
    ) -> Vec<SourcedAction> {
        let range = range.unwrap_or_else(|| LineIndex::new(&document.text).full_range());
        let context = CodeActionContext {
            only: kinds.map(|kinds| kinds.to_vec()),
            trigger_kind: Some(CodeActionTriggerKind::INVOKED),
            ..CodeActionContext::default()
        };
        let actions = self.engine.aggregate(document, range, &context, cancel);
        filter_actions(actions, kinds)
    }

    /// Actions for the active document, with the range derived from `mode`.
    pub fn get_current_code_actions(
        &self,
        mode: RangeMode,
        kinds: Option<&[CodeActionKind]>,
        cancel: &CancellationToken,
    ) -> Result<Vec<SourcedAction>, CodeActionError> {
        let document = self.view.active_document()?;
        let range = self.range_for_mode(&document, mode);
        Ok(self.get_code_actions(&document, Some(range), kinds, cancel))
    }

    /// Select and apply one action for the active document.
    ///
    /// Without an identifier the picker is consulted. "Nothing to do" —
    /// no candidate, no title match, or a cancelled pick — returns
    /// `Ok(None)` with no mutation.
    pub fn do_code_action(
        &self,
        range: Option<Range>,
        identifier: Option<ActionIdentifier>,
        cancel: &CancellationToken,
    ) -> Result<Option<CodeAction>, CodeActionError> {
        let document = self.view.active_document()?;
        let actions = self.get_code_actions(&document, range, None, cancel);
        let Some(chosen) = select_action(actions, identifier, self.picker.as_ref())? else {
            return Ok(None);
        };
        if cancel.is_cancelled() {
            return Ok(None);
        }
        self.apply_code_action(chosen, cancel).map(Some)
    }

    /// Apply the preferred quickfix for the current line.
    pub fn do_quickfix(&self, cancel: &CancellationToken) -> Result<CodeAction, CodeActionError> {
        let document = self.view.active_document()?;
        let range = self.range_for_mode(&document, RangeMode::Line);
        let kinds = [CodeActionKind::QUICKFIX];
        let actions = self.get_code_actions(&document, Some(range), Some(&kinds), cancel);
        if cancel.is_cancelled() {
            return Err(CodeActionError::Cancelled);
        }
        let chosen = preferred_quickfix(&actions)
            .cloned()
            .ok_or(CodeActionError::NotFound)?;
        self.apply_code_action(chosen, cancel)
    }

    /// Apply the first organize-imports action for the whole document.
    pub fn organize_import(
        &self,
        cancel: &CancellationToken,
    ) -> Result<CodeAction, CodeActionError> {
        let document = self.view.active_document()?;
        let actions = self.get_code_actions(&document, None, None, cancel);
        if cancel.is_cancelled() {
            return Err(CodeActionError::Cancelled);
        }
        let chosen = organize_imports_action(&actions)
            .cloned()
            .ok_or(CodeActionError::NotFound)?;
        self.apply_code_action(chosen, cancel)
    }

    /// Resolve and execute one action: edit first, then command.
    ///
    /// A dispatch failure after the edit applied propagates without rolling
    /// the edit back; the two steps are sequential, not transactional.
    pub fn apply_code_action(
        &self,
        action: SourcedAction,
        cancel: &CancellationToken,
    ) -> Result<CodeAction, CodeActionError> {
        if let Some(disabled) = &action.action().disabled {
            return Err(CodeActionError::Disabled {
                reason: disabled.reason.clone(),
            });
        }

        let action = action.resolve(cancel).into_action();
        if let Some(edit) = &action.edit {
            self.edits.apply_workspace_edit(edit)?;
        }
        if let Some(command) = &action.command {
            let args = command.arguments.as_deref().unwrap_or(&[]);
            self.commands.dispatch(&command.command, args)?;
        }
        Ok(action)
    }

    fn range_for_mode(&self, document: &Document, mode: RangeMode) -> Range {
        match mode {
            RangeMode::Cursor => {
                let cursor = self.view.cursor();
                Range::new(cursor, cursor)
            }
            RangeMode::Line => {
                let index = LineIndex::new(&document.text);
                index
                    .line_range(self.view.cursor().line)
                    .unwrap_or_else(|| index.full_range())
            }
            RangeMode::Selection => self.view.selection(),
        }
    }
}
