use crate::registry::RegisteredProvider;
use lsp_types::{CodeAction, CodeActionKind, WorkspaceEdit};
use std::fmt;
use tokio_util::sync::CancellationToken;

/// A code action together with the provider that produced it.
///
/// The association is established at aggregation time and used to route the
/// lazy resolve step back to the owning provider. Actions constructed by the
/// caller have no source and simply never resolve further.
#[derive(Clone)]
pub struct SourcedAction {
    action: CodeAction,
    source: Option<RegisteredProvider>,
}

impl SourcedAction {
    pub fn new(action: CodeAction, source: RegisteredProvider) -> Self {
        Self {
            action,
            source: Some(source),
        }
    }

    /// An action with no owning provider.
    pub fn detached(action: CodeAction) -> Self {
        Self {
            action,
            source: None,
        }
    }

    pub fn action(&self) -> &CodeAction {
        &self.action
    }

    pub fn into_action(self) -> CodeAction {
        self.action
    }

    pub fn title(&self) -> &str {
        &self.action.title
    }

    /// Fill in the action's edit/command via the owning provider.
    ///
    /// Idempotent: an action that already carries an edit is returned
    /// unchanged. A provider without the resolve capability, a provider that
    /// has nothing to add, or a resolve failure all leave the action as it
    /// was; an unresolved action stays valid.
    pub fn resolve(self, cancel: &CancellationToken) -> Self {
        if self.action.edit.is_some() {
            return self;
        }
        let Some(source) = &self.source else {
            return self;
        };
        if !source.provider().supports_resolve() {
            return self;
        }

        match source.provider().resolve_action(self.action.clone(), cancel) {
            Ok(Some(resolved)) => Self {
                action: resolved,
                source: self.source.clone(),
            },
            Ok(None) => self,
            Err(err) => {
                tracing::warn!(
                    target: "mend.actions",
                    provider = source.name(),
                    action = %self.action.title,
                    error = %err,
                    "code action resolve failed"
                );
                self
            }
        }
    }
}

impl fmt::Debug for SourcedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcedAction")
            .field("title", &self.action.title)
            .field("kind", &self.action.kind)
            .field("source", &self.source.as_ref().map(|s| s.name()))
            .finish()
    }
}

/// Build a complete code action around a workspace edit.
pub fn code_action_for_edit(
    title: impl Into<String>,
    kind: CodeActionKind,
    edit: WorkspaceEdit,
) -> CodeAction {
    CodeAction {
        title: title.into(),
        kind: Some(kind),
        edit: Some(edit),
        ..Default::default()
    }
}
