use crate::document::Document;
use lsp_types::{CodeAction, CodeActionContext, Range};
use std::fmt;
use tokio_util::sync::CancellationToken;

/// The result type returned by action providers.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The provider exceeded its own internal time budget.
    Timeout,
    /// The provider panicked.
    Panic,
    /// Any other provider-side failure.
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ProviderError {}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderErrorKind::Timeout => "timeout",
            ProviderErrorKind::Panic => "panic",
            ProviderErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// A source of code actions for a span of a document.
///
/// `provide_actions` is required; resolution is an optional capability that
/// implementations opt into by overriding [`ActionProvider::supports_resolve`]
/// together with [`ActionProvider::resolve_action`]. The capability marker is
/// explicit so callers never probe for behavior.
pub trait ActionProvider: Send + Sync {
    fn name(&self) -> &str;

    /// List candidate actions for `range`. The context carries diagnostics
    /// and trigger metadata through to the provider untouched.
    fn provide_actions(
        &self,
        document: &Document,
        range: Range,
        context: &CodeActionContext,
        cancel: &CancellationToken,
    ) -> ProviderResult<Vec<CodeAction>>;

    /// Whether this provider can fill in edits/commands for actions it listed
    /// with only a title and kind.
    fn supports_resolve(&self) -> bool {
        false
    }

    /// Resolve a previously listed action into a complete one. Returning
    /// `Ok(None)` means the provider has nothing to add; the unresolved
    /// action stays valid.
    fn resolve_action(
        &self,
        action: CodeAction,
        _cancel: &CancellationToken,
    ) -> ProviderResult<Option<CodeAction>> {
        Ok(Some(action))
    }
}
