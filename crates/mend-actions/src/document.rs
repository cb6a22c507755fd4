use lsp_types::Uri;

/// A detached snapshot of a text document, owned by the caller for the
/// duration of one code-action flow.
#[derive(Clone, Debug)]
pub struct Document {
    pub uri: Uri,
    pub language_id: String,
    pub text: String,
}

impl Document {
    pub fn new(uri: Uri, language_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri,
            language_id: language_id.into(),
            text: text.into(),
        }
    }
}

/// Predicate deciding which documents a provider registration applies to.
#[derive(Clone, Debug)]
pub enum DocumentSelector {
    /// Matches every document.
    Any,
    /// Matches documents whose language id is in the set.
    Languages(Vec<String>),
}

impl DocumentSelector {
    pub fn language(id: impl Into<String>) -> Self {
        Self::Languages(vec![id.into()])
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            DocumentSelector::Any => true,
            DocumentSelector::Languages(ids) => {
                ids.iter().any(|id| id == &document.language_id)
            }
        }
    }
}
