use crate::action::SourcedAction;
use crate::error::CodeActionError;
use crate::filter::filter_actions;
use crate::kind::kind_covers;
use lsp_types::CodeActionKind;

/// How a caller names the action it wants, short of picking interactively.
#[derive(Clone, Debug)]
pub enum ActionIdentifier {
    /// Exact title match; the first match in sequence order wins.
    Title(String),
    /// Kind-prefix filter that must leave exactly one candidate.
    Kinds(Vec<CodeActionKind>),
}

/// Presents an ordered menu of labels and awaits the caller's choice.
///
/// Returning `None` is a cancellation; callers treat it as "no action
/// chosen", never as an error.
pub trait ActionPicker: Send + Sync {
    fn pick(&self, labels: &[String]) -> Option<usize>;
}

/// Turn a filtered collection into the single action to execute.
///
/// With a [`ActionIdentifier::Title`], no match yields `Ok(None)`. With
/// [`ActionIdentifier::Kinds`], anything but exactly one surviving candidate
/// is [`CodeActionError::NotFound`]. Without an identifier the picker is
/// consulted; an empty collection or a cancelled pick yields `Ok(None)`.
pub fn select_action(
    actions: Vec<SourcedAction>,
    identifier: Option<ActionIdentifier>,
    picker: &dyn ActionPicker,
) -> Result<Option<SourcedAction>, CodeActionError> {
    match identifier {
        Some(ActionIdentifier::Title(title)) => Ok(actions
            .into_iter()
            .find(|action| action.title() == title)),
        Some(ActionIdentifier::Kinds(kinds)) => {
            let mut filtered = filter_actions(actions, Some(&kinds));
            if filtered.len() != 1 {
                return Err(CodeActionError::NotFound);
            }
            Ok(filtered.pop())
        }
        None => {
            if actions.is_empty() {
                return Ok(None);
            }
            let labels: Vec<String> = actions
                .iter()
                .map(|action| action.title().to_string())
                .collect();
            match picker.pick(&labels) {
                Some(index) => Ok(actions.into_iter().nth(index)),
                None => Ok(None),
            }
        }
    }
}

/// The first preferred action covered by `quickfix`.
pub(crate) fn preferred_quickfix(actions: &[SourcedAction]) -> Option<&SourcedAction> {
    actions.iter().find(|sourced| {
        let action = sourced.action();
        action
            .kind
            .as_ref()
            .is_some_and(|kind| kind_covers(&CodeActionKind::QUICKFIX, kind))
            && action.is_preferred == Some(true)
    })
}

/// The first action covered by `source.organizeImports`.
pub(crate) fn organize_imports_action(actions: &[SourcedAction]) -> Option<&SourcedAction> {
    actions.iter().find(|sourced| {
        sourced
            .action()
            .kind
            .as_ref()
            .is_some_and(|kind| kind_covers(&CodeActionKind::SOURCE_ORGANIZE_IMPORTS, kind))
    })
}
