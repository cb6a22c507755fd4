use crate::action::SourcedAction;
use crate::kind::covered_by_any;
use lsp_types::CodeActionKind;

/// Drop disabled actions and, when a kind filter is supplied, actions whose
/// kind is not covered by at least one requested kind.
///
/// Stable: the relative order of surviving actions is preserved. Filtering an
/// already-filtered sequence by the same kinds is a no-op.
pub fn filter_actions(
    actions: Vec<SourcedAction>,
    kinds: Option<&[CodeActionKind]>,
) -> Vec<SourcedAction> {
    actions
        .into_iter()
        .filter(|sourced| {
            let action = sourced.action();
            if action.disabled.is_some() {
                return false;
            }
            match kinds {
                Some(kinds) if !kinds.is_empty() => match &action.kind {
                    Some(kind) => covered_by_any(kind, kinds),
                    None => false,
                },
                _ => true,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::{CodeAction, CodeActionDisabled};

    fn action(title: &str, kind: Option<&str>) -> SourcedAction {
        SourcedAction::detached(CodeAction {
            title: title.to_string(),
            kind: kind.map(|k| CodeActionKind::from(k.to_string())),
            ..Default::default()
        })
    }

    fn disabled(title: &str, kind: &str) -> SourcedAction {
        SourcedAction::detached(CodeAction {
            title: title.to_string(),
            kind: Some(CodeActionKind::from(kind.to_string())),
            disabled: Some(CodeActionDisabled {
                reason: "not applicable here".to_string(),
            }),
            ..Default::default()
        })
    }

    fn titles(actions: &[SourcedAction]) -> Vec<&str> {
        actions.iter().map(|a| a.title()).collect()
    }

    #[test]
    fn disabled_actions_never_survive() {
        let out = filter_actions(
            vec![action("a", Some("quickfix")), disabled("b", "quickfix")],
            None,
        );
        assert_eq!(titles(&out), vec!["a"]);

        let kinds = [CodeActionKind::QUICKFIX];
        let out = filter_actions(
            vec![disabled("b", "quickfix"), action("a", Some("quickfix"))],
            Some(&kinds),
        );
        assert_eq!(titles(&out), vec!["a"]);
    }

    #[test]
    fn kind_filter_uses_prefix_coverage_and_keeps_order() {
        let kinds = [CodeActionKind::REFACTOR];
        let out = filter_actions(
            vec![
                action("extract", Some("refactor.extract")),
                action("fix", Some("quickfix")),
                action("inline", Some("refactor.inline")),
                action("untagged", None),
            ],
            Some(&kinds),
        );
        assert_eq!(titles(&out), vec!["extract", "inline"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let kinds = [CodeActionKind::QUICKFIX];
        let once = filter_actions(
            vec![
                action("a", Some("quickfix")),
                action("b", Some("refactor")),
                action("c", Some("quickfix.spelling")),
            ],
            Some(&kinds),
        );
        let twice = filter_actions(once.clone(), Some(&kinds));
        assert_eq!(titles(&once), titles(&twice));
    }

    #[test]
    fn empty_kind_list_filters_nothing() {
        let out = filter_actions(vec![action("a", None)], Some(&[]));
        assert_eq!(titles(&out), vec!["a"]);
    }
}
