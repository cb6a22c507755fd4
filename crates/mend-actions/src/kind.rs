use lsp_types::CodeActionKind;

/// Whether `kind` is covered by the filter kind `filter`.
///
/// A kind `A` is covered by `B` iff `A == B` or `A` starts with `B` followed
/// by a dot segment, e.g. `refactor.extract.function` is covered by
/// `refactor.extract` but not by `refactor.ex`.
pub fn kind_covers(filter: &CodeActionKind, kind: &CodeActionKind) -> bool {
    let filter = filter.as_str();
    let kind = kind.as_str();
    kind == filter
        || (kind.len() > filter.len()
            && kind.starts_with(filter)
            && kind.as_bytes()[filter.len()] == b'.')
}

/// Whether `kind` is covered by at least one of `filters`.
pub fn covered_by_any(kind: &CodeActionKind, filters: &[CodeActionKind]) -> bool {
    filters.iter().any(|filter| kind_covers(filter, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(s: &str) -> CodeActionKind {
        CodeActionKind::from(s.to_string())
    }

    #[test]
    fn coverage_is_dot_segment_prefix() {
        assert!(kind_covers(&kind("quickfix"), &kind("quickfix")));
        assert!(kind_covers(&kind("refactor"), &kind("refactor.extract")));
        assert!(kind_covers(
            &kind("source.organizeImports"),
            &kind("source.organizeImports.java")
        ));

        assert!(!kind_covers(&kind("refactor.ex"), &kind("refactor.extract")));
        assert!(!kind_covers(&kind("quickfix"), &kind("quickfixes")));
        assert!(!kind_covers(&kind("refactor.extract"), &kind("refactor")));
    }

    #[test]
    fn any_coverage_checks_each_filter() {
        let filters = vec![kind("quickfix"), kind("source")];
        assert!(covered_by_any(&kind("source.organizeImports"), &filters));
        assert!(!covered_by_any(&kind("refactor"), &filters));
        assert!(!covered_by_any(&kind("refactor"), &[]));
    }
}
