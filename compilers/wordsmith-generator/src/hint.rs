use wordsmith_catalog::CatalogIndex;
use wordsmith_protocol::{Role, GENERIC_HINT};

/// Describes every root among `parts`, in input order.
///
/// Parts that are unknown or are not roots contribute nothing; with no roots
/// left the generic hint is returned.
pub fn compose_hint<S: AsRef<str>>(index: &CatalogIndex, parts: &[S]) -> String {
    let clauses: Vec<String> = index
        .resolve(parts)
        .into_iter()
        .filter(|m| m.role == Role::Root)
        .map(|m| format!("The root '{}' means '{}'.", m.text, m.meaning))
        .collect();

    if clauses.is_empty() {
        GENERIC_HINT.to_string()
    } else {
        clauses.join(" ")
    }
}
