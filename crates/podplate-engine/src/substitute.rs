//! Safe `${KEY}` substitution into template text
//!
//! Substitution never fails: a placeholder whose key is missing from the
//! mapping stays in the output exactly as written.

use podplate_core::FlatMapping;
use podplate_core::placeholder::{placeholders, replace_known};

use crate::error::UnresolvedPlaceholder;

/// Substitute every known `${KEY}` in `template`
///
/// `values` should already be resolved; substitution makes a single pass
/// and does not follow placeholders inside the inserted values.
pub fn substitute(template: &str, values: &FlatMapping) -> String {
    replace_known(template, |key| values.get(key)).into_owned()
}

/// Placeholders in rendered output whose key is not defined in `values`
pub fn unresolved_placeholders(rendered: &str, values: &FlatMapping) -> Vec<UnresolvedPlaceholder> {
    placeholders(rendered)
        .filter(|p| !values.contains_key(p.key))
        .map(|p| UnresolvedPlaceholder {
            key: p.key.to_string(),
            line: p.line_in(rendered),
            suggestion: None,
        })
        .collect()
}
