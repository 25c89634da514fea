//! `${KEY}` placeholder scanning and replacement
//!
//! Only the braced form is recognised. Bare `$NAME`, `$$` and malformed
//! braces (`${}`, `${1X}`, `${A-B}`, an unterminated `${A`) are plain text,
//! so nginx variables such as `$host` pass through untouched.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

static KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// A placeholder occurrence inside a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Referenced key, without the `${` `}` delimiters
    pub key: &'a str,
    /// Byte offset of the `$`
    pub start: usize,
    /// Byte offset one past the closing `}`
    pub end: usize,
}

impl Placeholder<'_> {
    /// 1-based line number of this placeholder within `text`
    pub fn line_in(&self, text: &str) -> usize {
        text[..self.start].matches('\n').count() + 1
    }
}

/// Check whether `key` is a valid variable name
pub fn is_valid_key(key: &str) -> bool {
    KEY.is_match(key)
}

/// Iterate over every placeholder in `text`, in order of appearance
pub fn placeholders(text: &str) -> impl Iterator<Item = Placeholder<'_>> {
    PLACEHOLDER.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let key = caps.get(1)?;
        Some(Placeholder {
            key: key.as_str(),
            start: whole.start(),
            end: whole.end(),
        })
    })
}

/// Distinct keys referenced by `text`, in order of first appearance
pub fn referenced_keys(text: &str) -> Vec<&str> {
    let mut keys: Vec<&str> = Vec::new();
    for placeholder in placeholders(text) {
        if !keys.contains(&placeholder.key) {
            keys.push(placeholder.key);
        }
    }
    keys
}

/// Check whether `text` contains at least one placeholder
pub fn has_placeholders(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}

/// Replace every placeholder for which `lookup` returns a value
///
/// Placeholders whose key is unknown to `lookup` are kept verbatim. The
/// replacement text is inserted literally; a `$` inside a value is never
/// interpreted.
pub fn replace_known<'t, 'v, F>(text: &'t str, lookup: F) -> Cow<'t, str>
where
    F: Fn(&str) -> Option<&'v str>,
{
    PLACEHOLDER.replace_all(text, |caps: &Captures| match lookup(&caps[1]) {
        Some(value) => value.to_string(),
        None => caps[0].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_placeholders_in_order() {
        let text = "http://${HOST}:${PORT}/${HOST}";
        let keys: Vec<&str> = placeholders(text).map(|p| p.key).collect();
        assert_eq!(keys, vec!["HOST", "PORT", "HOST"]);
        assert_eq!(referenced_keys(text), vec!["HOST", "PORT"]);
    }

    #[test]
    fn test_malformed_placeholders_are_text() {
        for text in ["${}", "${1X}", "${A-B}", "${A", "$A", "$$", "{A}", "$ {A}"] {
            assert!(!has_placeholders(text), "{text} should not match");
        }
    }

    #[test]
    fn test_nested_braces_match_inner_placeholder() {
        let keys: Vec<&str> = placeholders("${${A}}").map(|p| p.key).collect();
        assert_eq!(keys, vec!["A"]);
    }

    #[test]
    fn test_placeholder_offsets_and_line() {
        let text = "first\nsecond ${KEY} here";
        let found: Vec<_> = placeholders(text).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].start..found[0].end], "${KEY}");
        assert_eq!(found[0].line_in(text), 2);
    }

    #[test]
    fn test_replace_known_keeps_unknown() {
        let values: HashMap<&str, &str> = [("A", "1")].into_iter().collect();
        let out = replace_known("${A}-${B}", |k| values.get(k).copied());
        assert_eq!(out, "1-${B}");
    }

    #[test]
    fn test_replace_known_is_literal() {
        let values: HashMap<&str, &str> = [("A", "$1 ${0}")].into_iter().collect();
        let out = replace_known("x=${A}", |k| values.get(k).copied());
        assert_eq!(out, "x=$1 ${0}");
    }

    #[test]
    fn test_replace_without_placeholders_borrows() {
        let out = replace_known("plain text", |_| None);
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_valid_keys() {
        assert!(is_valid_key("APP_NAME"));
        assert!(is_valid_key("_private"));
        assert!(is_valid_key("a1"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("1A"));
        assert!(!is_valid_key("APP-NAME"));
        assert!(!is_valid_key("app.name"));
    }
}
