//! Variable resolution
//!
//! Resolution happens in two steps:
//!
//! 1. **Flatten**: merge all sections into one [`FlatMapping`], walking
//!    sections and their entries in document order. A key defined twice
//!    takes the value of its last definition.
//! 2. **Resolve**: replace every `${KEY}` whose key exists in the mapping
//!    with the fully resolved value of that key, so chains such as
//!    `C -> B -> A` collapse to the terminal value of `A`.
//!
//! Step 2 walks the reference graph depth-first. Each key is resolved after
//! the keys it references, so every value is computed exactly once. A key
//! met again while it is still being resolved closes a cycle, which is
//! reported as [`CoreError::CyclicReference`] with the chain of keys.
//! Placeholders naming undefined keys are left as they are.
//!
//! Substituted text can assemble a new placeholder, for example `$` followed
//! by `{C}`. After each walk the values are scanned again, and the walk is
//! repeated until no value references a defined key. The number of rounds is
//! bounded by the number of entries; going past it is reported as a cycle.

use std::collections::HashMap;
use tracing::{debug, trace};

use crate::document::{Section, validate_sections};
use crate::error::{CoreError, Result};
use crate::mapping::FlatMapping;
use crate::placeholder::{referenced_keys, replace_known};

/// Flatten and resolve a list of sections
pub fn resolve(sections: &[Section]) -> Result<FlatMapping> {
    validate_sections(sections)?;
    let flat = flatten(sections);
    resolve_mapping(&flat)
}

/// Merge sections into one mapping, later definitions winning
pub fn flatten(sections: &[Section]) -> FlatMapping {
    let mut flat = FlatMapping::new();

    for section in sections {
        for (key, value) in section.iter() {
            if let Some(previous) = flat.insert(key, value) {
                debug!(
                    section = %section.name,
                    key,
                    previous = %previous,
                    value,
                    "variable redefined, later value wins"
                );
            }
        }
    }

    flat
}

/// Resolve placeholder chains within a flat mapping
///
/// The returned mapping has the same keys in the same order.
pub fn resolve_mapping(flat: &FlatMapping) -> Result<FlatMapping> {
    let mut current = walk_once(flat)?;
    let mut rounds = 1;

    while !current.is_resolved() {
        if rounds > flat.len() {
            return Err(pending_cycle(&current));
        }
        debug!(round = rounds, "substitution produced new placeholders, resolving again");
        current = walk_once(&current)?;
        rounds += 1;
    }

    Ok(current)
}

/// One depth-first pass over the reference graph of `flat`
fn walk_once(flat: &FlatMapping) -> Result<FlatMapping> {
    let mut walk = Walk::new(flat);

    for key in flat.keys() {
        walk.visit(key)?;
    }

    let resolved = flat
        .keys()
        .map(|key| {
            let value = walk.resolved.remove(key).unwrap_or_default();
            (key.to_string(), value)
        })
        .collect();

    Ok(resolved)
}

/// First referenced key of `key`'s value that is defined in `mapping`
fn first_defined_reference<'m>(mapping: &'m FlatMapping, key: &str) -> Option<&'m str> {
    let value = mapping.get(key)?;
    referenced_keys(value)
        .into_iter()
        .find(|k| mapping.contains_key(k))
}

/// Build the error for a mapping that keeps producing placeholders
fn pending_cycle(mapping: &FlatMapping) -> CoreError {
    let mut chain: Vec<String> = Vec::new();
    let mut next = mapping
        .keys()
        .find(|key| first_defined_reference(mapping, key).is_some());

    while let Some(key) = next {
        if let Some(start) = chain.iter().position(|k| k == key) {
            chain.drain(..start);
            chain.push(key.to_string());
            break;
        }
        chain.push(key.to_string());
        next = first_defined_reference(mapping, key);
    }

    CoreError::CyclicReference { chain }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Depth-first walk over the reference graph
struct Walk<'a> {
    flat: &'a FlatMapping,
    marks: HashMap<&'a str, Mark>,
    stack: Vec<&'a str>,
    resolved: HashMap<String, String>,
}

impl<'a> Walk<'a> {
    fn new(flat: &'a FlatMapping) -> Self {
        Self {
            flat,
            marks: HashMap::with_capacity(flat.len()),
            stack: Vec::new(),
            resolved: HashMap::with_capacity(flat.len()),
        }
    }

    fn visit(&mut self, key: &'a str) -> Result<()> {
        match self.marks.get(key) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => return Err(self.cycle_through(key)),
            None => {}
        }

        let Some(raw) = self.flat.get(key) else {
            return Ok(());
        };

        self.marks.insert(key, Mark::InProgress);
        self.stack.push(key);

        for dependency in referenced_keys(raw) {
            if self.flat.contains_key(dependency) {
                self.visit(dependency)?;
            }
        }

        let value = replace_known(raw, |k| self.resolved.get(k).map(String::as_str)).into_owned();
        if value != raw {
            trace!(key, raw, value = %value, "resolved placeholders");
        }

        self.stack.pop();
        self.marks.insert(key, Mark::Done);
        self.resolved.insert(key.to_string(), value);

        Ok(())
    }

    /// Build the error for a cycle closing on `key`
    fn cycle_through(&self, key: &str) -> CoreError {
        let start = self.stack.iter().position(|k| *k == key).unwrap_or(0);
        let mut chain: Vec<String> = self.stack[start..].iter().map(|k| k.to_string()).collect();
        chain.push(key.to_string());
        CoreError::CyclicReference { chain }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section(name: &str, entries: &[(&str, &str)]) -> Section {
        entries
            .iter()
            .fold(Section::new(name), |s, (k, v)| s.with(*k, *v))
    }

    fn resolve_one(entries: &[(&str, &str)]) -> Result<FlatMapping> {
        resolve(&[section("S", entries)])
    }

    #[test]
    fn test_last_section_wins() {
        let sections = vec![section("A", &[("A", "1")]), section("B", &[("A", "2")])];
        let resolved = resolve(&sections).unwrap();
        assert_eq!(resolved.get("A"), Some("2"));
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_flatten_keeps_first_position_and_last_value() {
        let sections = vec![
            section("ONE", &[("A", "1"), ("B", "1")]),
            section("TWO", &[("C", "2"), ("A", "2")]),
        ];
        let flat = flatten(&sections);
        let pairs: Vec<(&str, &str)> = flat.iter().collect();
        assert_eq!(pairs, vec![("A", "2"), ("B", "1"), ("C", "2")]);
    }

    #[test]
    fn test_chain_resolution() {
        let resolved = resolve_one(&[("HOST", "x"), ("URL", "http://${HOST}/api")]).unwrap();
        assert_eq!(resolved.get("URL"), Some("http://x/api"));
    }

    #[test]
    fn test_multi_hop_chain() {
        let resolved = resolve_one(&[("A", "1"), ("B", "${A}"), ("C", "${B}")]).unwrap();
        assert_eq!(resolved.get("A"), Some("1"));
        assert_eq!(resolved.get("B"), Some("1"));
        assert_eq!(resolved.get("C"), Some("1"));
    }

    #[test]
    fn test_reference_declared_before_its_target() {
        let resolved = resolve_one(&[("C", "${B}-c"), ("B", "${A}-b"), ("A", "a")]).unwrap();
        assert_eq!(resolved.get("C"), Some("a-b-c"));
        assert_eq!(resolved.get("B"), Some("a-b"));
    }

    #[test]
    fn test_reference_across_sections() {
        let sections = vec![
            section("POSTGRES", &[("POSTGRES_DB", "${APP_NAME}")]),
            section("GENERAL", &[("APP_NAME", "shop")]),
        ];
        let resolved = resolve(&sections).unwrap();
        assert_eq!(resolved.get("POSTGRES_DB"), Some("shop"));
    }

    #[test]
    fn test_multiple_placeholders_in_one_value() {
        let resolved = resolve_one(&[
            ("PROJECT", "prod"),
            ("APP_NAME", "shop"),
            ("APPSERVICE_NAME", "${APP_NAME}-app"),
            ("CONTAINER", "container_name: ${PROJECT}_${APPSERVICE_NAME}"),
        ])
        .unwrap();
        assert_eq!(resolved.get("CONTAINER"), Some("container_name: prod_shop-app"));
    }

    #[test]
    fn test_unknown_placeholder_preserved() {
        let resolved = resolve_one(&[("A", "${MISSING}")]).unwrap();
        assert_eq!(resolved.get("A"), Some("${MISSING}"));
    }

    #[test]
    fn test_unknown_placeholder_carried_through_chain() {
        let resolved = resolve_one(&[("A", "${MISSING}/a"), ("B", "${A}/b")]).unwrap();
        assert_eq!(resolved.get("B"), Some("${MISSING}/a/b"));
    }

    #[test]
    fn test_cycle_detection() {
        let err = resolve_one(&[("A", "${B}"), ("B", "${A}")]).unwrap_err();
        assert_eq!(
            err.cycle_chain().unwrap(),
            &["A".to_string(), "B".to_string(), "A".to_string()]
        );
        insta::assert_snapshot!(err.to_string(), @"Cyclic variable reference: A -> B -> A");
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let err = resolve_one(&[("A", "x${A}")]).unwrap_err();
        assert_eq!(err.cycle_chain().unwrap(), &["A".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_cycle_chain_starts_at_the_loop() {
        let err = resolve_one(&[
            ("ENTRY", "${B}"),
            ("B", "${C}"),
            ("C", "${D}"),
            ("D", "${B}"),
        ])
        .unwrap_err();
        let chain: Vec<&str> = err.cycle_chain().unwrap().iter().map(String::as_str).collect();
        assert_eq!(chain, vec!["B", "C", "D", "B"]);
    }

    #[test]
    fn test_cycle_is_found_wherever_it_sits() {
        let err = resolve_one(&[("OK", "fine"), ("X", "${Y}"), ("Y", "${Z}"), ("Z", "${X}")])
            .unwrap_err();
        assert!(matches!(err, CoreError::CyclicReference { .. }));
    }

    #[test]
    fn test_idempotence() {
        let resolved: FlatMapping = [("A", "1"), ("B", "x-1"), ("C", "${MISSING}")]
            .into_iter()
            .collect();
        assert_eq!(resolve_mapping(&resolved).unwrap(), resolved);

        let again = resolve_mapping(&resolve_one(&[("A", "1"), ("B", "${A}")]).unwrap()).unwrap();
        assert_eq!(again.get("B"), Some("1"));
    }

    #[test]
    fn test_placeholder_assembled_by_substitution() {
        let resolved = resolve_one(&[("A", "$"), ("B", "${A}{C}"), ("C", "c")]).unwrap();
        assert_eq!(resolved.get("B"), Some("c"));
        assert!(resolved.is_resolved());
        assert_eq!(resolve_mapping(&resolved).unwrap(), resolved);
    }

    #[test]
    fn test_assembled_placeholder_chain() {
        let resolved = resolve_one(&[
            ("OPEN", "${"),
            ("NAME", "${OPEN}HOST}"),
            ("HOST", "${PREFIX}.local"),
            ("PREFIX", "db"),
        ])
        .unwrap();
        assert_eq!(resolved.get("NAME"), Some("db.local"));
    }

    #[test]
    fn test_assembled_placeholder_to_unknown_key_is_kept() {
        let resolved = resolve_one(&[("A", "$"), ("B", "${A}{MISSING}")]).unwrap();
        assert_eq!(resolved.get("B"), Some("${MISSING}"));
    }

    #[test]
    fn test_assembled_self_reference_is_a_cycle() {
        let err = resolve_one(&[("A", "${"), ("B", "${A}B}")]).unwrap_err();
        assert_eq!(err.cycle_chain().unwrap(), &["B".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_assembled_cycle_between_keys() {
        let err = resolve_one(&[("D", "$"), ("X", "${D}{Y}"), ("Y", "${D}{X}")]).unwrap_err();
        assert!(matches!(err, CoreError::CyclicReference { .. }));
    }

    #[test]
    fn test_pending_cycle_chain() {
        let mapping: FlatMapping = [("OK", "1"), ("A", "${B}"), ("B", "${C}"), ("C", "${B}")]
            .into_iter()
            .collect();
        let chain: Vec<String> = match pending_cycle(&mapping) {
            CoreError::CyclicReference { chain } => chain,
            other => panic!("unexpected error: {other}"),
        };
        assert_eq!(chain, vec!["B", "C", "B"]);
    }

    #[test]
    fn test_result_is_resolved() {
        let resolved = resolve_one(&[
            ("A", "${B}${C}"),
            ("B", "${C}"),
            ("C", "c"),
            ("D", "${NOPE}"),
        ])
        .unwrap();
        assert!(resolved.is_resolved());
        assert_eq!(resolved.get("A"), Some("cc"));
    }

    #[test]
    fn test_determinism() {
        let sections = vec![
            section("ONE", &[("A", "${C}"), ("B", "${A}/${C}")]),
            section("TWO", &[("C", "c"), ("D", "${B}")]),
        ];
        let first = serde_json::to_string(&resolve(&sections).unwrap()).unwrap();
        let second = serde_json::to_string(&resolve(&sections).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolved_value_with_dollar_is_literal() {
        let resolved = resolve_one(&[("PRICE", "$5"), ("LABEL", "cost ${PRICE}")]).unwrap();
        assert_eq!(resolved.get("LABEL"), Some("cost $5"));
    }

    #[test]
    fn test_invalid_key_rejected() {
        let err = resolve(&[section("S", &[("NOT-VALID", "x")])]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve(&[]).unwrap().is_empty());
    }
}
