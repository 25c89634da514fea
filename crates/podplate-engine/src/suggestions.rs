//! Fuzzy matching for undefined variables and unknown template names
//!
//! Uses Levenshtein distance to point at the key the author most likely meant.

/// Maximum Levenshtein distance to consider for suggestions
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Suggestion result with confidence scoring
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggested correction
    pub text: String,
    /// Levenshtein distance (lower = better match)
    pub distance: usize,
}

/// Calculate Levenshtein distance between two strings
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Find closest matches from a list of candidates
pub fn find_closest_matches<'a>(
    input: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    max_results: usize,
) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let distance = levenshtein(input, candidate);
            if distance <= MAX_SUGGESTION_DISTANCE && distance > 0 {
                Some(Suggestion {
                    text: candidate.to_string(),
                    distance,
                })
            } else {
                None
            }
        })
        .collect();

    // Stable sort keeps candidate order among equal distances
    suggestions.sort_by_key(|s| s.distance);
    suggestions.truncate(max_results);
    suggestions
}

/// Suggest a defined key for an undefined one
pub fn suggest_key<'a>(missing: &str, known: impl IntoIterator<Item = &'a str> + Clone) -> Option<String> {
    // Wrong case is the most common slip: `${app_name}` for `${APP_NAME}`
    if let Some(exact) = known
        .clone()
        .into_iter()
        .find(|k| k.eq_ignore_ascii_case(missing) && *k != missing)
    {
        return Some(format!("did you mean `{}`?", exact));
    }

    let matches = find_closest_matches(missing, known, 2);
    if matches.is_empty() {
        return None;
    }

    let names: Vec<String> = matches.iter().map(|s| format!("`{}`", s.text)).collect();
    Some(format!("did you mean {}?", names.join(" or ")))
}

/// Suggest a built-in template for an unknown name
pub fn suggest_template<'a>(name: &str, available: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let available: Vec<&str> = available.into_iter().collect();

    let matches = find_closest_matches(name, available.iter().copied(), 1);
    if let Some(best) = matches.first() {
        return Some(format!("did you mean `{}`?", best.text));
    }

    Some(format!("available templates: {}", available.join(", ")))
}
