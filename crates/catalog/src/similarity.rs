//! Text normalization and string similarity.

/// Score for one string containing the other
pub const CONTAINS_SCORE: f64 = 0.9;

/// Upper bound of the character-overlap score, kept below [`CONTAINS_SCORE`]
/// so overlap alone can never pass as containment
pub const OVERLAP_CEILING: f64 = 0.85;

/// Lowercase, drop everything but word characters and whitespace, collapse
/// whitespace runs, trim
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace tokens of at least two characters
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized
        .split_whitespace()
        .filter(|t| t.chars().count() >= 2)
        .collect()
}

/// Either non-empty string contains the other
pub fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Similarity of two normalized strings in `[0, 1]`
///
/// 1.0 for equal strings, [`CONTAINS_SCORE`] when one contains the other,
/// otherwise the number of characters of the shorter string found in order
/// in the longer one, divided by the longer length and capped at
/// [`OVERLAP_CEILING`].
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if contains_either(a, b) {
        return CONTAINS_SCORE;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    let mut matched = 0usize;
    let mut cursor = 0usize;
    for c in shorter {
        if let Some(offset) = longer[cursor..].iter().position(|l| l == c) {
            matched += 1;
            cursor += offset + 1;
        }
    }

    (matched as f64 / longer.len() as f64).min(OVERLAP_CEILING)
}
