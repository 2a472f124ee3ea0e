use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Case-fold and strip diacritics while keeping punctuation and spacing.
///
/// Used for whole-value (keyword) postings, wildcard patterns and sort keys.
pub fn normalize(input: &str) -> String {
    input
        .trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Split a value into searchable tokens: normalized, then broken on every
/// non-alphanumeric character.
pub fn tokenize(input: &str) -> Vec<String> {
    normalize(input)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
