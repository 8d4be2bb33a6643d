//! Query normalization and the explicit article-reference scanner.
//!
//! The reference pattern is `article` followed by optional whitespace and a
//! token of the form `\d+[a-z]?` ("21", "21a"). It is implemented as a plain
//! scanner so the rule stays unit-testable without a regex engine.

/// Lower-case and trim a raw query.
#[must_use]
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whitespace-split tokens of an already-normalized query. Punctuation is kept
/// attached to its token on purpose: word-equality scoring matches the stored
/// text the same way.
#[must_use]
pub fn tokenize(normalized_query: &str) -> Vec<&str> {
    normalized_query.split_whitespace().collect()
}

/// Extract an explicit article reference from a normalized query.
///
/// Returns the referenced number ("21", "21a") from the first occurrence of
/// `article` that is followed, after optional whitespace, by digits and an
/// optional trailing letter. Occurrences without digits are skipped, so
/// "article about liberty, see article 19" still resolves to "19".
#[must_use]
pub fn extract_article_reference(normalized_query: &str) -> Option<String> {
    const MARKER: &str = "article";

    let bytes = normalized_query.as_bytes();
    let mut search_from = 0;

    while let Some(found) = normalized_query[search_from..].find(MARKER) {
        let marker_start = search_from + found;
        let mut cursor = marker_start + MARKER.len();

        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }

        let digits_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }

        if cursor > digits_start {
            let mut end = cursor;
            if end < bytes.len() && bytes[end].is_ascii_lowercase() {
                end += 1;
            }
            return Some(normalized_query[digits_start..end].to_string());
        }

        search_from = marker_start + 1;
    }

    None
}
