//! Query normalization.
//!
//! Turns raw user input into a [`MatchPattern`]: a literal, case-insensitive
//! pattern that finds every non-overlapping occurrence of the query.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::error::{PagemarkError, Result};

/// Default minimum query length, in characters, after trimming.
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;

/// A compiled literal pattern derived from a user query.
#[derive(Debug, Clone)]
pub struct MatchPattern {
    query: String,
    regex: Regex,
}

impl MatchPattern {
    /// The trimmed query this pattern matches literally.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The escaped regular expression source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Byte ranges of every non-overlapping match, left to right.
    pub fn find_ranges(&self, text: &str) -> Vec<Range<usize>> {
        self.regex.find_iter(text).map(|m| m.range()).collect()
    }

    pub fn count_in(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }
}

/// Escape every character that is special in the pattern syntax.
///
/// At minimum `. * + ? ^ $ { } ( ) | [ ] \` are escaped, so the result only
/// ever matches `literal` itself.
pub fn escape_pattern(literal: &str) -> String {
    regex::escape(literal)
}

/// Validate and compile a raw query.
///
/// Returns [`PagemarkError::TooShort`] when the trimmed query has fewer than
/// `min_chars` characters.
pub fn normalize(raw: &str, min_chars: usize) -> Result<MatchPattern> {
    let query = raw.trim();
    let length = query.chars().count();
    if length == 0 || length < min_chars {
        return Err(PagemarkError::too_short(min_chars, length));
    }

    let regex = RegexBuilder::new(&escape_pattern(query))
        .case_insensitive(true)
        .build()
        .map_err(|e| PagemarkError::pattern(format!("failed to compile query: {e}")))?;

    Ok(MatchPattern {
        query: query.to_string(),
        regex,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_keeps_literal() {
        let pattern = normalize("  daily \n", DEFAULT_MIN_QUERY_CHARS).unwrap();
        assert_eq!(pattern.query(), "daily");
    }

    #[test]
    fn test_rejection_boundary() {
        match normalize(" a ", DEFAULT_MIN_QUERY_CHARS) {
            Err(PagemarkError::TooShort { min, actual }) => {
                assert_eq!(min, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected TooShort, got {other:?}"),
        }
        assert!(normalize("ab", DEFAULT_MIN_QUERY_CHARS).is_ok());
        assert!(normalize("   ", DEFAULT_MIN_QUERY_CHARS).is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert!(normalize("é", DEFAULT_MIN_QUERY_CHARS).is_err());
        assert!(normalize("日本", DEFAULT_MIN_QUERY_CHARS).is_ok());
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let pattern = normalize("a.b*c", DEFAULT_MIN_QUERY_CHARS).unwrap();
        assert_eq!(pattern.count_in("a.b*c"), 1);
        assert_eq!(pattern.count_in("axbbbc"), 0);

        for query in ["(x)", "[ab]", "^$", "a|b", "x{2}", "1+1?", r"C:\dir"] {
            let pattern = normalize(query, DEFAULT_MIN_QUERY_CHARS).unwrap();
            let haystack = format!("before {query} after");
            assert_eq!(pattern.count_in(&haystack), 1, "query {query:?}");
        }
    }

    #[test]
    fn test_escape_pattern_covers_metacharacters() {
        let escaped = escape_pattern(r".*+?^${}()|[]\");
        for meta in [".", "*", "+", "?", "^", "$", "{", "}", "(", ")", "|", "[", "]"] {
            assert!(escaped.contains(&format!("\\{meta}")), "{meta} not escaped");
        }
        assert!(escaped.contains(r"\\"));
    }

    #[test]
    fn test_case_insensitive_non_overlapping() {
        let pattern = normalize("north", DEFAULT_MIN_QUERY_CHARS).unwrap();
        let text = "we serve the North region";
        let ranges = pattern.find_ranges(text);
        assert_eq!(ranges.len(), 1);
        assert_eq!(&text[ranges[0].clone()], "North");

        let pattern = normalize("ana", DEFAULT_MIN_QUERY_CHARS).unwrap();
        assert_eq!(pattern.count_in("banana"), 1);

        let pattern = normalize("an", DEFAULT_MIN_QUERY_CHARS).unwrap();
        assert_eq!(pattern.count_in("BANANA"), 2);
    }

    #[test]
    fn test_custom_minimum() {
        assert!(normalize("a", 1).is_ok());
        assert!(normalize("abc", 4).is_err());
    }
}
