//! Search functionality for filtering items.
//!
//! Two flavors live here: fuzzy matching for narrowing pick lists, and plain
//! case-insensitive substring matching for list and viewport search.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// A matcher for fuzzy searching text.
pub struct Matcher {
    inner: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            inner: SkimMatcherV2::default(),
        }
    }

    /// Returns `true` if the pattern fuzzy-matches the text, ignoring case.
    pub fn matches(&self, text: &str, pattern: &str) -> bool {
        self.score(text, pattern).is_some()
    }

    /// Higher scores indicate better matches.
    pub fn score(&self, text: &str, pattern: &str) -> Option<i64> {
        let pattern_lower = pattern.to_lowercase();
        self.inner.fuzzy_match(text, &pattern_lower)
    }
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte length of `needle` matched at the start of `haystack`, if it matches.
fn match_len_at(haystack: &str, needle: &str) -> Option<usize> {
    let mut hay = haystack.char_indices();
    for n in needle.chars() {
        match hay.next() {
            Some((_, h)) if chars_eq_ignore_case(h, n) => {}
            _ => return None,
        }
    }
    Some(hay.next().map_or(haystack.len(), |(i, _)| i))
}

/// Non-overlapping, case-insensitive occurrences of `needle` as byte ranges
/// into `haystack`. An empty needle matches nothing.
pub fn match_ranges(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    if needle.is_empty() {
        return ranges;
    }
    let mut pos = 0;
    while pos < haystack.len() {
        if let Some(len) = match_len_at(&haystack[pos..], needle) {
            ranges.push((pos, pos + len));
            pos += len;
        } else {
            pos += haystack[pos..].chars().next().map_or(1, char::len_utf8);
        }
    }
    ranges
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    !match_ranges(haystack, needle).is_empty()
}

pub fn count_matches(haystack: &str, needle: &str) -> usize {
    match_ranges(haystack, needle).len()
}

/// Byte offset of the `n`th (zero-based) occurrence, found by scanning from
/// the start of `haystack`.
pub fn nth_match_offset(haystack: &str, needle: &str, n: usize) -> Option<usize> {
    match_ranges(haystack, needle).get(n).map(|&(start, _)| start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_match() {
        let matcher = Matcher::new();

        assert!(matcher.matches("cn-hangzhou", "cnhz"));
        assert!(matcher.matches("ap-southeast-1", "apse"));
        assert!(matcher.matches("API-KEY", "apk"));
        assert!(matcher.matches("api-key", "APK"));
        assert!(!matcher.matches("hello", "xyz"));
    }

    #[test]
    fn test_score() {
        let matcher = Matcher::new();

        let exact_score = matcher.score("prod", "prod").unwrap();
        let fuzzy_score = matcher.score("production", "prod").unwrap();
        assert!(exact_score >= fuzzy_score);
        assert!(matcher.score("hello", "xyz").is_none());
    }

    #[test]
    fn test_match_ranges_case_insensitive() {
        assert_eq!(match_ranges("Web-1 web-2 WEB", "web"), vec![(0, 3), (6, 9), (12, 15)]);
        assert!(match_ranges("abc", "").is_empty());
        assert!(match_ranges("abc", "abcd").is_empty());
    }

    #[test]
    fn test_match_ranges_are_non_overlapping() {
        assert_eq!(count_matches("aaaa", "aa"), 2);
    }

    #[test]
    fn test_match_ranges_multibyte() {
        let text = "名前: Éclair, éclair";
        let ranges = match_ranges(text, "éclair");
        assert_eq!(ranges.len(), 2);
        assert_eq!(&text[ranges[0].0..ranges[0].1], "Éclair");
        assert_eq!(&text[ranges[1].0..ranges[1].1], "éclair");
    }

    #[test]
    fn test_nth_match_offset() {
        let text = "ip\nfoo ip\nbar IP";
        assert_eq!(nth_match_offset(text, "ip", 0), Some(0));
        assert_eq!(nth_match_offset(text, "ip", 1), Some(7));
        assert_eq!(nth_match_offset(text, "ip", 2), Some(14));
        assert_eq!(nth_match_offset(text, "ip", 3), None);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("i-Bp1ABC", "bp1abc"));
        assert!(!contains_ignore_case("i-bp1", "xyz"));
    }
}
