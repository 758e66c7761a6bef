// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword highlighting for display.
//!
//! Splits a body into alternating plain and matched segments. Matching is
//! case-insensitive and non-overlapping, scanning left to right; at a given
//! position the earliest configured keyword that matches wins.

/// A contiguous slice of the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub is_match: bool,
}

impl Segment {
    fn new(text: &str, is_match: bool) -> Self {
        Self {
            text: text.to_string(),
            is_match,
        }
    }
}

/// Segment `text` around every keyword occurrence.
///
/// Segments cover the whole input with no gaps or overlaps; concatenating
/// their texts yields `text` unchanged. Blank keywords are ignored. An empty
/// input produces no segments.
pub fn highlight<S: AsRef<str>>(text: &str, keywords: &[S]) -> Vec<Segment> {
    let needles: Vec<Vec<char>> = keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .map(|k| fold_case(k).chars().collect())
        .collect();

    let mut segments = Vec::new();
    if text.is_empty() {
        return segments;
    }
    if needles.is_empty() {
        segments.push(Segment::new(text, false));
        return segments;
    }

    let mut plain_start = 0;
    let mut pos = 0;
    while pos < text.len() {
        let hit = needles
            .iter()
            .find_map(|needle| match_len(&text[pos..], needle));

        match hit {
            Some(len) => {
                if plain_start < pos {
                    segments.push(Segment::new(&text[plain_start..pos], false));
                }
                segments.push(Segment::new(&text[pos..pos + len], true));
                pos += len;
                plain_start = pos;
            }
            None => {
                // Advance one char; `pos` always stays on a char boundary.
                pos += text[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if plain_start < text.len() {
        segments.push(Segment::new(&text[plain_start..], false));
    }
    segments
}

/// Lowercase `text` one char at a time.
///
/// Unlike [`str::to_lowercase`] this ignores context-sensitive rules such as
/// the Greek final sigma, so it agrees with how [`highlight`] compares chars.
/// The filter pipeline folds with this too.
pub(crate) fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Byte length of the prefix of `haystack` that equals `needle` case-insensitively.
///
/// `needle` is already lowercased. A haystack char whose lowercase form is
/// several chars only matches if all of them line up with the needle.
fn match_len(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (offset, ch) in haystack.char_indices() {
        for lower in ch.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(offset + ch.len_utf8());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(segments: &[Segment]) -> Vec<(&str, bool)> {
        segments.iter().map(|s| (s.text.as_str(), s.is_match)).collect()
    }

    #[test]
    fn single_keyword_in_the_middle() {
        let segments = highlight("I hate Mondays", &["hate"]);
        assert_eq!(
            pairs(&segments),
            vec![("I ", false), ("hate", true), (" Mondays", false)]
        );
    }

    #[test]
    fn match_preserves_original_case() {
        let segments = highlight("HATE it", &["hate"]);
        assert_eq!(pairs(&segments), vec![("HATE", true), (" it", false)]);
    }

    #[test]
    fn repeated_and_adjacent_matches() {
        let segments = highlight("nonono", &["no"]);
        assert_eq!(
            pairs(&segments),
            vec![("no", true), ("no", true), ("no", true)]
        );
    }

    #[test]
    fn earlier_keyword_wins_at_same_position() {
        let segments = highlight("category", &["cat", "category"]);
        assert_eq!(pairs(&segments), vec![("cat", true), ("egory", false)]);

        let segments = highlight("category", &["category", "cat"]);
        assert_eq!(pairs(&segments), vec![("category", true)]);
    }

    #[test]
    fn matches_do_not_overlap() {
        let segments = highlight("aaa", &["aa"]);
        assert_eq!(pairs(&segments), vec![("aa", true), ("a", false)]);
    }

    #[test]
    fn no_keywords_yields_one_plain_segment() {
        let none: [&str; 0] = [];
        assert_eq!(pairs(&highlight("hello", &none)), vec![("hello", false)]);
        assert_eq!(pairs(&highlight("hello", &["  "])), vec![("hello", false)]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(highlight("", &["x"]).is_empty());
    }

    #[test]
    fn multibyte_text_keeps_boundaries() {
        let segments = highlight("Ça va, ÇA VA", &["ça"]);
        assert_eq!(
            pairs(&segments),
            vec![("Ça", true), (" va, ", false), ("ÇA", true), (" VA", false)]
        );
    }

    #[test]
    fn segments_reassemble_the_input() {
        let text = "Some Text with some words, SOME more";
        let joined: String = highlight(text, &["some", "words"])
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(joined, text);
    }
}
