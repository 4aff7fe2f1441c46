//! Per-slide content density metrics.
//!
//! All functions are pure: the same text always yields the same numbers.

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern"));

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9][A-Za-z0-9'./-]*").expect("word pattern"));

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]\s+|\d+\.\s+)").expect("bullet pattern"));

static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SlideMetrics {
    pub words: usize,
    pub bullets: usize,
    pub max_paragraph_words: usize,
}

impl SlideMetrics {
    pub fn measure(text: &str) -> Self {
        Self {
            words: count_words(text),
            bullets: count_bullets(text),
            max_paragraph_words: max_paragraph_words(text),
        }
    }
}

/// Replace every `<...>` span with a space.
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, " ").into_owned()
}

fn words_in(plain: &str) -> usize {
    WORD_RE.find_iter(plain).count()
}

/// Words outside of markup tags.
pub fn count_words(text: &str) -> usize {
    words_in(&strip_tags(text))
}

/// Lines starting with `-`, `*`, `+` or `N.` followed by whitespace.
pub fn count_bullets(text: &str) -> usize {
    text.lines().filter(|line| BULLET_RE.is_match(line)).count()
}

/// Word count of the longest blank-line-separated paragraph, tags stripped.
pub fn max_paragraph_words(text: &str) -> usize {
    let plain = strip_tags(text);
    PARAGRAPH_BREAK_RE
        .split(&plain)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(words_in)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_do_not_count_as_words() {
        assert_eq!(count_words("<b>hello</b> world"), 2);
        assert_eq!(count_words(r#"<div className="col prose-compact">"#), 0);
    }

    #[test]
    fn test_word_pattern_keeps_inner_punctuation() {
        assert_eq!(count_words("don't re-run v1.2 a/b"), 4);
        assert_eq!(count_words("-- ... !!"), 0);
    }

    #[test]
    fn test_bullets_and_numbered_items() {
        let text = "# Heading\n- one\n  * two\n+ three\n1. first\n10. tenth\n-notabullet\n---\n3.14 pi";
        assert_eq!(count_bullets(text), 5);
    }

    #[test]
    fn test_bullets_with_crlf() {
        assert_eq!(count_bullets("- a\r\n- b\r\n"), 2);
    }

    #[test]
    fn test_bullet_marker_needs_text_on_its_own_line() {
        // A bare `-` line is not a bullet and never borrows the next line's text
        assert_eq!(count_bullets("-\n- a"), 1);
        assert_eq!(count_bullets("1.\n2. b"), 1);
    }

    #[test]
    fn test_max_paragraph_words() {
        let text = "one two\n\nthree four five\n   \nsix";
        assert_eq!(max_paragraph_words(text), 3);
    }

    #[test]
    fn test_max_paragraph_words_empty() {
        assert_eq!(max_paragraph_words(""), 0);
        assert_eq!(max_paragraph_words("\n\n<div>\n\n</div>\n"), 0);
    }

    #[test]
    fn test_tags_do_not_join_paragraphs() {
        let text = "<p>alpha beta</p>\n\n<p>gamma</p>";
        assert_eq!(max_paragraph_words(text), 2);
    }

    #[test]
    fn test_measure_is_deterministic() {
        let text = "# Title\n\n- a point\n- another point\n\nClosing words here.";
        let first = SlideMetrics::measure(text);
        let second = SlideMetrics::measure(text);
        assert_eq!(first, second);
        assert_eq!(
            first,
            SlideMetrics {
                words: 8,
                bullets: 2,
                max_paragraph_words: 4,
            }
        );
    }
}
