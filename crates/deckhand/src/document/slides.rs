//! Slide segmentation.
//!
//! A slide opens with `<section className="slide">` (attribute match is
//! case-insensitive, either quote style) and closes at the first `</section>`
//! before the next slide opens. A slide without a closing tag runs up to the next
//! opening marker, or to the end of the body for the last slide. Spans never
//! overlap and ordinals are `1..=n` in document order.

use regex::Regex;
use std::sync::LazyLock;

static SLIDE_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<section\s+className\s*=\s*["']slide["']\s*>"#).expect("slide start pattern")
});

static SLIDE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</section\s*>").expect("slide end pattern"));

/// One slide's content, borrowed from the body it was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide<'a> {
    /// 1-based position in the document
    pub ordinal: usize,
    /// Byte offset where the content starts (just past the opening tag)
    pub start: usize,
    /// Byte offset where the content ends (exclusive)
    pub end: usize,
    /// Whether a closing tag ended the slide
    pub terminated: bool,
    pub text: &'a str,
}

/// Number of slide-start markers in `body`.
pub fn count_slides(body: &str) -> usize {
    SLIDE_START_RE.find_iter(body).count()
}

/// Cut `body` into slides. No markers means no slides.
pub fn segment_slides(body: &str) -> Vec<Slide<'_>> {
    let starts: Vec<_> = SLIDE_START_RE.find_iter(body).collect();

    starts
        .iter()
        .enumerate()
        .map(|(index, marker)| {
            let start = marker.end();
            let boundary = starts
                .get(index + 1)
                .map(|next| next.start())
                .unwrap_or(body.len());

            let closing = SLIDE_END_RE
                .find(&body[start..boundary])
                .map(|m| start + m.start());
            let end = closing.unwrap_or(boundary);

            tracing::trace!(ordinal = index + 1, start, end, "segmented slide");
            Slide {
                ordinal: index + 1,
                start,
                end,
                terminated: closing.is_some(),
                text: &body[start..end],
            }
        })
        .collect()
}
