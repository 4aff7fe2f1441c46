//! Leading metadata block extraction.
//!
//! A deck document may open with a block delimited by `---` lines:
//!
//! ```text
//! ---
//! project: "demo"
//! title: Quarterly Review
//! ---
//!
//! <main className="deck">
//! ```
//!
//! The block is only recognised at the very start of the document. Each interior
//! line is read as `key: value`; anything else is skipped, so malformed metadata
//! degrades to fewer keys rather than failing.

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---\s*\n(.*?)\n---\s*(?:\n|$)").expect("frontmatter block pattern")
});

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9_-]+)\s*:\s*(.*?)\s*$").expect("frontmatter line pattern")
});

/// Parsed metadata block.
///
/// `values` is empty both when the block is absent and when it is present but
/// holds no recognisable lines; `detected` tells the two apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Frontmatter {
    /// Whether a metadata block opened the document
    pub detected: bool,
    /// Lowercased key to unescaped value
    pub values: BTreeMap<String, String>,
}

impl Frontmatter {
    /// Look up a key (keys are stored lowercase).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// A key counts as present only when its value is non-blank.
    pub fn has_value(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Split `source` into its metadata block and the remaining body.
///
/// The returned body borrows from `source`. When no block is present the whole
/// source is returned unchanged.
pub fn split_frontmatter(source: &str) -> (Frontmatter, &str) {
    let Some(captures) = BLOCK_RE.captures(source) else {
        return (Frontmatter::default(), source);
    };
    let Some(full) = captures.get(0) else {
        return (Frontmatter::default(), source);
    };
    let block = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

    let mut values = BTreeMap::new();
    for raw_line in block.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(parsed) = LINE_RE.captures(line) else {
            continue;
        };
        let (Some(key), Some(value)) = (parsed.get(1), parsed.get(2)) else {
            continue;
        };
        values.insert(
            key.as_str().to_ascii_lowercase(),
            unquote_value(value.as_str()),
        );
    }

    (
        Frontmatter {
            detected: true,
            values,
        },
        &source[full.end()..],
    )
}

/// Strip matching surrounding quotes and unescape `\<quote>` and `\\`.
///
/// Unquoted values are only trimmed.
pub fn unquote_value(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return trimmed.to_string();
    };
    if first != last || (first != '"' && first != '\'') {
        return trimmed.to_string();
    }

    let inner = &trimmed[1..trimmed.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut iter = inner.chars().peekable();
    while let Some(c) = iter.next() {
        if c == '\\' {
            match iter.peek() {
                Some(&next) if next == first || next == '\\' => {
                    out.push(next);
                    iter.next();
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
    }
    out.trim().to_string()
}
