//! Asset reference cleaning, classification, and normalisation
//!
//! Raw targets pulled out by the [`SyntaxRegistry`](super::SyntaxRegistry) are
//! cleaned (angle brackets, whitespace, trailing `"Title"`), classified as local or
//! external, and local ones are reduced to a normalised project-relative path.
//! Normalisation is purely lexical; nothing here touches the filesystem.

use super::syntax::{RawReference, ReferenceKind, SyntaxRegistry};
use percent_encoding::percent_decode_str;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Scheme prefixes that mark a target as living outside the project.
pub const EXTERNAL_PREFIXES: &[&str] = &["http://", "https://", "data:", "blob:", "mailto:", "tel:"];

static TITLED_TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(\S+)(?:\s+"[^"]*")?$"#).expect("titled target pattern"));

/// Local-or-external classification of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Resolvable inside the project folder
    Local,
    /// URL, anchor, or root-absolute path; never resolved
    External,
}

/// A cleaned and classified reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssetReference {
    /// Target exactly as written
    pub raw: String,
    pub kind: ReferenceKind,
    /// For local references: decoded, slash-unified, `.`/`..` collapsed path.
    /// For external ones: the cleaned target.
    pub normalized: String,
    pub classification: Classification,
}

impl AssetReference {
    pub fn is_local(&self) -> bool {
        self.classification == Classification::Local
    }
}

/// Strip surrounding whitespace and angle brackets, then drop a trailing
/// `"Title"` if the target is followed by one.
pub fn clean_target(raw: &str) -> String {
    let value = raw.trim().trim_matches(|c| c == '<' || c == '>').trim();
    match TITLED_TARGET_RE.captures(value).and_then(|c| c.get(1)) {
        Some(target) => target.as_str().to_string(),
        None => value.to_string(),
    }
}

/// Whether a cleaned target points outside the project model.
pub fn is_external(cleaned: &str) -> bool {
    if cleaned.starts_with('#') || cleaned.starts_with('/') {
        return true;
    }
    let lower = cleaned.to_ascii_lowercase();
    EXTERNAL_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

/// Reduce a local target to its normalised path.
///
/// Strips `#fragment` then `?query`, percent-decodes, turns backslashes into
/// forward slashes and collapses `.`/`..` segments. Returns `None` when nothing
/// is left after stripping.
pub fn normalize_reference(target: &str) -> Option<String> {
    let no_fragment = target.split('#').next().unwrap_or_default();
    let no_query = no_fragment.split('?').next().unwrap_or_default();
    if no_query.is_empty() {
        return None;
    }
    let decoded = percent_decode_str(no_query).decode_utf8_lossy();
    Some(normalize_path(&decoded.replace('\\', "/")))
}

/// Lexical POSIX-style path normalisation.
///
/// Empty segments and `.` are dropped, `..` cancels the previous segment. Leading
/// `..` segments survive on relative paths and vanish on absolute ones. An empty
/// result becomes `.`.
pub fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Clean and classify one raw reference.
///
/// Returns `None` for targets that aren't references at all: empty values and
/// local targets that are nothing but a query or fragment.
pub fn classify(raw: &RawReference) -> Option<AssetReference> {
    let cleaned = clean_target(&raw.raw);
    if cleaned.is_empty() {
        return None;
    }

    let (normalized, classification) = if is_external(&cleaned) {
        (cleaned, Classification::External)
    } else {
        (normalize_reference(&cleaned)?, Classification::Local)
    };

    Some(AssetReference {
        raw: raw.raw.clone(),
        kind: raw.kind,
        normalized,
        classification,
    })
}

/// Finds, classifies, and deduplicates references in a document body.
///
/// # Example
///
/// ```
/// use deckhand::document::ReferenceScanner;
///
/// let scanner = ReferenceScanner::default();
/// let refs = scanner.scan("![a](images/a.png?v=2) ![b](./images/a.png#top)");
///
/// assert_eq!(refs.len(), 1);
/// assert_eq!(refs[0].raw, "images/a.png?v=2");
/// assert_eq!(refs[0].normalized, "images/a.png");
/// ```
pub struct ReferenceScanner {
    registry: SyntaxRegistry,
}

impl ReferenceScanner {
    pub fn new(registry: SyntaxRegistry) -> Self {
        Self { registry }
    }

    /// Every distinct reference in document order.
    ///
    /// Only the first raw occurrence of each normalised value is kept.
    pub fn scan(&self, body: &str) -> Vec<AssetReference> {
        let mut seen: HashSet<(Classification, String)> = HashSet::new();
        let mut references = Vec::new();

        for raw in self.registry.scan(body) {
            let Some(reference) = classify(&raw) else {
                tracing::trace!(raw = %raw.raw, "discarded empty reference");
                continue;
            };
            if !seen.insert((reference.classification, reference.normalized.clone())) {
                tracing::trace!(raw = %reference.raw, "duplicate reference");
                continue;
            }
            references.push(reference);
        }

        references
    }
}

impl Default for ReferenceScanner {
    fn default() -> Self {
        Self::new(SyntaxRegistry::with_builtins())
    }
}
