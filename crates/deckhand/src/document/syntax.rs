//! Reference syntax matchers and registry
//!
//! Deck documents mix Markdown with JSX-style elements, so asset references show
//! up in more than one shape. Each shape is a `ReferenceSyntax` that pulls raw
//! target strings out of body text. Matchers never fail: text that doesn't match
//! simply yields nothing.

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static MARKUP_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[[^\]]*\]\(([^)]+)\)").expect("markup link pattern"));

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:src|href|poster)\s*=\s*["']([^"']+)["']"#).expect("attribute pattern")
});

/// Where a raw reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// `[label](target)` or `![label](target)`
    MarkupLink,
    /// `src="target"`, `href="target"`, `poster="target"`
    Attribute,
}

/// A target string exactly as it appears in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    pub raw: String,
    pub kind: ReferenceKind,
    /// Byte offset of the target within the scanned text
    pub offset: usize,
}

/// Trait for reference syntax matchers
///
/// # Example
///
/// ```
/// use deckhand::document::{MarkupLinkSyntax, ReferenceSyntax};
///
/// let refs = MarkupLinkSyntax.scan("![Logo](images/logo.png)");
/// assert_eq!(refs.len(), 1);
/// assert_eq!(refs[0].raw, "images/logo.png");
/// ```
pub trait ReferenceSyntax {
    /// Identifier used in logs
    fn id(&self) -> &str;

    /// Extract every raw target in `text`, in document order.
    fn scan(&self, text: &str) -> Vec<RawReference>;
}

/// Markdown image and link syntax.
pub struct MarkupLinkSyntax;

impl ReferenceSyntax for MarkupLinkSyntax {
    fn id(&self) -> &str {
        "markup-link"
    }

    fn scan(&self, text: &str) -> Vec<RawReference> {
        capture_targets(&MARKUP_LINK_RE, text, ReferenceKind::MarkupLink)
    }
}

/// Element attributes that point at files: `src`, `href`, `poster`.
pub struct AttributeSyntax;

impl ReferenceSyntax for AttributeSyntax {
    fn id(&self) -> &str {
        "attribute"
    }

    fn scan(&self, text: &str) -> Vec<RawReference> {
        capture_targets(&ATTRIBUTE_RE, text, ReferenceKind::Attribute)
    }
}

fn capture_targets(re: &Regex, text: &str, kind: ReferenceKind) -> Vec<RawReference> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| RawReference {
            raw: m.as_str().to_string(),
            kind,
            offset: m.start(),
        })
        .collect()
}

/// Ordered set of syntaxes applied to a document body.
pub struct SyntaxRegistry {
    syntaxes: Vec<Box<dyn ReferenceSyntax + Send + Sync>>,
}

impl SyntaxRegistry {
    pub fn new() -> Self {
        Self {
            syntaxes: Vec::new(),
        }
    }

    /// Registry with markup links and attributes registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MarkupLinkSyntax));
        registry.register(Box::new(AttributeSyntax));
        registry
    }

    pub fn register(&mut self, syntax: Box<dyn ReferenceSyntax + Send + Sync>) {
        self.syntaxes.push(syntax);
    }

    /// Run every registered syntax and merge the hits in document order.
    ///
    /// Hits at the same offset keep registration order.
    pub fn scan(&self, text: &str) -> Vec<RawReference> {
        let mut hits: Vec<RawReference> = self
            .syntaxes
            .iter()
            .flat_map(|syntax| {
                let found = syntax.scan(text);
                tracing::trace!(syntax = syntax.id(), count = found.len(), "scanned references");
                found
            })
            .collect();
        hits.sort_by_key(|hit| hit.offset);
        hits
    }
}

impl Default for SyntaxRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
