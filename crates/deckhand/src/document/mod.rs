//! Deck document model
//!
//! The pieces that turn a `page.mdx` source into structured data: metadata
//! block, asset references, slides and their density metrics. None of them build
//! a syntax tree; each is a small set of pattern matchers that never fail on
//! malformed content.

mod frontmatter;
mod metrics;
mod references;
mod resolver;
mod slides;
mod syntax;

pub use frontmatter::{split_frontmatter, unquote_value, Frontmatter};
pub use metrics::{count_bullets, count_words, max_paragraph_words, strip_tags, SlideMetrics};
pub use references::{
    classify, clean_target, is_external, normalize_path, normalize_reference, AssetReference,
    Classification, ReferenceScanner, EXTERNAL_PREFIXES,
};
pub use resolver::{is_within, relative_posix, Outcome, PathResolver, ResolvedAsset};
pub use slides::{count_slides, segment_slides, Slide};
pub use syntax::{
    AttributeSyntax, MarkupLinkSyntax, RawReference, ReferenceKind, ReferenceSyntax,
    SyntaxRegistry,
};
