//! Deck project engine
//!
//! Parses a deck document (`page.mdx`) into frontmatter, asset references, and
//! slides, confines every local reference to the project folder, and builds the
//! audit and validation reports on top. Used by the `deckhand` binary and its
//! tests.

pub mod cli;
pub mod config;
pub mod document;
pub mod engine;
pub mod errors;
pub mod output;
pub mod project;
pub mod scaffold;

// Re-export commonly used types
pub use document::{AssetReference, Frontmatter, Outcome, ResolvedAsset, SlideMetrics};
pub use engine::{
    AuditReport, DocumentModel, Engine, Finding, FindingCode, Thresholds, ValidateOptions,
    ValidationReport,
};
pub use output::{ExitCode, JsonOutput};
pub use project::{Project, ProjectError, ProjectLocator};
