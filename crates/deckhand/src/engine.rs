//! Document model orchestration.
//!
//! [`Engine::inspect`] runs every document component once over a loaded project
//! and produces a [`DocumentModel`]. The two read paths build on it:
//!
//! - [`Engine::audit`] partitions local references by outcome and compares them
//!   against the files actually present in the project folder.
//! - [`Engine::validate`] applies structural and density rules and sorts the
//!   results into errors and warnings.
//!
//! Neither path fails on document content. Only I/O problems while walking the
//! project folder surface as [`EngineError`].

use crate::document::{
    relative_posix, segment_slides, split_frontmatter, AssetReference, Frontmatter, Outcome,
    PathResolver, ReferenceScanner, ResolvedAsset, SlideMetrics,
};
use crate::project::{Project, DOCUMENT_FILE};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use walkdir::WalkDir;

pub const DEFAULT_MAX_WORDS: usize = 140;
pub const DEFAULT_MAX_BULLETS: usize = 8;
pub const DEFAULT_MAX_PARAGRAPH_WORDS: usize = 55;
pub const DEFAULT_TOP: usize = 10;
pub const DEFAULT_REQUIRED_KEYS: &[&str] = &["project", "title"];

static MODULE_STATEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(?:import|export)\s+").expect("module statement pattern"));

static CLIENT_DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*["']use client["']\s*;?\s*$"#).expect("client directive pattern")
});

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to walk project folder: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One slide with its measurements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SlideReport {
    pub slide: usize,
    #[serde(skip)]
    pub start: usize,
    #[serde(skip)]
    pub end: usize,
    #[serde(skip)]
    pub terminated: bool,
    #[serde(flatten)]
    pub metrics: SlideMetrics,
}

/// Everything derived from a single pass over one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentModel {
    pub frontmatter: Frontmatter,
    /// Distinct references in document order, local and external
    pub references: Vec<AssetReference>,
    /// Local references with their resolution outcome, in document order
    pub assets: Vec<ResolvedAsset>,
    pub slides: Vec<SlideReport>,
}

impl DocumentModel {
    fn with_outcome<'a>(
        &'a self,
        keep: impl Fn(&Outcome) -> bool + 'a,
    ) -> impl Iterator<Item = &'a ResolvedAsset> + 'a {
        self.assets.iter().filter(move |asset| keep(&asset.outcome))
    }

    pub fn resolved(&self) -> impl Iterator<Item = &ResolvedAsset> + '_ {
        self.with_outcome(|o| matches!(o, Outcome::Resolved { .. }))
    }

    pub fn missing(&self) -> impl Iterator<Item = &ResolvedAsset> + '_ {
        self.with_outcome(|o| matches!(o, Outcome::Missing { .. }))
    }

    pub fn directories(&self) -> impl Iterator<Item = &ResolvedAsset> + '_ {
        self.with_outcome(|o| matches!(o, Outcome::Directory { .. }))
    }

    pub fn traversals(&self) -> impl Iterator<Item = &ResolvedAsset> + '_ {
        self.with_outcome(|o| matches!(o, Outcome::Traversal))
    }

    /// Root-relative paths of every resolved file.
    pub fn resolved_paths(&self) -> BTreeSet<String> {
        self.assets
            .iter()
            .filter_map(|asset| match &asset.outcome {
                Outcome::Resolved { path } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }
}

/// A project file and its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileSize {
    pub path: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuditReport {
    pub project_dir: String,
    pub page_path: String,
    pub frontmatter_detected: bool,
    /// Sorted distinct normalised local references, whatever their outcome
    pub referenced_assets: Vec<String>,
    pub referenced_file_count: usize,
    pub all_asset_file_count: usize,
    pub missing_assets: Vec<String>,
    pub traversal_assets: Vec<String>,
    pub directory_targets: Vec<String>,
    pub unused_assets: Vec<String>,
    pub largest_files: Vec<FileSize>,
}

impl AuditReport {
    pub fn has_errors(&self) -> bool {
        !self.missing_assets.is_empty()
            || !self.traversal_assets.is_empty()
            || !self.directory_targets.is_empty()
    }

    pub fn failed(&self, strict_unused: bool) -> bool {
        self.has_errors() || (strict_unused && !self.unused_assets.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Stable identifier for each validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FindingCode {
    Traversal,
    MissingAsset,
    DirectoryTarget,
    ModuleStatement,
    NoSlides,
    MissingFrontmatter,
    MissingKey,
    ProjectMismatch,
    ClientDirective,
    SlideWords,
    SlideBullets,
    SlideParagraph,
}

impl FindingCode {
    pub fn severity(self) -> Severity {
        match self {
            FindingCode::Traversal
            | FindingCode::MissingAsset
            | FindingCode::DirectoryTarget
            | FindingCode::ModuleStatement
            | FindingCode::NoSlides => Severity::Error,
            FindingCode::MissingFrontmatter
            | FindingCode::MissingKey
            | FindingCode::ProjectMismatch
            | FindingCode::ClientDirective
            | FindingCode::SlideWords
            | FindingCode::SlideBullets
            | FindingCode::SlideParagraph => Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub code: FindingCode,
    pub message: String,
    /// Slide ordinal for per-slide findings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide: Option<usize>,
}

impl Finding {
    fn new(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            slide: None,
        }
    }

    fn on_slide(code: FindingCode, slide: usize, message: impl Into<String>) -> Self {
        Self {
            slide: Some(slide),
            ..Self::new(code, message)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    pub project_dir: String,
    pub page_path: String,
    pub frontmatter: Frontmatter,
    pub slide_count: usize,
    /// Distinct local references examined
    pub assets_checked: usize,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub slide_stats: Vec<SlideReport>,
}

impl ValidationReport {
    pub fn passed(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }

    fn push(&mut self, finding: Finding) {
        match finding.code.severity() {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }
}

/// Per-slide density limits; a metric strictly above its limit is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Thresholds {
    pub max_words: usize,
    pub max_bullets: usize,
    pub max_paragraph_words: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            max_bullets: DEFAULT_MAX_BULLETS,
            max_paragraph_words: DEFAULT_MAX_PARAGRAPH_WORDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    pub thresholds: Thresholds,
    /// Frontmatter keys that must carry a non-blank value
    pub required_keys: Vec<String>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            required_keys: DEFAULT_REQUIRED_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Runs the document components over a project.
#[derive(Default)]
pub struct Engine {
    scanner: ReferenceScanner,
}

impl Engine {
    pub fn new(scanner: ReferenceScanner) -> Self {
        Self { scanner }
    }

    /// Build the full document model for `project`.
    pub fn inspect(&self, project: &Project) -> Result<DocumentModel, EngineError> {
        let resolver = PathResolver::new(&project.root)?;
        let (frontmatter, body) = split_frontmatter(&project.source);

        let references = self.scanner.scan(body);
        let assets: Vec<ResolvedAsset> = references
            .iter()
            .filter_map(|reference| resolver.resolve_reference(reference))
            .collect();

        let slides = segment_slides(body)
            .into_iter()
            .map(|slide| SlideReport {
                slide: slide.ordinal,
                start: slide.start,
                end: slide.end,
                terminated: slide.terminated,
                metrics: SlideMetrics::measure(slide.text),
            })
            .collect();

        Ok(DocumentModel {
            frontmatter,
            references,
            assets,
            slides,
        })
    }

    pub fn audit(&self, project: &Project, top: usize) -> Result<AuditReport, EngineError> {
        tracing::info!(project = %project.root.display(), "starting asset audit");
        let model = self.inspect(project)?;

        let files = asset_files(&project.root)?;
        let resolved = model.resolved_paths();
        let unused_assets: Vec<String> = files
            .iter()
            .map(|file| file.path.clone())
            .filter(|path| !resolved.contains(path))
            .collect();

        let mut largest_files = files.clone();
        largest_files.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.path.cmp(&b.path)));
        largest_files.truncate(top);

        let referenced_assets: BTreeSet<String> = model
            .assets
            .iter()
            .map(|asset| asset.reference.normalized.clone())
            .collect();

        let report = AuditReport {
            project_dir: project.root.display().to_string(),
            page_path: project.page_path.display().to_string(),
            frontmatter_detected: model.frontmatter.detected,
            referenced_assets: referenced_assets.into_iter().collect(),
            referenced_file_count: resolved.len(),
            all_asset_file_count: files.len(),
            missing_assets: model.missing().map(ResolvedAsset::describe).collect(),
            traversal_assets: model.traversals().map(ResolvedAsset::describe).collect(),
            directory_targets: model.directories().map(ResolvedAsset::describe).collect(),
            unused_assets,
            largest_files,
        };

        tracing::info!(
            referenced = report.referenced_file_count,
            files = report.all_asset_file_count,
            unused = report.unused_assets.len(),
            "asset audit finished"
        );
        Ok(report)
    }

    pub fn validate(
        &self,
        project: &Project,
        options: &ValidateOptions,
    ) -> Result<ValidationReport, EngineError> {
        tracing::info!(project = %project.root.display(), "starting validation");
        let model = self.inspect(project)?;
        let (_, body) = split_frontmatter(&project.source);

        let mut report = ValidationReport {
            project_dir: project.root.display().to_string(),
            page_path: project.page_path.display().to_string(),
            frontmatter: model.frontmatter.clone(),
            slide_count: model.slides.len(),
            assets_checked: model.assets.len(),
            errors: Vec::new(),
            warnings: Vec::new(),
            slide_stats: model.slides.clone(),
        };

        for finding in frontmatter_findings(&model.frontmatter, &project.folder_name(), options) {
            report.push(finding);
        }

        if MODULE_STATEMENT_RE.is_match(body) {
            report.push(Finding::new(
                FindingCode::ModuleStatement,
                format!(
                    "Detected import/export statements in {DOCUMENT_FILE}; decks should be content-only MDX."
                ),
            ));
        }
        if CLIENT_DIRECTIVE_RE.is_match(body) {
            report.push(Finding::new(
                FindingCode::ClientDirective,
                format!(
                    "Found \"use client\" directive in {DOCUMENT_FILE}; this is usually unnecessary in runtime-loaded MDX."
                ),
            ));
        }

        if model.slides.is_empty() {
            report.push(Finding::new(
                FindingCode::NoSlides,
                "No `<section className=\"slide\">` blocks were found.",
            ));
        }
        for slide in &model.slides {
            for finding in slide_findings(slide, &options.thresholds) {
                report.push(finding);
            }
        }

        for asset in &model.assets {
            if let Some(finding) = asset_finding(asset) {
                report.push(finding);
            }
        }

        tracing::info!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            slides = report.slide_count,
            "validation finished"
        );
        Ok(report)
    }
}

fn frontmatter_findings(
    frontmatter: &Frontmatter,
    folder_name: &str,
    options: &ValidateOptions,
) -> Vec<Finding> {
    if !frontmatter.detected || frontmatter.is_empty() {
        let keys = options.required_keys.join("/");
        return vec![Finding::new(
            FindingCode::MissingFrontmatter,
            format!("Missing YAML frontmatter in {DOCUMENT_FILE}. Add a `---` metadata block with {keys}."),
        )];
    }

    let mut findings: Vec<Finding> = options
        .required_keys
        .iter()
        .filter(|key| !frontmatter.has_value(key))
        .map(|key| Finding::new(FindingCode::MissingKey, format!("Frontmatter is missing `{key}`.")))
        .collect();

    if let Some(declared) = frontmatter.get("project").filter(|v| !v.is_empty()) {
        if declared != folder_name {
            findings.push(Finding::new(
                FindingCode::ProjectMismatch,
                format!("Frontmatter project `{declared}` does not match folder name `{folder_name}`."),
            ));
        }
    }

    findings
}

fn slide_findings(slide: &SlideReport, limits: &Thresholds) -> Vec<Finding> {
    let n = slide.slide;
    let m = &slide.metrics;
    let mut findings = Vec::new();

    if m.words > limits.max_words {
        findings.push(Finding::on_slide(
            FindingCode::SlideWords,
            n,
            format!("Slide {n} has {} words (threshold: {}).", m.words, limits.max_words),
        ));
    }
    if m.bullets > limits.max_bullets {
        findings.push(Finding::on_slide(
            FindingCode::SlideBullets,
            n,
            format!(
                "Slide {n} has {} bullets/list items (threshold: {}).",
                m.bullets, limits.max_bullets
            ),
        ));
    }
    if m.max_paragraph_words > limits.max_paragraph_words {
        findings.push(Finding::on_slide(
            FindingCode::SlideParagraph,
            n,
            format!(
                "Slide {n} has a paragraph with {} words (threshold: {}).",
                m.max_paragraph_words, limits.max_paragraph_words
            ),
        ));
    }

    findings
}

fn asset_finding(asset: &ResolvedAsset) -> Option<Finding> {
    let raw = &asset.reference.raw;
    match &asset.outcome {
        Outcome::Resolved { .. } => None,
        Outcome::Traversal => Some(Finding::new(
            FindingCode::Traversal,
            format!("Asset path escapes project folder: {raw}"),
        )),
        Outcome::Missing { .. } => Some(Finding::new(
            FindingCode::MissingAsset,
            format!("Missing asset target: {}", asset.describe()),
        )),
        Outcome::Directory { .. } => Some(Finding::new(
            FindingCode::DirectoryTarget,
            format!("Asset reference names a directory: {}", asset.describe()),
        )),
    }
}

/// Every regular file under `root` except the deck document itself, sorted by
/// path. Symlinks are not followed.
pub fn asset_files(root: &Path) -> Result<Vec<FileSize>, EngineError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = relative_posix(root, entry.path());
        if path == DOCUMENT_FILE {
            continue;
        }
        let bytes = entry.metadata()?.len();
        files.push(FileSize { path, bytes });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
