//! Starter project generation.
//!
//! Creates a project folder with the conventional asset subfolders and a
//! three-slide `page.mdx` whose frontmatter round-trips through the parser.

use crate::project::DOCUMENT_FILE;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "Presentation";
pub const DEFAULT_SUBTITLE: &str = "Project Overview";
pub const DEFAULT_DATE: &str = "Month YYYY";

/// Asset subfolders created next to the document.
pub const ASSET_DIRS: &[&str] = &["images", "media", "data"];

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("{} already exists. Use --force to overwrite.", .0.display())]
    PageExists(PathBuf),
    #[error("Could not infer project key. Set --project-key explicitly.")]
    MissingProjectKey,
    #[error("The {field} value contains a line break or control character")]
    InvalidValue { field: &'static str },
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOptions {
    /// Value written to the `project` frontmatter key
    pub project_key: String,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    /// Overwrite an existing document
    pub force: bool,
}

impl ScaffoldOptions {
    pub fn new(project_key: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            date: DEFAULT_DATE.to_string(),
            force: false,
        }
    }
}

/// What [`scaffold`] produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldSummary {
    pub project_dir: String,
    pub page_path: String,
    pub asset_dirs: Vec<String>,
    /// Whether an existing document was replaced
    pub overwritten: bool,
}

/// Double-quote `value`, escaping backslashes and double quotes.
pub fn yaml_quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Frontmatter values are single-line; reject anything the parser can't read back.
fn check_value(field: &'static str, value: &str) -> Result<(), ScaffoldError> {
    if value.chars().any(char::is_control) {
        return Err(ScaffoldError::InvalidValue { field });
    }
    Ok(())
}

/// Render the starter document.
pub fn build_starter_page(project: &str, title: &str, subtitle: &str, date: &str) -> String {
    let frontmatter = [
        "---".to_string(),
        format!("project: {}", yaml_quote(project)),
        format!("title: {}", yaml_quote(title)),
        format!("subtitle: {}", yaml_quote(subtitle)),
        format!("date: {}", yaml_quote(date)),
        "---".to_string(),
        String::new(),
    ]
    .join("\n");

    format!(
        r#"{frontmatter}<main className="deck">

<section className="slide">

# {title}

<div className="flex flex-col h-full justify-center">
  <div className="text-6xl font-extrabold text-neutral-900 mb-6">{subtitle}</div>
  <div className="text-2xl text-neutral-500">{date}</div>
</div>

</section>

<section className="slide">

# Problem

<div className="split">
  <div className="col prose-compact">

  - Current process is fragmented across inboxes and handoffs.
  - Ownership is unclear for time-sensitive messages.
  - Manual triage creates delays and rework.

  </div>
  <div className="col prose-compact">

  - Delays reduce responsiveness and predictability.
  - Teams spend time coordinating instead of resolving.
  - Leadership lacks a clear operational signal.

  </div>
</div>

</section>

<section className="slide">

# Proposal

<div className="split">
  <div className="col prose-compact">

  1. Classify incoming messages by intent and urgency.
  2. Route each message to a clear owner.
  3. Track response timing and outcomes.

  </div>
  <div className="col prose-compact">

  ## Expected Outcome

  - Faster first response
  - Lower coordination overhead
  - Better visibility for management decisions

  </div>
</div>

</section>

</main>
"#
    )
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> ScaffoldError + '_ {
    move |source| ScaffoldError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Create the project folder, its asset subfolders and the starter document.
///
/// An existing document is left untouched unless `options.force` is set; the
/// check happens before anything is created.
pub fn scaffold(dir: &Path, options: &ScaffoldOptions) -> Result<ScaffoldSummary, ScaffoldError> {
    if options.project_key.trim().is_empty() {
        return Err(ScaffoldError::MissingProjectKey);
    }
    check_value("project key", &options.project_key)?;
    check_value("title", &options.title)?;
    check_value("subtitle", &options.subtitle)?;
    check_value("date", &options.date)?;

    let page_path = dir.join(DOCUMENT_FILE);
    let overwritten = page_path.exists();
    if overwritten && !options.force {
        return Err(ScaffoldError::PageExists(page_path));
    }

    fs::create_dir_all(dir).map_err(io_at(dir))?;
    for name in ASSET_DIRS {
        let sub = dir.join(name);
        fs::create_dir_all(&sub).map_err(io_at(&sub))?;
    }

    let page = build_starter_page(
        &options.project_key,
        &options.title,
        &options.subtitle,
        &options.date,
    );
    fs::write(&page_path, page).map_err(io_at(&page_path))?;
    tracing::info!(page = %page_path.display(), overwritten, "wrote starter document");

    Ok(ScaffoldSummary {
        project_dir: dir.display().to_string(),
        page_path: page_path.display().to_string(),
        asset_dirs: ASSET_DIRS.iter().map(|d| format!("{d}/")).collect(),
        overwritten,
    })
}
