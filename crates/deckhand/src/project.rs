//! Deck project location and loading.
//!
//! A project is a folder holding one `page.mdx` plus asset subfolders. Callers
//! name it either directly by path or by identifier under a projects directory.
//! Everything here is a precondition: failures abort the run instead of becoming
//! findings.

use regex::Regex;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// File name of the deck document inside a project folder.
pub const DOCUMENT_FILE: &str = "page.mdx";

/// Environment variables consulted, in order, for the projects directory.
pub const PROJECTS_DIR_ENV: &[&str] = &["DECK_PROJECTS_DIR", "FASTSLIDES_PROJECTS_DIR"];

static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("project name pattern"));

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Invalid project name '{0}'. Use letters, numbers, dot, underscore, and dash.")]
    InvalidName(String),
    #[error("Project folder not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Project path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Missing {DOCUMENT_FILE}: {}", .0.display())]
    MissingDocument(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// How the caller identified the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectLocator {
    /// Direct path to the project folder
    Dir(PathBuf),
    /// Identifier under a projects directory
    Named { name: String, projects_dir: PathBuf },
}

/// Check a project identifier against `^[A-Za-z0-9._-]+$`.
pub fn validate_project_name(name: &str) -> Result<(), ProjectError> {
    if PROJECT_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(ProjectError::InvalidName(name.to_string()))
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_user_path(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Expand `~` and make the path absolute without touching the filesystem.
pub fn absolutize(path: &Path) -> Result<PathBuf, ProjectError> {
    Ok(std::path::absolute(expand_user_path(path))?)
}

/// Projects directory from the environment, else `<cwd>/projects`.
pub fn default_projects_dir() -> Result<PathBuf, ProjectError> {
    for var in PROJECTS_DIR_ENV {
        if let Ok(value) = env::var(var) {
            if !value.trim().is_empty() {
                return absolutize(Path::new(&value));
            }
        }
    }
    Ok(env::current_dir()?.join("projects"))
}

/// Turn a locator into an absolute project folder path.
///
/// Identifiers are validated before they are joined onto the projects
/// directory, so `../x` or `a/b` never reach the filesystem.
pub fn resolve_project_dir(locator: &ProjectLocator) -> Result<PathBuf, ProjectError> {
    match locator {
        ProjectLocator::Dir(dir) => absolutize(dir),
        ProjectLocator::Named { name, projects_dir } => {
            validate_project_name(name)?;
            Ok(absolutize(projects_dir)?.join(name))
        }
    }
}

/// A loaded deck project.
#[derive(Debug, Clone)]
pub struct Project {
    /// Canonical project folder
    pub root: PathBuf,
    /// Path of the deck document
    pub page_path: PathBuf,
    /// Raw document text
    pub source: String,
}

impl Project {
    /// Load the project at `dir`, checking the folder and reading the document.
    pub fn open(dir: &Path) -> Result<Self, ProjectError> {
        if !dir.exists() {
            return Err(ProjectError::NotFound(dir.to_path_buf()));
        }
        if !dir.is_dir() {
            return Err(ProjectError::NotADirectory(dir.to_path_buf()));
        }

        let root = dir.canonicalize()?;
        let page_path = root.join(DOCUMENT_FILE);
        if !page_path.is_file() {
            return Err(ProjectError::MissingDocument(page_path));
        }

        let source = fs::read_to_string(&page_path).map_err(|source| ProjectError::Unreadable {
            path: page_path.clone(),
            source,
        })?;

        tracing::debug!(root = %root.display(), bytes = source.len(), "loaded project");
        Ok(Self {
            root,
            page_path,
            source,
        })
    }

    /// Resolve a locator and open the project it names.
    pub fn locate(locator: &ProjectLocator) -> Result<Self, ProjectError> {
        Self::open(&resolve_project_dir(locator)?)
    }

    /// Folder name, used to cross-check the declared `project` key.
    pub fn folder_name(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
