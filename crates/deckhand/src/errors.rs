//! Actionable error formatting for precondition failures.
//!
//! Content problems are reported as findings. The errors here stop a run
//! before any inspection happens, so each one carries possible causes and the
//! steps that fix it.

use crate::config::ConfigError;
use crate::project::{ProjectError, DOCUMENT_FILE, PROJECTS_DIR_ENV};
use crate::scaffold::ScaffoldError;
use std::fmt;
use std::path::Path;

/// An error with diagnostic context and remediation steps.
///
/// # Example
///
/// ```
/// use deckhand::errors::ActionableError;
///
/// let error = ActionableError::new("Project folder not found: decks/demo")
///     .with_cause("The project name may be misspelled")
///     .with_remedy("Create it: deckhand scaffold --project demo");
///
/// eprintln!("{}", error);
/// ```
#[derive(Debug, Clone)]
pub struct ActionableError {
    error: String,
    causes: Vec<String>,
    remediation: Vec<String>,
}

impl ActionableError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            causes: Vec::new(),
            remediation: Vec::new(),
        }
    }

    /// Add a possible cause (diagnostic hint).
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a remediation step (actionable fix).
    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remediation.push(remedy.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.error
    }

    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    pub fn remediation(&self) -> &[String] {
        &self.remediation
    }

    /// Convert to a formatted error message suitable for display.
    pub fn to_error_message(&self) -> String {
        let mut msg = format!("Error: {}\n", self.error);

        if !self.causes.is_empty() {
            msg.push_str("\nPossible causes:\n");
            for cause in &self.causes {
                msg.push_str(&format!("  • {}\n", cause));
            }
        }

        if !self.remediation.is_empty() {
            msg.push_str("\nTo fix:\n");
            for remedy in &self.remediation {
                msg.push_str(&format!("  • {}\n", remedy));
            }
        }

        msg
    }
}

impl fmt::Display for ActionableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_error_message())
    }
}

impl std::error::Error for ActionableError {}

pub fn invalid_project_name(name: &str) -> ActionableError {
    ActionableError::new(format!("Invalid project name '{}'", name))
        .with_cause("Project names may only contain letters, numbers, dot, underscore, and dash")
        .with_cause("A path was passed where a name was expected")
        .with_remedy("Pick a name matching ^[A-Za-z0-9._-]+$")
        .with_remedy("Point at a folder directly: --project-dir <path>")
}

pub fn project_not_found(dir: &Path) -> ActionableError {
    ActionableError::new(format!("Project folder not found: {}", dir.display()))
        .with_cause("The project name may be misspelled")
        .with_cause(format!(
            "The projects directory may be wrong (set --projects-dir or {})",
            PROJECTS_DIR_ENV.join(" / ")
        ))
        .with_remedy("Create a starter project: deckhand scaffold --project <name>")
}

pub fn not_a_directory(path: &Path) -> ActionableError {
    ActionableError::new(format!("Project path is not a directory: {}", path.display()))
        .with_cause("--project-dir points at a file")
        .with_remedy("Pass the folder that contains the deck document")
}

pub fn missing_document(page: &Path) -> ActionableError {
    ActionableError::new(format!("Missing {}: {}", DOCUMENT_FILE, page.display()))
        .with_cause("The folder exists but was never scaffolded")
        .with_cause("The document was renamed or moved")
        .with_remedy("Generate a starter document: deckhand scaffold --project-dir <path>")
}

pub fn unreadable_document(page: &Path, detail: &str) -> ActionableError {
    ActionableError::new(format!("Failed to read {}", page.display()))
        .with_cause(detail.to_string())
        .with_cause("The document may not be valid UTF-8")
        .with_remedy("Check file permissions and re-save the document as UTF-8")
}

pub fn page_exists(page: &Path) -> ActionableError {
    ActionableError::new(format!("{} already exists", page.display()))
        .with_cause("The project was scaffolded before")
        .with_remedy("Re-run with --force to overwrite it")
        .with_remedy("Choose another --project name")
}

pub fn invalid_scaffold_value(field: &str) -> ActionableError {
    ActionableError::new(format!("Invalid {} for the starter document", field))
        .with_cause("The value contains a line break, tab, or other control character")
        .with_cause("Frontmatter values must fit on one line")
        .with_remedy(format!("Pass a single-line {} value", field))
        .with_remedy("Check [scaffold] defaults in deckhand.toml for multi-line strings")
}

pub fn invalid_config(detail: &str) -> ActionableError {
    ActionableError::new("Could not load configuration")
        .with_cause(detail.to_string())
        .with_remedy("Fix the file or pass another one with --config <path>")
}

impl From<&ProjectError> for ActionableError {
    fn from(err: &ProjectError) -> Self {
        match err {
            ProjectError::InvalidName(name) => invalid_project_name(name),
            ProjectError::NotFound(dir) => project_not_found(dir),
            ProjectError::NotADirectory(path) => not_a_directory(path),
            ProjectError::MissingDocument(page) => missing_document(page),
            ProjectError::Unreadable { path, source } => {
                unreadable_document(path, &source.to_string())
            }
            ProjectError::Io(e) => ActionableError::new(format!("IO error: {}", e)),
        }
    }
}

impl From<&ScaffoldError> for ActionableError {
    fn from(err: &ScaffoldError) -> Self {
        match err {
            ScaffoldError::PageExists(page) => page_exists(page),
            ScaffoldError::InvalidValue { field } => invalid_scaffold_value(field),
            other => ActionableError::new(other.to_string()),
        }
    }
}

impl From<&ConfigError> for ActionableError {
    fn from(err: &ConfigError) -> Self {
        invalid_config(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_actionable_error_formatting() {
        let error = ActionableError::new("Test error")
            .with_cause("First cause")
            .with_cause("Second cause")
            .with_remedy("First remedy")
            .with_remedy("Second remedy");

        let msg = error.to_error_message();

        assert!(msg.contains("Error: Test error"));
        assert!(msg.contains("Possible causes:"));
        assert!(msg.contains("• First cause"));
        assert!(msg.contains("• Second cause"));
        assert!(msg.contains("To fix:"));
        assert!(msg.contains("• Second remedy"));
    }

    #[test]
    fn test_error_without_causes() {
        let msg = ActionableError::new("Simple error")
            .with_remedy("Just fix it")
            .to_error_message();

        assert!(!msg.contains("Possible causes:"));
        assert!(msg.contains("• Just fix it"));
    }

    #[test]
    fn test_project_error_conversion() {
        let err = ProjectError::InvalidName("../x".to_string());
        let actionable = ActionableError::from(&err);
        assert!(actionable.message().contains("'../x'"));
        assert!(actionable
            .remediation()
            .iter()
            .any(|r| r.contains("--project-dir")));
    }

    #[test]
    fn test_missing_document_helper() {
        let msg = missing_document(&PathBuf::from("/decks/demo/page.mdx")).to_error_message();
        assert!(msg.contains("Missing page.mdx: /decks/demo/page.mdx"));
        assert!(msg.contains("deckhand scaffold"));
    }

    #[test]
    fn test_page_exists_helper() {
        let err = ScaffoldError::PageExists(PathBuf::from("/decks/demo/page.mdx"));
        let msg = ActionableError::from(&err).to_error_message();
        assert!(msg.contains("already exists"));
        assert!(msg.contains("--force"));
    }

    #[test]
    fn test_invalid_scaffold_value_conversion() {
        let err = ScaffoldError::InvalidValue { field: "title" };
        let actionable = ActionableError::from(&err);
        assert_eq!(actionable.message(), "Invalid title for the starter document");
        assert!(actionable
            .remediation()
            .iter()
            .any(|r| r.contains("single-line title")));
    }
}
