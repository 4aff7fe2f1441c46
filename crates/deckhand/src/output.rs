//! Structured output formatting for CLI commands.
//!
//! Reports go to stdout either as a JSON envelope or as plain text. Logging and
//! errors go to stderr so `--json` output stays machine-readable.

use chrono::Utc;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Write as _};
use std::io::{self, Write};

use crate::engine::{AuditReport, Finding, ValidationReport};
use crate::errors::ActionableError;
use crate::scaffold::ScaffoldSummary;

/// Version of the JSON output format
const OUTPUT_VERSION: &str = "0.1.0";

// ============================================================================
// Output Context for Quiet Mode
// ============================================================================

/// Context for controlling output verbosity
pub struct OutputContext {
    quiet: bool,
    json: bool,
}

impl OutputContext {
    pub fn new(quiet: bool, json: bool) -> Self {
        Self { quiet, json }
    }

    /// Print essential output (always shown unless --json)
    pub fn print_data(&self, msg: impl Display) -> io::Result<()> {
        if !self.json {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }

    /// Print informational message (suppressed by --quiet or --json)
    pub fn print_info(&self, msg: impl Display) -> io::Result<()> {
        if !self.quiet && !self.json {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Safe println that handles broken pipes gracefully
pub fn writeln_safe(msg: &str) -> io::Result<()> {
    match writeln!(io::stdout(), "{}", msg) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            // Silently exit on broken pipe (expected when piping to head, etc.)
            std::process::exit(0);
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// JSON Output Types
// ============================================================================

/// Wrapper for command output with metadata
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    /// Whether the command's pass/fail gate passed
    pub success: bool,
    pub data: T,
    pub metadata: Metadata,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T, command: impl Into<String>) -> Self {
        Self::new(true, data, command)
    }

    /// Report output whose gate may have failed; `data` is still complete.
    pub fn new(success: bool, data: T, command: impl Into<String>) -> Self {
        Self {
            success,
            data,
            metadata: Metadata::new(command),
        }
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Wrapper for precondition failures when `--json` is set
#[derive(Debug, Serialize)]
pub struct JsonError {
    pub success: bool,
    pub error: ErrorDetail,
    pub metadata: Metadata,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Exit code name (e.g., "NOT_FOUND")
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl JsonError {
    pub fn new(code: ExitCode, message: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.name().to_string(),
                message: message.into(),
                causes: Vec::new(),
                suggestions: Vec::new(),
            },
            metadata: Metadata::new(command),
        }
    }

    pub fn from_actionable(
        code: ExitCode,
        err: &ActionableError,
        command: impl Into<String>,
    ) -> Self {
        let mut json = Self::new(code, err.message(), command);
        json.error.causes = err.causes().to_vec();
        json.error.suggestions = err.remediation().to_vec();
        json
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    /// Timestamp when the response was generated
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: chrono::DateTime<Utc>,
    /// Version of the output format
    pub version: String,
    /// Command that generated this response
    pub command: String,
}

impl Metadata {
    fn new(command: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            version: OUTPUT_VERSION.to_string(),
            command: command.into(),
        }
    }
}

/// Serialize timestamp in RFC 3339 format
fn serialize_timestamp<S>(dt: &chrono::DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

// ============================================================================
// Exit Codes
// ============================================================================

/// Process exit codes
///
/// ```rust
/// use deckhand::ExitCode;
///
/// assert_eq!(ExitCode::ValidationFailed.code(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command succeeded (0)
    Success = 0,

    /// Generic error (1)
    GenericError = 1,

    /// Invalid arguments, including a malformed project name (2)
    InvalidArgument = 2,

    /// Project folder or document not found (3)
    NotFound = 3,

    /// Report gate failed: error findings, strict warnings, strict unused (4)
    ValidationFailed = 4,

    /// Permission denied (5)
    PermissionDenied = 5,

    /// Document already exists (6)
    AlreadyExists = 6,

    /// File system failure (10)
    ExternalError = 10,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Stable name used in JSON error output
    pub fn name(self) -> &'static str {
        match self {
            ExitCode::Success => "SUCCESS",
            ExitCode::GenericError => "GENERIC_ERROR",
            ExitCode::InvalidArgument => "INVALID_ARGUMENT",
            ExitCode::NotFound => "NOT_FOUND",
            ExitCode::ValidationFailed => "VALIDATION_FAILED",
            ExitCode::PermissionDenied => "PERMISSION_DENIED",
            ExitCode::AlreadyExists => "ALREADY_EXISTS",
            ExitCode::ExternalError => "IO_ERROR",
        }
    }
}

// ============================================================================
// Human-readable reports
// ============================================================================

fn status(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "FAIL"
    }
}

fn section(out: &mut String, title: &str, items: impl IntoIterator<Item = impl Display>) {
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return;
    }
    let _ = write!(out, "\n{}:\n", title);
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
}

pub fn render_audit(report: &AuditReport, strict_unused: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] Asset audit for {}",
        status(!report.failed(strict_unused)),
        report.project_dir
    );
    let _ = writeln!(
        out,
        "Referenced files: {} | Project asset files: {}",
        report.referenced_file_count, report.all_asset_file_count
    );

    section(
        &mut out,
        "Traversal/invalid asset references",
        &report.traversal_assets,
    );
    section(&mut out, "Missing asset references", &report.missing_assets);
    section(
        &mut out,
        "Directory references (expected file paths)",
        &report.directory_targets,
    );
    section(&mut out, "Unused asset files", &report.unused_assets);
    section(
        &mut out,
        "Largest asset files",
        report
            .largest_files
            .iter()
            .map(|f| format!("{}: {} bytes", f.path, f.bytes)),
    );

    out.trim_end().to_string()
}

pub fn render_validation(report: &ValidationReport, strict: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] Validation report for {}",
        status(report.passed(strict)),
        report.project_dir
    );
    let _ = writeln!(
        out,
        "Slides: {} | Asset references checked: {}",
        report.slide_count, report.assets_checked
    );

    let message = |f: &Finding| f.message.clone();
    section(&mut out, "Errors", report.errors.iter().map(message));
    section(&mut out, "Warnings", report.warnings.iter().map(message));
    section(
        &mut out,
        "Slide stats",
        report.slide_stats.iter().map(|s| {
            format!(
                "Slide {}: words={}, bullets={}, max_paragraph_words={}",
                s.slide, s.metrics.words, s.metrics.bullets, s.metrics.max_paragraph_words
            )
        }),
    );

    out.trim_end().to_string()
}

pub fn render_scaffold(summary: &ScaffoldSummary) -> String {
    format!(
        "[OK] Project scaffold ready: {}\n[OK] Wrote: {}\n[OK] Ensured asset dirs: {}",
        summary.project_dir,
        summary.page_path,
        summary.asset_dirs.join(", ")
    )
}
