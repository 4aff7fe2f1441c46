//! Command-line interface definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Deck project inspector
///
/// Audits asset usage, validates structure and slide density, and scaffolds
/// starter deck projects (a folder holding page.mdx plus asset subfolders).
///
/// Exit Codes:
///   0  - Command succeeded
///   1  - Generic error occurred
///   2  - Invalid arguments or project name
///   3  - Project folder or page.mdx not found
///   4  - Report failed (errors, or warnings/unused under strict flags)
///   6  - page.mdx already exists
///  10  - File system failure
#[derive(Parser, Debug)]
#[command(name = "deckhand", version)]
#[command(about = "Deck project audit, validation, and scaffolding", long_about = None)]
pub struct Cli {
    /// Suppress non-essential output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to a deckhand.toml (default: <projects-dir>/deckhand.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which project to operate on.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ProjectTarget {
    /// Project name under --projects-dir
    #[arg(long)]
    pub project: Option<String>,

    /// Direct path to the deck project folder
    #[arg(long)]
    pub project_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub target: ProjectTarget,

    /// Root directory containing deck projects (used with --project)
    /// [default: $DECK_PROJECTS_DIR, $FASTSLIDES_PROJECTS_DIR, or ./projects]
    #[arg(long)]
    pub projects_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit assets: referenced, missing, unused, and largest files
    Audit {
        #[command(flatten)]
        project: ProjectArgs,

        /// Number of largest files to list
        #[arg(long)]
        top: Option<usize>,

        /// Fail when unused asset files are found
        #[arg(long)]
        strict_unused: bool,

        #[arg(long)]
        json: bool,
    },

    /// Validate structure, asset links, and slide density
    Validate {
        #[command(flatten)]
        project: ProjectArgs,

        /// Warning threshold for words per slide
        #[arg(long)]
        max_words: Option<usize>,

        /// Warning threshold for bullets per slide
        #[arg(long)]
        max_bullets: Option<usize>,

        /// Warning threshold for the longest paragraph
        #[arg(long)]
        max_paragraph_words: Option<usize>,

        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,

        #[arg(long)]
        json: bool,
    },

    /// Create a project folder with a starter page.mdx and asset folders
    Scaffold {
        #[command(flatten)]
        project: ProjectArgs,

        /// Frontmatter project key (default: project name or folder name)
        #[arg(long)]
        project_key: Option<String>,

        /// Cover slide heading
        #[arg(long)]
        title: Option<String>,

        /// Cover slide subtitle
        #[arg(long)]
        subtitle: Option<String>,

        /// Cover slide date label
        #[arg(long)]
        date: Option<String>,

        /// Overwrite page.mdx if it already exists
        #[arg(long)]
        force: bool,

        #[arg(long)]
        json: bool,
    },

    /// Print the JSON Schema of a report
    Schema {
        #[arg(value_enum)]
        report: SchemaKind,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Audit,
    Validate,
}

impl Commands {
    /// Name used in JSON metadata
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Audit { .. } => "audit",
            Commands::Validate { .. } => "validate",
            Commands::Scaffold { .. } => "scaffold",
            Commands::Schema { .. } => "schema",
        }
    }

    /// Whether failures should be reported as a JSON envelope
    pub fn json(&self) -> bool {
        match self {
            Commands::Audit { json, .. }
            | Commands::Validate { json, .. }
            | Commands::Scaffold { json, .. } => *json,
            Commands::Schema { .. } => false,
        }
    }
}
