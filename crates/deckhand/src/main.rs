//! Deckhand
//!
//! Inspects and scaffolds deck project folders: a `page.mdx` document plus its
//! asset subfolders.
//!
//! # Commands
//!
//! - `audit`: referenced, missing, unused, and largest asset files
//! - `validate`: frontmatter, structure, asset links, and slide density
//! - `scaffold`: starter document and asset folders
//! - `schema`: JSON Schema of the audit and validation reports

// Binary-specific module (not in library)
mod output_macros;

use anyhow::{anyhow, Result};
use clap::Parser;
use deckhand::cli::{Cli, Commands, ProjectArgs, SchemaKind};
use deckhand::config::{ConfigError, DeckhandConfig, CONFIG_FILE};
use deckhand::engine::{AuditReport, Engine, EngineError, ValidationReport};
use deckhand::errors::ActionableError;
use deckhand::output::{
    render_audit, render_scaffold, render_validation, writeln_safe, ExitCode, JsonOutput,
    OutputContext,
};
use deckhand::project::{
    absolutize, default_projects_dir, resolve_project_dir, Project, ProjectError, ProjectLocator,
};
use deckhand::scaffold::{scaffold, ScaffoldError, ScaffoldOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "DECKHAND_LOG";

/// Map an error to its exit code by looking at the concrete error type
fn error_to_exit_code(error: &anyhow::Error) -> ExitCode {
    if let Some(err) = error.downcast_ref::<ProjectError>() {
        return match err {
            ProjectError::InvalidName(_) => ExitCode::InvalidArgument,
            ProjectError::NotFound(_)
            | ProjectError::NotADirectory(_)
            | ProjectError::MissingDocument(_) => ExitCode::NotFound,
            ProjectError::Unreadable { .. } | ProjectError::Io(_) => ExitCode::ExternalError,
        };
    }

    if let Some(err) = error.downcast_ref::<ScaffoldError>() {
        return match err {
            ScaffoldError::PageExists(_) => ExitCode::AlreadyExists,
            ScaffoldError::MissingProjectKey | ScaffoldError::InvalidValue { .. } => {
                ExitCode::InvalidArgument
            }
            ScaffoldError::Io { .. } => ExitCode::ExternalError,
        };
    }

    if error.downcast_ref::<ConfigError>().is_some() {
        return ExitCode::InvalidArgument;
    }

    if error.downcast_ref::<EngineError>().is_some() {
        return ExitCode::ExternalError;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return match io_error.kind() {
            std::io::ErrorKind::NotFound => ExitCode::NotFound,
            std::io::ErrorKind::PermissionDenied => ExitCode::PermissionDenied,
            _ => ExitCode::ExternalError,
        };
    }

    ExitCode::GenericError
}

fn to_actionable(error: &anyhow::Error) -> ActionableError {
    if let Some(err) = error.downcast_ref::<ProjectError>() {
        return err.into();
    }
    if let Some(err) = error.downcast_ref::<ScaffoldError>() {
        return err.into();
    }
    if let Some(err) = error.downcast_ref::<ConfigError>() {
        return err.into();
    }
    ActionableError::new(format!("{:#}", error))
}

/// Log to stderr; `-v` flags win over the environment filter
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let json = cli.command.json();
    let command = cli.command.name();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            let code = error_to_exit_code(&e);
            tracing::debug!(error = %e, exit_code = code.code(), "command failed");
            report_failure!(json, code, &to_actionable(&e), command);
            code
        }
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

fn gate(passed: bool) -> ExitCode {
    if passed {
        ExitCode::Success
    } else {
        ExitCode::ValidationFailed
    }
}

fn projects_dir(args: &ProjectArgs) -> Result<PathBuf> {
    match &args.projects_dir {
        Some(dir) => Ok(absolutize(dir)?),
        None => Ok(default_projects_dir()?),
    }
}

fn locator(args: &ProjectArgs) -> Result<ProjectLocator> {
    if let Some(dir) = &args.target.project_dir {
        return Ok(ProjectLocator::Dir(dir.clone()));
    }
    let name = args
        .target
        .project
        .clone()
        .ok_or_else(|| anyhow!("Provide --project or --project-dir."))?;
    Ok(ProjectLocator::Named {
        name,
        projects_dir: projects_dir(args)?,
    })
}

/// `--config` if given, else `<projects-dir>/deckhand.toml` when it exists
fn load_config(explicit: Option<&Path>, args: &ProjectArgs) -> Result<DeckhandConfig> {
    let config = match explicit {
        Some(path) => DeckhandConfig::load(&absolutize(path)?)?,
        None => DeckhandConfig::load_or_default(&projects_dir(args)?.join(CONFIG_FILE))?,
    };
    Ok(config)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let quiet = cli.quiet;
    let engine = Engine::default();

    match cli.command {
        Commands::Audit {
            project: args,
            top,
            strict_unused,
            json,
        } => {
            let ctx = OutputContext::new(quiet, json);
            let config = load_config(cli.config.as_deref(), &args)?.audit();
            let project = Project::locate(&locator(&args)?)?;

            let strict_unused = strict_unused || config.strict_unused();
            let report = engine.audit(&project, top.unwrap_or_else(|| config.top()))?;
            let passed = !report.failed(strict_unused);

            output_report!(ctx, passed, "audit", report, render_audit(&report, strict_unused));
            Ok(gate(passed))
        }

        Commands::Validate {
            project: args,
            max_words,
            max_bullets,
            max_paragraph_words,
            strict,
            json,
        } => {
            let ctx = OutputContext::new(quiet, json);
            let config = load_config(cli.config.as_deref(), &args)?;
            let project = Project::locate(&locator(&args)?)?;

            let strict = strict || config.validate().strict();
            let mut options = config.validate_options();
            if let Some(n) = max_words {
                options.thresholds.max_words = n;
            }
            if let Some(n) = max_bullets {
                options.thresholds.max_bullets = n;
            }
            if let Some(n) = max_paragraph_words {
                options.thresholds.max_paragraph_words = n;
            }

            let report = engine.validate(&project, &options)?;
            let passed = report.passed(strict);

            output_report!(ctx, passed, "validate", report, render_validation(&report, strict));
            Ok(gate(passed))
        }

        Commands::Scaffold {
            project: args,
            project_key,
            title,
            subtitle,
            date,
            force,
            json,
        } => {
            let ctx = OutputContext::new(quiet, json);
            let defaults = load_config(cli.config.as_deref(), &args)?.scaffold();
            let dir = resolve_project_dir(&locator(&args)?)?;

            let project_key = project_key
                .or_else(|| args.target.project.clone())
                .or_else(|| {
                    dir.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                })
                .unwrap_or_default();
            let options = ScaffoldOptions {
                project_key,
                title: title.unwrap_or_else(|| defaults.title()),
                subtitle: subtitle.unwrap_or_else(|| defaults.subtitle()),
                date: date.unwrap_or_else(|| defaults.date()),
                force,
            };

            let summary = scaffold(&dir, &options)?;
            if ctx.is_json() {
                writeln_safe(&JsonOutput::success(&summary, "scaffold").to_json_string()?)?;
            } else {
                ctx.print_info(render_scaffold(&summary))?;
            }
            Ok(ExitCode::Success)
        }

        Commands::Schema { report } => {
            let schema = match report {
                SchemaKind::Audit => schemars::schema_for!(AuditReport),
                SchemaKind::Validate => schemars::schema_for!(ValidationReport),
            };
            writeln_safe(&serde_json::to_string_pretty(&schema)?)?;
            Ok(ExitCode::Success)
        }
    }
}
