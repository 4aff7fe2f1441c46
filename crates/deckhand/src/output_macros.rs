//! Output helper macros for reducing JSON boilerplate in main.rs

/// Output a report either as a JSON envelope or as rendered text
///
/// # Examples
///
/// ```ignore
/// output_report!(ctx, passed, "validate", report, render_validation(&report, strict));
/// ```
#[macro_export]
macro_rules! output_report {
    ($ctx:expr, $success:expr, $command:expr, $data:expr, $human:expr) => {
        if $ctx.is_json() {
            use deckhand::output::{writeln_safe, JsonOutput};
            let output = JsonOutput::new($success, &$data, $command);
            writeln_safe(&output.to_json_string()?)?;
        } else {
            $ctx.print_data($human)?;
        }
    };
}

/// Print a precondition failure: JSON error envelope or actionable text
///
/// # Examples
///
/// ```ignore
/// report_failure!(json, ExitCode::NotFound, &actionable, "audit");
/// ```
#[macro_export]
macro_rules! report_failure {
    ($json:expr, $code:expr, $err:expr, $command:expr) => {
        if $json {
            use deckhand::output::{writeln_safe, JsonError};
            if let Ok(text) = JsonError::from_actionable($code, $err, $command).to_json_string() {
                let _ = writeln_safe(&text);
            }
        } else {
            eprint!("{}", $err);
        }
    };
}
