//! Rendering build results for the terminal or for tools.

use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::Result;
use serde::Serialize;

use crate::core::BuildResult;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Output format for build results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for MessageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(MessageFormat::Human),
            "json" => Ok(MessageFormat::Json),
            other => Err(format!(
                "unknown message format `{}` (expected `human` or `json`)",
                other
            )),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    project: &'a str,
    operation: &'a str,
    #[serde(flatten)]
    result: &'a BuildResult,
}

/// Render `result` of `operation` on `project`.
pub fn format_result(
    project: &str,
    operation: &str,
    result: &BuildResult,
    format: MessageFormat,
    color: bool,
) -> Result<String> {
    match format {
        MessageFormat::Json => {
            let report = JsonReport {
                project,
                operation,
                result,
            };
            Ok(serde_json::to_string(&report)? + "\n")
        }
        MessageFormat::Human => Ok(format_human(project, operation, result, color)),
    }
}

fn format_human(project: &str, operation: &str, result: &BuildResult, color: bool) -> String {
    let mut out = String::new();

    for warning in result.warnings() {
        out.push_str(&Diagnostic::warning(warning.as_str()).format(color));
    }

    if result.success() {
        let _ = writeln!(out, "    Finished {} `{}`", operation, project);
        return out;
    }

    if !result.output().is_empty() {
        out.push_str(result.output());
        if !result.output().ends_with('\n') {
            out.push('\n');
        }
    }

    let mut errors = result.errors().iter();
    let headline = errors
        .next()
        .map(String::as_str)
        .unwrap_or(crate::core::COMPILATION_FAILED);
    let mut diag = Diagnostic::error(format!("{} (`{}`)", headline, project));
    for error in errors {
        diag = diag.with_context(error.as_str());
    }
    out.push_str(&diag.with_suggestion(suggestions::BUILD_FAILED).format(color));
    out
}
