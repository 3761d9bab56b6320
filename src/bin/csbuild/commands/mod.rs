//! Command implementations

pub mod build;
pub mod check;
pub mod completions;
pub mod emit;
pub mod sources;
pub mod stub;

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::cli::Cli;
use csbuild::core::manifest::{find_manifest, manifest_path_for};
use csbuild::ops::{format_result, load_project, MessageFormat};
use csbuild::util::config::{global_config_path, load_config, project_config_path};
use csbuild::{BuildContext, BuildResult, ProjectBuilder};

/// The manifest named by `--manifest-path`, or the nearest one above the
/// current directory.
pub fn manifest_path(cli: &Cli) -> Result<PathBuf> {
    match cli.manifest_path {
        Some(ref path) => Ok(manifest_path_for(path)),
        None => find_manifest(&std::env::current_dir()?),
    }
}

/// Locate the manifest, load configuration and the project.
pub fn load(cli: &Cli) -> Result<ProjectBuilder> {
    let manifest_path = manifest_path(cli)?;
    let root = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = load_config(global_config_path().as_deref(), &project_config_path(&root));
    let ctx = BuildContext::from_config(&config, cli.compiler.as_deref())?;

    load_project(&manifest_path, &ctx)
}

/// Print a build result; returns whether it succeeded.
pub fn report(
    cli: &Cli,
    builder: &ProjectBuilder,
    operation: &str,
    result: &BuildResult,
) -> Result<bool> {
    let text = format_result(
        builder.project().name(),
        operation,
        result,
        cli.message_format,
        !cli.no_color && std::io::stderr().is_terminal(),
    )?;

    match cli.message_format {
        MessageFormat::Json => print!("{}", text),
        MessageFormat::Human => eprint!("{}", text),
    }

    Ok(result.success())
}

/// Create a temporary file in the directory that will hold `path`.
///
/// Pair with [`persist`] so a failed build never leaves a partial file at
/// `path`.
pub fn staged_file(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    NamedTempFile::new_in(&dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))
}

/// Move a staged file into place.
pub fn persist(mut file: NamedTempFile, path: &Path) -> Result<()> {
    file.as_file_mut()
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
