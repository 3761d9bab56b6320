//! `csbuild.toml` project manifest parsing and schema.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::{validate_reference_name, BuildError};

/// File name of a project manifest.
pub const MANIFEST_NAME: &str = "csbuild.toml";

/// The parsed project manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub project: ProjectMetadata,

    /// Upstream references, in declaration order
    #[serde(default, rename = "reference")]
    pub references: Vec<ReferenceSpec>,
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectMetadata {
    /// Project name; also the assembly name
    pub name: String,

    /// Source glob patterns relative to the project root
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
}

fn default_sources() -> Vec<String> {
    vec!["src/**/*.cs".to_string()]
}

/// One `[[reference]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceSpec {
    pub name: String,

    /// Prebuilt assembly on disk
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// File whose bytes are embedded as an in-memory assembly
    #[serde(default)]
    pub embed: Option<PathBuf>,

    /// Directory of another csbuild project
    #[serde(default)]
    pub project: Option<PathBuf>,
}

/// What a validated reference entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSource<'a> {
    Path(&'a Path),
    Embed(&'a Path),
    Project(&'a Path),
}

impl ReferenceSpec {
    /// The single source this entry declares.
    pub fn source(&self) -> Result<ReferenceSource<'_>> {
        match (&self.path, &self.embed, &self.project) {
            (Some(p), None, None) => Ok(ReferenceSource::Path(p)),
            (None, Some(p), None) => Ok(ReferenceSource::Embed(p)),
            (None, None, Some(p)) => Ok(ReferenceSource::Project(p)),
            (None, None, None) => bail!(
                "reference `{}` needs one of `path`, `embed` or `project`",
                self.name
            ),
            _ => bail!(
                "reference `{}` may only set one of `path`, `embed` or `project`",
                self.name
            ),
        }
    }
}

impl Manifest {
    /// Parse a manifest from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(contents)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            bail!("project name must not be empty");
        }

        let mut seen = Vec::new();
        for reference in &self.references {
            validate_reference_name(&reference.name)?;
            reference.source()?;
            if seen.contains(&reference.name.as_str()) {
                bail!("duplicate reference `{}`", reference.name);
            }
            seen.push(reference.name.as_str());
        }

        Ok(())
    }
}

/// Resolve the manifest for a project directory or manifest path.
pub fn manifest_path_for(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(MANIFEST_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Find the manifest by walking up from `start`.
pub fn find_manifest(start: &Path) -> Result<PathBuf> {
    let mut current = start;

    loop {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => {
                return Err(BuildError::ManifestNotFound {
                    start: start.to_path_buf(),
                }
                .into())
            }
        }
    }
}
