//! Loading projects from `csbuild.toml` manifests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::builder::{BuildContext, ProjectBuilder};
use crate::core::manifest::{manifest_path_for, ReferenceSource};
use crate::core::{
    BuildChain, BuildError, BuildResult, BuildUnit, Manifest, Project, Reference, ReferenceSet,
};
use crate::util::fs::glob_files;

/// Load the project described by `manifest_path`.
///
/// Embedded references are read into memory now. Project references are
/// only loaded when their stub is built.
pub fn load_project(manifest_path: &Path, ctx: &BuildContext) -> Result<ProjectBuilder> {
    let (manifest, project) = read_manifest(manifest_path)?;
    let root = project.root().to_path_buf();

    let mut references = ReferenceSet::new();
    for spec in &manifest.references {
        let reference = match spec.source()? {
            ReferenceSource::Path(path) => Reference::file(&spec.name, root.join(path)),
            ReferenceSource::Embed(path) => {
                let path = root.join(path);
                let bytes = std::fs::read(&path).with_context(|| {
                    format!(
                        "failed to read embedded reference `{}`: {}",
                        spec.name,
                        path.display()
                    )
                })?;
                Reference::embedded(&spec.name, bytes)
            }
            ReferenceSource::Project(dir) => Reference::nested(
                &spec.name,
                Arc::new(ManifestUnit::new(
                    &spec.name,
                    manifest_path_for(&root.join(dir)),
                    ctx.clone(),
                )),
            ),
        };
        references.push(reference);
    }

    tracing::debug!(
        "Loaded `{}`: {} source(s), {} reference(s)",
        project.name(),
        project.sources().len(),
        references.len()
    );

    Ok(ProjectBuilder::new(project, references, ctx.clone()))
}

/// Load only the project model (name, root, sources).
///
/// Needs no compiler and reads no references.
pub fn load_sources(manifest_path: &Path) -> Result<Project> {
    read_manifest(manifest_path).map(|(_, project)| project)
}

fn read_manifest(manifest_path: &Path) -> Result<(Manifest, Project)> {
    let manifest_path = manifest_path
        .canonicalize()
        .with_context(|| format!("manifest not found: {}", manifest_path.display()))?;
    let manifest = Manifest::load(&manifest_path)?;
    let root = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let sources = glob_files(&root, &manifest.project.sources)?;
    if sources.is_empty() {
        tracing::warn!(
            "No source files in `{}` match {:?}",
            manifest.project.name,
            manifest.project.sources
        );
    }

    let project = Project::new(manifest.project.name.clone(), root, sources);
    Ok((manifest, project))
}

/// A project reference that loads its manifest on demand.
#[derive(Debug, Clone)]
pub struct ManifestUnit {
    name: String,
    manifest_path: PathBuf,
    ctx: BuildContext,
}

impl ManifestUnit {
    pub fn new(name: impl Into<String>, manifest_path: PathBuf, ctx: BuildContext) -> Self {
        ManifestUnit {
            name: name.into(),
            manifest_path,
            ctx,
        }
    }
}

impl BuildUnit for ManifestUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn write_reference_stub(
        &self,
        out: &mut dyn Write,
        chain: &mut BuildChain,
    ) -> Result<BuildResult, BuildError> {
        let builder =
            load_project(&self.manifest_path, &self.ctx).map_err(|e| BuildError::Project {
                path: self.manifest_path.clone(),
                message: format!("{:#}", e),
            })?;
        builder.write_reference_stub(out, chain)
    }
}
