//! Project builds.
//!
//! [`ProjectBuilder`] exposes the four build operations (emit to a directory,
//! emit to writers, emit a reference stub, diagnostics only). All of them go
//! through one emit step:
//!
//! 1. prepare the scratch workspace `obj` directory
//! 2. resolve references, building nested projects inline
//! 3. run the compiler once and wait for it
//! 4. on success remove materialized references and `obj`
//!
//! The scratch workspace is removed on every exit path.

use std::io::Write;
use std::path::Path;

use crate::builder::command::{compile_command, ArtifactPaths, EmitOptions};
use crate::builder::context::BuildContext;
use crate::builder::resolver::{ReferenceResolver, Resolution};
use crate::builder::transport::copy_artifact;
use crate::builder::workspace::{finish, ScratchWorkspace};
use crate::core::{BuildChain, BuildError, BuildResult, BuildUnit, Project, ReferenceSet, SourceFile};
use crate::util::fs::ensure_dir;

/// Subdirectory of a unique workspace that receives the artifacts.
const SCRATCH_BIN: &str = "bin";

/// Builds one project with its references.
#[derive(Debug, Clone)]
pub struct ProjectBuilder {
    project: Project,
    references: ReferenceSet,
    ctx: BuildContext,
}

impl ProjectBuilder {
    pub fn new(project: Project, references: ReferenceSet, ctx: BuildContext) -> Self {
        ProjectBuilder {
            project,
            references,
            ctx,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// Source files in project order.
    pub fn sources(&self) -> &[SourceFile] {
        self.project.sources()
    }

    /// Build into `output_dir`, leaving `<Name>.dll`, `.pdb` and `.xml` there.
    ///
    /// Materialized references go to `<output_dir>/<Name>/obj` for the
    /// duration of the build. Two concurrent builds of the same project into
    /// the same directory must be serialized by the caller.
    pub fn emit_to_path(&self, output_dir: &Path) -> Result<BuildResult, BuildError> {
        tracing::info!(
            "Building `{}` into {}",
            self.name(),
            output_dir.display()
        );

        ensure_dir(output_dir)?;
        let workspace = ScratchWorkspace::fixed(output_dir.join(self.name()))?;
        let outcome = self.emit(output_dir, &workspace, EmitOptions::FULL, &mut BuildChain::new());
        finish(workspace, outcome)
    }

    /// Build in a scratch directory and copy the assembly and debug symbols
    /// into the given writers.
    ///
    /// Neither writer is touched if the build fails.
    pub fn emit_to_streams(
        &self,
        assembly: &mut dyn Write,
        pdb: &mut dyn Write,
    ) -> Result<BuildResult, BuildError> {
        tracing::info!("Building `{}` to streams", self.name());

        let workspace = ScratchWorkspace::unique(self.ctx.scratch_root(), self.name())?;
        let output_dir = workspace.root().join(SCRATCH_BIN);
        let artifacts = ArtifactPaths::new(&output_dir, self.name(), EmitOptions::WITH_PDB);

        let outcome = self
            .emit(&output_dir, &workspace, EmitOptions::WITH_PDB, &mut BuildChain::new())
            .and_then(|result| {
                if result.success() {
                    copy_artifact(&artifacts.assembly, assembly)?;
                    if let Some(ref pdb_path) = artifacts.pdb {
                        copy_artifact(pdb_path, pdb)?;
                    }
                }
                Ok(result)
            });

        finish(workspace, outcome)
    }

    /// Build a minimal reference assembly (no debug symbols, no docs) and
    /// copy it into `out`.
    pub fn emit_reference_stub(&self, out: &mut dyn Write) -> Result<BuildResult, BuildError> {
        self.write_reference_stub(out, &mut BuildChain::new())
    }

    /// Compile without keeping any artifacts, to learn whether the project
    /// builds.
    pub fn diagnostics(&self) -> Result<BuildResult, BuildError> {
        tracing::info!("Checking `{}`", self.name());

        let workspace = ScratchWorkspace::unique(self.ctx.scratch_root(), self.name())?;
        let output_dir = workspace.root().join(SCRATCH_BIN);
        let outcome = self.emit(&output_dir, &workspace, EmitOptions::MINIMAL, &mut BuildChain::new());
        finish(workspace, outcome)
    }

    /// Stub build that continues an existing build chain.
    fn stub_in_chain(
        &self,
        out: &mut dyn Write,
        chain: &mut BuildChain,
    ) -> Result<BuildResult, BuildError> {
        tracing::info!("Building reference stub for `{}`", self.name());

        let workspace = ScratchWorkspace::unique(self.ctx.scratch_root(), self.name())?;
        let output_dir = workspace.root().join(SCRATCH_BIN);
        let artifacts = ArtifactPaths::new(&output_dir, self.name(), EmitOptions::MINIMAL);

        let outcome = self
            .emit(&output_dir, &workspace, EmitOptions::MINIMAL, chain)
            .and_then(|result| {
                if result.success() {
                    copy_artifact(&artifacts.assembly, out)?;
                }
                Ok(result)
            });

        finish(workspace, outcome)
    }

    fn emit(
        &self,
        output_dir: &Path,
        workspace: &ScratchWorkspace,
        options: EmitOptions,
        chain: &mut BuildChain,
    ) -> Result<BuildResult, BuildError> {
        chain.enter(self.name())?;
        let outcome = self.emit_in_workspace(output_dir, workspace, options, chain);
        chain.leave();
        outcome
    }

    fn emit_in_workspace(
        &self,
        output_dir: &Path,
        workspace: &ScratchWorkspace,
        options: EmitOptions,
        chain: &mut BuildChain,
    ) -> Result<BuildResult, BuildError> {
        let artifacts = ArtifactPaths::new(output_dir, self.name(), options);
        ensure_dir(output_dir)?;
        let obj_dir = workspace.prepare_obj_dir()?;

        let resolved = match ReferenceResolver::new(self.name(), &obj_dir)
            .resolve(&self.references, chain)?
        {
            Resolution::Resolved(resolved) => resolved,
            Resolution::Failed(result) => return Ok(result),
        };

        let command = compile_command(&self.ctx, &self.project, &artifacts, resolved.paths());
        tracing::debug!("{}", command.display_command());

        let output = self.ctx.runner().run(&command)?;

        if !output.success() {
            tracing::info!(
                "Compiler exited with {:?} for `{}`",
                output.code,
                self.name()
            );
            return Ok(BuildResult::compilation_failed().with_output(output.combined()));
        }

        resolved.remove_temp_files()?;
        workspace.remove_obj_dir()?;

        tracing::info!("Built `{}` -> {}", self.name(), artifacts.assembly.display());
        Ok(BuildResult::succeeded().with_output(output.combined()))
    }
}

impl BuildUnit for ProjectBuilder {
    fn name(&self) -> &str {
        self.project.name()
    }

    fn write_reference_stub(
        &self,
        out: &mut dyn Write,
        chain: &mut BuildChain,
    ) -> Result<BuildResult, BuildError> {
        self.stub_in_chain(out, chain)
    }
}
