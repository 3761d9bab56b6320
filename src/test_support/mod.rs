//! Test utilities and mocks for csbuild unit tests.
//!
//! This module provides a mock compiler implementing the
//! [`CompilerRunner`] seam, so builds can be exercised without a real C#
//! toolchain, plus a few project fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use csbuild::test_support::{project_in, MockCompiler};
//!
//! #[test]
//! fn test_example() {
//!     let compiler = Arc::new(MockCompiler::new().fail_project("Broken"));
//!     let ctx = BuildContext::new("csc").with_runner(compiler.clone());
//!     // Build, then inspect compiler.invocations()...
//! }
//! ```

pub mod fixtures;

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use crate::builder::command::CommandSpec;
use crate::builder::runner::{CompilerOutput, CompilerRunner};
use crate::core::{BuildChain, BuildError, BuildResult, BuildUnit};

pub use fixtures::*;

/// One recorded compiler run.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Assembly name taken from `/out:`
    pub project: String,
    /// The full command
    pub command: CommandSpec,
    /// Every `/r:` path with its contents at launch time (None if missing)
    pub references: Vec<(PathBuf, Option<Vec<u8>>)>,
}

/// Mock compiler that records invocations and writes fake artifacts.
///
/// Succeeds for every project except those marked with
/// [`MockCompiler::fail_project`], which exit with code 1 and write nothing.
#[derive(Debug, Default)]
pub struct MockCompiler {
    failing: Vec<String>,
    invocations: Mutex<Vec<Invocation>>,
}

impl MockCompiler {
    /// Create a mock compiler that succeeds for every project.
    pub fn new() -> Self {
        MockCompiler::default()
    }

    /// Make compiles of `project` exit non-zero.
    pub fn fail_project(mut self, project: impl Into<String>) -> Self {
        self.failing.push(project.into());
        self
    }

    /// Invocations so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Bytes written as `<project>.dll`.
    pub fn assembly_bytes(project: &str) -> Vec<u8> {
        format!("MZ assembly {}", project).into_bytes()
    }

    /// Bytes written as `<project>.pdb`.
    pub fn pdb_bytes(project: &str) -> Vec<u8> {
        format!("BSJB symbols {}", project).into_bytes()
    }

    fn flag_value(argv: &[String], flag: &str) -> Option<PathBuf> {
        argv.iter()
            .find_map(|a| a.strip_prefix(flag))
            .map(PathBuf::from)
    }
}

impl CompilerRunner for MockCompiler {
    fn run(&self, cmd: &CommandSpec) -> Result<CompilerOutput, BuildError> {
        let argv = cmd.argv();
        let assembly = Self::flag_value(&argv, "/out:").expect("command has no /out:");
        let project = assembly
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let references = cmd
            .references()
            .into_iter()
            .map(|path| {
                let bytes = fs::read(&path).ok();
                (path, bytes)
            })
            .collect();

        self.invocations.lock().unwrap().push(Invocation {
            project: project.clone(),
            command: cmd.clone(),
            references,
        });

        if self.failing.contains(&project) {
            return Ok(CompilerOutput {
                code: Some(1),
                stdout: format!("{}.cs(1,1): error CS0000: mock failure\n", project),
                stderr: String::new(),
            });
        }

        fs::write(&assembly, Self::assembly_bytes(&project))
            .map_err(|e| BuildError::io(&assembly, e))?;
        if let Some(pdb) = Self::flag_value(&argv, "/pdb:") {
            fs::write(&pdb, Self::pdb_bytes(&project)).map_err(|e| BuildError::io(&pdb, e))?;
        }
        if let Some(doc) = Self::flag_value(&argv, "/doc:") {
            fs::write(&doc, "<doc/>").map_err(|e| BuildError::io(&doc, e))?;
        }

        Ok(CompilerOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

/// A build unit bound after construction, for wiring reference cycles.
pub struct LateUnit {
    name: String,
    target: OnceLock<Arc<dyn BuildUnit>>,
}

impl LateUnit {
    pub fn new(name: impl Into<String>) -> Self {
        LateUnit {
            name: name.into(),
            target: OnceLock::new(),
        }
    }

    /// Bind the real unit. Later binds are ignored.
    pub fn bind(&self, unit: Arc<dyn BuildUnit>) {
        let _ = self.target.set(unit);
    }
}

impl BuildUnit for LateUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn write_reference_stub(
        &self,
        out: &mut dyn Write,
        chain: &mut BuildChain,
    ) -> Result<BuildResult, BuildError> {
        match self.target.get() {
            Some(unit) => unit.write_reference_stub(out, chain),
            None => Ok(BuildResult::failed([format!("`{}` is not bound", self.name)])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mock_compiler_writes_requested_artifacts() {
        let tmp = TempDir::new().unwrap();
        let dll = tmp.path().join("App.dll");
        let pdb = tmp.path().join("App.pdb");
        let cmd = CommandSpec::new("csc")
            .flag_path("/out:", &dll)
            .arg("/debug")
            .flag_path("/pdb:", &pdb);

        let compiler = MockCompiler::new();
        let out = compiler.run(&cmd).unwrap();
        assert!(out.success());
        assert_eq!(fs::read(&dll).unwrap(), MockCompiler::assembly_bytes("App"));
        assert_eq!(fs::read(&pdb).unwrap(), MockCompiler::pdb_bytes("App"));
        assert!(!tmp.path().join("App.xml").exists());
        assert_eq!(compiler.invocations()[0].project, "App");
    }

    #[test]
    fn test_mock_compiler_failure_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let dll = tmp.path().join("Bad.dll");
        let cmd = CommandSpec::new("csc").flag_path("/out:", &dll);

        let out = MockCompiler::new().fail_project("Bad").run(&cmd).unwrap();
        assert_eq!(out.code, Some(1));
        assert!(!dll.exists());
    }
}
