//! Build context - compiler location, scratch root and the runner seam.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::builder::runner::{CompilerRunner, ProcessRunner};
use crate::core::BuildError;
use crate::util::config::Config;
use crate::util::process::{find_compiler, find_executable};

/// Build context shared by a project and every nested project it builds.
#[derive(Clone)]
pub struct BuildContext {
    /// Absolute path (or PATH-resolvable name) of the compiler
    compiler: PathBuf,

    /// Arguments appended after the fixed flags
    extra_args: Vec<String>,

    /// Parent directory of unique scratch workspaces
    scratch_root: PathBuf,

    /// How the compiler is launched
    runner: Arc<dyn CompilerRunner>,
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("compiler", &self.compiler)
            .field("extra_args", &self.extra_args)
            .field("scratch_root", &self.scratch_root)
            .finish_non_exhaustive()
    }
}

impl BuildContext {
    /// Create a context for the given compiler, launched as a subprocess.
    pub fn new(compiler: impl Into<PathBuf>) -> Self {
        BuildContext {
            compiler: compiler.into(),
            extra_args: Vec::new(),
            scratch_root: std::env::temp_dir(),
            runner: Arc::new(ProcessRunner),
        }
    }

    /// Create a context from configuration.
    ///
    /// Compiler priority:
    /// 1. `explicit` (the `--compiler` flag)
    /// 2. `compiler.path` from config
    /// 3. `$CSC`, then `csc`/`mcs` on PATH
    pub fn from_config(config: &Config, explicit: Option<&Path>) -> Result<Self, BuildError> {
        let compiler = explicit
            .or(config.compiler.path.as_deref())
            .map(resolve_program)
            .or_else(find_compiler)
            .ok_or(BuildError::CompilerNotFound)?;

        tracing::debug!("Using compiler {}", compiler.display());

        let mut ctx = BuildContext::new(compiler).with_extra_args(config.compiler.args.clone());
        if let Some(ref scratch) = config.build.scratch_dir {
            ctx = ctx.with_scratch_root(scratch);
        }
        Ok(ctx)
    }

    /// Replace the compiler runner.
    pub fn with_runner(mut self, runner: Arc<dyn CompilerRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Place unique scratch workspaces under `root`.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    /// Extra compiler arguments.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn compiler(&self) -> &Path {
        &self.compiler
    }

    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }

    pub fn runner(&self) -> &dyn CompilerRunner {
        self.runner.as_ref()
    }
}

/// Bare program names are looked up on PATH; anything else is taken as is.
fn resolve_program(program: &Path) -> PathBuf {
    if program.components().count() == 1 {
        if let Some(found) = program.to_str().and_then(find_executable) {
            return found;
        }
    }
    program.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_compiler_wins() {
        let mut config = Config::default();
        config.compiler.path = Some(PathBuf::from("/opt/mono/bin/mcs"));
        config.compiler.args = vec!["/langversion:7".into()];

        let ctx = BuildContext::from_config(&config, Some(Path::new("/opt/csc/csc"))).unwrap();
        assert_eq!(ctx.compiler(), Path::new("/opt/csc/csc"));
        assert_eq!(ctx.extra_args(), ["/langversion:7"]);
    }

    #[test]
    fn test_config_compiler_and_scratch() {
        let mut config = Config::default();
        config.compiler.path = Some(PathBuf::from("/opt/mono/bin/mcs"));
        config.build.scratch_dir = Some(PathBuf::from("/var/tmp/csbuild"));

        let ctx = BuildContext::from_config(&config, None).unwrap();
        assert_eq!(ctx.compiler(), Path::new("/opt/mono/bin/mcs"));
        assert_eq!(ctx.scratch_root(), Path::new("/var/tmp/csbuild"));
    }

    #[test]
    fn test_default_scratch_root_is_temp_dir() {
        let ctx = BuildContext::new("csc");
        assert_eq!(ctx.scratch_root(), std::env::temp_dir());
        assert!(format!("{:?}", ctx).contains("\"csc\""));
    }
}
