//! Build error types and diagnostics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Infrastructure failure that aborts a build attempt.
///
/// Compiler failures are not errors; they come back as a failed
/// [`BuildResult`](crate::core::BuildResult). Nothing here is retried.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("I/O error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to materialize reference `{name}`")]
    Materialize {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to launch compiler `{}`", program.display())]
    CompilerLaunch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no C# compiler found")]
    CompilerNotFound,

    #[error("could not find `csbuild.toml` in `{}` or any parent directory", start.display())]
    ManifestNotFound { start: PathBuf },

    #[error("invalid reference name `{name}`")]
    InvalidReferenceName { name: String },

    #[error("cyclic project reference: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    #[error("failed to load project `{}`: {message}", path.display())]
    Project { path: PathBuf, message: String },
}

impl BuildError {
    /// Wrap an I/O error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            BuildError::Io { path, source } => {
                Diagnostic::error(format!("filesystem error: {}", source)).with_location(path)
            }

            BuildError::Materialize { name, source } => Diagnostic::error(format!(
                "could not write reference `{}` to the scratch directory",
                name
            ))
            .with_context(source.to_string()),

            BuildError::CompilerLaunch { program, source } => {
                Diagnostic::error(format!("could not run `{}`", program.display()))
                    .with_context(source.to_string())
                    .with_suggestion(suggestions::SET_COMPILER)
            }

            BuildError::CompilerNotFound => {
                Diagnostic::error("no C# compiler found")
                    .with_context("searched: --compiler, config `compiler.path`, $CSC, PATH (csc, mcs)")
                    .with_suggestion(suggestions::SET_COMPILER)
            }

            BuildError::ManifestNotFound { .. } => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::NO_MANIFEST)
            }

            BuildError::InvalidReferenceName { name } => {
                Diagnostic::error(format!("invalid reference name `{}`", name))
                    .with_context("reference names become `<Name>.dll` in the scratch directory")
                    .with_suggestion(suggestions::RENAME_REFERENCE)
            }

            BuildError::CyclicReference { chain } => {
                let mut diag = Diagnostic::error("cyclic project reference");
                for pair in chain.windows(2) {
                    diag = diag.with_context(format!("`{}` references `{}`", pair[0], pair[1]));
                }
                diag.with_suggestion(suggestions::BREAK_CYCLE)
            }

            BuildError::Project { path, message } => {
                Diagnostic::error(format!("failed to load project: {}", message))
                    .with_location(path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message() {
        let err = BuildError::CyclicReference {
            chain: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "cyclic project reference: A -> B -> A");

        let diag = err.to_diagnostic().format(false);
        assert!(diag.contains("`A` references `B`"));
        assert!(diag.contains("`B` references `A`"));
    }

    #[test]
    fn test_io_diagnostic_has_location() {
        let err = BuildError::io(
            "/tmp/obj",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let diag = err.to_diagnostic().format(false);
        assert!(diag.contains("--> /tmp/obj"));
    }
}
