//! Launching the compiler.

use crate::builder::command::CommandSpec;
use crate::core::BuildError;
use crate::util::process::ProcessBuilder;

/// Captured result of one compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CompilerOutput {
    /// Only exit code 0 is success.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

/// Runs a compiler command to completion.
///
/// Implementations block until the compiler has exited, so every file named
/// on the command line may be removed once `run` returns.
pub trait CompilerRunner: Send + Sync {
    fn run(&self, cmd: &CommandSpec) -> Result<CompilerOutput, BuildError>;
}

/// Runs the compiler as a subprocess.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CompilerRunner for ProcessRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<CompilerOutput, BuildError> {
        let mut process = ProcessBuilder::new(&cmd.program).args(cmd.argv());
        if let Some(ref cwd) = cmd.cwd {
            process = process.cwd(cwd);
        }

        let output = process.output().map_err(|source| BuildError::CompilerLaunch {
            program: cmd.program.clone(),
            source,
        })?;

        Ok(CompilerOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
