//! Build results returned by every build operation.

use serde::Serialize;

/// The single error reported when the compiler exits with a non-zero status.
///
/// Compiler output is not parsed, so a failed compile is always reported with
/// this one opaque message. The raw output travels alongside in
/// [`BuildResult::output`].
pub const COMPILATION_FAILED: &str = "Compilation failed";

/// Outcome of a build attempt.
///
/// Immutable once constructed. Ordinary compile failures are reported here
/// rather than as errors; only environment faults surface as
/// [`BuildError`](crate::core::BuildError).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildResult {
    success: bool,
    warnings: Vec<String>,
    errors: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    output: String,
}

impl BuildResult {
    /// A successful build.
    pub fn succeeded() -> Self {
        BuildResult {
            success: true,
            warnings: Vec::new(),
            errors: Vec::new(),
            output: String::new(),
        }
    }

    /// A failed build with the given error messages.
    ///
    /// A failure always carries at least one error; an empty list falls back
    /// to [`COMPILATION_FAILED`].
    pub fn failed<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut errors: Vec<String> = errors.into_iter().map(Into::into).collect();
        if errors.is_empty() {
            errors.push(COMPILATION_FAILED.to_string());
        }

        BuildResult {
            success: false,
            warnings: Vec::new(),
            errors,
            output: String::new(),
        }
    }

    /// A failed compiler invocation.
    pub fn compilation_failed() -> Self {
        Self::failed([COMPILATION_FAILED])
    }

    /// Attach the raw compiler output.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Raw stdout and stderr of the compiler, unparsed. Empty if the compiler
    /// never ran.
    pub fn output(&self) -> &str {
        &self.output
    }
}
