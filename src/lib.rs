//! csbuild - reference resolution and compiler invocation for C# libraries
//!
//! This crate turns a project's upstream references (prebuilt assemblies,
//! in-memory assembly bytes and other projects) into inputs for an external
//! C# compiler, runs it, and reports a uniform build result.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for csbuild unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock compiler and project fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    BuildChain, BuildError, BuildResult, BuildUnit, Project, Reference, ReferenceSet, SourceFile,
};

pub use builder::{BuildContext, ProjectBuilder};
pub use util::config::Config;
