//! C# library build orchestration.
//!
//! This module resolves project references into compiler inputs, runs the
//! compiler and manages the scratch state a build needs.

pub mod command;
pub mod context;
pub mod invoker;
pub mod resolver;
pub mod runner;
pub mod transport;
pub mod workspace;

pub use command::{ArtifactPaths, CommandSpec, EmitOptions};
pub use context::BuildContext;
pub use invoker::ProjectBuilder;
pub use resolver::{ReferenceResolver, Resolution, ResolvedReferences};
pub use runner::{CompilerOutput, CompilerRunner, ProcessRunner};
pub use workspace::ScratchWorkspace;
