//! Core data structures for csbuild.
//!
//! This module contains the foundational types used throughout csbuild:
//! - Projects and their source files
//! - Upstream references and the nested build-unit seam
//! - Build results and infrastructure errors
//! - The `csbuild.toml` manifest

pub mod error;
pub mod manifest;
pub mod project;
pub mod reference;
pub mod result;

pub use error::BuildError;
pub use manifest::{find_manifest, Manifest, MANIFEST_NAME};
pub use project::{Project, SourceFile};
pub use reference::{
    BuildChain, BuildUnit, EmbeddedReference, FileReference, NestedBuildReference, Reference,
    ReferenceSet, validate_reference_name,
};
pub use result::{BuildResult, COMPILATION_FAILED};
