//! High-level operations.
//!
//! This module contains the manifest-driven pieces used by the `csbuild`
//! commands.

pub mod load;
pub mod report;

pub use load::{load_project, load_sources, ManifestUnit};
pub use report::{format_result, MessageFormat};
