//! Test fixtures for common test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{Project, MANIFEST_NAME};

/// A project rooted at `<dir>/<name>` with the given relative sources.
///
/// Source files are not written; the mock compiler never reads them.
pub fn project_in(dir: &Path, name: &str, sources: &[&str]) -> Project {
    Project::new(name, dir.join(name), sources.iter().copied())
}

/// Write a project directory with a manifest and one source file.
///
/// `references` is appended verbatim after the `[project]` section.
pub fn write_project(dir: &Path, name: &str, references: &str) -> PathBuf {
    let root = dir.join(name);
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("src").join(format!("{}.cs", name)),
        format!("public class {} {{}}\n", name),
    )
    .unwrap();
    fs::write(
        root.join(MANIFEST_NAME),
        format!("[project]\nname = \"{}\"\n{}", name, references),
    )
    .unwrap();
    root
}
