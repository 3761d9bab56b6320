//! Project model: name, root directory and ordered source files.

use std::path::{Path, PathBuf};

/// Opaque handle to one source file of a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    path: PathBuf,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SourceFile { path: path.into() }
    }

    /// The path as declared, possibly relative to the project root.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A compilable project.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    root: PathBuf,
    sources: Vec<SourceFile>,
}

impl Project {
    /// Create a project. Source order is preserved.
    pub fn new<I, P>(name: impl Into<String>, root: impl Into<PathBuf>, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Project {
            name: name.into(),
            root: root.into(),
            sources: sources.into_iter().map(SourceFile::new).collect(),
        }
    }

    /// Project name. Also the file stem of every artifact it produces.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }

    /// Path of a source file as handed to the compiler.
    pub fn source_path(&self, source: &SourceFile) -> PathBuf {
        if source.path.is_absolute() {
            source.path.clone()
        } else {
            self.root.join(&source.path)
        }
    }
}
