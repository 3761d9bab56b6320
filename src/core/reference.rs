//! Upstream references and the build-unit seam used for nested projects.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::{BuildError, BuildResult};

/// Something that can build a reference-only stub of itself.
///
/// Nested project references hold one of these. The chain of units currently
/// being built is threaded through so cyclic project graphs fail instead of
/// recursing forever.
pub trait BuildUnit: Send + Sync {
    /// Name of the unit, matched against the names in the build chain.
    fn name(&self) -> &str;

    /// Build a minimal reference assembly and write its bytes to `out`.
    ///
    /// `out` is only written when the returned result is successful.
    fn write_reference_stub(
        &self,
        out: &mut dyn Write,
        chain: &mut BuildChain,
    ) -> Result<BuildResult, BuildError>;
}

/// Names of the build units in progress, outermost first.
#[derive(Debug, Clone, Default)]
pub struct BuildChain {
    units: Vec<String>,
}

impl BuildChain {
    pub fn new() -> Self {
        BuildChain::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.iter().any(|u| u == name)
    }

    /// Push a unit, failing if it is already being built.
    pub fn enter(&mut self, name: &str) -> Result<(), BuildError> {
        if self.contains(name) {
            return Err(self.cycle_error(name));
        }
        self.units.push(name.to_string());
        Ok(())
    }

    /// Pop the innermost unit.
    pub fn leave(&mut self) {
        self.units.pop();
    }

    /// The error for re-entering `name`, listing the full cycle.
    pub fn cycle_error(&self, name: &str) -> BuildError {
        let mut chain = self.units.clone();
        chain.push(name.to_string());
        BuildError::CyclicReference { chain }
    }
}

/// Check that `name` can be used as the file stem of a materialized
/// reference.
///
/// Empty names, `.`, `..` and names containing path separators would
/// escape `<obj>/<Name>.dll`.
pub fn validate_reference_name(name: &str) -> Result<(), BuildError> {
    let valid = !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c: char| matches!(c, '/' | '\\' | ':' | '\0'));
    if valid {
        Ok(())
    } else {
        Err(BuildError::InvalidReferenceName {
            name: name.to_string(),
        })
    }
}

/// A reference to an already-built assembly on disk.
#[derive(Debug, Clone)]
pub struct FileReference {
    name: String,
    path: PathBuf,
}

impl FileReference {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        FileReference {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Name the reference after the file stem (`out/Lib.dll` -> `Lib`).
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        FileReference { name, path }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Assembly bytes with no on-disk location yet.
#[derive(Clone)]
pub struct EmbeddedReference {
    name: String,
    content: Arc<[u8]>,
}

impl EmbeddedReference {
    pub fn new(name: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        EmbeddedReference {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl fmt::Debug for EmbeddedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedReference")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .finish()
    }
}

/// Another build unit whose stub is built on demand.
#[derive(Clone)]
pub struct NestedBuildReference {
    name: String,
    unit: Arc<dyn BuildUnit>,
}

impl NestedBuildReference {
    pub fn new(name: impl Into<String>, unit: Arc<dyn BuildUnit>) -> Self {
        NestedBuildReference {
            name: name.into(),
            unit,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &dyn BuildUnit {
        self.unit.as_ref()
    }
}

impl fmt::Debug for NestedBuildReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedBuildReference")
            .field("name", &self.name)
            .field("unit", &self.unit.name())
            .finish()
    }
}

/// One upstream reference of a project.
#[derive(Debug, Clone)]
pub enum Reference {
    File(FileReference),
    Embedded(EmbeddedReference),
    Nested(NestedBuildReference),
}

impl Reference {
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Reference::File(FileReference::new(name, path))
    }

    pub fn embedded(name: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        Reference::Embedded(EmbeddedReference::new(name, content))
    }

    pub fn nested(name: impl Into<String>, unit: Arc<dyn BuildUnit>) -> Self {
        Reference::Nested(NestedBuildReference::new(name, unit))
    }

    /// Stable name used for de-duplication and self-reference exclusion.
    pub fn name(&self) -> &str {
        match self {
            Reference::File(r) => r.name(),
            Reference::Embedded(r) => r.name(),
            Reference::Nested(r) => r.name(),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Reference::File(_) => "file",
            Reference::Embedded(_) => "embedded",
            Reference::Nested(_) => "project",
        }
    }
}

impl From<FileReference> for Reference {
    fn from(r: FileReference) -> Self {
        Reference::File(r)
    }
}

/// Ordered set of references exported for a project.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    references: Vec<Reference>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        ReferenceSet::default()
    }

    pub fn push(&mut self, reference: impl Into<Reference>) {
        self.references.push(reference.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reference> {
        self.references.iter()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

impl FromIterator<Reference> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = Reference>>(iter: I) -> Self {
        ReferenceSet {
            references: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ReferenceSet {
    type Item = &'a Reference;
    type IntoIter = std::slice::Iter<'a, Reference>;

    fn into_iter(self) -> Self::IntoIter {
        self.references.iter()
    }
}
