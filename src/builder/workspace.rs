//! Scratch workspaces for a single build attempt.
//!
//! A workspace is removed when it is released or dropped, whichever comes
//! first, so every exit path of a build (including `?` returns) cleans up.
//! Dropping only logs removal failures; [`ScratchWorkspace::release`] reports
//! them.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::BuildError;
use crate::util::fs::{ensure_dir, is_empty_dir, remove_dir_all_if_exists};

/// Name of the materialized-reference subdirectory.
pub const OBJ_DIR: &str = "obj";

enum Kind {
    /// Uniquely named directory owned outright
    Unique(Option<TempDir>),
    /// Deterministic directory; removed only if we created it
    Fixed { created_root: bool },
}

/// Transient directory tree of one build attempt.
pub struct ScratchWorkspace {
    root: PathBuf,
    kind: Kind,
    released: bool,
}

impl ScratchWorkspace {
    /// Create a uniquely named workspace under `parent`.
    pub fn unique(parent: &Path, label: &str) -> Result<Self, BuildError> {
        ensure_dir(parent)?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("csbuild-{}-", label))
            .tempdir_in(parent)
            .map_err(|e| BuildError::io(parent, e))?;

        tracing::debug!("Created scratch workspace {}", dir.path().display());

        Ok(ScratchWorkspace {
            root: dir.path().to_path_buf(),
            kind: Kind::Unique(Some(dir)),
            released: false,
        })
    }

    /// Use a deterministic workspace root, creating it if needed.
    ///
    /// Concurrent builds must not share the same fixed root.
    pub fn fixed(root: impl Into<PathBuf>) -> Result<Self, BuildError> {
        let root = root.into();
        let created_root = !root.exists();
        ensure_dir(&root)?;

        Ok(ScratchWorkspace {
            root,
            kind: Kind::Fixed { created_root },
            released: false,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/obj`
    pub fn obj_dir(&self) -> PathBuf {
        self.root.join(OBJ_DIR)
    }

    /// Create the `obj` subdirectory and return its path.
    pub fn prepare_obj_dir(&self) -> Result<PathBuf, BuildError> {
        let obj = self.obj_dir();
        ensure_dir(&obj)?;
        Ok(obj)
    }

    /// Remove the `obj` subdirectory, if present.
    pub fn remove_obj_dir(&self) -> Result<(), BuildError> {
        remove_dir_all_if_exists(&self.obj_dir())
    }

    /// Remove the workspace now, reporting failures.
    pub fn release(mut self) -> Result<(), BuildError> {
        self.released = true;
        self.cleanup()
    }

    fn cleanup(&mut self) -> Result<(), BuildError> {
        match self.kind {
            Kind::Unique(ref mut dir) => {
                if let Some(dir) = dir.take() {
                    dir.close().map_err(|e| BuildError::io(&self.root, e))?;
                }
            }
            Kind::Fixed { created_root } => {
                self.remove_obj_dir()?;
                if created_root && self.root.exists() && is_empty_dir(&self.root)? {
                    fs::remove_dir(&self.root).map_err(|e| BuildError::io(&self.root, e))?;
                }
            }
        }

        tracing::debug!("Removed scratch workspace {}", self.root.display());
        Ok(())
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.cleanup() {
            tracing::warn!(
                "Failed to remove scratch workspace {}: {}",
                self.root.display(),
                e
            );
        }
    }
}

/// Release the workspace after a successful operation.
///
/// On error the workspace is dropped, which removes it before the error
/// propagates.
pub fn finish<T>(
    workspace: ScratchWorkspace,
    outcome: Result<T, BuildError>,
) -> Result<T, BuildError> {
    let value = outcome?;
    workspace.release()?;
    Ok(value)
}
