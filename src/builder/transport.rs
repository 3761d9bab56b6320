//! Copying emitted artifacts into caller-supplied writers.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::core::BuildError;

/// Copy the file at `path` into `out` and flush it.
///
/// Returns once every byte has been written; the source file is closed only
/// afterwards.
pub fn copy_artifact(path: &Path, out: &mut dyn Write) -> Result<u64, BuildError> {
    let mut file = File::open(path).map_err(|e| BuildError::io(path, e))?;
    let copied = io::copy(&mut file, out).map_err(|e| BuildError::io(path, e))?;
    out.flush().map_err(|e| BuildError::io(path, e))?;

    tracing::debug!("Copied {} bytes from {}", copied, path.display());
    Ok(copied)
}
