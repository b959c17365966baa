//! Filesystem payload copier.
//!
//! A resource's payload is everything stored in the directory of its `.yy`
//! file (sprite frames, script source, layer images, ...). The whole directory
//! is mirrored into the staging root at the same relative location.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use super::PayloadCopier;
use crate::core::ExportError;
use crate::domain::ResourceIdentity;

/// Copies resource payload directories with `std::fs` on the blocking pool
#[derive(Debug, Clone, Default)]
pub struct FsPayloadCopier;

impl FsPayloadCopier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PayloadCopier for FsPayloadCopier {
    async fn copy(
        &self,
        resource: &ResourceIdentity,
        source_root: &Path,
        staging_root: &Path,
    ) -> Result<usize, ExportError> {
        let storage_dir = resource.storage_dir();

        // A resource without its own directory contributes only its own file
        let (source, target, single_file) = if storage_dir.is_empty() {
            (
                source_root.join(&resource.path),
                staging_root.join(&resource.path),
                true,
            )
        } else {
            (
                source_root.join(storage_dir),
                staging_root.join(storage_dir),
                false,
            )
        };

        let source_for_error = source.clone();
        tokio::task::spawn_blocking(move || {
            if single_file {
                copy_file(&source, &target).map(|_| 1)
            } else {
                copy_tree(&source, &target)
            }
        })
        .await
        .map_err(|e| ExportError::io(source_for_error, io::Error::other(e)))?
    }
}

fn copy_file(source: &Path, target: &Path) -> Result<(), ExportError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }
    fs::copy(source, target).map_err(|e| ExportError::io(source, e))?;
    Ok(())
}

/// Mirror `source` into `target`; returns the number of files copied
fn copy_tree(source: &Path, target: &Path) -> Result<usize, ExportError> {
    if !source.is_dir() {
        return Err(ExportError::io(
            source,
            io::Error::new(io::ErrorKind::NotFound, "resource directory not found"),
        ));
    }

    fs::create_dir_all(target).map_err(|e| ExportError::io(target, e))?;

    let mut copied = 0;
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|e| ExportError::io(source, e.into()))?;
        let dest = target.join(relative_to(entry.path(), source)?);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| ExportError::io(&dest, e))?;
        } else {
            fs::copy(entry.path(), &dest).map_err(|e| ExportError::io(entry.path(), e))?;
            copied += 1;
        }
    }

    Ok(copied)
}

pub(crate) fn relative_to(path: &Path, base: &Path) -> Result<PathBuf, ExportError> {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .map_err(|e| ExportError::io(path, io::Error::other(e)))
}
