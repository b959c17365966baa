//! Zip archive writer for `.yymps` packages.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::copier::relative_to;
use super::ArchiveWriter;
use crate::core::ExportError;

/// Writes the staging root as a zip container
#[derive(Debug, Clone)]
pub struct ZipArchiveWriter {
    compression: CompressionMethod,
}

impl Default for ZipArchiveWriter {
    fn default() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }
}

impl ZipArchiveWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store entries uncompressed
    pub fn stored() -> Self {
        Self {
            compression: CompressionMethod::Stored,
        }
    }
}

#[async_trait]
impl ArchiveWriter for ZipArchiveWriter {
    async fn write(&self, staging_root: &Path, output: &Path) -> Result<PathBuf, ExportError> {
        let staging_root = staging_root.to_path_buf();
        let output = output.to_path_buf();
        let compression = self.compression;

        let fail_path = output.clone();
        tokio::task::spawn_blocking(move || write_zip(&staging_root, &output, compression))
            .await
            .map_err(|e| ExportError::ArchiveWrite {
                path: fail_path,
                message: e.to_string(),
            })?
    }
}

fn write_zip(
    staging_root: &Path,
    output: &Path,
    compression: CompressionMethod,
) -> Result<PathBuf, ExportError> {
    let fail = |message: String| ExportError::ArchiveWrite {
        path: output.to_path_buf(),
        message,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
    }

    let file = File::create(output).map_err(|e| fail(e.to_string()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(compression);

    for entry in WalkDir::new(staging_root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| fail(e.to_string()))?;
        let relative = relative_to(entry.path(), staging_root).map_err(|e| fail(e.to_string()))?;
        let name = entry_name(&relative);

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)
                .map_err(|e| fail(e.to_string()))?;
        } else {
            zip.start_file(name, options)
                .map_err(|e| fail(e.to_string()))?;
            let mut source = File::open(entry.path()).map_err(|e| fail(e.to_string()))?;
            io::copy(&mut source, &mut zip).map_err(|e| fail(e.to_string()))?;
        }
    }

    zip.finish().map_err(|e| fail(e.to_string()))?;
    Ok(output.to_path_buf())
}

/// Zip entry names always use `/`, whatever the host separator
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
