//! Adapter interfaces for the filesystem collaborators.
//!
//! The export pipeline talks to the outside world only through these traits:
//! reading the project description, copying resource payloads into the
//! staging root, and compressing the staging root into a package archive.

pub mod archive;
pub mod copier;
pub mod reader;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::core::ExportError;
use crate::domain::{ProjectDescription, ResourceIdentity, ResourceRecord};

// Re-export the filesystem adapters
pub use archive::ZipArchiveWriter;
pub use copier::FsPayloadCopier;
pub use reader::FsDescriptionReader;

/// A project description as loaded from disk
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Project root directory
    pub root: PathBuf,

    /// File name of the description (e.g. "MyGame.yyp")
    pub file_name: String,

    /// Parsed description
    pub description: ProjectDescription,

    /// One record per resource, with its parent folder resolved
    pub records: Vec<ResourceRecord>,
}

/// Supplies a parsed project description
#[async_trait]
pub trait DescriptionReader: Send + Sync {
    /// Load the description found at `project_root`
    async fn load(&self, project_root: &Path) -> Result<LoadedProject, ExportError>;
}

/// Copies one resource's payload into the staging root
#[async_trait]
pub trait PayloadCopier: Send + Sync {
    /// Copy every file stored alongside `resource`; returns the number of files copied
    async fn copy(
        &self,
        resource: &ResourceIdentity,
        source_root: &Path,
        staging_root: &Path,
    ) -> Result<usize, ExportError>;
}

/// Produces the package container from a staging root
#[async_trait]
pub trait ArchiveWriter: Send + Sync {
    /// Compress `staging_root` into `output`; entry names are relative to the staging root
    async fn write(&self, staging_root: &Path, output: &Path) -> Result<PathBuf, ExportError>;
}
