//! Export pipeline.
//!
//! Drives a single export: load the project, compute the selection with the
//! pure core stages, stage the package contents, and hand the staging root to
//! the archive writer. Any failure aborts the whole export; the staging
//! directory is removed when it goes out of scope.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use super::error::ExportError;
use super::path::FOLDER_ROOT;
use super::projector::{flatten_folders, flatten_resources};
use super::relink::{relink, unfiltered_references};
use super::selector::{select, SelectionPattern};
use super::tree::build;
use crate::adapters::{
    ArchiveWriter, DescriptionReader, FsDescriptionReader, FsPayloadCopier, LoadedProject,
    PayloadCopier, ZipArchiveWriter,
};
use crate::config::ResolvedConfig;
use crate::domain::{
    PackageFields, PackageSummary, ProjectDescription, ResourceIdentity, SUMMARY_FILE_NAME,
};

/// Prefix of staging directory names
pub const STAGING_PREFIX: &str = "gm_local_package_exporter";

/// What to export and where
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Project root directory
    pub project_path: PathBuf,

    /// Package file to produce
    pub output_file: PathBuf,

    /// Which part of the resource tree to include
    pub pattern: SelectionPattern,

    /// Package identity
    pub fields: PackageFields,

    /// Compute the selection only; touch nothing on disk
    pub dry_run: bool,
}

/// Environment-dependent settings of the exporter
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory the staging directory is created in
    pub staging_dir: PathBuf,

    /// Abort before archiving if any payload copy failed
    pub fail_on_copy_error: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            staging_dir: std::env::temp_dir(),
            fail_on_copy_error: false,
        }
    }
}

impl From<&ResolvedConfig> for ExportOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            staging_dir: config.staging_dir.clone(),
            fail_on_copy_error: config.fail_on_copy_error,
        }
    }
}

/// Everything the package will contain, computed without side effects
#[derive(Debug, Clone)]
pub struct PackagePlan {
    /// Selected resources, in copy order
    pub resources: Vec<ResourceIdentity>,

    /// Selected folder paths
    pub folders: Vec<String>,

    /// Re-linked description
    pub description: ProjectDescription,

    /// Summary document
    pub summary: PackageSummary,

    /// Sections that still reference resources outside the selection
    pub flagged_sections: Vec<String>,
}

/// Run the pure stages: build, select, project, re-link, summarize.
pub fn plan(
    project: LoadedProject,
    pattern: &SelectionPattern,
    fields: &PackageFields,
) -> Result<PackagePlan, ExportError> {
    let tree = build(&project.description.folders, &project.records)?;
    let selected = select(&tree, pattern);

    let resources = flatten_resources(&selected);
    let folders = flatten_folders(&selected, FOLDER_ROOT);

    let description = relink(project.description, &resources, &folders, fields)?;
    let summary = PackageSummary::from_description(&description);
    let flagged_sections = unfiltered_references(&description);

    Ok(PackagePlan {
        resources,
        folders,
        description,
        summary,
        flagged_sections,
    })
}

/// A payload copy that did not complete
#[derive(Debug, Clone)]
pub struct CopyFailure {
    pub resource: ResourceIdentity,
    pub error: String,
}

/// Outcome of an export
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Package written (`None` for a dry run)
    pub output: Option<PathBuf>,

    /// Selected resources
    pub resources: Vec<ResourceIdentity>,

    /// Selected folder paths
    pub folders: Vec<String>,

    /// Resources whose payload could not be copied
    pub copy_failures: Vec<CopyFailure>,

    /// Sections passed through with references outside the selection
    pub flagged_sections: Vec<String>,
}

/// Export engine
pub struct Exporter {
    reader: Box<dyn DescriptionReader>,
    copier: Box<dyn PayloadCopier>,
    writer: Box<dyn ArchiveWriter>,
    options: ExportOptions,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

impl Exporter {
    /// Create an exporter backed by the local filesystem
    pub fn new(options: ExportOptions) -> Self {
        Self {
            reader: Box::new(FsDescriptionReader::new()),
            copier: Box::new(FsPayloadCopier::new()),
            writer: Box::new(ZipArchiveWriter::new()),
            options,
        }
    }

    /// Replace the payload copier
    pub fn with_copier(mut self, copier: impl PayloadCopier + 'static) -> Self {
        self.copier = Box::new(copier);
        self
    }

    /// Replace the archive writer
    pub fn with_writer(mut self, writer: impl ArchiveWriter + 'static) -> Self {
        self.writer = Box::new(writer);
        self
    }

    /// Replace the description reader
    pub fn with_reader(mut self, reader: impl DescriptionReader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }

    /// Export a package
    #[instrument(skip(self, request), fields(project = %request.project_path.display(), pattern = %request.pattern))]
    pub async fn export(&self, request: &ExportRequest) -> Result<ExportReport> {
        let project = self.reader.load(&request.project_path).await?;
        info!(
            file = %project.file_name,
            resources = project.records.len(),
            folders = project.description.folders.len(),
            "Project detected"
        );

        let source_root = project.root.clone();
        let file_name = project.file_name.clone();
        let plan = plan(project, &request.pattern, &request.fields)?;

        for section in &plan.flagged_sections {
            warn!(
                %section,
                "Section references resources outside the selection and is passed through unfiltered"
            );
        }
        info!(
            resources = plan.resources.len(),
            folders = plan.folders.len(),
            "Selection resolved"
        );

        if request.dry_run {
            return Ok(ExportReport {
                output: None,
                resources: plan.resources,
                folders: plan.folders,
                copy_failures: Vec::new(),
                flagged_sections: plan.flagged_sections,
            });
        }

        let staging = self.create_staging().await?;
        debug!(staging = %staging.path().display(), "Staging directory created");

        let document = plan.description.to_document()?;
        write_json(&staging.path().join(&file_name), &document).await?;
        write_json(&staging.path().join(SUMMARY_FILE_NAME), &plan.summary).await?;

        let copy_failures = self
            .copy_payloads(&plan.resources, &source_root, staging.path())
            .await;

        if self.options.fail_on_copy_error && !copy_failures.is_empty() {
            return Err(ExportError::PayloadCopy {
                failed: copy_failures.len(),
            }
            .into());
        }

        let output = self
            .writer
            .write(staging.path(), &request.output_file)
            .await?;
        info!(output = %output.display(), "Local package exported");

        Ok(ExportReport {
            output: Some(output),
            resources: plan.resources,
            folders: plan.folders,
            copy_failures,
            flagged_sections: plan.flagged_sections,
        })
    }

    async fn create_staging(&self) -> Result<tempfile::TempDir> {
        let base = &self.options.staging_dir;
        tokio::fs::create_dir_all(base)
            .await
            .with_context(|| format!("Failed to create staging base: {}", base.display()))?;

        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(base)
            .with_context(|| format!("Failed to create staging directory in {}", base.display()))
    }

    /// Copy every selected payload in selection order; failures are collected, not fatal
    async fn copy_payloads(
        &self,
        resources: &[ResourceIdentity],
        source_root: &Path,
        staging_root: &Path,
    ) -> Vec<CopyFailure> {
        let mut failures = Vec::new();

        for resource in resources {
            match self.copier.copy(resource, source_root, staging_root).await {
                Ok(files) => debug!(resource = %resource, files, "Payload copied"),
                Err(e) => {
                    warn!(resource = %resource, error = %e, "Payload copy failed");
                    failures.push(CopyFailure {
                        resource: resource.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        failures
    }
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
