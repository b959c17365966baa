//! Filesystem reader for GameMaker project descriptions.
//!
//! The project root holds one `*.yyp` description. Each resource listed in it
//! has its own `.yy` file naming the folder it is filed under. GameMaker
//! writes both with trailing commas, so they are parsed as JSON5.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;

use super::{DescriptionReader, LoadedProject};
use crate::core::ExportError;
use crate::domain::{ProjectDescription, ResourceRecord, PROJECT_FILE_EXTENSION};

/// The parts of a resource `.yy` file the tree needs
#[derive(Debug, Deserialize)]
struct ResourceFile {
    #[serde(default)]
    name: Option<String>,
    parent: ParentRef,
}

#[derive(Debug, Deserialize)]
struct ParentRef {
    path: String,
}

/// Reads `.yyp` projects from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FsDescriptionReader;

impl FsDescriptionReader {
    pub fn new() -> Self {
        Self
    }

    /// Find the description file name in a project root
    async fn find_description(root: &Path) -> Result<String, ExportError> {
        let mut entries = fs::read_dir(root)
            .await
            .map_err(|e| ExportError::io(root, e))?;

        let mut candidates = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ExportError::io(root, e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_description = Path::new(&name)
                .extension()
                .is_some_and(|ext| ext == PROJECT_FILE_EXTENSION);
            if is_description {
                candidates.push(name);
            }
        }

        // read_dir order is platform dependent
        candidates.sort();
        candidates
            .into_iter()
            .next()
            .ok_or_else(|| ExportError::MetadataFileNotFound(root.to_path_buf()))
    }
}

/// Read and parse a JSON5 file
async fn read_json5(path: &Path) -> Result<Value, ExportError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ExportError::io(path, e))?;

    json5::from_str(&content).map_err(|e| ExportError::parse(path, e))
}

#[async_trait]
impl DescriptionReader for FsDescriptionReader {
    async fn load(&self, project_root: &Path) -> Result<LoadedProject, ExportError> {
        let exists = fs::try_exists(project_root)
            .await
            .map_err(|e| ExportError::io(project_root, e))?;
        if !exists {
            return Err(ExportError::ProjectNotFound(project_root.to_path_buf()));
        }

        let file_name = Self::find_description(project_root).await?;
        let description_path = project_root.join(&file_name);

        let document = read_json5(&description_path).await?;
        let description = ProjectDescription::from_document(document)
            .map_err(|e| ExportError::parse(&description_path, e))?;

        let mut records = Vec::with_capacity(description.resources.len());
        for entry in &description.resources {
            let resource_path = project_root.join(&entry.id.path);
            let resource: ResourceFile = serde_json::from_value(read_json5(&resource_path).await?)
                .map_err(|e| ExportError::parse(&resource_path, e))?;

            let name = resource.name.unwrap_or_else(|| entry.id.name.clone());
            records.push(ResourceRecord::new(entry.id.clone(), resource.parent.path).with_name(name));
        }

        Ok(LoadedProject {
            root: project_root.to_path_buf(),
            file_name,
            description,
            records,
        })
    }
}
