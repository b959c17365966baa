//! Errors raised by the export pipeline.
//!
//! Every variant is unrecoverable at the point it is raised and propagates
//! unchanged to the caller. Nothing here is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while exporting a package
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Project path {0} does not exist")]
    ProjectNotFound(PathBuf),

    #[error("Project's metadata file not found in {0}")]
    MetadataFileNotFound(PathBuf),

    #[error("Malformed folder path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("Resource '{name}' references missing folder '{parent}'")]
    OrphanResource { name: String, parent: String },

    #[error("Selection is empty: no {what} matched but the project has some")]
    MissingSelection { what: &'static str },

    #[error("Invalid selection pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to copy {failed} resource payload(s)")]
    PayloadCopy { failed: usize },

    #[error("Failed to write archive {path}: {message}")]
    ArchiveWrite { path: PathBuf, message: String },
}

impl ExportError {
    pub(crate) fn malformed(path: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
