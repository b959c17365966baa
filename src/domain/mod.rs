//! Domain types for gmpack.
//!
//! This module contains the core data structures:
//! - Identity: resource identities and resource records
//! - Project: the `.yyp` project description and its tables
//! - Summary: the compact package summary

pub mod identity;
pub mod project;
pub mod summary;

// Re-export commonly used types
pub use identity::{ResourceIdentity, ResourceRecord, PROJECT_FILE_EXTENSION};
pub use project::{
    FolderDescriptor, MetaData, PackageFields, ProjectDescription, ResourceEntry, RoomOrderNode,
    PACKAGE_TYPE_ASSET,
};
pub use summary::{PackageSummary, SUMMARY_FILE_NAME};
