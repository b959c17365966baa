//! Core export logic.
//!
//! This module contains:
//! - Path: folder path decomposition
//! - Tree: resource tree model and builder
//! - Selector: glob-style pruning of the tree
//! - Projector: flattening a tree into resource and folder lists
//! - Relink: filtering the project description to a selection
//! - Exporter: the pipeline driving all of the above and the adapters
//!
//! Everything except the exporter is pure and never logs.

pub mod error;
pub mod exporter;
pub mod path;
pub mod projector;
pub mod relink;
pub mod selector;
pub mod tree;

// Re-export commonly used types
pub use error::ExportError;
pub use exporter::{
    plan, CopyFailure, ExportOptions, ExportReport, ExportRequest, Exporter, PackagePlan,
};
pub use path::{compose, decompose, FOLDER_ROOT, FOLDER_SUFFIX};
pub use projector::{flatten_folders, flatten_resources};
pub use relink::{relink, unfiltered_references, PASS_THROUGH_SECTIONS};
pub use selector::{select, SelectionPattern, SELECT_ALL};
pub use tree::{build, Children, TreeNode};
