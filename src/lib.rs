//! gmpack - GameMaker local package exporter
//!
//! Extracts a selection of a GameMaker project (virtual folders and
//! resources described by a `.yyp` file) into a standalone `.yymps` local
//! package.
//!
//! # Architecture
//!
//! The export is a single-pass pipeline of pure stages:
//! - The flat folder and resource tables are folded into a resource tree
//! - A glob pattern prunes the tree
//! - The pruned tree is flattened back into resource and folder lists
//! - The project description is re-linked so every table matches the selection
//!
//! Filesystem work (reading the project, copying payloads, zipping) sits
//! behind the traits in `adapters`.
//!
//! # Modules
//!
//! - `adapters`: Filesystem collaborators (reader, payload copier, zip writer)
//! - `core`: Tree model, selection, re-linking and the export pipeline
//! - `domain`: Data structures (ResourceIdentity, ProjectDescription, PackageSummary)
//! - `config`: Configuration file and environment overrides
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! gmpack export -P ./MyGame -a "Scripts/**" \
//!     -d "My Tools" -i com.example.tools -p "Example" -v 1.0.0 \
//!     -o my_tools.yymps
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::core::{ExportError, ExportReport, ExportRequest, Exporter, SelectionPattern, TreeNode};
pub use crate::domain::{PackageFields, PackageSummary, ProjectDescription, ResourceIdentity};
