//! Resource identity types.
//!
//! A GameMaker resource is identified by its declared name and the path of its
//! `.yy` file, relative to the project root.

use serde::{Deserialize, Serialize};

/// File extension of the project description file
pub const PROJECT_FILE_EXTENSION: &str = "yyp";

/// Identifies a resource by declared name and storage path.
///
/// Two identities are equal iff both fields match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceIdentity {
    /// Declared resource name (e.g. "scr_player_move")
    pub name: String,

    /// Storage path of the resource's `.yy` file (e.g. "scripts/foo/foo.yy")
    pub path: String,
}

impl ResourceIdentity {
    /// Create a new identity
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Directory holding the resource's payload files, relative to the project root.
    ///
    /// Returns an empty string for a path without a directory component.
    pub fn storage_dir(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }
}

impl std::fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}

/// A resource declaration plus the folder path it lives under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Identity as listed in the project's `resources` table
    pub id: ResourceIdentity,

    /// Name the resource is filed under in the tree
    pub name: String,

    /// Folder path of the parent, e.g. "folders/Scripts/Sub.yy".
    /// Resources placed directly under the project point at the project file.
    pub parent_folder_path: String,
}

impl ResourceRecord {
    /// Create a record whose tree name is the identity's declared name
    pub fn new(id: ResourceIdentity, parent_folder_path: impl Into<String>) -> Self {
        Self {
            name: id.name.clone(),
            id,
            parent_folder_path: parent_folder_path.into(),
        }
    }

    /// Override the name the resource is filed under
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// True if the parent is the project description itself (tree root)
    pub fn is_root_level(&self) -> bool {
        self.parent_folder_path
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext == PROJECT_FILE_EXTENSION)
    }
}
