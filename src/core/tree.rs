//! Resource tree model.
//!
//! The project's flat folder and resource tables are folded into a single
//! nested tree keyed by segment name. Folders are inner nodes; resources are
//! terminals carrying their identity.

use std::collections::BTreeMap;

use super::error::ExportError;
use super::path::decompose;
use crate::domain::{FolderDescriptor, ResourceIdentity, ResourceRecord};

/// Children of a folder node, keyed by segment name
pub type Children = BTreeMap<String, TreeNode>;

/// A node of the resource tree.
///
/// A key maps to either a sub-tree or a terminal, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// Folder (or the root) with named children
    Folder(Children),

    /// Concrete resource
    Resource(ResourceIdentity),
}

impl Default for TreeNode {
    fn default() -> Self {
        Self::empty()
    }
}

impl TreeNode {
    /// An empty folder
    pub fn empty() -> Self {
        Self::Folder(Children::new())
    }

    /// Children if this is a folder
    pub fn children(&self) -> Option<&Children> {
        match self {
            Self::Folder(children) => Some(children),
            Self::Resource(_) => None,
        }
    }

    /// True for a folder without children
    pub fn is_empty(&self) -> bool {
        self.children().is_some_and(Children::is_empty)
    }

    /// Look up a node by segment path relative to this node
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&TreeNode> {
        let mut current = self;
        for segment in path {
            current = current.children()?.get(segment.as_ref())?;
        }
        Some(current)
    }

    /// Number of resource terminals below this node
    pub fn resource_count(&self) -> usize {
        match self {
            Self::Resource(_) => 1,
            Self::Folder(children) => children.values().map(TreeNode::resource_count).sum(),
        }
    }
}

/// Build the resource tree from the flat folder and resource tables.
///
/// Folders may be declared in any order and re-declaring one is a no-op.
/// Every resource's parent chain must already exist. A resource replaces
/// whatever already holds its name in its folder (last write wins), including
/// a folder of the same name together with its subtree.
pub fn build(
    folders: &[FolderDescriptor],
    resources: &[ResourceRecord],
) -> Result<TreeNode, ExportError> {
    let mut root = Children::new();

    for folder in folders {
        let segments = decompose(&folder.folder_path)?;
        ensure_chain(&mut root, &segments);
    }

    for record in resources {
        let parent = if record.is_root_level() {
            &mut root
        } else {
            let segments = decompose(&record.parent_folder_path)?;
            walk_chain(&mut root, &segments).ok_or_else(|| ExportError::OrphanResource {
                name: record.name.clone(),
                parent: record.parent_folder_path.clone(),
            })?
        };

        parent.insert(record.name.clone(), TreeNode::Resource(record.id.clone()));
    }

    Ok(TreeNode::Folder(root))
}

/// Walk the chain, creating empty folders for missing segments.
///
/// Runs before any resource is inserted, so every existing node is a folder.
fn ensure_chain(mut current: &mut Children, segments: &[String]) {
    for segment in segments {
        let TreeNode::Folder(children) = current
            .entry(segment.clone())
            .or_insert_with(TreeNode::empty)
        else {
            return;
        };
        current = children;
    }
}

/// Walk an existing chain; `None` if any link is missing or is a terminal
fn walk_chain<'a>(mut current: &'a mut Children, segments: &[String]) -> Option<&'a mut Children> {
    for segment in segments {
        current = match current.get_mut(segment)? {
            TreeNode::Folder(children) => children,
            TreeNode::Resource(_) => return None,
        };
    }
    Some(current)
}
