//! Flattening a (pruned) tree back into lists.

use super::path::compose;
use super::tree::{Children, TreeNode};
use crate::domain::ResourceIdentity;

/// Collect every resource terminal's identity, depth-first.
pub fn flatten_resources(tree: &TreeNode) -> Vec<ResourceIdentity> {
    let mut result = Vec::new();
    collect_resources(tree, &mut result);
    result
}

fn collect_resources(node: &TreeNode, result: &mut Vec<ResourceIdentity>) {
    match node {
        TreeNode::Resource(id) => result.push(id.clone()),
        TreeNode::Folder(children) => {
            for child in children.values() {
                collect_resources(child, result);
            }
        }
    }
}

/// Collect one folder path per folder node below the root, parent before child.
///
/// Paths are rebuilt as `<prefix>/<Seg>/.../<Name>.yy`; empty folders are
/// included, the root itself is not.
pub fn flatten_folders(tree: &TreeNode, prefix: &str) -> Vec<String> {
    let mut result = Vec::new();
    if let TreeNode::Folder(children) = tree {
        let mut segments = Vec::new();
        collect_folders(children, prefix, &mut segments, &mut result);
    }
    result
}

fn collect_folders<'a>(
    children: &'a Children,
    prefix: &str,
    segments: &mut Vec<&'a str>,
    result: &mut Vec<String>,
) {
    for (name, node) in children {
        let TreeNode::Folder(grandchildren) = node else {
            continue;
        };

        segments.push(name);
        result.push(compose(prefix, segments.as_slice()));
        collect_folders(grandchildren, prefix, segments, result);
        segments.pop();
    }
}
