//! Pattern-based selection over the resource tree.
//!
//! Patterns are `/`-separated and matched against segment-name paths relative
//! to the tree root (`Scripts/Sub/foo`). Each segment is either `**` (zero or
//! more segments) or a single-segment glob supporting `*`, `?` and `[...]`.
//!
//! A node whose path matches is kept together with its whole subtree. A folder
//! that does not match is kept only as a pruned ancestor of some match.

use std::str::FromStr;

use glob::Pattern;

use super::error::ExportError;
use super::tree::{Children, TreeNode};

/// Pattern selecting everything
pub const SELECT_ALL: &str = "*";

#[derive(Debug, Clone)]
enum Segment {
    /// `**`
    Recursive,

    /// Glob matched against exactly one segment name
    Name(Pattern),
}

/// A compiled selection pattern
#[derive(Debug, Clone)]
pub struct SelectionPattern {
    source: String,
    segments: Vec<Segment>,
}

impl SelectionPattern {
    /// Compile a selection pattern
    pub fn parse(pattern: &str) -> Result<Self, ExportError> {
        let invalid = |reason: String| ExportError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        for raw in pattern.trim().split('/').filter(|s| !s.is_empty()) {
            if raw == "**" {
                // Consecutive `**` are equivalent to one
                if !matches!(segments.last(), Some(Segment::Recursive)) {
                    segments.push(Segment::Recursive);
                }
                continue;
            }

            let compiled = Pattern::new(raw).map_err(|e| invalid(e.to_string()))?;
            segments.push(Segment::Name(compiled));
        }

        if segments.is_empty() {
            return Err(invalid("pattern is empty".to_string()));
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// Pattern selecting every top-level node, and therefore the whole tree
    pub fn all() -> Result<Self, ExportError> {
        Self::parse(SELECT_ALL)
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a segment-name path
    pub fn matches<S: AsRef<str>>(&self, path: &[S]) -> bool {
        match_segments(&self.segments, path)
    }
}

impl FromStr for SelectionPattern {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for SelectionPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

fn match_segments<S: AsRef<str>>(pattern: &[Segment], path: &[S]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Recursive, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((Segment::Name(glob), rest)) => match path.split_first() {
            Some((head, tail)) => glob.matches(head.as_ref()) && match_segments(rest, tail),
            None => false,
        },
    }
}

/// Prune `tree` down to the nodes selected by `pattern`.
///
/// The root is always retained; a pattern matching nothing yields an empty
/// root. The input is never modified and `select` is idempotent.
pub fn select(tree: &TreeNode, pattern: &SelectionPattern) -> TreeNode {
    match tree {
        TreeNode::Folder(children) => {
            let mut prefix = Vec::new();
            TreeNode::Folder(select_children(children, pattern, &mut prefix))
        }
        TreeNode::Resource(_) => tree.clone(),
    }
}

fn select_children<'a>(
    children: &'a Children,
    pattern: &SelectionPattern,
    prefix: &mut Vec<&'a str>,
) -> Children {
    let mut selected = Children::new();

    for (name, node) in children {
        prefix.push(name);

        if pattern.matches(prefix.as_slice()) {
            selected.insert(name.clone(), node.clone());
        } else if let TreeNode::Folder(grandchildren) = node {
            let pruned = select_children(grandchildren, pattern, prefix);
            if !pruned.is_empty() {
                selected.insert(name.clone(), TreeNode::Folder(pruned));
            }
        }

        prefix.pop();
    }

    selected
}
