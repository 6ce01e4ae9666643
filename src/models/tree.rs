use serde::Serialize;
use serde::ser::SerializeStruct;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeKind {
    File,
    Directory { children: Vec<TreeNode> },
}

/// One path segment of a crawl result.
///
/// Directory sizes are the sum of their children's sizes, saturating at
/// `u64::MAX`; the constructors are the only way the crawler builds nodes, so
/// that holds by construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeNode {
    pub filename: String,
    pub size: u64,
    pub kind: NodeKind,
}

impl TreeNode {
    pub fn file(filename: impl Into<String>, size: u64) -> Self {
        Self {
            filename: filename.into(),
            size,
            kind: NodeKind::File,
        }
    }

    pub fn directory(filename: impl Into<String>, children: Vec<TreeNode>) -> Self {
        let size = children
            .iter()
            .fold(0u64, |total, child| total.saturating_add(child.size));
        Self {
            filename: filename.into(),
            size,
            kind: NodeKind::Directory { children },
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn children(&self) -> Option<&[TreeNode]> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File => None,
        }
    }
}

impl Serialize for TreeNode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.is_directory() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("TreeNode", len)?;
        state.serialize_field("filename", &self.filename)?;
        state.serialize_field("directory", &self.is_directory())?;
        state.serialize_field("size", &self.size)?;
        if let NodeKind::Directory { children } = &self.kind {
            state.serialize_field("children", children)?;
        }
        state.end()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CrawlResult {
    pub root: Vec<TreeNode>,
    pub total_size: u64,
    /// Branches whose enumeration failed and were emitted empty.
    pub failed_branches: usize,
    /// Branches skipped because of cancellation or the depth limit.
    pub pruned_branches: usize,
}
