mod entry;
mod target;
mod tree;

pub use entry::{EntryKind, ShareEntry, ShareInfo, ShareKind};
pub use target::{DEFAULT_CREDENTIAL, DEFAULT_PORT, Target};
pub use tree::{CrawlResult, NodeKind, TreeNode};
