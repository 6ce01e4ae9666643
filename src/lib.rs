pub mod batch;
pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod remote;
pub mod session;

pub use crate::core::{CrawlOptions, crawl, list_directory, list_shares};
pub use error::{ConnectionError, ListError, RemoteFault, TargetParseError};
pub use models::{CrawlResult, EntryKind, NodeKind, ShareEntry, ShareInfo, Target, TreeNode};
pub use session::{Session, SessionConfig, SessionState};
