use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::list::list_directory;
use crate::models::{CrawlResult, EntryKind, ShareEntry, TreeNode};
use crate::session::Session;

/// Configuration options for a crawl.
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// Number of directory levels to enumerate, counting the root as one
    /// (None means unlimited). Deeper directories are emitted empty.
    pub max_depth: Option<usize>,
    /// Checked before every enumeration call; once cancelled, the remaining
    /// directories are emitted empty.
    pub cancel: CancellationToken,
}

/// One directory level being built.
struct Frame {
    filename: String,
    path: String,
    depth: usize,
    pending: std::vec::IntoIter<ShareEntry>,
    nodes: Vec<TreeNode>,
    total: u64,
}

#[derive(Default)]
struct Counters {
    failed: usize,
    pruned: usize,
}

/// Crawl `share` depth-first from `root_path`.
///
/// Uses the one session for every listing. A directory whose listing fails
/// becomes an empty, zero-size node; the rest of the tree is still built.
/// Traversal state lives on an explicit stack, so depth is bounded by heap,
/// not by the call stack.
pub async fn crawl(
    session: &Session,
    share: &str,
    root_path: &str,
    options: &CrawlOptions,
) -> CrawlResult {
    let root_path = normalize_root(root_path);
    let mut counters = Counters::default();

    let root = open_frame(
        session,
        share,
        String::new(),
        root_path,
        0,
        options,
        &mut counters,
    )
    .await;
    let mut stack = vec![root];

    while let Some(frame) = stack.last_mut() {
        let Some(entry) = frame.pending.next() else {
            let Some(finished) = stack.pop() else { break };

            match stack.last_mut() {
                Some(parent) => {
                    parent.total = parent.total.saturating_add(finished.total);
                    parent
                        .nodes
                        .push(TreeNode::directory(finished.filename, finished.nodes));
                }
                None => {
                    info!(
                        share,
                        total_size = finished.total,
                        failed_branches = counters.failed,
                        pruned_branches = counters.pruned,
                        "Crawl complete"
                    );
                    return CrawlResult {
                        root: finished.nodes,
                        total_size: finished.total,
                        failed_branches: counters.failed,
                        pruned_branches: counters.pruned,
                    };
                }
            }
            continue;
        };

        match entry.kind {
            EntryKind::File => {
                frame.total = frame.total.saturating_add(entry.size);
                frame.nodes.push(TreeNode::file(entry.filename, entry.size));
            }
            EntryKind::Directory => {
                let child_path = format!("{}{}/", frame.path, entry.filename);
                let depth = frame.depth + 1;
                let child = open_frame(
                    session,
                    share,
                    entry.filename,
                    child_path,
                    depth,
                    options,
                    &mut counters,
                )
                .await;
                stack.push(child);
            }
        }
    }

    CrawlResult::default()
}

/// List a directory and turn it into a frame with its entries pending.
/// Failures, cancellation and the depth limit all yield a frame with nothing
/// pending.
async fn open_frame(
    session: &Session,
    share: &str,
    filename: String,
    path: String,
    depth: usize,
    options: &CrawlOptions,
    counters: &mut Counters,
) -> Frame {
    let entries = if options.cancel.is_cancelled() {
        debug!(path = %path, "Crawl cancelled, skipping branch");
        counters.pruned += 1;
        Vec::new()
    } else if options.max_depth.is_some_and(|max| depth >= max) {
        debug!(path = %path, depth, "Depth limit reached, skipping branch");
        counters.pruned += 1;
        Vec::new()
    } else {
        match list_directory(session, share, &path).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(share, path = %path, error = %err, "Listing failed, branch left empty");
                counters.failed += 1;
                Vec::new()
            }
        }
    };

    Frame {
        filename,
        path,
        depth,
        pending: entries.into_iter(),
        nodes: Vec::new(),
        total: 0,
    }
}

/// Root paths always start and end with `/` so children can be appended.
fn normalize_root(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{trimmed}/")
    }
}
