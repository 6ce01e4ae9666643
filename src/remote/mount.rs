use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::debug;

use crate::error::{ConnectionError, RemoteFault};
use crate::models::{EntryKind, ShareEntry, ShareInfo, ShareKind, Target};

use super::{Connector, Transport};

/// Serves targets whose shares are mounted locally under
/// `<export_root>/<host>/<share>`.
#[derive(Clone, Debug)]
pub struct MountConnector {
    export_root: PathBuf,
}

impl MountConnector {
    pub fn new(export_root: impl Into<PathBuf>) -> Self {
        Self {
            export_root: export_root.into(),
        }
    }
}

#[async_trait]
impl Connector for MountConnector {
    async fn connect(&self, target: &Target) -> Result<Box<dyn Transport>, ConnectionError> {
        let host_dir = self.export_root.join(&target.host);
        debug!(host_dir = %host_dir.display(), credential = %target.credential, "Opening mount");

        let probe_dir = host_dir.clone();
        let probe = task::spawn_blocking(move || -> io::Result<()> {
            let metadata = std::fs::metadata(&probe_dir)?;
            if !metadata.is_dir() {
                return Err(io::Error::new(io::ErrorKind::NotFound, "not a directory"));
            }
            std::fs::read_dir(&probe_dir)?;
            Ok(())
        })
        .await
        .map_err(|err| ConnectionError::Refused {
            target: target.to_string(),
            reason: err.to_string(),
        })?;

        match probe {
            Ok(()) => Ok(Box::new(MountTransport {
                host_dir,
                open: true,
            })),
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                Err(ConnectionError::AuthFailed {
                    target: target.to_string(),
                    reason: err.to_string(),
                })
            }
            Err(err) => Err(ConnectionError::Refused {
                target: target.to_string(),
                reason: err.to_string(),
            }),
        }
    }
}

struct MountTransport {
    host_dir: PathBuf,
    open: bool,
}

impl MountTransport {
    fn ensure_open(&self) -> Result<(), RemoteFault> {
        if self.open {
            Ok(())
        } else {
            Err(RemoteFault::OperationFailed("connection is closed".to_owned()))
        }
    }
}

#[async_trait]
impl Transport for MountTransport {
    async fn enumerate(&self, share: &str, path: &str) -> Result<Vec<ShareEntry>, RemoteFault> {
        self.ensure_open()?;
        let dir = resolve(&self.host_dir, share, path)?;

        task::spawn_blocking(move || read_entries(&dir).map_err(fault_from_io))
            .await
            .map_err(|err| RemoteFault::Other(err.to_string()))?
    }

    async fn shares(&self) -> Result<Vec<ShareInfo>, RemoteFault> {
        self.ensure_open()?;
        let host_dir = self.host_dir.clone();

        task::spawn_blocking(move || {
            let mut shares = Vec::new();
            for entry in std::fs::read_dir(&host_dir)
                .map_err(fault_from_io)?
                .filter_map(|e| e.ok())
            {
                let file_type = match entry.file_type() {
                    Ok(file_type) => file_type,
                    Err(_) => continue,
                };
                let name = entry.file_name().to_string_lossy().into_owned();
                shares.push(ShareInfo {
                    is_special: false,
                    kind: if file_type.is_dir() {
                        ShareKind::DiskTree
                    } else {
                        ShareKind::Device
                    },
                    name,
                });
            }
            Ok(shares)
        })
        .await
        .map_err(|err| RemoteFault::Other(err.to_string()))?
    }

    fn shutdown(&mut self) {
        self.open = false;
    }
}

/// Map a share-relative remote path onto the mount. Both `/` and `\` separate
/// components; `..` is rejected so a listing can never escape its share.
fn resolve(host_dir: &Path, share: &str, path: &str) -> Result<PathBuf, RemoteFault> {
    if share.is_empty() || share == "." || share == ".." || share.contains(['/', '\\']) {
        return Err(RemoteFault::OperationFailed(format!(
            "invalid share name '{share}'"
        )));
    }

    let mut dir = host_dir.join(share);
    for component in path.split(['/', '\\']) {
        match component {
            "" | "." => continue,
            ".." => {
                return Err(RemoteFault::OperationFailed(format!(
                    "malformed path '{path}'"
                )));
            }
            name => dir.push(name),
        }
    }
    Ok(dir)
}

fn read_entries(dir: &Path) -> io::Result<Vec<ShareEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)?.filter_map(|e| e.ok()) {
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(_) => continue,
        };
        let filename = entry.file_name().to_string_lossy().into_owned();

        // Links are reported with their own metadata and never followed.
        if file_type.is_dir() {
            entries.push(ShareEntry {
                filename,
                kind: EntryKind::Directory,
                size: 0,
            });
        } else {
            let size = std::fs::symlink_metadata(entry.path())
                .map(|metadata| metadata.len())
                .unwrap_or(0);
            entries.push(ShareEntry {
                filename,
                kind: EntryKind::File,
                size,
            });
        }
    }
    Ok(entries)
}

fn fault_from_io(err: io::Error) -> RemoteFault {
    match err.kind() {
        io::ErrorKind::TimedOut => RemoteFault::Timeout,
        io::ErrorKind::NotFound
        | io::ErrorKind::PermissionDenied
        | io::ErrorKind::NotADirectory => RemoteFault::OperationFailed(err.to_string()),
        _ => RemoteFault::Other(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn export_with_share(temp: &TempDir) -> PathBuf {
        let share = temp.path().join("fileserver").join("public");
        fs::create_dir_all(share.join("docs")).unwrap();
        fs::write(share.join("a.txt"), vec![0u8; 100]).unwrap();
        fs::write(share.join("docs/b.txt"), vec![0u8; 50]).unwrap();
        share
    }

    #[tokio::test]
    async fn missing_host_is_refused() {
        let temp = TempDir::new().unwrap();
        let connector = MountConnector::new(temp.path());
        let err = connector
            .connect(&Target::new("nowhere"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ConnectionError::Refused { .. }));
    }

    #[tokio::test]
    async fn enumerates_files_with_sizes() {
        let temp = TempDir::new().unwrap();
        export_with_share(&temp);
        let connector = MountConnector::new(temp.path());
        let transport = connector.connect(&Target::new("fileserver")).await.unwrap();

        let mut entries = transport.enumerate("public", "/").await.unwrap();
        entries.sort_by(|a, b| a.filename.cmp(&b.filename));
        assert_eq!(
            entries,
            vec![ShareEntry::file("a.txt", 100), ShareEntry::directory("docs")]
        );

        let entries = transport.enumerate("public", "/docs/").await.unwrap();
        assert_eq!(entries, vec![ShareEntry::file("b.txt", 50)]);
    }

    #[tokio::test]
    async fn rejects_parent_components_and_missing_dirs() {
        let temp = TempDir::new().unwrap();
        export_with_share(&temp);
        let connector = MountConnector::new(temp.path());
        let transport = connector.connect(&Target::new("fileserver")).await.unwrap();

        assert!(matches!(
            transport.enumerate("public", "/../../").await,
            Err(RemoteFault::OperationFailed(_))
        ));
        assert!(matches!(
            transport.enumerate("public", "/missing/").await,
            Err(RemoteFault::OperationFailed(_))
        ));
        assert!(matches!(
            transport.enumerate("../public", "/").await,
            Err(RemoteFault::OperationFailed(_))
        ));
    }

    #[tokio::test]
    async fn shutdown_rejects_further_calls() {
        let temp = TempDir::new().unwrap();
        export_with_share(&temp);
        let connector = MountConnector::new(temp.path());
        let mut transport = connector.connect(&Target::new("fileserver")).await.unwrap();

        transport.shutdown();
        assert!(transport.enumerate("public", "/").await.is_err());
        assert!(transport.shares().await.is_err());
    }

    #[tokio::test]
    async fn shares_are_host_subdirectories() {
        let temp = TempDir::new().unwrap();
        export_with_share(&temp);
        fs::write(temp.path().join("fileserver/readme"), "x").unwrap();
        let connector = MountConnector::new(temp.path());
        let transport = connector.connect(&Target::new("fileserver")).await.unwrap();

        let mut shares = transport.shares().await.unwrap();
        shares.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0], ShareInfo::disk("public"));
        assert_eq!(shares[1].kind, ShareKind::Device);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_host_fails_authentication() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        export_with_share(&temp);
        let host_dir = temp.path().join("fileserver");
        fs::set_permissions(&host_dir, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root; nothing to observe then.
        if fs::read_dir(&host_dir).is_ok() {
            fs::set_permissions(&host_dir, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let connector = MountConnector::new(temp.path());
        let result = connector.connect(&Target::new("fileserver")).await;
        fs::set_permissions(&host_dir, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result.err(), Some(ConnectionError::AuthFailed { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_loops_are_files_and_crawl_terminates() {
        use crate::core::{CrawlOptions, crawl};
        use crate::models::TreeNode;
        use crate::session::{Session, SessionConfig};

        let temp = TempDir::new().unwrap();
        let share = export_with_share(&temp);
        std::os::unix::fs::symlink(&share, share.join("docs/loop")).unwrap();
        let link_size = fs::symlink_metadata(share.join("docs/loop")).unwrap().len();

        let connector = MountConnector::new(temp.path());
        let transport = connector.connect(&Target::new("fileserver")).await.unwrap();
        let mut entries = transport.enumerate("public", "/docs/").await.unwrap();
        entries.sort_by(|a, b| a.filename.cmp(&b.filename));
        assert_eq!(
            entries,
            vec![
                ShareEntry::file("b.txt", 50),
                ShareEntry::file("loop", link_size),
            ]
        );

        let session = Session::open(&connector, Target::new("fileserver"), SessionConfig::default())
            .await
            .unwrap();
        let result = crawl(&session, "public", "/", &CrawlOptions::default()).await;

        let docs = result
            .root
            .iter()
            .find(|node| node.filename == "docs")
            .unwrap();
        assert_eq!(docs.size, 50 + link_size);
        assert!(
            docs.children()
                .unwrap()
                .contains(&TreeNode::file("loop", link_size))
        );
        assert_eq!(result.total_size, 150 + link_size);
        assert_eq!(result.failed_branches, 0);
    }
}
