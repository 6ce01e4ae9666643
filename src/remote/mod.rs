mod mount;

#[cfg(test)]
mod mock;

pub use mount::MountConnector;

#[cfg(test)]
pub use mock::MockConnector;

use async_trait::async_trait;

use crate::error::{ConnectionError, RemoteFault};
use crate::models::{ShareEntry, ShareInfo, Target};

/// Opens live connections to targets.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, target: &Target) -> Result<Box<dyn Transport>, ConnectionError>;
}

/// One live connection. Enumeration results are raw: they may include `.`
/// and `..`, and faults are not yet normalized.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn enumerate(&self, share: &str, path: &str) -> Result<Vec<ShareEntry>, RemoteFault>;

    async fn shares(&self) -> Result<Vec<ShareInfo>, RemoteFault>;

    fn shutdown(&mut self);
}
