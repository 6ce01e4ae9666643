use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::error::{ConnectionError, RemoteFault};
use crate::models::{ShareEntry, ShareInfo, Target};

use super::{Connector, Transport};

#[derive(Clone, Debug)]
enum Response {
    Ok(Vec<ShareEntry>),
    Err(RemoteFault),
    Hang,
}

#[derive(Clone, Debug, Default)]
enum ConnectBehavior {
    #[default]
    Accept,
    Fail(ConnectionError),
    Hang,
}

/// Scripted connector for tests. Every transport it opens shares the same
/// responses and call log.
#[derive(Clone, Default)]
pub struct MockConnector {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    connect: ConnectBehavior,
    responses: HashMap<String, Response>,
    shares: Vec<ShareInfo>,
    cancel_after: HashMap<String, CancellationToken>,
    calls: Vec<String>,
    connects: usize,
    shutdowns: usize,
}

impl MockConnector {
    pub fn set_dir_entries(&self, path: impl Into<String>, entries: Vec<ShareEntry>) {
        let mut inner = self.inner.lock().expect("mock connector lock");
        inner.responses.insert(path.into(), Response::Ok(entries));
    }

    pub fn set_error(&self, path: impl Into<String>, fault: RemoteFault) {
        let mut inner = self.inner.lock().expect("mock connector lock");
        inner.responses.insert(path.into(), Response::Err(fault));
    }

    pub fn set_hang(&self, path: impl Into<String>) {
        let mut inner = self.inner.lock().expect("mock connector lock");
        inner.responses.insert(path.into(), Response::Hang);
    }

    /// Cancel `token` once `path` has been enumerated.
    pub fn cancel_after(&self, path: impl Into<String>, token: CancellationToken) {
        let mut inner = self.inner.lock().expect("mock connector lock");
        inner.cancel_after.insert(path.into(), token);
    }

    pub fn set_shares(&self, shares: Vec<ShareInfo>) {
        let mut inner = self.inner.lock().expect("mock connector lock");
        inner.shares = shares;
    }

    pub fn fail_connect(&self, err: ConnectionError) {
        let mut inner = self.inner.lock().expect("mock connector lock");
        inner.connect = ConnectBehavior::Fail(err);
    }

    pub fn hang_connect(&self) {
        let mut inner = self.inner.lock().expect("mock connector lock");
        inner.connect = ConnectBehavior::Hang;
    }

    /// Paths passed to `enumerate`, in call order.
    pub fn calls(&self) -> Vec<String> {
        let inner = self.inner.lock().expect("mock connector lock");
        inner.calls.clone()
    }

    pub fn connects(&self) -> usize {
        self.inner.lock().expect("mock connector lock").connects
    }

    pub fn shutdowns(&self) -> usize {
        self.inner.lock().expect("mock connector lock").shutdowns
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, _target: &Target) -> Result<Box<dyn Transport>, ConnectionError> {
        let behavior = {
            let mut inner = self.inner.lock().expect("mock connector lock");
            inner.connects += 1;
            inner.connect.clone()
        };

        match behavior {
            ConnectBehavior::Accept => Ok(Box::new(MockTransport {
                inner: Arc::clone(&self.inner),
            })),
            ConnectBehavior::Fail(err) => Err(err),
            ConnectBehavior::Hang => std::future::pending().await,
        }
    }
}

struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

#[async_trait]
impl Transport for MockTransport {
    async fn enumerate(&self, _share: &str, path: &str) -> Result<Vec<ShareEntry>, RemoteFault> {
        let response = {
            let mut inner = self.inner.lock().expect("mock connector lock");
            inner.calls.push(path.to_owned());
            if let Some(token) = inner.cancel_after.get(path) {
                token.cancel();
            }
            inner.responses.get(path).cloned()
        };

        match response {
            Some(Response::Ok(entries)) => Ok(entries),
            Some(Response::Err(fault)) => Err(fault),
            Some(Response::Hang) => std::future::pending().await,
            None => Err(RemoteFault::OperationFailed(format!(
                "no mock response for {path}"
            ))),
        }
    }

    async fn shares(&self) -> Result<Vec<ShareInfo>, RemoteFault> {
        let inner = self.inner.lock().expect("mock connector lock");
        Ok(inner.shares.clone())
    }

    fn shutdown(&mut self) {
        let mut inner = self.inner.lock().expect("mock connector lock");
        inner.shutdowns += 1;
    }
}
