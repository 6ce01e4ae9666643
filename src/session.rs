use std::time::Duration;

use tokio::time;
use tracing::debug;

use crate::error::ConnectionError;
use crate::models::Target;
use crate::remote::{Connector, Transport};

/// Lifecycle of a session. `open` either yields a `Connected` session or an
/// error, so a `Session` value is only ever `Connected` or `Closed`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    Connected,
    Closed,
}

/// Timeouts applied to a session's connection and to each remote call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SessionConfig {
    pub connect_timeout: Duration,
    pub call_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            call_timeout: Duration::from_secs(30),
        }
    }
}

/// Exclusive owner of one live connection to a target.
///
/// The connection is released by `close()` or, failing that, on drop, so
/// every exit path of a crawl gives it back.
pub struct Session {
    target: Target,
    config: SessionConfig,
    state: SessionState,
    transport: Option<Box<dyn Transport>>,
}

impl Session {
    /// Connect and authenticate. Never retries.
    pub async fn open(
        connector: &dyn Connector,
        target: Target,
        config: SessionConfig,
    ) -> Result<Self, ConnectionError> {
        debug!(remote = %target, "Connecting");

        let connected = time::timeout(config.connect_timeout, connector.connect(&target))
            .await
            .unwrap_or_else(|_| {
                Err(ConnectionError::Timeout {
                    target: target.to_string(),
                })
            });

        match connected {
            Ok(transport) => {
                debug!(remote = %target, "Session established");
                Ok(Self {
                    target,
                    config,
                    state: SessionState::Connected,
                    transport: Some(transport),
                })
            }
            Err(err) => {
                // The caller reports the error; keep stderr to that one line.
                debug!(remote = %target, error = %err, "Session failed");
                Err(err)
            }
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn call_timeout(&self) -> Duration {
        self.config.call_timeout
    }

    /// The live connection, or `None` once closed.
    pub fn transport(&self) -> Option<&dyn Transport> {
        self.transport.as_deref()
    }

    pub fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.shutdown();
            self.state = SessionState::Closed;
            debug!(remote = %self.target, state = ?self.state, "Session closed");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockConnector;

    fn quick() -> SessionConfig {
        SessionConfig {
            connect_timeout: Duration::from_millis(50),
            call_timeout: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn open_connects_once() {
        let connector = MockConnector::default();
        let session = Session::open(&connector, Target::new("host"), quick())
            .await
            .unwrap();
        assert_eq!(session.state(), SessionState::Connected);
        assert_eq!(session.target().host, "host");
        assert_eq!(connector.connects(), 1);
    }

    #[tokio::test]
    async fn refused_connection_is_surfaced() {
        let connector = MockConnector::default();
        let refused = ConnectionError::Refused {
            target: "host:445".to_owned(),
            reason: "connection refused".to_owned(),
        };
        connector.fail_connect(refused.clone());

        let err = Session::open(&connector, Target::new("host"), quick())
            .await
            .err()
            .unwrap();
        assert_eq!(err, refused);
        assert_eq!(connector.shutdowns(), 0);
    }

    #[tokio::test]
    async fn slow_connect_times_out() {
        let connector = MockConnector::default();
        connector.hang_connect();

        let err = Session::open(&connector, Target::new("host"), quick())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ConnectionError::Timeout { .. }));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let connector = MockConnector::default();
        let mut session = Session::open(&connector, Target::new("host"), quick())
            .await
            .unwrap();

        session.close();
        session.close();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.transport().is_none());

        drop(session);
        assert_eq!(connector.shutdowns(), 1);
    }

    #[tokio::test]
    async fn drop_releases_connection() {
        let connector = MockConnector::default();
        {
            let _session = Session::open(&connector, Target::new("host"), quick())
                .await
                .unwrap();
        }
        assert_eq!(connector.shutdowns(), 1);
    }
}
