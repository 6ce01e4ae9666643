//! Error types for sharetree
//!
//! Connection failures are fatal to a crawl; listing failures are absorbed
//! per branch by the crawler and never surface past it.

use thiserror::Error;

/// Failure to establish a session with a target.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("{target} refused connection: {reason}")]
    Refused { target: String, reason: String },

    #[error("authentication failed for {target}: {reason}")]
    AuthFailed { target: String, reason: String },

    #[error("timed out connecting to {target}")]
    Timeout { target: String },
}

/// Failure of a single enumeration call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// Protocol-level rejection: permission denied, malformed path, missing share.
    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("no response within the call timeout")]
    Timeout,
}

/// Raw fault reported by a transport, before normalization by the lister.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteFault {
    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("remote call timed out")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

impl From<RemoteFault> for ListError {
    fn from(fault: RemoteFault) -> Self {
        match fault {
            RemoteFault::Timeout => ListError::Timeout,
            RemoteFault::OperationFailed(reason) | RemoteFault::Other(reason) => {
                ListError::OperationFailed(reason)
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("invalid target '{0}': expected [credential@]host[:port]")]
    Syntax(String),

    #[error("invalid port '{0}': expected 1-65535")]
    Port(String),
}
