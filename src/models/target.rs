use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::TargetParseError;

/// Well-known port of the file-sharing service.
pub const DEFAULT_PORT: u16 = 445;

/// Anonymous login, used when the target string names no credential.
pub const DEFAULT_CREDENTIAL: &str = "guest";

// Matches: [credential@]host[:port]
static TARGET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([^@\s]+)@)?([A-Za-z0-9._-]+)(?::(\d+))?$").expect("Invalid target regex")
});

/// The remote endpoint a session is opened against.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub credential: String,
}

impl Target {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            credential: DEFAULT_CREDENTIAL.to_owned(),
        }
    }
}

impl FromStr for Target {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = TARGET_REGEX
            .captures(s.trim())
            .ok_or_else(|| TargetParseError::Syntax(s.to_owned()))?;

        let host = caps[2].to_owned();
        if host == "." || host == ".." {
            return Err(TargetParseError::Syntax(s.to_owned()));
        }

        let port = match caps.get(3) {
            Some(port) => port
                .as_str()
                .parse::<u16>()
                .ok()
                .filter(|port| *port != 0)
                .ok_or_else(|| TargetParseError::Port(port.as_str().to_owned()))?,
            None => DEFAULT_PORT,
        };

        let credential = caps
            .get(1)
            .map(|m| m.as_str().to_owned())
            .unwrap_or_else(|| DEFAULT_CREDENTIAL.to_owned());

        Ok(Self {
            host,
            port,
            credential,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
