use clap::{Args, Parser};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::core::JsonStyle;
use crate::models::Target;
use crate::remote::MountConnector;
use crate::session::SessionConfig;

/// Connection options shared by every binary.
#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// Directory holding one mount per host, each with one subdirectory per share
    #[arg(
        long,
        env = "SHARETREE_EXPORT_ROOT",
        default_value = "/mnt/shares",
        value_name = "DIR"
    )]
    pub export_root: PathBuf,

    /// Seconds to wait for a connection
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub connect_timeout: u64,

    /// Seconds to wait for each listing call
    #[arg(long, default_value_t = 30, value_name = "SECS")]
    pub call_timeout: u64,

    /// Verbose logging on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl ConnectArgs {
    pub fn connector(&self) -> MountConnector {
        MountConnector::new(&self.export_root)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout),
            call_timeout: Duration::from_secs(self.call_timeout),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "crawl-tool", version)]
#[command(
    about = "Crawl a share recursively and print its tree with aggregated sizes as JSON",
    long_about = None
)]
pub struct CrawlCli {
    /// Remote target: [credential@]host[:port]
    pub target: Target,

    /// Share to crawl
    pub share: String,

    /// Directory to start from
    #[arg(default_value = "/")]
    pub path: String,

    /// Enumerate at most this many directory levels
    #[arg(
        short = 'L',
        long,
        value_name = "LEVEL",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_depth: Option<u64>,

    /// Stop descending after this many seconds; unvisited branches are left empty
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Parser, Debug)]
#[command(name = "list-path", version)]
#[command(about = "List a single directory of a share as JSON", long_about = None)]
pub struct ListPathCli {
    /// Remote target: [credential@]host[:port]
    #[arg(required_unless_present = "batch")]
    pub target: Option<Target>,

    /// Share to list
    #[arg(required_unless_present = "batch")]
    pub share: Option<String>,

    /// Directory to list
    #[arg(required_unless_present = "batch")]
    pub path: Option<String>,

    /// Read "<id> <target> '<share>' '<path>'" requests from stdin, one per line
    #[arg(long, conflicts_with_all = ["target", "share", "path"])]
    pub batch: bool,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Parser, Debug)]
#[command(name = "list-shares", version)]
#[command(about = "List the browsable disk shares of a target as JSON", long_about = None)]
pub struct ListSharesCli {
    /// Remote target: [credential@]host[:port]
    #[arg(required_unless_present = "batch")]
    pub target: Option<Target>,

    /// Read one target per line from stdin
    #[arg(long, conflicts_with = "target")]
    pub batch: bool,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

pub fn json_style(pretty: bool) -> JsonStyle {
    if pretty {
        JsonStyle::Pretty
    } else {
        JsonStyle::Compact
    }
}

/// Parse arguments, exiting with status 1 on usage errors (0 for help and version).
pub fn parse_or_exit<P: Parser>() -> Result<P, ExitCode> {
    P::try_parse().map_err(|err| {
        let _ = err.print();
        if err.use_stderr() {
            ExitCode::from(1)
        } else {
            ExitCode::SUCCESS
        }
    })
}

/// Logs go to stderr; stdout is reserved for JSON. `RUST_LOG` overrides.
pub fn setup_logging(verbose: bool) {
    let default = if verbose {
        "sharetree=debug,warn"
    } else {
        "sharetree=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
