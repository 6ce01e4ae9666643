use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use sharetree::batch::{list_shares_once, run_shares_batch};
use sharetree::cli::{self, ListSharesCli};
use sharetree::core::{JsonStyle, write_shares};
use tokio::io::BufReader;
use tracing::warn;

#[tokio::main]
async fn main() -> ExitCode {
    let cli: ListSharesCli = match cli::parse_or_exit() {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    cli::setup_logging(cli.connect.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("list-shares: {err:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: ListSharesCli) -> Result<()> {
    let connector = cli.connect.connector();
    let config = cli.connect.session_config();

    if cli.batch {
        let stdin = BufReader::new(tokio::io::stdin());
        return run_shares_batch(&connector, config, stdin, &mut io::stdout()).await;
    }

    let Some(target) = cli.target else {
        anyhow::bail!("target is required");
    };

    // An unreachable host simply has no shares.
    let remote = target.to_string();
    let shares = list_shares_once(&connector, config, target)
        .await
        .unwrap_or_else(|err| {
            warn!(remote = %remote, error = %err, "Share listing failed");
            Vec::new()
        });

    let mut stdout = io::stdout().lock();
    write_shares(&mut stdout, &shares, JsonStyle::Compact)?;
    stdout.flush()?;
    Ok(())
}
