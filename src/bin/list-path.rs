use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use sharetree::batch::{list_path_once, run_path_batch};
use sharetree::cli::{self, ListPathCli};
use sharetree::core::write_listing;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> ExitCode {
    let cli: ListPathCli = match cli::parse_or_exit() {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    cli::setup_logging(cli.connect.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("list-path: {err:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: ListPathCli) -> Result<()> {
    let connector = cli.connect.connector();
    let config = cli.connect.session_config();

    if cli.batch {
        let stdin = BufReader::new(tokio::io::stdin());
        return run_path_batch(&connector, config, stdin, &mut io::stdout()).await;
    }

    let (Some(target), Some(share), Some(path)) = (cli.target, cli.share, cli.path) else {
        anyhow::bail!("target, share and path are required");
    };
    let entries = list_path_once(&connector, config, target, &share, &path)
        .await
        .with_context(|| format!("{share}:{path}"))?;

    let mut stdout = io::stdout().lock();
    write_listing(&mut stdout, &entries, cli::json_style(cli.pretty))?;
    stdout.flush()?;
    Ok(())
}
