use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use sharetree::cli::{self, CrawlCli};
use sharetree::core::write_tree;
use sharetree::{CrawlOptions, Session, crawl};
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let cli: CrawlCli = match cli::parse_or_exit() {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    cli::setup_logging(cli.connect.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("crawl-tool: {err}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: CrawlCli) -> Result<()> {
    let connector = cli.connect.connector();
    let mut session =
        Session::open(&connector, cli.target.clone(), cli.connect.session_config()).await?;

    let options = CrawlOptions {
        max_depth: cli.max_depth.map(|depth| depth as usize),
        ..CrawlOptions::default()
    };
    let deadline = cli.timeout.map(|secs| {
        let cancel = options.cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            cancel.cancel();
        })
    });

    let result = crawl(&session, &cli.share, &cli.path, &options).await;
    session.close();
    if let Some(deadline) = deadline {
        deadline.abort();
    }

    info!(
        remote = %cli.target,
        share = %cli.share,
        total_size = result.total_size,
        "Writing tree"
    );

    let mut stdout = io::stdout().lock();
    write_tree(&mut stdout, &result.root, cli::json_style(cli.pretty))?;
    stdout.flush()?;
    Ok(())
}
