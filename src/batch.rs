//! Line-oriented drivers: read one request per line, answer with one JSON
//! object per line. Every request gets its own session, and a failed request
//! answers with an empty result instead of stopping the batch.

use std::io::Write;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::core::{JsonStyle, list_directory, list_shares, write_json};
use crate::models::{ShareEntry, Target};
use crate::remote::Connector;
use crate::session::{Session, SessionConfig};

/// A parsed `<id> <target> '<share>' '<path>'` request line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathRequest {
    pub id: String,
    pub target: String,
    pub share: String,
    pub path: String,
}

#[derive(Serialize)]
struct PathResponse<'a> {
    id: &'a str,
    data: &'a [ShareEntry],
}

#[derive(Serialize)]
struct SharesResponse<'a> {
    hostname: &'a str,
    shares: &'a [String],
}

impl PathRequest {
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let id = fields.next()?.to_owned();
        let target = fields.next()?.to_owned();
        let share = unquote(fields.next()?).to_owned();
        let path = unquote(fields.next()?).to_owned();

        Some(Self {
            id,
            target,
            share,
            path,
        })
    }
}

/// Strip one pair of matching single or double quotes.
fn unquote(field: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = field
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    field
}

pub async fn list_path_once(
    connector: &dyn Connector,
    config: SessionConfig,
    target: Target,
    share: &str,
    path: &str,
) -> anyhow::Result<Vec<ShareEntry>> {
    let mut session = Session::open(connector, target, config).await?;
    let entries = list_directory(&session, share, path).await;
    session.close();
    Ok(entries?)
}

pub async fn list_shares_once(
    connector: &dyn Connector,
    config: SessionConfig,
    target: Target,
) -> anyhow::Result<Vec<String>> {
    let mut session = Session::open(connector, target, config).await?;
    let shares = list_shares(&session).await;
    session.close();
    Ok(shares?)
}

pub async fn run_path_batch<R, W>(
    connector: &dyn Connector,
    config: SessionConfig,
    reader: R,
    writer: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let (id, data) = match PathRequest::parse(&line) {
            Some(request) => {
                let data = match request.target.parse::<Target>() {
                    Ok(target) => {
                        list_path_once(connector, config, target, &request.share, &request.path)
                            .await
                    }
                    Err(err) => Err(err.into()),
                }
                .unwrap_or_else(|err| {
                    warn!(id = %request.id, error = %err, "Listing request failed");
                    Vec::new()
                });
                (request.id, data)
            }
            None => {
                warn!(line = %line, "Malformed listing request");
                let id = line.split_whitespace().next().unwrap_or_default().to_owned();
                (id, Vec::new())
            }
        };

        write_json(writer, &PathResponse { id: &id, data: &data }, JsonStyle::Compact)?;
        writer.flush()?;
    }
    Ok(())
}

pub async fn run_shares_batch<R, W>(
    connector: &dyn Connector,
    config: SessionConfig,
    reader: R,
    writer: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let hostname = line.trim();
        if hostname.is_empty() {
            continue;
        }

        let shares = match hostname.parse::<Target>() {
            Ok(target) => list_shares_once(connector, config, target).await,
            Err(err) => Err(err.into()),
        }
        .unwrap_or_else(|err| {
            warn!(hostname, error = %err, "Share request failed");
            Vec::new()
        });

        write_json(
            writer,
            &SharesResponse {
                hostname,
                shares: &shares,
            },
            JsonStyle::Compact,
        )?;
        writer.flush()?;
    }
    Ok(())
}
