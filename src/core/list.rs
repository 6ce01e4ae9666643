use tokio::time;

use crate::error::ListError;
use crate::models::ShareEntry;
use crate::session::Session;

/// List one directory of `share`. Issues exactly one enumeration call; never
/// recurses or retries. `.` and `..` are removed from the result.
pub async fn list_directory(
    session: &Session,
    share: &str,
    path: &str,
) -> Result<Vec<ShareEntry>, ListError> {
    let transport = session.transport().ok_or_else(closed)?;

    let entries = time::timeout(session.call_timeout(), transport.enumerate(share, path))
        .await
        .map_err(|_| ListError::Timeout)??;

    Ok(entries
        .into_iter()
        .filter(|entry| !entry.is_dot_entry())
        .collect())
}

/// Names of the browsable disk shares on the session's target, in the order
/// the host advertised them.
pub async fn list_shares(session: &Session) -> Result<Vec<String>, ListError> {
    let transport = session.transport().ok_or_else(closed)?;

    let shares = time::timeout(session.call_timeout(), transport.shares())
        .await
        .map_err(|_| ListError::Timeout)??;

    Ok(shares
        .into_iter()
        .filter(|share| share.is_browsable())
        .map(|share| share.name)
        .collect())
}

fn closed() -> ListError {
    ListError::OperationFailed("session is closed".to_owned())
}
