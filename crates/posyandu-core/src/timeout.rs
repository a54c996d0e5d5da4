//! Upper bound for calls into remote stores.

use std::future::Future;
use std::time::Duration;

/// A remote call did not resolve within its limit.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{operation} timed out after {limit:?}")]
pub struct Elapsed {
    pub operation: &'static str,
    pub limit: Duration,
}

/// Run `fut` for at most `limit`. The inner output is returned untouched.
pub async fn bounded<F>(operation: &'static str, limit: Duration, fut: F) -> Result<F::Output, Elapsed>
where
    F: Future,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| Elapsed { operation, limit })
}
