//! Exponential backoff for GitHub API calls.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use tracing::warn;

use crate::error::GitHubError;

/// 3 total attempts, base 1s, max 30s.
pub const MAX_ATTEMPTS: u32 = 3;
const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 30;

impl GitHubError {
    /// Whether another attempt may succeed.
    ///
    /// Rate limits, server errors and transport failures are transient.
    /// Any other API response (422, 403, ...) will fail the same way again.
    pub fn is_transient(&self) -> bool {
        match self {
            GitHubError::RateLimited => true,
            GitHubError::Api(e) => match e.as_ref() {
                octocrab::Error::GitHub { source, .. } => {
                    source.status_code.is_server_error()
                        || source.status_code.as_u16() == 429
                }
                octocrab::Error::Hyper { .. } | octocrab::Error::Service { .. } => true,
                _ => false,
            },
            _ => false,
        }
    }
}

/// Retry a GitHub call with exponential backoff.
///
/// Errors that are not transient are returned immediately. When all
/// attempts fail, the last error is wrapped in
/// [`GitHubError::RetriesExhausted`].
pub async fn retry_with_backoff<T, Fut, F>(operation: &str, mut attempt: F) -> Result<T, GitHubError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GitHubError>>,
{
    let mut backoff = ExponentialBackoff {
        initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
        max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
        max_elapsed_time: None,
        ..Default::default()
    };

    let mut attempts = 0;
    loop {
        attempts += 1;

        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) if attempts >= MAX_ATTEMPTS => {
                return Err(GitHubError::RetriesExhausted(Box::new(e)));
            }
            Err(e) => {
                warn!("{} failed (attempt {}/{}): {}", operation, attempts, MAX_ATTEMPTS, e);
                if let Some(wait_duration) = backoff.next_backoff() {
                    tokio::time::sleep(wait_duration).await;
                }
            }
        }
    }
}
