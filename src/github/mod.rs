//! GitHub API operations using octocrab.

pub mod auth;
pub mod host;
pub mod remote;
pub mod retry;

pub use auth::get_github_token;
pub use host::{GitHubHost, NewRelease, ReleaseHost};
pub use remote::parse_github_remote;
