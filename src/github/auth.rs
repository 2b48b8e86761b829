//! GitHub token discovery.
//!
//! Lookup order:
//! 1. `GITHUB_TOKEN` environment variable (set by most CI runners)
//! 2. `GH_TOKEN` environment variable
//! 3. `gh auth token` from an authenticated gh CLI

use std::env;
use std::process::Command;

use tracing::debug;

use crate::error::GitHubError;

const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Get a GitHub token from the environment or the gh CLI.
pub fn get_github_token() -> Result<String, GitHubError> {
    if let Some(token) = get_token_from_env() {
        return Ok(token);
    }

    if let Some(token) = get_token_from_gh_cli() {
        debug!("Using GitHub token from gh CLI");
        return Ok(token);
    }

    Err(GitHubError::AuthenticationFailed)
}

fn get_token_from_env() -> Option<String> {
    TOKEN_VARS.iter().find_map(|var| {
        let token = env::var(var).ok()?;
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        debug!("Using GitHub token from {}", var);
        Some(token.to_string())
    })
}

fn get_token_from_gh_cli() -> Option<String> {
    which::which("gh").ok()?;

    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_github_token_preferred() {
        temp_env::with_vars(
            [("GITHUB_TOKEN", Some("ghs_first")), ("GH_TOKEN", Some("ghs_second"))],
            || {
                assert_eq!(get_github_token().unwrap(), "ghs_first");
            },
        );
    }

    #[test]
    #[serial]
    fn test_gh_token_fallback() {
        temp_env::with_vars(
            [("GITHUB_TOKEN", Some("  ")), ("GH_TOKEN", Some("ghs_second\n"))],
            || {
                assert_eq!(get_github_token().unwrap(), "ghs_second");
            },
        );
    }

    #[test]
    #[serial]
    fn test_no_token_in_env() {
        temp_env::with_vars_unset(["GITHUB_TOKEN", "GH_TOKEN"], || {
            assert!(get_token_from_env().is_none());
        });
    }
}
