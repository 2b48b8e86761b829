//! Pull requests and releases on GitHub.

use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::params::State;
use tracing::info;

use crate::error::GitHubError;

use super::retry::retry_with_backoff;

/// A GitHub release to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelease {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub prerelease: bool,
}

/// Hosting service operations needed by the release workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseHost: Send + Sync {
    /// Number of the open pull request from `head` into `base`, if any.
    async fn find_open_pull_request(&self, head: &str, base: &str)
    -> Result<Option<u64>, GitHubError>;

    /// Open a pull request and return its number.
    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<u64, GitHubError>;

    /// Replace the title and body of an existing pull request.
    async fn update_pull_request(
        &self,
        number: u64,
        title: &str,
        body: &str,
    ) -> Result<(), GitHubError>;

    async fn create_release(&self, release: &NewRelease) -> Result<(), GitHubError>;
}

/// [`ReleaseHost`] for one GitHub repository, backed by octocrab.
pub struct GitHubHost {
    client: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubHost {
    /// Build a host authenticated with `token`.
    pub fn new(token: &str, owner: &str, repo: &str) -> Result<Self, GitHubError> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| GitHubError::Api(Box::new(e)))?;

        Ok(Self::with_client(client, owner, repo))
    }

    /// Build a host around a pre-configured client.
    ///
    /// This allows dependency injection for testing with mock servers.
    pub fn with_client(client: Octocrab, owner: &str, repo: &str) -> Self {
        Self {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    fn classify(&self, e: octocrab::Error) -> GitHubError {
        // octocrab error shapes vary; check both Display and Debug output
        let err_display = e.to_string();
        let err_debug = format!("{:?}", e);

        if err_display.to_lowercase().contains("rate limit")
            || err_debug.to_lowercase().contains("rate limit")
        {
            return GitHubError::RateLimited;
        }
        if err_display.contains("Not Found") || err_debug.contains("Not Found") {
            return GitHubError::RepositoryNotFound {
                owner: self.owner.clone(),
                repo: self.repo.clone(),
            };
        }
        if err_display.contains("Bad credentials") || err_debug.contains("Bad credentials") {
            return GitHubError::AuthenticationFailed;
        }
        GitHubError::Api(Box::new(e))
    }
}

#[async_trait]
impl ReleaseHost for GitHubHost {
    async fn find_open_pull_request(
        &self,
        head: &str,
        base: &str,
    ) -> Result<Option<u64>, GitHubError> {
        let head_filter = format!("{}:{}", self.owner, head);

        let page = retry_with_backoff("List pull requests", || async {
            self.client
                .pulls(&self.owner, &self.repo)
                .list()
                .state(State::Open)
                .head(head_filter.clone())
                .base(base)
                .per_page(1)
                .send()
                .await
                .map_err(|e| self.classify(e))
        })
        .await?;

        Ok(page.items.first().map(|pr| pr.number))
    }

    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<u64, GitHubError> {
        info!("Creating pull request {} -> {}", head, base);

        let pr = retry_with_backoff("Create pull request", || async {
            self.client
                .pulls(&self.owner, &self.repo)
                .create(title, head, base)
                .body(body)
                .send()
                .await
                .map_err(|e| self.classify(e))
        })
        .await?;

        Ok(pr.number)
    }

    async fn update_pull_request(
        &self,
        number: u64,
        title: &str,
        body: &str,
    ) -> Result<(), GitHubError> {
        info!("Updating pull request #{}", number);

        retry_with_backoff("Update pull request", || async {
            self.client
                .pulls(&self.owner, &self.repo)
                .update(number)
                .title(title)
                .body(body)
                .send()
                .await
                .map_err(|e| self.classify(e))
        })
        .await?;

        Ok(())
    }

    async fn create_release(&self, release: &NewRelease) -> Result<(), GitHubError> {
        info!("Creating GitHub release {}", release.tag_name);

        retry_with_backoff("Create release", || async {
            self.client
                .repos(&self.owner, &self.repo)
                .releases()
                .create(&release.tag_name)
                .name(&release.name)
                .body(&release.body)
                .prerelease(release.prerelease)
                .send()
                .await
                .map_err(|e| self.classify(e))
        })
        .await?;

        Ok(())
    }
}
