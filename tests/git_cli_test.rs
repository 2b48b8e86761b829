//! Integration tests for the git collaborator against throw-away repositories.

mod common;

use changeset_release::error::GitError;
use changeset_release::git::{GitCli, GitOps, GitUser, current_branch};
use common::TestRepo;

fn repo_with_commit() -> TestRepo {
    let repo = TestRepo::new();
    repo.write("package.json", r#"{"name":"root","version":"1.0.0"}"#);
    repo.commit("Initial commit");
    repo
}

// =============================================================================
// BRANCHES
// =============================================================================

#[tokio::test]
async fn test_switch_creates_missing_branch() {
    let repo = repo_with_commit();
    let git = GitCli::new(repo.path());

    git.switch_to_maybe_existing_branch("release/main")
        .await
        .unwrap();

    assert_eq!(repo.head_branch(), "release/main");
    assert_eq!(current_branch(repo.path()).unwrap(), "release/main");
}

#[tokio::test]
async fn test_switch_to_existing_branch() {
    let repo = repo_with_commit();
    let oid = repo.commit("Second commit");
    repo.branch("release/main", oid);
    let git = GitCli::new(repo.path());

    git.switch_to_maybe_existing_branch("release/main")
        .await
        .unwrap();
    git.switch_to_maybe_existing_branch("main").await.unwrap();

    assert_eq!(repo.head_branch(), "main");
}

#[test]
fn test_current_branch_from_subdirectory() {
    let repo = repo_with_commit();
    repo.write("packages/a/package.json", r#"{"name":"a","version":"0.1.0"}"#);

    let branch = current_branch(&repo.path().join("packages/a")).unwrap();

    assert_eq!(branch, "main");
}

// =============================================================================
// WORKING TREE
// =============================================================================

#[tokio::test]
async fn test_commit_all_cleans_tree() {
    let repo = repo_with_commit();
    let git = GitCli::new(repo.path());
    assert!(git.is_clean().await.unwrap());

    repo.write("packages/a/CHANGELOG.md", "# a\n\n## 0.2.0\n");
    assert!(!git.is_clean().await.unwrap());

    git.commit_all("Version Packages").await.unwrap();

    assert!(git.is_clean().await.unwrap());
    let head = repo.repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.summary(), Some("Version Packages"));
}

#[tokio::test]
async fn test_commit_all_uses_configured_user() {
    let repo = repo_with_commit();
    let git = GitCli::new(repo.path());
    git.configure_user(&GitUser {
        name: "release-bot".to_string(),
        email: "bot@example.com".to_string(),
    })
    .await
    .unwrap();

    repo.write("CHANGELOG.md", "## 1.1.0\n");
    git.commit_all("Version Packages").await.unwrap();

    let head = repo.repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.author().name(), Some("release-bot"));
    assert_eq!(head.author().email(), Some("bot@example.com"));
}

#[tokio::test]
async fn test_reset_hard_discards_later_commits() {
    let repo = repo_with_commit();
    let first = repo.repo.head().unwrap().target().unwrap();
    repo.write("later.txt", "later");
    repo.commit("Later commit");
    let git = GitCli::new(repo.path());

    git.reset_hard(&first.to_string()).await.unwrap();

    assert_eq!(repo.repo.head().unwrap().target(), Some(first));
    assert!(!repo.path().join("later.txt").exists());
}

// =============================================================================
// PUSHING
// =============================================================================

#[tokio::test]
async fn test_force_push_release_branch() {
    let repo = repo_with_commit();
    let (_origin_dir, origin) = repo.add_bare_origin();
    let git = GitCli::new(repo.path());

    git.switch_to_maybe_existing_branch("release/main")
        .await
        .unwrap();
    repo.write("CHANGELOG.md", "## 1.1.0\n");
    git.commit_all("Version Packages").await.unwrap();
    git.push("release/main", true).await.unwrap();

    let local = repo.repo.head().unwrap().target().unwrap();
    let remote = origin
        .find_reference("refs/heads/release/main")
        .unwrap()
        .target()
        .unwrap();
    assert_eq!(local, remote);
}

#[tokio::test]
async fn test_push_tags_follows_annotated_tags() {
    let repo = repo_with_commit();
    let (_origin_dir, origin) = repo.add_bare_origin();
    let head = repo.repo.head().unwrap().peel_to_commit().unwrap();
    let sig = git2::Signature::now("Test User", "test@example.com").unwrap();
    repo.repo
        .tag("a@1.0.0", head.as_object(), &sig, "a@1.0.0", false)
        .unwrap();
    let git = GitCli::new(repo.path());

    git.push_tags("main").await.unwrap();

    assert!(origin.find_reference("refs/heads/main").is_ok());
    assert!(origin.find_reference("refs/tags/a@1.0.0").is_ok());
}

#[tokio::test]
async fn test_push_without_origin_fails() {
    let repo = repo_with_commit();
    let git = GitCli::new(repo.path());

    let result = git.push("main", false).await;

    match result {
        Err(GitError::CommandFailed { operation, .. }) => assert_eq!(operation, "push"),
        other => panic!("Expected CommandFailed, got {:?}", other),
    }
}
