//! changeset-release - CI release automation for changeset-driven monorepos.
//!
//! # Overview
//!
//! On every push to a release branch, changeset-release reads the pending
//! changesets and either opens (or refreshes) a "Version Packages" pull
//! request with the bumped versions and their changelog entries, or, once
//! that pull request is merged, runs the publish script and reports which
//! packages were released.

pub mod changelog;
pub mod changeset;
pub mod error;
pub mod exec;
pub mod git;
pub mod github;
pub mod packages;
pub mod publish;
pub mod release;
pub mod workflow;

// Re-export commonly used types
pub use changelog::{BumpLevel, ChangelogSection, extract};
pub use changeset::{BumpType, Changeset, ChangesetState, read_changeset_state};
pub use error::{
    ChangelogError, ChangesetError, ExecError, GitError, GitHubError, PackageError, PublishError,
    WorkflowError,
};
pub use packages::{Package, PackageDiscovery, Packages, Tool};
pub use publish::{PublishResult, PublishedPackage, scan_published_packages};
pub use release::{ChangedPackageInfo, compose, sort_release_notes};
pub use workflow::{Phase, RunOutcome, WorkflowConfig};
