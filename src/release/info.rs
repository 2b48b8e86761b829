//! Collect the changelog entry of every changed package.

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::changelog::{BumpLevel, extract, read_changelog};
use crate::error::ChangelogError;
use crate::packages::Package;

/// One package's row in the release notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedPackageInfo {
    pub name: String,
    /// Display header, `## name@version`.
    pub header: String,
    /// Rendered changelog entry for the released version.
    pub content: String,
    pub highest_level: BumpLevel,
    pub private: bool,
}

impl ChangedPackageInfo {
    /// Build the info for `package` from its changelog text.
    pub fn from_changelog(package: &Package, changelog: &str) -> Self {
        let section = extract(changelog, &package.version);
        if !section.matched {
            warn!(
                "No changelog entry for {}@{}, using the whole changelog",
                package.name, package.version
            );
        }

        Self {
            name: package.name.clone(),
            header: format!("## {}@{}", package.name, package.version),
            content: section.content,
            highest_level: section.highest_level,
            private: package.private,
        }
    }
}

/// Read and extract the changelog entry of each changed package.
///
/// Changelogs are read concurrently; the result keeps the order of
/// `changed`. Packages without a changelog file are skipped.
pub async fn changed_packages_info(
    changed: &[Package],
) -> Result<Vec<ChangedPackageInfo>, ChangelogError> {
    let mut reads = JoinSet::new();
    for (index, package) in changed.iter().cloned().enumerate() {
        reads.spawn(async move {
            let changelog = read_changelog(&package.dir).await?;
            Ok::<_, ChangelogError>((index, package, changelog))
        });
    }

    let mut slots: Vec<Option<ChangedPackageInfo>> = vec![None; changed.len()];
    while let Some(joined) = reads.join_next().await {
        let (index, package, changelog) = joined??;

        match changelog {
            Some(text) => slots[index] = Some(ChangedPackageInfo::from_changelog(&package, &text)),
            None => debug!("{} has no changelog, leaving it out", package.name),
        }
    }

    Ok(slots.into_iter().flatten().collect())
}
