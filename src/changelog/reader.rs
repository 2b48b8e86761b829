//! Read package changelog files.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::ChangelogError;

/// File name of a package changelog, relative to the package directory.
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Read the changelog of the package in `package_dir`.
///
/// Returns `Ok(None)` when the file does not exist, which is how packages
/// with changelogs disabled look on disk.
pub async fn read_changelog(package_dir: &Path) -> Result<Option<String>, ChangelogError> {
    let path = package_dir.join(CHANGELOG_FILE);

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ChangelogError::ReadFailed { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_existing_changelog() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CHANGELOG_FILE), "# pkg\n").unwrap();

        let content = read_changelog(dir.path()).await.unwrap();
        assert_eq!(content.as_deref(), Some("# pkg\n"));
    }

    #[tokio::test]
    async fn test_missing_changelog_is_none() {
        let dir = tempfile::tempdir().unwrap();

        let content = read_changelog(dir.path()).await.unwrap();
        assert!(content.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_changelog_is_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as a string.
        std::fs::create_dir(dir.path().join(CHANGELOG_FILE)).unwrap();

        let result = read_changelog(dir.path()).await;
        assert!(matches!(result, Err(ChangelogError::ReadFailed { .. })));
    }
}
