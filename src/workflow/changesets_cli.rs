//! Locate the `@changesets/cli` installation used to version packages.

use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;
use tracing::debug;

use crate::error::WorkflowError;

const CLI_PACKAGE_DIR: &str = "node_modules/@changesets/cli";

/// The node runtime that executes the CLI.
pub const NODE: &str = "node";

#[derive(Debug, Deserialize)]
struct CliPackageJson {
    version: String,
}

/// An installed `@changesets/cli`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangesetsCli {
    pub dir: PathBuf,
    pub version: Version,
}

impl ChangesetsCli {
    /// Find the CLI in `node_modules` of `cwd` or any parent directory.
    pub fn resolve(cwd: &Path) -> Result<Self, WorkflowError> {
        let dir = cwd
            .ancestors()
            .map(|dir| dir.join(CLI_PACKAGE_DIR))
            .find(|dir| dir.join("package.json").is_file())
            .ok_or_else(|| WorkflowError::ChangesetsCliNotFound(cwd.to_path_buf()))?;

        let manifest = dir.join("package.json");
        let invalid = |reason: String| WorkflowError::InvalidChangesetsCli {
            path: manifest.clone(),
            reason,
        };

        let content = std::fs::read_to_string(&manifest).map_err(|e| invalid(e.to_string()))?;
        let package: CliPackageJson =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        let version = Version::parse(&package.version).map_err(|e| invalid(e.to_string()))?;

        debug!("Using @changesets/cli {} from {}", version, dir.display());
        Ok(Self { dir, version })
    }

    pub fn bin(&self) -> PathBuf {
        self.dir.join("bin.js")
    }

    /// The versioning subcommand; releases before 2.0.0 call it `bump`.
    pub fn version_command(&self) -> &'static str {
        if self.version < Version::new(2, 0, 0) {
            "bump"
        } else {
            "version"
        }
    }

    /// Arguments for `node` to run `subcommand` with `extra` arguments.
    pub fn node_args(&self, subcommand: &str, extra: &[String]) -> Vec<String> {
        let mut args = vec![
            self.bin().to_string_lossy().into_owned(),
            subcommand.to_string(),
        ];
        args.extend(extra.iter().cloned());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn install_cli(root: &Path, version: &str) {
        let dir = root.join(CLI_PACKAGE_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("package.json"),
            format!(r#"{{"name":"@changesets/cli","version":"{}"}}"#, version),
        )
        .unwrap();
    }

    #[test]
    fn test_resolve_from_nested_directory() {
        let root = tempfile::tempdir().unwrap();
        install_cli(root.path(), "2.27.1");
        let nested = root.path().join("packages/a");
        std::fs::create_dir_all(&nested).unwrap();

        let cli = ChangesetsCli::resolve(&nested).unwrap();

        assert_eq!(cli.dir, root.path().join(CLI_PACKAGE_DIR));
        assert_eq!(cli.version_command(), "version");
        assert_eq!(cli.bin(), root.path().join(CLI_PACKAGE_DIR).join("bin.js"));
    }

    #[test]
    fn test_old_cli_uses_bump() {
        let root = tempfile::tempdir().unwrap();
        install_cli(root.path(), "1.9.0");

        let cli = ChangesetsCli::resolve(root.path()).unwrap();
        assert_eq!(cli.version_command(), "bump");
    }

    #[test]
    fn test_missing_cli() {
        let root = tempfile::tempdir().unwrap();

        let err = ChangesetsCli::resolve(root.path()).unwrap_err();

        assert!(matches!(err, WorkflowError::ChangesetsCliNotFound(_)));
        assert!(err.to_string().contains("Have you forgotten to install `@changesets/cli`"));
    }

    #[test]
    fn test_invalid_cli_version() {
        let root = tempfile::tempdir().unwrap();
        install_cli(root.path(), "not-a-version");

        let result = ChangesetsCli::resolve(root.path());
        assert!(matches!(result, Err(WorkflowError::InvalidChangesetsCli { .. })));
    }

    #[test]
    fn test_node_args() {
        let cli = ChangesetsCli {
            dir: PathBuf::from("/repo/node_modules/@changesets/cli"),
            version: Version::new(2, 0, 0),
        };

        assert_eq!(
            cli.node_args("status", &["--since=main".to_string()]),
            vec![
                "/repo/node_modules/@changesets/cli/bin.js".to_string(),
                "status".to_string(),
                "--since=main".to_string(),
            ]
        );
    }
}
