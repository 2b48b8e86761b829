//! Package version snapshots and the packages that changed between two.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use super::Package;

/// Declared version of every package, keyed by package directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSnapshot {
    versions: BTreeMap<PathBuf, String>,
}

impl VersionSnapshot {
    /// Capture the current versions of `packages`.
    pub fn capture(packages: &[Package]) -> Self {
        Self {
            versions: packages
                .iter()
                .map(|p| (p.dir.clone(), p.version.clone()))
                .collect(),
        }
    }

    pub fn get(&self, dir: &Path) -> Option<&str> {
        self.versions.get(dir).map(String::as_str)
    }
}

/// Packages whose declared version differs from `previous`.
///
/// A package missing from `previous` counts as changed. Each directory is
/// reported at most once.
pub fn changed_packages(current: &[Package], previous: &VersionSnapshot) -> Vec<Package> {
    let mut seen = HashSet::new();

    current
        .iter()
        .filter(|pkg| previous.get(&pkg.dir) != Some(pkg.version.as_str()))
        .filter(|pkg| seen.insert(pkg.dir.clone()))
        .cloned()
        .collect()
}
