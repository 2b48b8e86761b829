//! Interpret the output of the publish tool.
//!
//! The publish tool reports each created tag on its own line:
//!
//! ```text
//! 🦋  New tag:  @scope/pkg-a@1.2.0
//! 🦋  New tag:  pkg-b@0.4.1
//! ```

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Serialize;

use crate::error::PublishError;
use crate::packages::{Package, Packages, Tool};

const NEW_TAG_MARKER: &str = "New tag:";

static NEW_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"New tag:\s+(@[^/]+/[^@]+|[^/]+)@(\S+)").expect("new tag pattern is valid")
});

/// A package released by the publish step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedPackage {
    pub name: String,
    pub version: String,
}

impl From<&Package> for PublishedPackage {
    fn from(package: &Package) -> Self {
        Self {
            name: package.name.clone(),
            version: package.version.clone(),
        }
    }
}

/// Outcome of the publish phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResult {
    pub published: bool,
    pub published_packages: Vec<PublishedPackage>,
}

impl PublishResult {
    pub fn from_released(released: &[Package]) -> Self {
        Self {
            published: !released.is_empty(),
            published_packages: released.iter().map(PublishedPackage::from).collect(),
        }
    }
}

/// Packages released according to the publish tool's stdout.
///
/// In a workspace every `New tag: <name>@<version>` line names a package,
/// which must exist in `packages`. For a single root package the first
/// `New tag:` line releases it. Released packages carry their declared
/// version, in the order the tags were reported.
pub fn scan_published_packages(
    stdout: &str,
    packages: &Packages,
) -> Result<Vec<Package>, PublishError> {
    if packages.tool == Tool::Root {
        let package = packages.packages.first().ok_or(PublishError::NoPackages)?;
        let released = stdout.lines().any(|line| line.contains(NEW_TAG_MARKER));
        return Ok(if released {
            vec![package.clone()]
        } else {
            Vec::new()
        });
    }

    stdout
        .lines()
        .filter_map(|line| NEW_TAG.captures(line))
        .map(|caps| {
            let name = &caps[1];
            packages
                .find(name)
                .cloned()
                .ok_or_else(|| PublishError::PackageNotFound(name.to_string()))
        })
        .collect()
}
