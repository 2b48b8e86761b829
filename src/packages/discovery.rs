//! Node workspace discovery from package.json and pnpm-workspace.yaml.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::PackageError;

use super::{Package, PackageDiscovery, Packages, Tool};

const PACKAGE_JSON: &str = "package.json";
const PNPM_WORKSPACE: &str = "pnpm-workspace.yaml";

#[derive(Debug, Deserialize)]
struct PackageJson {
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    private: bool,
    workspaces: Option<Workspaces>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Workspaces {
    List(Vec<String>),
    Config {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl Workspaces {
    fn into_patterns(self) -> Vec<String> {
        match self {
            Workspaces::List(patterns) => patterns,
            Workspaces::Config { packages } => packages,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PnpmWorkspace {
    #[serde(default)]
    packages: Vec<String>,
}

/// Discovers npm/yarn/pnpm workspaces, falling back to a single root package.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeWorkspaceDiscovery;

impl PackageDiscovery for NodeWorkspaceDiscovery {
    fn discover(&self, cwd: &Path) -> Result<Packages, PackageError> {
        let (root_dir, tool, patterns) = find_root(cwd)?;

        let packages = match tool {
            Tool::Root => vec![read_package(&root_dir)?],
            Tool::Npm | Tool::Pnpm => expand_workspaces(&root_dir, &patterns)?
                .iter()
                .map(|dir| read_package(dir))
                .collect::<Result<Vec<_>, _>>()?,
        };

        debug!(
            "Discovered {} packages in {} ({:?})",
            packages.len(),
            root_dir.display(),
            tool
        );

        Ok(Packages {
            tool,
            root_dir,
            packages,
        })
    }
}

/// Walk up from `cwd` to the workspace root.
///
/// The first ancestor declaring workspaces wins; without one, the nearest
/// directory holding a package.json is a single-package root.
fn find_root(cwd: &Path) -> Result<(PathBuf, Tool, Vec<String>), PackageError> {
    let mut nearest_package = None;

    for dir in cwd.ancestors() {
        let pnpm_path = dir.join(PNPM_WORKSPACE);
        if pnpm_path.is_file() {
            let content = read_file(&pnpm_path)?;
            let workspace: PnpmWorkspace =
                serde_yaml::from_str(&content).map_err(|e| PackageError::InvalidManifest {
                    path: pnpm_path.clone(),
                    reason: e.to_string(),
                })?;
            return Ok((dir.to_path_buf(), Tool::Pnpm, workspace.packages));
        }

        let manifest_path = dir.join(PACKAGE_JSON);
        if manifest_path.is_file() {
            let manifest = read_manifest(&manifest_path)?;
            if let Some(workspaces) = manifest.workspaces {
                return Ok((dir.to_path_buf(), Tool::Npm, workspaces.into_patterns()));
            }
            if nearest_package.is_none() {
                nearest_package = Some(dir.to_path_buf());
            }
        }
    }

    nearest_package
        .map(|dir| (dir, Tool::Root, Vec::new()))
        .ok_or_else(|| PackageError::RootNotFound(cwd.to_path_buf()))
}

/// Expand workspace globs into package directories, honouring `!` exclusions.
fn expand_workspaces(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, PackageError> {
    let mut included = BTreeSet::new();
    let mut excluded = BTreeSet::new();

    for pattern in patterns {
        let (negated, pattern) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern.as_str()),
        };
        let target = if negated { &mut excluded } else { &mut included };
        target.extend(match_package_dirs(root, pattern)?);
    }

    Ok(included.difference(&excluded).cloned().collect())
}

fn match_package_dirs(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, PackageError> {
    let pattern = pattern.trim_end_matches('/');
    let full = root.join(pattern).join(PACKAGE_JSON);
    let full = full.to_string_lossy();

    let entries = glob::glob(&full).map_err(|e| PackageError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    Ok(entries
        .filter_map(Result::ok)
        .filter(|path| !path.components().any(|c| c.as_os_str() == "node_modules"))
        .filter_map(|path| path.parent().map(Path::to_path_buf))
        .collect())
}

fn read_package(dir: &Path) -> Result<Package, PackageError> {
    let path = dir.join(PACKAGE_JSON);
    let manifest = read_manifest(&path)?;

    let name = manifest.name.ok_or_else(|| PackageError::InvalidManifest {
        path: path.clone(),
        reason: "missing \"name\"".to_string(),
    })?;

    Ok(Package {
        name,
        version: manifest.version.unwrap_or_default(),
        dir: dir.to_path_buf(),
        private: manifest.private,
    })
}

fn read_manifest(path: &Path) -> Result<PackageJson, PackageError> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| PackageError::InvalidManifest {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn read_file(path: &Path) -> Result<String, PackageError> {
    std::fs::read_to_string(path).map_err(|source| PackageError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}
