//! Monorepo package discovery.

pub mod discovery;
pub mod snapshot;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PackageError;

pub use discovery::NodeWorkspaceDiscovery;
pub use snapshot::{VersionSnapshot, changed_packages};

/// A package as declared by its manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub dir: PathBuf,
    pub private: bool,
}

/// The workspace tool that owns the package graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// A single package at the root, no workspaces.
    Root,
    /// `workspaces` in the root package.json (npm, yarn, bolt).
    Npm,
    /// `pnpm-workspace.yaml` at the root.
    Pnpm,
}

/// Every package in a repository.
#[derive(Debug, Clone)]
pub struct Packages {
    pub tool: Tool,
    pub root_dir: PathBuf,
    /// Workspace members, or the root package alone for [`Tool::Root`].
    pub packages: Vec<Package>,
}

impl Packages {
    /// Look up a package by name.
    pub fn find(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }
}

/// Resolves the package graph of the repository containing a directory.
#[cfg_attr(test, mockall::automock)]
pub trait PackageDiscovery: Send + Sync {
    /// Discover the packages of the repository containing `cwd`.
    fn discover(&self, cwd: &Path) -> Result<Packages, PackageError>;
}
