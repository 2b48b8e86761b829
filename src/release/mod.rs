//! Release notes: per-package changelog entries, their order, and the
//! version pull request body built from them.

pub mod body;
pub mod info;
pub mod order;

pub use body::{compose, pre_release_notice, version_pr_body};
pub use info::{ChangedPackageInfo, changed_packages_info};
pub use order::{compare_release_notes, sort_release_notes};
