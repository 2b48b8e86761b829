//! Changelog reading and version-section extraction.

pub mod entry;
pub mod markdown;
pub mod reader;

pub use entry::{BumpLevel, ChangelogSection, extract};
pub use reader::{CHANGELOG_FILE, read_changelog};
