//! Locate the changelog section written for one version.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Serialize;

use super::markdown::{self, Block};

/// Bump severity implied by changelog headings.
///
/// Ordered `Dep < Patch < Minor < Major`; `Dep` is the floor when no heading
/// names a bump type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    #[default]
    Dep = 0,
    Patch = 1,
    Minor = 2,
    Major = 3,
}

impl BumpLevel {
    /// Severity named by the first bump keyword in a heading's text, if any.
    ///
    /// Matching is case-insensitive and only the first of `major`, `minor`
    /// or `patch` counts.
    pub fn from_heading(text: &str) -> Option<Self> {
        static KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new("(major|minor|patch)").expect("bump keyword pattern is valid")
        });

        let lowered = text.to_lowercase();
        let found = KEYWORD.find(&lowered)?;
        match found.as_str() {
            "major" => Some(Self::Major),
            "minor" => Some(Self::Minor),
            "patch" => Some(Self::Patch),
            _ => None,
        }
    }
}

/// The changelog content written for one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogSection {
    /// Rendered markdown of the blocks under the version heading.
    pub content: String,
    /// Highest severity mentioned by any heading in the whole document.
    pub highest_level: BumpLevel,
    /// Whether a heading matched the version. When false, `content` is the
    /// entire document.
    pub matched: bool,
}

/// Extract the section for `version` from a changelog.
///
/// The section starts after the first heading whose flattened text equals
/// `version` exactly and ends before the next heading of the same depth.
/// Without a matching heading the whole document is returned.
pub fn extract(changelog: &str, version: &str) -> ChangelogSection {
    let blocks = markdown::parse(changelog);

    let mut highest_level = BumpLevel::Dep;
    let mut start: Option<(usize, u8)> = None;
    let mut end: Option<usize> = None;

    for (index, block) in blocks.iter().enumerate() {
        let Block::Heading { depth, .. } = block else {
            continue;
        };
        let text = block.heading_text().unwrap_or_default();

        if let Some(level) = BumpLevel::from_heading(&text) {
            highest_level = highest_level.max(level);
        }

        match start {
            None if text == version => start = Some((index, *depth)),
            Some((_, start_depth)) if end.is_none() && *depth == start_depth => end = Some(index),
            _ => {}
        }
    }

    let content = match start {
        Some((start_index, _)) => {
            let end_index = end.unwrap_or(blocks.len());
            markdown::render(&blocks[start_index + 1..end_index])
        }
        None => markdown::render(&blocks),
    };

    ChangelogSection {
        content,
        highest_level,
        matched: start.is_some(),
    }
}
