//! Changeset files: pending release intents stored in `.changeset/`.
//!
//! # Format
//!
//! ```markdown
//! ---
//! "package-name": minor
//! "another-package": patch
//! ---
//!
//! Summary of the change.
//! ```

pub mod pre;
pub mod state;
pub mod writer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChangesetError;

pub use pre::{PreMode, PreState, read_pre_state};
pub use state::{ChangesetState, read_changeset_state, read_changesets};
pub use writer::{NewChangeset, write_changeset};

/// Directory holding changeset files, relative to the repository root.
pub const CHANGESET_DIR: &str = ".changeset";

const FRONT_MATTER_DELIMITER: &str = "---";

/// Type of version bump requested for a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    None,
    Patch,
    Minor,
    Major,
}

impl BumpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            other => Err(format!(
                "invalid bump type '{}', expected major, minor, patch or none",
                other
            )),
        }
    }
}

/// One package release requested by a changeset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub name: String,
    #[serde(rename = "type")]
    pub bump_type: BumpType,
}

impl Release {
    pub fn new(name: impl Into<String>, bump_type: BumpType) -> Self {
        Self {
            name: name.into(),
            bump_type,
        }
    }
}

/// A changeset that has not been applied yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    pub id: String,
    pub summary: String,
    pub releases: Vec<Release>,
}

impl Changeset {
    /// Parse a changeset file's content. `id` is the file stem.
    pub fn parse(id: &str, content: &str) -> Result<Self, ChangesetError> {
        let invalid = |reason: &str| ChangesetError::InvalidChangeset {
            id: id.to_string(),
            reason: reason.to_string(),
        };

        let mut lines = content.trim_start().lines();
        if lines.next().map(str::trim_end) != Some(FRONT_MATTER_DELIMITER) {
            return Err(invalid("must start with a '---' front matter delimiter"));
        }

        let mut front_matter = Vec::new();
        let mut closed = false;
        for line in lines.by_ref() {
            if line.trim_end() == FRONT_MATTER_DELIMITER {
                closed = true;
                break;
            }
            front_matter.push(line);
        }
        if !closed {
            return Err(invalid("missing closing '---' front matter delimiter"));
        }

        let releases = parse_releases(&front_matter.join("\n")).map_err(|e| invalid(&e))?;
        let summary = lines.collect::<Vec<_>>().join("\n").trim().to_string();

        Ok(Self {
            id: id.to_string(),
            summary,
            releases,
        })
    }

    /// Render the changeset back to its file format.
    pub fn to_markdown(&self) -> String {
        let mut output = String::from("---\n");
        for release in &self.releases {
            output.push_str(&format!("\"{}\": {}\n", release.name, release.bump_type));
        }
        output.push_str("---\n\n");
        output.push_str(&self.summary);
        output.push('\n');
        output
    }

    /// A changeset that releases nothing.
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

fn parse_releases(front_matter: &str) -> Result<Vec<Release>, String> {
    if front_matter.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: serde_yaml::Value = serde_yaml::from_str(front_matter).map_err(|e| e.to_string())?;
    let mapping = match value {
        serde_yaml::Value::Null => return Ok(Vec::new()),
        serde_yaml::Value::Mapping(mapping) => mapping,
        _ => return Err("front matter must map package names to bump types".to_string()),
    };

    mapping
        .into_iter()
        .map(|(name, bump)| {
            let name = name
                .as_str()
                .ok_or_else(|| "package name must be a string".to_string())?;
            let bump = bump
                .as_str()
                .ok_or_else(|| format!("bump type for '{}' must be a string", name))?;
            Ok(Release::new(name, bump.parse::<BumpType>()?))
        })
        .collect()
}
