//! Pre-release mode state.
//!
//! File: `.changeset/pre.json`
//! ```json
//! {
//!   "mode": "pre",
//!   "tag": "beta",
//!   "initialVersions": { "pkg-a": "1.0.0" },
//!   "changesets": ["brave-lions-dance"]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ChangesetError;

use super::CHANGESET_DIR;

const PRE_STATE_FILE: &str = "pre.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreMode {
    Pre,
    Exit,
}

/// Pre-release state, tracking changesets already consumed by prereleases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreState {
    pub mode: PreMode,
    pub tag: String,
    #[serde(default)]
    pub initial_versions: BTreeMap<String, String>,
    #[serde(default)]
    pub changesets: Vec<String>,
}

impl PreState {
    pub fn is_active(&self) -> bool {
        self.mode == PreMode::Pre
    }

    /// Ids of changesets already released as prereleases.
    pub fn consumed(&self) -> HashSet<&str> {
        self.changesets.iter().map(String::as_str).collect()
    }
}

/// Read `.changeset/pre.json` under `root`. A missing file is `Ok(None)`.
pub fn read_pre_state(root: &Path) -> Result<Option<PreState>, ChangesetError> {
    let path = root.join(CHANGESET_DIR).join(PRE_STATE_FILE);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(ChangesetError::ReadFailed { path, source }),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| ChangesetError::InvalidPreState { path, source })
}
