//! Write new changeset files.

use std::io::Write;
use std::path::Path;

use tracing::info;
use uuid::Uuid;

use crate::error::ChangesetError;

use super::{CHANGESET_DIR, Changeset, Release};

/// A changeset to be written; the id is assigned on write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewChangeset {
    pub summary: String,
    pub releases: Vec<Release>,
}

/// Write `new` into `.changeset/` and return the generated id.
///
/// Used for auxiliary releases such as dependency alignment, where the
/// summary is usually empty. The file is written atomically.
pub fn write_changeset(root: &Path, new: &NewChangeset) -> Result<String, ChangesetError> {
    let dir = root.join(CHANGESET_DIR);
    std::fs::create_dir_all(&dir).map_err(ChangesetError::WriteFailed)?;

    let changeset = Changeset {
        id: generate_id(),
        summary: new.summary.clone(),
        releases: new.releases.clone(),
    };

    let mut file = tempfile::NamedTempFile::new_in(&dir).map_err(ChangesetError::WriteFailed)?;
    file.write_all(changeset.to_markdown().as_bytes())
        .map_err(ChangesetError::WriteFailed)?;
    file.persist(dir.join(format!("{}.md", changeset.id)))
        .map_err(|e| ChangesetError::WriteFailed(e.error))?;

    info!(
        "Wrote changeset {} releasing {} packages",
        changeset.id,
        changeset.releases.len()
    );

    Ok(changeset.id)
}

/// Short random id; 12 hex characters keep collisions negligible.
fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}
