//! Ordering of release notes.

use std::cmp::Ordering;

use super::info::ChangedPackageInfo;

/// Public packages before private ones, then by descending bump level.
pub fn compare_release_notes(a: &ChangedPackageInfo, b: &ChangedPackageInfo) -> Ordering {
    a.private
        .cmp(&b.private)
        .then_with(|| b.highest_level.cmp(&a.highest_level))
}

/// Stable sort; equal entries keep their relative order.
pub fn sort_release_notes(infos: &mut [ChangedPackageInfo]) {
    infos.sort_by(compare_release_notes);
}
