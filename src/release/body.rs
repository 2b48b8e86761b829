//! Version pull request body.
//!
//! The body is a preamble followed by the release notes of every changed
//! package. When that exceeds the character budget, the notes shrink to
//! their headers; when that still does not fit, all release information is
//! dropped.

use super::info::ChangedPackageInfo;

const RELEASES_HEADING: &str = "# Releases";

const CONTENT_OMITTED_NOTICE: &str = "\n> The changelog information of each package has been omitted from this message, as the content exceeds the size limit.\n";

const ALL_OMITTED_NOTICE: &str = "\n> All release information have been omitted from this message, as the content exceeds the size limit.";

/// Compose the release notes under `max_characters`.
///
/// Lengths are counted in characters. The last fallback is returned without
/// being measured.
pub fn compose(
    header: &str,
    pre_release_notice: Option<&str>,
    infos: &[ChangedPackageInfo],
    max_characters: usize,
) -> String {
    let preamble = [header, pre_release_notice.unwrap_or(""), RELEASES_HEADING];

    let full = preamble
        .iter()
        .map(|s| s.to_string())
        .chain(infos.iter().map(|info| format!("{}\n\n{}", info.header, info.content)))
        .collect::<Vec<_>>()
        .join("\n");
    if full.chars().count() <= max_characters {
        return full;
    }

    let headers_only = preamble
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::once(CONTENT_OMITTED_NOTICE.to_string()))
        .chain(infos.iter().map(|info| format!("{}\n\n", info.header)))
        .collect::<Vec<_>>()
        .join("\n");
    if headers_only.chars().count() <= max_characters {
        return headers_only;
    }

    [header, pre_release_notice.unwrap_or(""), RELEASES_HEADING, ALL_OMITTED_NOTICE].join("\n")
}

/// Warning shown while `branch` is in pre-release mode.
pub fn pre_release_notice(branch: &str) -> String {
    format!(
        "⚠️⚠️⚠️⚠️⚠️⚠️\n\n`{branch}` is currently in **pre mode** so this branch has prereleases rather than normal releases. If you want to exit prereleases, run `changeset pre exit` on `{branch}`.\n\n⚠️⚠️⚠️⚠️⚠️⚠️\n"
    )
}

/// Opening paragraph of the version pull request.
fn message_header(branch: &str, has_publish_script: bool) -> String {
    let on_merge = if has_publish_script {
        "the packages will be published automatically"
    } else {
        "publish the packages yourself, or configure a publish script so that merging publishes them"
    };

    format!(
        "This PR was opened by changeset-release. When you're ready to do a release, you can merge this and {}. If you're not ready to do a release yet, that's fine, whenever you add more changesets to {}, this PR will be updated.",
        on_merge, branch
    )
}

/// Full body of the version pull request targeting `branch`.
///
/// `infos` must already be in release-note order.
pub fn version_pr_body(
    branch: &str,
    has_publish_script: bool,
    in_pre_mode: bool,
    infos: &[ChangedPackageInfo],
    max_characters: usize,
) -> String {
    let notice = in_pre_mode.then(|| pre_release_notice(branch));
    compose(
        &message_header(branch, has_publish_script),
        notice.as_deref(),
        infos,
        max_characters,
    )
}
