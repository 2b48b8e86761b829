//! Integration tests for building release notes from a workspace on disk.

mod common;

use changeset_release::changeset::{
    BumpType, NewChangeset, Release, read_changeset_state, write_changeset,
};
use changeset_release::packages::{
    NodeWorkspaceDiscovery, PackageDiscovery, Tool, VersionSnapshot, changed_packages,
};
use changeset_release::release::{changed_packages_info, sort_release_notes, version_pr_body};
use changeset_release::BumpLevel;

/// npm workspace with two public packages and one private one.
fn workspace() -> tempfile::TempDir {
    let dir = common::temp_test_dir();
    let root = dir.path();
    common::write_file(
        root,
        "package.json",
        r#"{"name":"monorepo","private":true,"workspaces":["packages/*"]}"#,
    );
    common::write_package(root, "packages/core", "@acme/core", "1.0.0");
    common::write_package(root, "packages/cli", "@acme/cli", "0.4.2");
    common::write_file(
        root,
        "packages/docs/package.json",
        r#"{"name":"@acme/docs","version":"0.0.1","private":true}"#,
    );
    dir
}

#[tokio::test]
async fn test_version_bump_produces_ordered_notes() {
    let dir = workspace();
    let root = dir.path();
    let discovery = NodeWorkspaceDiscovery;

    let before = discovery.discover(&root.join("packages/cli")).unwrap();
    assert_eq!(before.tool, Tool::Npm);
    assert_eq!(before.root_dir, root);
    assert_eq!(before.packages.len(), 3);
    let snapshot = VersionSnapshot::capture(&before.packages);

    // What the version command leaves behind
    common::write_package(root, "packages/core", "@acme/core", "1.1.0");
    common::write_file(
        root,
        "packages/core/CHANGELOG.md",
        "# @acme/core\n\n## 1.1.0\n\n### Minor Changes\n\n- Add streaming API.\n\n## 1.0.0\n\n### Major Changes\n\n- First stable release.\n",
    );
    common::write_package(root, "packages/cli", "@acme/cli", "0.4.3");
    common::write_file(
        root,
        "packages/cli/CHANGELOG.md",
        "# @acme/cli\n\n## 0.4.3\n\n### Patch Changes\n\n- Fix exit code.\n",
    );
    common::write_file(
        root,
        "packages/docs/package.json",
        r#"{"name":"@acme/docs","version":"0.0.2","private":true}"#,
    );

    let after = discovery.discover(root).unwrap();
    let changed = changed_packages(&after.packages, &snapshot);
    assert_eq!(changed.len(), 3);

    let mut infos = changed_packages_info(&changed).await.unwrap();
    // docs has no changelog
    assert_eq!(infos.len(), 2);
    sort_release_notes(&mut infos);

    // core's changelog mentions a major heading in an older entry
    assert_eq!(infos[0].header, "## @acme/core@1.1.0");
    assert_eq!(infos[0].highest_level, BumpLevel::Major);
    assert_eq!(infos[0].content, "### Minor Changes\n\n- Add streaming API.");
    assert_eq!(infos[1].header, "## @acme/cli@0.4.3");

    let body = version_pr_body("main", true, false, &infos, 32768);
    assert!(body.contains("# Releases\n## @acme/core@1.1.0\n\n### Minor Changes"));
    assert!(body.find("@acme/core").unwrap() < body.find("@acme/cli").unwrap());
    assert!(!body.contains("pre mode"));
}

#[tokio::test]
async fn test_body_shrinks_to_headers_when_too_long() {
    let dir = workspace();
    let root = dir.path();
    let discovery = NodeWorkspaceDiscovery;
    let snapshot = VersionSnapshot::capture(&discovery.discover(root).unwrap().packages);

    common::write_package(root, "packages/core", "@acme/core", "2.0.0");
    let notes = "- Long entry describing a breaking change in detail.\n".repeat(40);
    common::write_file(
        root,
        "packages/core/CHANGELOG.md",
        &format!("# @acme/core\n\n## 2.0.0\n\n### Major Changes\n\n{}", notes),
    );

    let after = discovery.discover(root).unwrap();
    let infos = changed_packages_info(&changed_packages(&after.packages, &snapshot))
        .await
        .unwrap();

    let body = version_pr_body("main", false, false, &infos, 1200);

    assert!(body.contains("## @acme/core@2.0.0"));
    assert!(body.contains("has been omitted from this message"));
    assert!(!body.contains("Long entry"));
}

#[test]
fn test_written_changesets_are_read_back() {
    let dir = workspace();
    let root = dir.path();

    let id = write_changeset(
        root,
        &NewChangeset {
            summary: String::new(),
            releases: vec![
                Release::new("@acme/core", BumpType::Patch),
                Release::new("@acme/cli", BumpType::Patch),
            ],
        },
    )
    .unwrap();

    let state = read_changeset_state(root).unwrap();

    assert!(state.pre_state.is_none());
    assert_eq!(state.changesets.len(), 1);
    assert_eq!(state.changesets[0].id, id);
    assert_eq!(state.changesets[0].summary, "");
    assert_eq!(
        state.changesets[0].releases,
        vec![
            Release::new("@acme/core", BumpType::Patch),
            Release::new("@acme/cli", BumpType::Patch),
        ]
    );
    assert!(state.has_non_empty_changesets());
}

#[test]
fn test_pre_mode_hides_consumed_changesets() {
    let dir = workspace();
    let root = dir.path();
    common::write_file(
        root,
        ".changeset/brave-owls-sing.md",
        "---\n\"@acme/core\": minor\n---\n\nAdd streaming API.\n",
    );
    common::write_file(
        root,
        ".changeset/quiet-cats-run.md",
        "---\n\"@acme/cli\": patch\n---\n\nFix exit code.\n",
    );
    common::write_file(
        root,
        ".changeset/pre.json",
        r#"{
  "mode": "pre",
  "tag": "next",
  "initialVersions": { "@acme/core": "1.0.0", "@acme/cli": "0.4.2" },
  "changesets": ["brave-owls-sing"]
}"#,
    );

    let state = read_changeset_state(root).unwrap();

    let pre = state.pre_state.expect("pre mode is active");
    assert_eq!(pre.tag, "next");
    let ids: Vec<&str> = state.changesets.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["quiet-cats-run"]);
}
