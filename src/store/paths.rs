// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Sandboxed path resolution under trusted roots.

use std::path::{Component, Path, PathBuf};

use super::identity::Identity;
use super::StoreError;

/// Collapses `.` and `..` components without touching the filesystem.
///
/// `..` at the filesystem root stays at the root. Symlinks are not resolved.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Resolves `relative` against `root` and refuses anything that lands outside it.
///
/// An absolute `relative` replaces `root` before normalization and is then rejected by the
/// containment check like any other escape.
pub fn safe_join(root: &Path, relative: &str) -> Result<PathBuf, StoreError> {
    let root = normalize_lexically(root);
    let target = normalize_lexically(&root.join(relative));

    // Component-wise prefix: `/tmp/root2` is not inside `/tmp/root`.
    if target == root || target.starts_with(&root) {
        Ok(target)
    } else {
        Err(StoreError::PathTraversal {
            root,
            path: PathBuf::from(relative),
        })
    }
}

/// `storage_root / owner / workspace` with both segments sanitized. Does no I/O.
pub fn user_root(storage_root: &Path, identity: &Identity) -> PathBuf {
    storage_root
        .join(identity.owner_segment())
        .join(identity.workspace_segment())
}

/// Like [`user_root`], but rejects identities whose sanitized segments are `.` or `..`.
///
/// Those survive sanitization and would alias or escape the storage root.
pub fn checked_user_root(storage_root: &Path, identity: &Identity) -> Result<PathBuf, StoreError> {
    check_segment(storage_root, &identity.owner_segment())?;
    check_segment(storage_root, &identity.workspace_segment())?;
    Ok(user_root(storage_root, identity))
}

/// Template directory named after the sanitized workspace id.
pub fn checked_template_dir(
    template_root: &Path,
    identity: &Identity,
) -> Result<PathBuf, StoreError> {
    let segment = identity.workspace_segment();
    check_segment(template_root, &segment)?;
    Ok(template_root.join(segment))
}

fn check_segment(root: &Path, segment: &str) -> Result<(), StoreError> {
    if segment == "." || segment == ".." {
        return Err(StoreError::PathTraversal {
            root: root.to_path_buf(),
            path: PathBuf::from(segment),
        });
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use rstest::rstest;

    use super::*;

    const ROOT: &str = "/tmp/root";

    #[test]
    fn joins_plain_relative_path() {
        let joined = safe_join(Path::new(ROOT), "foo").unwrap();
        assert_eq!(joined, Path::new("/tmp/root/foo"));
    }

    #[rstest]
    #[case("", "/tmp/root")]
    #[case(".", "/tmp/root")]
    #[case("a/./b", "/tmp/root/a/b")]
    #[case("a/../b", "/tmp/root/b")]
    #[case("a/b/../../c.txt", "/tmp/root/c.txt")]
    #[case("dir/", "/tmp/root/dir")]
    #[case("..\\foo", "/tmp/root/..\\foo")]
    fn normalizes_inside_root(#[case] relative: &str, #[case] expected: &str) {
        assert_eq!(safe_join(Path::new(ROOT), relative).unwrap(), Path::new(expected));
    }

    #[rstest]
    #[case("../foo")]
    #[case("/etc/passwd")]
    #[case("a/../../foo")]
    #[case("../root2/file")]
    #[case("../../../../../../etc/shadow")]
    fn rejects_escapes(#[case] relative: &str) {
        let err = safe_join(Path::new(ROOT), relative).unwrap_err();
        assert!(err.is_path_traversal(), "{relative:?} -> {err}");
    }

    #[test]
    fn root_with_trailing_separator_is_equivalent() {
        let joined = safe_join(Path::new("/tmp/root/"), "x").unwrap();
        assert_eq!(joined, Path::new("/tmp/root/x"));
        assert!(safe_join(Path::new("/tmp/root/"), "../x").is_err());
    }

    #[test]
    fn absolute_path_inside_root_is_accepted() {
        let joined = safe_join(Path::new(ROOT), "/tmp/root/inner").unwrap();
        assert_eq!(joined, Path::new("/tmp/root/inner"));
    }

    #[test]
    fn normalize_keeps_parent_at_filesystem_root() {
        assert_eq!(normalize_lexically(Path::new("/../a")), Path::new("/a"));
    }

    #[test]
    fn user_root_composes_sanitized_segments() {
        let identity = Identity::new("alice@example.com", "demo space");
        assert_eq!(
            user_root(Path::new("/srv/storage"), &identity),
            Path::new("/srv/storage/alice_example.com/demo_space")
        );
    }

    #[rstest]
    #[case("..", "ws")]
    #[case("alice", "..")]
    #[case(".", "ws")]
    fn checked_user_root_rejects_dot_segments(#[case] owner: &str, #[case] workspace: &str) {
        let identity = Identity::new(owner, workspace);
        let err = checked_user_root(Path::new("/srv/storage"), &identity).unwrap_err();
        assert!(err.is_path_traversal());
    }

    #[test]
    fn checked_template_dir_rejects_parent_segment() {
        let identity = Identity::new("alice", "..");
        assert!(checked_template_dir(Path::new("/srv/templates"), &identity).is_err());

        let identity = Identity::new("alice", "demo");
        assert_eq!(
            checked_template_dir(Path::new("/srv/templates"), &identity).unwrap(),
            Path::new("/srv/templates/demo")
        );
    }
}
