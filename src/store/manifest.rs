// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Manifest derivation: stored workspace, then bundled template, then an empty project.

use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use super::identity::Identity;
use super::paths::checked_template_dir;
use super::workspace::WorkspaceStore;
use super::StoreError;

/// Files of the built-in skeleton served when neither stored state nor a template exists.
pub const EMPTY_PROJECT_FILES: [&str; 3] = ["index.html", "index.js", "index.css"];

/// One entry of a workspace manifest.
///
/// Paths are `/`-separated and relative to the workspace root. Directory paths end with `/`,
/// except the synthetic root entry whose path is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ManifestEntry {
    Directory {
        path: String,
    },
    File {
        path: String,
        #[serde(rename = "contentBase64")]
        content_base64: String,
    },
}

impl ManifestEntry {
    pub fn root() -> Self {
        Self::Directory {
            path: String::new(),
        }
    }

    pub fn directory(relative: &str) -> Self {
        Self::Directory {
            path: format!("{relative}/"),
        }
    }

    pub fn file(relative: impl Into<String>, content: &[u8]) -> Self {
        Self::File {
            path: relative.into(),
            content_base64: STANDARD.encode(content),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Directory { path } | Self::File { path, .. } => path,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }
}

/// Root entry plus the three empty skeleton files.
pub fn empty_project_manifest() -> Vec<ManifestEntry> {
    let mut manifest = vec![ManifestEntry::root()];
    manifest.extend(
        EMPTY_PROJECT_FILES
            .iter()
            .map(|name| ManifestEntry::file(*name, &[])),
    );
    manifest
}

#[derive(Debug)]
struct PendingEntry {
    abs: PathBuf,
    relative: String,
    is_dir: bool,
}

/// Walks `dir` depth-first, emitting each directory before its contents.
///
/// Siblings are visited in file-name order. Symlinks and special files are skipped, so the
/// walk cannot loop. The synthetic root entry is not included.
pub async fn encode_dir_to_manifest(dir: &Path) -> Result<Vec<ManifestEntry>, StoreError> {
    let mut out = Vec::new();
    let mut stack = Vec::new();
    push_children(dir, "", &mut stack).await?;

    while let Some(entry) = stack.pop() {
        if entry.is_dir {
            out.push(ManifestEntry::directory(&entry.relative));
            push_children(&entry.abs, &entry.relative, &mut stack).await?;
        } else {
            let content = fs::read(&entry.abs)
                .await
                .map_err(StoreError::io(&entry.abs))?;
            out.push(ManifestEntry::file(entry.relative, &content));
        }
    }

    Ok(out)
}

/// Pushes the regular files and directories of `dir` so that the first by name pops first.
async fn push_children(
    dir: &Path,
    base: &str,
    stack: &mut Vec<PendingEntry>,
) -> Result<(), StoreError> {
    let mut read_dir = fs::read_dir(dir).await.map_err(StoreError::io(dir))?;
    let mut children = Vec::new();

    while let Some(child) = read_dir.next_entry().await.map_err(StoreError::io(dir))? {
        let abs = child.path();
        // `DirEntry::file_type` does not follow symlinks.
        let file_type = child.file_type().await.map_err(StoreError::io(&abs))?;
        if !file_type.is_dir() && !file_type.is_file() {
            continue;
        }

        let name = child.file_name().to_string_lossy().into_owned();
        let relative = if base.is_empty() {
            name
        } else {
            format!("{base}/{name}")
        };
        children.push(PendingEntry {
            abs,
            relative,
            is_dir: file_type.is_dir(),
        });
    }

    children.sort_by(|a, b| b.relative.cmp(&a.relative));
    stack.extend(children);
    Ok(())
}

async fn is_dir(path: &Path) -> Result<bool, StoreError> {
    match fs::metadata(path).await {
        Ok(metadata) => Ok(metadata.is_dir()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

async fn directory_has_contents(path: &Path) -> Result<bool, StoreError> {
    if !is_dir(path).await? {
        return Ok(false);
    }
    let mut read_dir = fs::read_dir(path).await.map_err(StoreError::io(path))?;
    let first = read_dir.next_entry().await.map_err(StoreError::io(path))?;
    Ok(first.is_some())
}

impl WorkspaceStore {
    /// Current manifest for `identity`, recomputed from disk on every call.
    ///
    /// A non-empty stored workspace wins; otherwise the template named after the sanitized
    /// workspace id; otherwise [`empty_project_manifest`].
    pub async fn load_manifest(
        &self,
        identity: &Identity,
    ) -> Result<Vec<ManifestEntry>, StoreError> {
        let storage_dir = self.workspace_root(identity)?;
        if directory_has_contents(&storage_dir).await? {
            debug!(dir = %storage_dir.display(), "manifest from stored workspace");
            return Ok(with_root(encode_dir_to_manifest(&storage_dir).await?));
        }

        let template_dir = checked_template_dir(self.template_root(), identity)?;
        if is_dir(&template_dir).await? {
            debug!(dir = %template_dir.display(), "manifest from template");
            return Ok(with_root(encode_dir_to_manifest(&template_dir).await?));
        }

        debug!(
            owner_id = identity.owner_id(),
            workspace_id = identity.workspace_id(),
            "manifest from empty project skeleton"
        );
        Ok(empty_project_manifest())
    }
}

fn with_root(mut entries: Vec<ManifestEntry>) -> Vec<ManifestEntry> {
    entries.insert(0, ManifestEntry::root());
    entries
}
