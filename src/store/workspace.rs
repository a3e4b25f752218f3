// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use super::identity::Identity;
use super::mutation::Mutation;
use super::paths::{checked_user_root, safe_join};
use super::StoreError;

/// Filesystem-backed store of per-workspace file trees.
///
/// Every workspace lives at `storage_root / owner / workspace`. The tree on disk is the only
/// state; nothing is cached between requests.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    storage_root: PathBuf,
    template_root: PathBuf,
}

impl WorkspaceStore {
    pub fn new(storage_root: impl Into<PathBuf>, template_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            template_root: template_root.into(),
        }
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    pub fn template_root(&self) -> &Path {
        &self.template_root
    }

    /// Directory holding `identity`'s files. Does not create it.
    pub fn workspace_root(&self, identity: &Identity) -> Result<PathBuf, StoreError> {
        checked_user_root(&self.storage_root, identity)
    }

    pub async fn ensure_storage_root(&self) -> Result<(), StoreError> {
        ensure_dir(&self.storage_root).await
    }

    pub async fn apply(&self, identity: &Identity, mutation: &Mutation) -> Result<(), StoreError> {
        match mutation {
            Mutation::Snapshot { path, content } => {
                self.write_snapshot(identity, path, content).await
            }
            Mutation::Create { path, is_directory } => {
                self.create_entry(identity, path, *is_directory).await
            }
            Mutation::Delete { path } => self.delete_entry(identity, path).await,
            Mutation::Rename { old_path, new_path } => {
                self.rename_entry(identity, old_path, new_path).await
            }
            Mutation::Heartbeat => Ok(()),
        }
    }

    /// Replaces the full content of `path`, creating the workspace and parents as needed.
    pub async fn write_snapshot(
        &self,
        identity: &Identity,
        path: &str,
        content: &[u8],
    ) -> Result<(), StoreError> {
        let root = self.workspace_root(identity)?;
        let abs = safe_join(&root, path)?;
        ensure_dir(&root).await?;
        ensure_parent(&abs).await?;

        fs::write(&abs, content).await.map_err(StoreError::io(&abs))?;
        debug!(path = %abs.display(), bytes = content.len(), "wrote snapshot");
        Ok(())
    }

    /// Creates a directory (recursively) or an empty file.
    ///
    /// An entry that already exists at `path` is left untouched.
    pub async fn create_entry(
        &self,
        identity: &Identity,
        path: &str,
        is_directory: bool,
    ) -> Result<(), StoreError> {
        let root = self.workspace_root(identity)?;
        let abs = safe_join(&root, path)?;

        if is_directory {
            ensure_dir(&abs).await?;
            debug!(path = %abs.display(), "created directory");
            return Ok(());
        }

        ensure_parent(&abs).await?;
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&abs)
            .await
        {
            Ok(_) => {
                debug!(path = %abs.display(), "created empty file");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(source) => Err(StoreError::Io { path: abs, source }),
        }
    }

    /// Removes a file or a whole directory tree. A missing target is not an error.
    ///
    /// Symlinks are unlinked, never followed.
    pub async fn delete_entry(&self, identity: &Identity, path: &str) -> Result<(), StoreError> {
        let root = self.workspace_root(identity)?;
        let abs = safe_join(&root, path)?;

        let metadata = match fs::symlink_metadata(&abs).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => return Err(StoreError::Io { path: abs, source }),
        };

        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&abs).await
        } else {
            fs::remove_file(&abs).await
        };
        match removed {
            Ok(()) => {
                debug!(path = %abs.display(), "deleted entry");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path: abs, source }),
        }
    }

    /// Moves `old_path` to `new_path` within the same workspace.
    pub async fn rename_entry(
        &self,
        identity: &Identity,
        old_path: &str,
        new_path: &str,
    ) -> Result<(), StoreError> {
        let root = self.workspace_root(identity)?;
        let old_abs = safe_join(&root, old_path)?;
        let new_abs = safe_join(&root, new_path)?;

        // Missing sources fail before any destination directories are created.
        fs::symlink_metadata(&old_abs)
            .await
            .map_err(StoreError::io(&old_abs))?;
        ensure_parent(&new_abs).await?;

        fs::rename(&old_abs, &new_abs)
            .await
            .map_err(StoreError::io(&old_abs))?;
        debug!(from = %old_abs.display(), to = %new_abs.display(), "renamed entry");
        Ok(())
    }
}

async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(path).await.map_err(StoreError::io(path))
}

async fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(parent) => ensure_dir(parent).await,
        None => Ok(()),
    }
}
