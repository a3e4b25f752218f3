// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Workspace storage on disk.
//!
//! The store maps identities to sandboxed directories under a storage root, applies file
//! mutations to them, and derives manifests from stored state or bundled templates.

mod error;
pub mod identity;
pub mod manifest;
pub mod mutation;
pub mod paths;
pub mod workspace;

pub use error::StoreError;
pub use identity::{
    sanitize, Identity, DEFAULT_MANIFEST_WORKSPACE_ID, DEFAULT_MUTATION_WORKSPACE_ID,
    DEFAULT_OWNER_ID,
};
pub use manifest::{empty_project_manifest, encode_dir_to_manifest, ManifestEntry};
pub use mutation::{EventKind, Mutation, UnknownEventKind};
pub use paths::{safe_join, user_root};
pub use workspace::WorkspaceStore;
