// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by workspace storage and manifest operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required request field is missing or has the wrong type.
    #[error("invalid body: field `{field}` is missing or malformed")]
    InvalidBody { field: &'static str },

    /// A caller-supplied path resolves outside its sandbox root.
    #[error("path traversal detected: root={root:?} path={path:?}")]
    PathTraversal { root: PathBuf, path: PathBuf },

    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub fn is_invalid_body(&self) -> bool {
        matches!(self, Self::InvalidBody { .. })
    }

    pub fn is_path_traversal(&self) -> bool {
        matches!(self, Self::PathTraversal { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}
