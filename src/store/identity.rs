// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Caller-supplied owner/workspace identity and its filesystem-safe form.

use serde_json::Value;

pub const DEFAULT_OWNER_ID: &str = "unknown";
/// Workspace id assumed when a mutation body carries none.
pub const DEFAULT_MUTATION_WORKSPACE_ID: &str = "default";
/// Workspace id assumed when a manifest query carries none.
///
/// Differs from [`DEFAULT_MUTATION_WORKSPACE_ID`]; a request without a workspace id reads a
/// different directory than it writes.
pub const DEFAULT_MANIFEST_WORKSPACE_ID: &str = "unknown";

/// Replaces every character outside `[a-zA-Z0-9._-]` with `_`.
///
/// Absent input maps to the empty string. The result is stable under re-application.
pub fn sanitize(value: Option<&str>) -> String {
    value
        .unwrap_or_default()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

/// Defaulted, not yet sanitized identity of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    owner_id: String,
    workspace_id: String,
}

impl Identity {
    pub fn new(owner_id: impl Into<String>, workspace_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            workspace_id: workspace_id.into(),
        }
    }

    /// Identity of a mutation request body.
    ///
    /// Fields that are absent, empty or not strings fall back to the mutation defaults.
    pub fn from_body(body: &Value) -> Self {
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
        };

        Self::new(
            field("ownerId").unwrap_or(DEFAULT_OWNER_ID),
            field("workspaceId").unwrap_or(DEFAULT_MUTATION_WORKSPACE_ID),
        )
    }

    /// Identity of a manifest lookup.
    pub fn from_query(owner_id: Option<&str>, workspace_id: Option<&str>) -> Self {
        Self::new(
            owner_id
                .filter(|value| !value.is_empty())
                .unwrap_or(DEFAULT_OWNER_ID),
            workspace_id
                .filter(|value| !value.is_empty())
                .unwrap_or(DEFAULT_MANIFEST_WORKSPACE_ID),
        )
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn owner_segment(&self) -> String {
        sanitize(Some(&self.owner_id))
    }

    pub fn workspace_segment(&self) -> String {
        sanitize(Some(&self.workspace_id))
    }
}
