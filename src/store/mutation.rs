// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Typed mutation payloads and their validation from raw request bodies.

use std::fmt;
use std::str::FromStr;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::StoreError;

/// Standard alphabet, padding optional on decode.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Kind of an inbound event request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    FileSnapshot,
    Create,
    Delete,
    Rename,
    Heartbeat,
}

impl EventKind {
    pub const ALL: [Self; 5] = [
        Self::FileSnapshot,
        Self::Create,
        Self::Delete,
        Self::Rename,
        Self::Heartbeat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FileSnapshot => "fileSnapshot",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Rename => "rename",
            Self::Heartbeat => "heartbeat",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event kind {0:?}")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .ok_or_else(|| UnknownEventKind(raw.to_owned()))
    }
}

/// A validated workspace mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Full-content overwrite of one file with already decoded bytes.
    Snapshot { path: String, content: Vec<u8> },
    Create { path: String, is_directory: bool },
    Delete { path: String },
    Rename { old_path: String, new_path: String },
    /// Liveness signal; touches nothing.
    Heartbeat,
}

impl Mutation {
    /// Validates `body` for `kind`. Never touches the filesystem.
    pub fn from_body(kind: EventKind, body: &Value) -> Result<Self, StoreError> {
        match kind {
            EventKind::FileSnapshot => {
                let path = required_str(body, "path")?;
                let content = required_str(body, "content")?;
                let content = LENIENT_BASE64
                    .decode(content.trim())
                    .map_err(|_| StoreError::InvalidBody { field: "content" })?;
                Ok(Self::Snapshot {
                    path: path.to_owned(),
                    content,
                })
            }
            EventKind::Create => Ok(Self::Create {
                path: required_str(body, "path")?.to_owned(),
                is_directory: body
                    .get("isDirectory")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            }),
            EventKind::Delete => Ok(Self::Delete {
                path: required_str(body, "path")?.to_owned(),
            }),
            EventKind::Rename => Ok(Self::Rename {
                old_path: required_str(body, "oldPath")?.to_owned(),
                new_path: required_str(body, "newPath")?.to_owned(),
            }),
            EventKind::Heartbeat => Ok(Self::Heartbeat),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Snapshot { .. } => EventKind::FileSnapshot,
            Self::Create { .. } => EventKind::Create,
            Self::Delete { .. } => EventKind::Delete,
            Self::Rename { .. } => EventKind::Rename,
            Self::Heartbeat => EventKind::Heartbeat,
        }
    }
}

fn required_str<'a>(body: &'a Value, field: &'static str) -> Result<&'a str, StoreError> {
    body.get(field)
        .and_then(Value::as_str)
        .ok_or(StoreError::InvalidBody { field })
}
