// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Append-only audit log of accepted event requests.
//!
//! Records are kept for inspection only; nothing reads them back to make decisions.

use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::EventKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Request body exactly as received.
    pub body: Value,
    /// Acceptance time in milliseconds since the Unix epoch.
    pub time: u64,
}

impl EventRecord {
    pub fn now(kind: EventKind, body: Value) -> Self {
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self { kind, body, time }
    }
}

/// Sink for accepted requests, shared across request handlers.
pub trait EventLog: Send + Sync {
    fn append(&self, record: EventRecord);

    /// Every record so far, in arrival order.
    fn read_all(&self) -> Vec<EventRecord>;
}

/// Process-local [`EventLog`].
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    records: RwLock<Vec<EventRecord>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventLog for InMemoryEventLog {
    fn append(&self, record: EventRecord) {
        // Push is the only mutation, so a poisoned log is still consistent.
        let mut records = self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.push(record);
    }

    fn read_all(&self) -> Vec<EventRecord> {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
