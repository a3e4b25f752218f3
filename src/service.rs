// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Request orchestration between the transport, the workspace store and the event log.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::events::{EventLog, EventRecord};
use crate::store::{EventKind, Identity, ManifestEntry, Mutation, StoreError, WorkspaceStore};

#[derive(Clone)]
pub struct SyncService {
    store: Arc<WorkspaceStore>,
    events: Arc<dyn EventLog>,
}

impl SyncService {
    pub fn new(store: WorkspaceStore, events: Arc<dyn EventLog>) -> Self {
        Self {
            store: Arc::new(store),
            events,
        }
    }

    pub fn store(&self) -> &WorkspaceStore {
        &self.store
    }

    /// Validates and applies one event request, then records it.
    ///
    /// Heartbeats are recorded unconditionally. A request that fails validation or application
    /// is not recorded.
    pub async fn handle_event(&self, kind: EventKind, body: Value) -> Result<(), StoreError> {
        let mutation = Mutation::from_body(kind, &body)?;
        let identity = Identity::from_body(&body);

        self.store.apply(&identity, &mutation).await?;
        debug!(
            kind = %kind,
            owner_id = identity.owner_id(),
            workspace_id = identity.workspace_id(),
            "event accepted"
        );
        self.events.append(EventRecord::now(kind, body));
        Ok(())
    }

    pub async fn manifest(
        &self,
        owner_id: Option<&str>,
        workspace_id: Option<&str>,
    ) -> Result<Vec<ManifestEntry>, StoreError> {
        let identity = Identity::from_query(owner_id, workspace_id);
        self.store.load_manifest(&identity).await
    }

    pub fn audit(&self) -> Vec<EventRecord> {
        self.events.read_all()
    }
}
