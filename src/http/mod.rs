// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP surface consumed by the editor extension.
//!
//! - `GET /manifest?ownerId=&workspaceId=` returns the workspace manifest.
//! - `POST /event/{kind}` accepts `fileSnapshot`, `create`, `delete`, `rename`, `heartbeat`.
//! - `GET /_events` dumps the audit log.

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, Query, Request, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

use crate::service::SyncService;
use crate::store::{EventKind, StoreError};

/// Request bodies carry whole files as base64.
pub const MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Serialize)]
struct Ack {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Ack {
    fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }
}

pub fn router(service: SyncService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/manifest", get(get_manifest))
        .route("/event/{kind}", post(post_event))
        .route("/_events", get(get_events))
        .layer(middleware::from_fn(answer_options))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(service)
}

/// `OPTIONS` without preflight headers never reaches a handler; preflights are answered by
/// the CORS layer before this runs.
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(request).await
}

/// First value of `key`; repeated query keys behave like an array whose head is used.
fn first_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

async fn get_manifest(
    State(service): State<SyncService>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let owner_id = first_param(&params, "ownerId");
    let workspace_id = first_param(&params, "workspaceId");

    match service.manifest(owner_id, workspace_id).await {
        Ok(manifest) => Json(manifest).into_response(),
        Err(err) => {
            error!(error = %err, "manifest error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Ack::failed(client_message(&err))),
            )
                .into_response()
        }
    }
}

async fn post_event(
    State(service): State<SyncService>,
    Path(kind): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(kind) = kind.parse::<EventKind>() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) if kind == EventKind::Heartbeat => {
            debug!(%rejection, "heartbeat without json body");
            Value::Object(Map::new())
        }
        Err(rejection) => {
            debug!(kind = %kind, %rejection, "unreadable event body");
            return (StatusCode::BAD_REQUEST, Json(Ack::failed("invalid body"))).into_response();
        }
    };

    match service.handle_event(kind, body).await {
        Ok(()) => Json(Ack::ok()).into_response(),
        Err(err) => {
            error!(kind = %kind, error = %err, "event error");
            (StatusCode::BAD_REQUEST, Json(Ack::failed(client_message(&err)))).into_response()
        }
    }
}

async fn get_events(State(service): State<SyncService>) -> Response {
    Json(service.audit()).into_response()
}

/// Message returned to the caller; sandbox roots stay server-side.
fn client_message(err: &StoreError) -> String {
    match err {
        StoreError::InvalidBody { .. } => "invalid body".to_owned(),
        StoreError::PathTraversal { .. } => "path traversal detected".to_owned(),
        StoreError::Io { source, .. } => format!("io error: {source}"),
    }
}
