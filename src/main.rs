// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Workspace Launch server entrypoint.
//!
//! Serves the sync API on `http://0.0.0.0:<port>`. Roots and port come from CLI flags, then
//! `STORAGE_ROOT` / `TEMPLATE_ROOT` / `PORT`, then project-relative defaults.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use workspace_launch::config::{Overrides, Settings};
use workspace_launch::events::InMemoryEventLog;
use workspace_launch::service::SyncService;
use workspace_launch::store::WorkspaceStore;
use workspace_launch::telemetry::{init_logging, LogFormat};

#[derive(Debug, Parser)]
#[command(name = "workspace-launch-server", version, about)]
struct Cli {
    /// Port to listen on (0 = ephemeral). Defaults to $PORT, then 8787.
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding stored workspaces.
    #[arg(long, value_name = "DIR")]
    storage_root: Option<PathBuf>,

    /// Directory holding starter templates, one subdirectory per workspace id.
    #[arg(long, value_name = "DIR")]
    template_root: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            port: self.port,
            storage_root: self.storage_root.clone(),
            template_root: self.template_root.clone(),
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let store = WorkspaceStore::new(&settings.storage_root, &settings.template_root);
    store
        .ensure_storage_root()
        .await
        .context("cannot create storage root")?;

    let service = SyncService::new(store, Arc::new(InMemoryEventLog::new()));
    let router = workspace_launch::http::router(service);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", settings.port))
        .await
        .with_context(|| format!("cannot bind port {}", settings.port))?;
    let port = listener.local_addr()?.port();

    info!(url = %format!("http://localhost:{port}"), "server listening");
    info!("manifest: GET /manifest?ownerId=alice&workspaceId=demo");
    info!("events:   GET /_events");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")
}

fn main() {
    let cli = Cli::parse();

    let result = (|| -> anyhow::Result<()> {
        init_logging(cli.log_format)?;

        let settings = Settings::from_env(&cli.overrides())?;
        info!(
            project_root = %settings.project_root.display(),
            storage_root = %settings.storage_root.display(),
            template_root = %settings.template_root.display(),
            template_source = ?settings.template_source,
            "resolved configuration"
        );
        if !settings.template_root.is_dir() {
            warn!(
                template_root = %settings.template_root.display(),
                "template root missing; workspaces without stored state get the empty project"
            );
        }

        // One worker thread: requests interleave on non-blocking I/O.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(serve(settings))
    })();

    if let Err(err) = result {
        eprintln!("workspace-launch-server: {err:#}");
        std::process::exit(1);
    }
}
