// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Workspace Launch: per-workspace file synchronization backend.
//!
//! An editor extension pushes file mutations and heartbeats; the server mirrors them into a
//! sandboxed tree keyed by owner and workspace and serves manifests of the current state.

pub mod config;
pub mod events;
pub mod http;
pub mod service;
pub mod store;
pub mod telemetry;
