// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic workspace trees for manifest benchmarks (no RNG).

use std::path::Path;

use tempfile::TempDir;

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// A handful of small web files.
    Small,
    /// Nested source tree with a bit over a hundred files.
    Medium,
    /// Few files of 1 MiB each.
    LargeFiles,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::LargeFiles => "large_files",
        }
    }

    /// (directories per level, depth, files per directory, bytes per file)
    fn shape(self) -> (usize, usize, usize, usize) {
        match self {
            Self::Small => (1, 1, 4, 256),
            Self::Medium => (4, 3, 6, 2 * 1024),
            Self::LargeFiles => (1, 1, 4, 1024 * 1024),
        }
    }
}

fn filler(len: usize, seed: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + ((i + seed) % 26) as u8).collect()
}

fn populate(dir: &Path, level: usize, case: Case, seed: &mut usize) {
    let (fanout, depth, files, bytes) = case.shape();
    std::fs::create_dir_all(dir).expect("create fixture dir");

    for n in 0..files {
        *seed += 1;
        std::fs::write(dir.join(format!("file_{n}.txt")), filler(bytes, *seed))
            .expect("write fixture file");
    }

    if level < depth {
        for n in 0..fanout {
            populate(&dir.join(format!("dir_{n}")), level + 1, case, seed);
        }
    }
}

/// Writes the tree for `case` into `dir`, creating it.
pub fn populate_workspace(dir: &Path, case: Case) {
    let mut seed = 0;
    populate(dir, 1, case, &mut seed);
}

/// Writes the tree for `case` under a fresh temp dir and returns it.
pub fn workspace(case: Case) -> TempDir {
    let tmp = tempfile::Builder::new()
        .prefix(&format!("workspace_launch_bench_{}_", case.id()))
        .tempdir()
        .expect("create temp dir");
    populate_workspace(tmp.path(), case);
    tmp
}
