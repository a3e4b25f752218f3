// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-WorkspaceLaunch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workspace Launch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Process configuration: listen port, project root discovery, storage and template roots.
//!
//! Resolution is a pure function of an [`EnvSnapshot`] and CLI [`Overrides`], apart from
//! probing the filesystem for project markers and template directories.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::store::paths::normalize_lexically;

pub const DEFAULT_PORT: u16 = 8787;
/// Per-project data directory holding `storage/` and, optionally, `templates/`.
pub const DATA_DIR_NAME: &str = ".workspace-launch";

/// Variables consulted for the project root, in priority order. The current directory is
/// tried last.
const PROJECT_ROOT_VARS: [&str; 4] = [
    "WORKSPACE_LAUNCH_PROJECT_ROOT",
    "INIT_CWD",
    "PWD",
    "npm_config_local_prefix",
];
const PROJECT_MARKERS: [&str; 2] = ["package.json", "Cargo.toml"];
const EXCLUDED_SEGMENT: &str = "node_modules";
/// Shared-data location of bundled templates under an install prefix.
const SHARE_TEMPLATES: &str = "share/workspace-launch/templates";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] io::Error),
}

/// Captured environment variables, working directory and executable location.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
    current_dir: PathBuf,
    exe_dir: Option<PathBuf>,
}

impl EnvSnapshot {
    pub fn capture() -> Result<Self, ConfigError> {
        let current_dir = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Ok(Self {
            vars: std::env::vars().collect(),
            current_dir,
            exe_dir,
        })
    }

    pub fn new(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: BTreeMap::new(),
            current_dir: current_dir.into(),
            exe_dir: None,
        }
    }

    pub fn with_exe_dir(mut self, exe_dir: impl Into<PathBuf>) -> Self {
        self.exe_dir = Some(exe_dir.into());
        self
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Empty values count as unset.
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Directory of the running executable, when it could be determined.
    pub fn exe_dir(&self) -> Option<&Path> {
        self.exe_dir.as_deref()
    }

    fn absolute(&self, path: impl AsRef<Path>) -> PathBuf {
        normalize_lexically(&self.current_dir.join(path))
    }
}

/// Values given on the command line; they win over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub storage_root: Option<PathBuf>,
    pub template_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    Explicit,
    ProjectData,
    Bundled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub project_root: PathBuf,
    pub data_root: PathBuf,
    pub storage_root: PathBuf,
    pub template_root: PathBuf,
    pub template_source: TemplateSource,
}

impl Settings {
    pub fn from_env(overrides: &Overrides) -> Result<Self, ConfigError> {
        Ok(Self::resolve(&EnvSnapshot::capture()?, overrides))
    }

    pub fn resolve(env: &EnvSnapshot, overrides: &Overrides) -> Self {
        let port = overrides.port.unwrap_or_else(|| resolve_port(env));
        let project_root = resolve_project_root(env);
        let data_root = project_root.join(DATA_DIR_NAME);

        let storage_root = match (&overrides.storage_root, env.var("STORAGE_ROOT")) {
            (Some(path), _) => env.absolute(path),
            (None, Some(raw)) => env.absolute(raw),
            (None, None) => data_root.join("storage"),
        };

        let (template_root, template_source) =
            match (&overrides.template_root, env.var("TEMPLATE_ROOT")) {
                (Some(path), _) => (env.absolute(path), TemplateSource::Explicit),
                (None, Some(raw)) => (env.absolute(raw), TemplateSource::Explicit),
                (None, None) => {
                    let project_templates = data_root.join("templates");
                    if project_templates.exists() {
                        (project_templates, TemplateSource::ProjectData)
                    } else {
                        (bundled_template_root(env), TemplateSource::Bundled)
                    }
                }
            };

        Self {
            port,
            project_root,
            data_root,
            storage_root,
            template_root,
            template_source,
        }
    }
}

/// Templates shipped alongside the executable.
///
/// Looks for `templates/` and `share/workspace-launch/templates` in the executable's
/// directory and its two parents, which covers a flat bundle, an install prefix, and
/// `target/<profile>` inside a checkout. When none exists the result is `<exe dir>/templates`
/// (or `<cwd>/templates`), so manifests fall through to the empty project.
pub fn bundled_template_root(env: &EnvSnapshot) -> PathBuf {
    let base = env.exe_dir().unwrap_or_else(|| env.current_dir());
    base.ancestors()
        .take(3)
        .flat_map(|dir| [dir.join("templates"), dir.join(SHARE_TEMPLATES)])
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| base.join("templates"))
}

fn resolve_port(env: &EnvSnapshot) -> u16 {
    env.var("PORT")
        .and_then(|raw| raw.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

fn candidate_roots(env: &EnvSnapshot) -> Vec<PathBuf> {
    let mut out = Vec::<PathBuf>::new();
    let raw = PROJECT_ROOT_VARS
        .iter()
        .filter_map(|key| env.var(key).map(PathBuf::from))
        .chain(std::iter::once(env.current_dir().to_path_buf()));
    for candidate in raw {
        let candidate = env.absolute(candidate);
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

fn inside_node_modules(path: &Path) -> bool {
    path.components()
        .any(|component| component.as_os_str() == EXCLUDED_SEGMENT)
}

/// First candidate outside `node_modules` that holds a project marker, else the first one
/// outside `node_modules`, else the first candidate.
fn resolve_project_root(env: &EnvSnapshot) -> PathBuf {
    let candidates = candidate_roots(env);

    let outside = || candidates.iter().filter(|c| !inside_node_modules(c));

    outside()
        .find(|candidate| {
            PROJECT_MARKERS
                .iter()
                .any(|marker| candidate.join(marker).is_file())
        })
        .or_else(|| outside().next())
        .or_else(|| candidates.first())
        .cloned()
        .unwrap_or_else(|| env.current_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    #[case(None, DEFAULT_PORT)]
    #[case(Some("9000"), 9000)]
    #[case(Some(" 9001 "), 9001)]
    #[case(Some("not-a-port"), DEFAULT_PORT)]
    #[case(Some("70000"), DEFAULT_PORT)]
    #[case(Some(""), DEFAULT_PORT)]
    fn port_falls_back_to_default(#[case] raw: Option<&str>, #[case] expected: u16) {
        let mut env = EnvSnapshot::new("/work");
        if let Some(raw) = raw {
            env = env.with_var("PORT", raw);
        }
        assert_eq!(Settings::resolve(&env, &Overrides::default()).port, expected);
    }

    #[test]
    fn cli_port_wins_over_env() {
        let env = EnvSnapshot::new("/work").with_var("PORT", "9000");
        let overrides = Overrides {
            port: Some(1234),
            ..Overrides::default()
        };
        assert_eq!(Settings::resolve(&env, &overrides).port, 1234);
    }

    #[test]
    fn project_root_prefers_candidate_with_marker() {
        let tmp = TempDir::new().unwrap();
        let plain = tmp.path().join("plain");
        let project = tmp.path().join("project");
        std::fs::create_dir_all(&plain).unwrap();
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(project.join("package.json"), "{}").unwrap();

        let env = EnvSnapshot::new(&project).with_var("INIT_CWD", plain.to_string_lossy());
        let settings = Settings::resolve(&env, &Overrides::default());
        assert_eq!(settings.project_root, project);
        assert_eq!(settings.data_root, project.join(DATA_DIR_NAME));
        assert_eq!(settings.storage_root, project.join(".workspace-launch/storage"));
    }

    #[test]
    fn project_root_skips_node_modules() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("app/node_modules/workspace-launch");
        let app = tmp.path().join("app");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("package.json"), "{}").unwrap();

        let env = EnvSnapshot::new(&app)
            .with_var("WORKSPACE_LAUNCH_PROJECT_ROOT", nested.to_string_lossy());
        let settings = Settings::resolve(&env, &Overrides::default());
        assert_eq!(settings.project_root, app);
    }

    #[test]
    fn project_root_falls_back_to_first_candidate() {
        let env = EnvSnapshot::new("/srv/node_modules/pkg");
        let settings = Settings::resolve(&env, &Overrides::default());
        assert_eq!(settings.project_root, Path::new("/srv/node_modules/pkg"));
    }

    #[test]
    fn relative_roots_resolve_against_current_dir() {
        let env = EnvSnapshot::new("/work")
            .with_var("STORAGE_ROOT", "data/../store")
            .with_var("TEMPLATE_ROOT", "tpl");
        let settings = Settings::resolve(&env, &Overrides::default());
        assert_eq!(settings.storage_root, Path::new("/work/store"));
        assert_eq!(settings.template_root, Path::new("/work/tpl"));
        assert_eq!(settings.template_source, TemplateSource::Explicit);
    }

    #[test]
    fn cli_roots_win_over_env() {
        let env = EnvSnapshot::new("/work")
            .with_var("STORAGE_ROOT", "/env/storage")
            .with_var("TEMPLATE_ROOT", "/env/templates");
        let overrides = Overrides {
            port: None,
            storage_root: Some(PathBuf::from("/cli/storage")),
            template_root: Some(PathBuf::from("/cli/templates")),
        };
        let settings = Settings::resolve(&env, &overrides);
        assert_eq!(settings.storage_root, Path::new("/cli/storage"));
        assert_eq!(settings.template_root, Path::new("/cli/templates"));
    }

    #[test]
    fn template_root_prefers_project_data_dir() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().to_path_buf();
        std::fs::write(project.join("Cargo.toml"), "").unwrap();

        let env = EnvSnapshot::new(&project).with_exe_dir(project.join("bin"));
        let settings = Settings::resolve(&env, &Overrides::default());
        assert_eq!(settings.template_source, TemplateSource::Bundled);
        assert_eq!(settings.template_root, bundled_template_root(&env));

        std::fs::create_dir_all(project.join(".workspace-launch/templates")).unwrap();
        let settings = Settings::resolve(&env, &Overrides::default());
        assert_eq!(settings.template_source, TemplateSource::ProjectData);
        assert_eq!(settings.template_root, project.join(".workspace-launch/templates"));
    }

    #[rstest]
    #[case::flat_bundle("app", "app/templates")]
    #[case::install_prefix("usr/bin", "usr/share/workspace-launch/templates")]
    #[case::cargo_target("checkout/target/release", "checkout/templates")]
    fn bundled_templates_resolve_from_executable(#[case] exe_dir: &str, #[case] templates: &str) {
        let tmp = TempDir::new().unwrap();
        let exe_dir = tmp.path().join(exe_dir);
        let templates = tmp.path().join(templates);
        std::fs::create_dir_all(&exe_dir).unwrap();
        std::fs::create_dir_all(templates.join("demo")).unwrap();

        let env = EnvSnapshot::new(tmp.path().join("elsewhere")).with_exe_dir(&exe_dir);
        assert_eq!(bundled_template_root(&env), templates);

        let settings = Settings::resolve(&env, &Overrides::default());
        assert_eq!(settings.template_source, TemplateSource::Bundled);
        assert_eq!(settings.template_root, templates);
    }

    #[test]
    fn bundled_templates_do_not_depend_on_build_directory() {
        let tmp = TempDir::new().unwrap();
        let exe_dir = tmp.path().join("opt/launch");
        std::fs::create_dir_all(&exe_dir).unwrap();

        let env = EnvSnapshot::new(tmp.path()).with_exe_dir(&exe_dir);
        let root = bundled_template_root(&env);
        assert_eq!(root, exe_dir.join("templates"));
        assert!(!root.starts_with(env!("CARGO_MANIFEST_DIR")));
    }
}
