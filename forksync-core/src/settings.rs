//! Optional user settings.
//!
//! # Storage layout
//!
//! ```text
//! <config dir>/
//!   fork-sync/
//!     config.yaml
//! ```
//!
//! Every field is optional; a missing file means built-in defaults. CLI flags
//! take precedence over anything set here.
//!
//! Like the rest of the workspace, loaders come in two forms: `load_at(dir)`
//! with an explicit config root (used by tests), and `load()` which resolves
//! the root via `dirs::config_dir()`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, SettingsError};
use crate::runner::DEFAULT_TIMEOUT;

pub const APP_DIR: &str = "fork-sync";
pub const SETTINGS_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Remote name used when `--upstream` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
    /// Branch used when `--branch` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,
    pub update_check: UpdateCheckSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateCheckSettings {
    pub enabled: bool,
    /// Minimum number of days between two latest-version lookups.
    pub period_days: u32,
}

impl Default for UpdateCheckSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            period_days: 1,
        }
    }
}

impl Settings {
    pub fn command_timeout(&self) -> Duration {
        self.command_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}

/// `<config_root>/fork-sync/config.yaml`: pure, no I/O.
pub fn settings_path_at(config_root: &Path) -> PathBuf {
    config_root.join(APP_DIR).join(SETTINGS_FILE)
}

/// Load settings under `config_root`. Missing file yields defaults.
pub fn load_at(config_root: &Path) -> Result<Settings, SettingsError> {
    let path = settings_path_at(config_root);
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    let settings: Settings = serde_yaml::from_str(&contents)
        .map_err(|source| SettingsError::Parse { path: path.clone(), source })?;
    if settings.command_timeout_secs == Some(0) {
        return Err(SettingsError::Invalid {
            path,
            reason: "command_timeout_secs must be at least 1".to_string(),
        });
    }
    Ok(settings)
}

/// `load_at` using the platform config directory.
pub fn load() -> Result<Settings, SettingsError> {
    let root = dirs::config_dir().ok_or(SettingsError::ConfigDirNotFound)?;
    load_at(&root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_settings(root: &Path, yaml: &str) {
        let path = settings_path_at(root);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, yaml).unwrap();
    }

    #[test]
    fn defaults_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let settings = load_at(tmp.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.update_check.enabled);
        assert_eq!(settings.update_check.period_days, 1);
        assert_eq!(settings.command_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        write_settings(tmp.path(), "branch: main\ncommand_timeout_secs: 30\n");
        let settings = load_at(tmp.path()).unwrap();
        assert_eq!(settings.branch.as_deref(), Some("main"));
        assert_eq!(settings.upstream, None);
        assert_eq!(settings.command_timeout(), Duration::from_secs(30));
        assert!(settings.update_check.enabled);
    }

    #[test]
    fn nested_update_check_section() {
        let tmp = TempDir::new().unwrap();
        write_settings(tmp.path(), "update_check:\n  enabled: false\n  period_days: 7\n");
        let settings = load_at(tmp.path()).unwrap();
        assert!(!settings.update_check.enabled);
        assert_eq!(settings.update_check.period_days, 7);
    }

    #[test]
    fn empty_file_is_defaults() {
        let tmp = TempDir::new().unwrap();
        write_settings(tmp.path(), "\n");
        assert_eq!(load_at(tmp.path()).unwrap(), Settings::default());
    }

    #[test]
    fn corrupt_file_names_path() {
        let tmp = TempDir::new().unwrap();
        write_settings(tmp.path(), "branch: [unclosed\n");
        let err = load_at(tmp.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }), "got: {err}");
        assert!(err.to_string().contains("config.yaml"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let tmp = TempDir::new().unwrap();
        write_settings(tmp.path(), "brnach: main\n");
        assert!(matches!(
            load_at(tmp.path()).unwrap_err(),
            SettingsError::Parse { .. }
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let tmp = TempDir::new().unwrap();
        write_settings(tmp.path(), "command_timeout_secs: 0\n");
        let err = load_at(tmp.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }), "got: {err}");
        assert!(err.to_string().contains("command_timeout_secs"));
    }

    #[cfg(unix)]
    #[test]
    fn huge_timeout_loads_and_runs_without_deadline() {
        let tmp = TempDir::new().unwrap();
        write_settings(tmp.path(), "command_timeout_secs: 18446744073709551615\n");
        let settings = load_at(tmp.path()).unwrap();
        assert_eq!(settings.command_timeout(), Duration::from_secs(u64::MAX));

        let runner = crate::runner::ProcessRunner::new(crate::runner::RunnerConfig {
            timeout: settings.command_timeout(),
            ..Default::default()
        });
        let out = crate::runner::CommandRunner::run(
            &runner,
            &crate::types::Invocation::new("sh", ["-c", "echo ok"]),
        )
        .unwrap();
        assert_eq!(out.stdout, "ok\n");
    }
}
