//! Time-to-live gate over the latest-version lookup.
//!
//! Persists an [`UpdateCacheRecord`] JSON document at
//! `<cache dir>/fork-sync/update-check.json`. Writes use the `.tmp` + rename
//! pattern so an interrupted run never leaves a truncated record behind.
//!
//! A missing, unreadable, or malformed record means "never checked". After
//! every check attempt the record is rewritten with the current time, whether
//! or not the lookup succeeded.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, UpdateError};
use crate::lookup::VersionLookup;

const APP_DIR: &str = "fork-sync";
const CACHE_FILE: &str = "update-check.json";
const MS_PER_DAY: i64 = 86_400_000;

/// On-disk record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateCacheRecord {
    /// Epoch milliseconds of the last check attempt.
    #[serde(rename = "lastChecked", default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<i64>,
}

/// What a call to [`UpdateCache::check_for_update`] concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    /// Record was younger than the period; no lookup made.
    Fresh,
    UpToDate { latest: String },
    /// A newer release exists (or debug mode forces the alert).
    Available { current: String, latest: String },
    /// The lookup itself failed; the record was still rewritten.
    Failed { reason: String },
}

/// `<cache_root>/fork-sync/update-check.json`: pure, no I/O.
pub fn cache_path_at(cache_root: &Path) -> PathBuf {
    cache_root.join(APP_DIR).join(CACHE_FILE)
}

/// Cache path under the platform cache directory, if one exists.
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|root| cache_path_at(&root))
}

#[derive(Debug, Clone)]
pub struct UpdateCache {
    path: PathBuf,
    package: String,
    current_version: String,
    period_days: u32,
    debug: bool,
}

impl UpdateCache {
    pub fn new(
        path: impl Into<PathBuf>,
        package: impl Into<String>,
        current_version: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            current_version: current_version.into(),
            period_days: 1,
            debug: false,
        }
    }

    pub fn period_days(mut self, days: u32) -> Self {
        self.period_days = days;
        self
    }

    /// Debug mode always looks up and always reports the result as available.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consult `lookup` unless the record says a check happened within the
    /// period, then rewrite the record with `now_ms`.
    pub fn check_for_update(&self, lookup: &dyn VersionLookup, now_ms: i64) -> UpdateCheck {
        let last_checked = self.load_record().and_then(|r| r.last_checked);
        let period_ms = i64::from(self.period_days) * MS_PER_DAY;
        let due = match last_checked {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > period_ms,
        };

        if !due && !self.debug {
            tracing::debug!(path = %self.path.display(), "update check skipped; cache is fresh");
            return UpdateCheck::Fresh;
        }

        let check = match lookup.latest_version(&self.package) {
            Ok(latest) if self.debug || is_newer(&latest, &self.current_version) => {
                UpdateCheck::Available {
                    current: self.current_version.clone(),
                    latest,
                }
            }
            Ok(latest) => UpdateCheck::UpToDate { latest },
            Err(err) => {
                tracing::warn!(error = %err, "latest version lookup failed");
                UpdateCheck::Failed {
                    reason: err.to_string(),
                }
            }
        };

        let record = UpdateCacheRecord {
            last_checked: Some(now_ms),
        };
        if let Err(err) = self.save_record(&record) {
            tracing::warn!(error = %err, "failed to write update cache");
        }
        check
    }

    /// Read the record. Absent or malformed content yields `None`.
    pub fn load_record(&self) -> Option<UpdateCacheRecord> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "update cache unreadable");
                return None;
            }
        };
        match serde_json::from_str::<UpdateCacheRecord>(&contents) {
            Ok(record) if record.last_checked.is_some() => Some(record),
            Ok(_) | Err(_) => {
                tracing::warn!(path = %self.path.display(), "update cache corrupted; overwriting");
                None
            }
        }
    }

    /// Write the record atomically, creating the parent directory if needed.
    pub fn save_record(&self, record: &UpdateCacheRecord) -> Result<(), UpdateError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        }
        let json = serde_json::to_string(record)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_err(&self.path, e))?;
        Ok(())
    }
}

/// Semver comparison; falls back to plain inequality for non-semver strings.
fn is_newer(latest: &str, current: &str) -> bool {
    let parse = |v: &str| semver::Version::parse(v.trim().trim_start_matches('v'));
    match (parse(latest), parse(current)) {
        (Ok(latest), Ok(current)) => latest > current,
        _ => latest.trim() != current.trim(),
    }
}
