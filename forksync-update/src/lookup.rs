//! Latest-published-version lookup.

use std::time::Duration;

use serde::Deserialize;

use crate::error::UpdateError;

pub const CRATES_IO_API: &str = "https://crates.io/api/v1/crates";

/// Resolves the newest published version of a package.
pub trait VersionLookup {
    fn latest_version(&self, package: &str) -> Result<String, UpdateError>;
}

/// [`VersionLookup`] against the crates.io registry API.
#[derive(Debug, Clone)]
pub struct CratesIoLookup {
    base_url: String,
    timeout: Duration,
}

impl Default for CratesIoLookup {
    fn default() -> Self {
        Self {
            base_url: CRATES_IO_API.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate")]
    krate: CrateInfo,
}

#[derive(Debug, Deserialize)]
struct CrateInfo {
    #[serde(default)]
    max_stable_version: Option<String>,
    #[serde(default)]
    max_version: Option<String>,
}

impl CratesIoLookup {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl VersionLookup for CratesIoLookup {
    fn latest_version(&self, package: &str) -> Result<String, UpdateError> {
        let agent = ureq::AgentBuilder::new()
            .timeout(self.timeout)
            .user_agent(concat!("fork-sync/", env!("CARGO_PKG_VERSION")))
            .build();
        let url = format!("{}/{package}", self.base_url.trim_end_matches('/'));
        let body = agent
            .get(&url)
            .call()
            .map_err(|e| UpdateError::Lookup(format!("GET {url}: {e}")))?
            .into_string()
            .map_err(|e| UpdateError::Lookup(format!("read {url}: {e}")))?;
        parse_latest(package, &body)
    }
}

fn parse_latest(package: &str, body: &str) -> Result<String, UpdateError> {
    let response: CrateResponse = serde_json::from_str(body)?;
    response
        .krate
        .max_stable_version
        .or(response.krate.max_version)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| UpdateError::MissingVersion {
            package: package.to_string(),
        })
}
