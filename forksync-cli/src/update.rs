//! Once-per-period update alert.

use std::path::PathBuf;

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use forksync_core::Settings;
use forksync_update::{default_cache_path, CratesIoLookup, UpdateCache, UpdateCheck};

const PACKAGE: &str = "fork-sync";

#[derive(Tabled)]
struct UpdateAlert {
    #[tabled(rename = "update available")]
    message: String,
}

pub fn enabled(settings: &Settings) -> bool {
    settings.update_check.enabled && std::env::var_os("FORK_SYNC_NO_UPDATE_CHECK").is_none()
}

fn cache_path() -> Option<PathBuf> {
    std::env::var_os("FORK_SYNC_CACHE")
        .map(PathBuf::from)
        .or_else(default_cache_path)
}

fn lookup() -> CratesIoLookup {
    match std::env::var("FORK_SYNC_REGISTRY") {
        Ok(url) if !url.is_empty() => CratesIoLookup::with_base_url(url),
        _ => CratesIoLookup::default(),
    }
}

pub fn check(settings: &Settings, debug: bool) {
    let Some(path) = cache_path() else {
        tracing::warn!("no cache directory available; skipping update check");
        return;
    };
    let cache = UpdateCache::new(path, PACKAGE, env!("CARGO_PKG_VERSION"))
        .period_days(settings.update_check.period_days)
        .debug(debug);

    let now_ms = chrono::Utc::now().timestamp_millis();
    if let UpdateCheck::Available { current, latest } =
        cache.check_for_update(&lookup(), now_ms)
    {
        println!("{}", render_alert(&current, &latest));
    }
}

pub fn render_alert(current: &str, latest: &str) -> String {
    let message = format!(
        "{} → {}\nRun {} to update",
        current.bright_black(),
        latest.white(),
        format!("cargo install {PACKAGE}").green()
    );
    let mut table = Table::new([UpdateAlert { message }]);
    table.with(Style::rounded());
    table.to_string()
}
