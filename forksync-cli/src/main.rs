//! fork-sync: keep a fork in step with its upstream.
//!
//! # Usage
//!
//! ```text
//! fork-sync [-u <upstream>] [-b <branch>] [-U | -L] [-l] [-d]
//! fork-sync -a <url> [-u <name>]
//! fork-sync -r <name>
//! fork-sync -R [-u <upstream>] [-b <branch>]
//! fork-sync --log-only
//! ```

mod console;
mod update;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use forksync_core::{
    settings, ConflictMode, ProcessRunner, RunnerConfig, Settings, SettingsError, SyncOptions,
};
use forksync_engine::Orchestrator;

use console::ConsoleReporter;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "fork-sync",
    version = concat!("version: ", env!("CARGO_PKG_VERSION")),
    about = "Sync your fork with its upstream repository",
    disable_version_flag = true,
)]
struct Cli {
    /// Upstream remote name (default "upstream").
    #[arg(short = 'u', long, value_name = "NAME")]
    upstream: Option<String>,

    /// Branch to sync (default "master").
    #[arg(short = 'b', long, value_name = "BRANCH")]
    branch: Option<String>,

    /// Add a remote pointing at URL, named by --upstream.
    #[arg(short = 'a', long, value_name = "URL")]
    add: Option<String>,

    /// Remove the named remote.
    #[arg(short = 'r', long, value_name = "NAME")]
    remove: Option<String>,

    /// Sync, then show the ten most recent commits.
    #[arg(short = 'l', long)]
    log: bool,

    /// Resolve conflicts by accepting all upcoming changes.
    #[arg(short = 'U', long, conflicts_with = "local")]
    upcoming: bool,

    /// Resolve conflicts by keeping all local changes.
    #[arg(short = 'L', long)]
    local: bool,

    /// Reset all local changes and replace them with upstream.
    #[arg(short = 'R', long)]
    reset: bool,

    /// Show recent commits only (skips sync).
    #[arg(long)]
    log_only: bool,

    /// Trace every git command with its output.
    #[arg(short = 'd', long)]
    debug: bool,

    /// Print version.
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: (),
}

impl Cli {
    /// Flags layered over settings layered over built-in defaults.
    fn sync_options(&self, settings: &Settings) -> SyncOptions {
        let defaults = SyncOptions::default();
        let conflict_mode = if self.upcoming {
            ConflictMode::PreferTheirs
        } else if self.local {
            ConflictMode::PreferOurs
        } else {
            ConflictMode::None
        };

        SyncOptions {
            upstream: self
                .upstream
                .clone()
                .or_else(|| settings.upstream.clone())
                .unwrap_or(defaults.upstream),
            branch: self
                .branch
                .clone()
                .or_else(|| settings.branch.clone())
                .unwrap_or(defaults.branch),
            conflict_mode,
            add: self.add.clone(),
            remove: self.remove.clone(),
            reset: self.reset,
            log: self.log,
            log_only: self.log_only,
            debug: self.debug,
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let settings = match settings::load() {
        Ok(settings) => settings,
        Err(SettingsError::ConfigDirNotFound) => Settings::default(),
        Err(err) => return Err(err).context("failed to load fork-sync settings"),
    };
    let opts = cli.sync_options(&settings);

    let runner = ProcessRunner::new(RunnerConfig {
        debug: opts.debug,
        timeout: settings.command_timeout(),
        current_dir: None,
    });
    let mut reporter = ConsoleReporter::new(opts.debug);
    let outcome = Orchestrator::new(&runner, &mut reporter).run(&opts);
    reporter.finish();
    tracing::debug!(?outcome, "flow outcome");

    if update::enabled(&settings) {
        update::check(&settings, opts.debug);
    }

    // Every flow outcome, failures included, has already been reported to the
    // operator; the exit status stays zero.
    Ok(())
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("FORK_SYNC_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
