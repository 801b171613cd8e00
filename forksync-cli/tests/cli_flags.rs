use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn fork_sync(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fork-sync"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_CACHE_HOME", home.join(".cache"))
        .env("FORK_SYNC_NO_UPDATE_CHECK", "1")
        .env_remove("FORK_SYNC_LOG");
    cmd
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[test]
fn version_flag_prints_tool_version() {
    let home = TempDir::new().expect("home");
    for flag in ["-v", "--version"] {
        fork_sync(home.path())
            .arg(flag)
            .assert()
            .success()
            .stdout(contains(format!(
                "fork-sync version: {}",
                env!("CARGO_PKG_VERSION")
            )));
    }
}

#[test]
fn help_lists_every_flag() {
    let home = TempDir::new().expect("home");
    let assert = fork_sync(home.path()).arg("--help").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    for flag in [
        "--upstream",
        "--branch",
        "--add",
        "--remove",
        "--log",
        "--upcoming",
        "--local",
        "--reset",
        "--log-only",
        "--debug",
        "--version",
    ] {
        assert!(stdout.contains(flag), "help missing {flag}:\n{stdout}");
    }
}

#[test]
fn upcoming_and_local_conflict() {
    let home = TempDir::new().expect("home");
    fork_sync(home.path())
        .args(["-U", "-L"])
        .assert()
        .failure()
        .stderr(contains("cannot be used with"));
}

// `dirs::config_dir` only honours XDG_CONFIG_HOME on Linux.
#[cfg(target_os = "linux")]
#[test]
fn corrupt_settings_file_is_reported() {
    let home = TempDir::new().expect("home");
    let dir = home.path().join(".config").join("fork-sync");
    std::fs::create_dir_all(&dir).expect("mkdir");
    std::fs::write(dir.join("config.yaml"), "branch: [unclosed\n").expect("write");

    fork_sync(home.path())
        .arg("--log-only")
        .current_dir(home.path())
        .assert()
        .failure()
        .stderr(contains("config.yaml"));
}

#[test]
fn outside_a_repository_reports_and_exits_cleanly() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let home = TempDir::new().expect("home");
    let work = TempDir::new().expect("work");

    fork_sync(home.path())
        .env("GIT_CEILING_DIRECTORIES", work.path().parent().expect("parent"))
        .current_dir(work.path())
        .assert()
        .success()
        .stdout(contains("you are not in a git repository"));
}

/// Serves one crates.io-shaped response advertising `version`.
fn registry_once(version: &'static str) -> (String, std::thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}/api/v1/crates", listener.local_addr().expect("addr"));
    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        let mut line = String::new();
        while reader.read_line(&mut line).expect("read") > 0 && line != "\r\n" {
            line.clear();
        }
        let body = format!(r#"{{"crate":{{"name":"fork-sync","max_stable_version":"{version}"}}}}"#);
        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .expect("write");
    });
    (base, handle)
}

#[test]
fn update_check_writes_record_to_cache_override() {
    let home = TempDir::new().expect("home");
    let work = TempDir::new().expect("work");
    let cache = home.path().join("elsewhere").join("update.json");
    let (registry, server) = registry_once("999.0.0");

    fork_sync(home.path())
        .env_remove("FORK_SYNC_NO_UPDATE_CHECK")
        .env("FORK_SYNC_CACHE", &cache)
        .env("FORK_SYNC_REGISTRY", &registry)
        .env("NO_COLOR", "1")
        .env("GIT_CEILING_DIRECTORIES", work.path().parent().expect("parent"))
        .arg("--log-only")
        .current_dir(work.path())
        .assert()
        .success()
        .stdout(contains("999.0.0"))
        .stdout(contains("cargo install fork-sync"));
    server.join().expect("registry thread");

    let record: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&cache).expect("cache written")).expect("json");
    assert!(record["lastChecked"].as_i64().is_some(), "got {record}");
    assert!(!home.path().join(".cache").join("fork-sync").exists());

    // Within the period the record is left alone and no lookup is made.
    let before = std::fs::read_to_string(&cache).expect("cache");
    fork_sync(home.path())
        .env_remove("FORK_SYNC_NO_UPDATE_CHECK")
        .env("FORK_SYNC_CACHE", &cache)
        .env("FORK_SYNC_REGISTRY", &registry)
        .env("GIT_CEILING_DIRECTORIES", work.path().parent().expect("parent"))
        .arg("--log-only")
        .current_dir(work.path())
        .assert()
        .success()
        .stdout(contains("999.0.0").not());
    assert_eq!(std::fs::read_to_string(&cache).expect("cache"), before);
}
