//! End-to-end tests for the zapretctl binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn zapretctl(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("zapretctl").unwrap();
    cmd.env_remove("RUST_LOG").arg("--root").arg(root);
    cmd
}

/// Minimal installed release under `<root>/zapret`
fn installed() -> TempDir {
    let dir = TempDir::new().unwrap();
    let zapret = dir.path().join("zapret");
    fs::create_dir_all(zapret.join("bin")).unwrap();
    fs::create_dir_all(zapret.join("lists")).unwrap();
    fs::write(zapret.join("service.bat"), "set \"LOCAL_VERSION=1.8.5\"\r\n").unwrap();
    fs::write(
        zapret.join("general.bat"),
        "@echo off\r\nchcp 65001 > nul\r\n\r\nstart \"zapret: general\" /min winws.exe --wf-tcp=80,443 ^\r\n--filter-udp=443   --dpi-desync=fake\r\n",
    )
    .unwrap();
    fs::write(zapret.join("general (ALT).bat"), "winws.exe --alt\r\n").unwrap();
    fs::write(zapret.join("uninstall.bat"), "").unwrap();
    fs::write(zapret.join("lists/list-general.txt"), "discord.com\n\nyoutube.com\n").unwrap();
    dir
}

#[test]
fn test_help() {
    Command::cargo_bin("zapretctl")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("zapret"));
}

#[test]
fn test_strategies_lists_scripts() {
    let dir = installed();
    zapretctl(dir.path())
        .arg("strategies")
        .assert()
        .success()
        .stdout("general (ALT)\ngeneral\n");
}

#[test]
fn test_strategies_requires_install() {
    let dir = TempDir::new().unwrap();
    zapretctl(dir.path())
        .arg("strategies")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not installed"));
}

#[test]
fn test_extract_prints_arguments() {
    let dir = installed();
    zapretctl(dir.path())
        .args(["extract", "general"])
        .assert()
        .success()
        .stdout("--wf-tcp=80,443 --filter-udp=443 --dpi-desync=fake\n");
}

#[test]
fn test_extract_unknown_strategy() {
    let dir = installed();
    zapretctl(dir.path())
        .args(["extract", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Strategy not found: nope"));
}

#[test]
fn test_game_filter_toggle() {
    let dir = installed();
    zapretctl(dir.path())
        .args(["game-filter", "on"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(dir.path().join("zapret/utils/game_filter.enabled")).unwrap(),
        "ENABLED"
    );

    zapretctl(dir.path())
        .arg("game-filter")
        .assert()
        .success()
        .stdout(predicate::str::contains("1024-65535"));

    zapretctl(dir.path())
        .args(["game-filter", "off"])
        .assert()
        .success();
    assert!(!dir.path().join("zapret/utils/game_filter.enabled").exists());
}

#[test]
fn test_log_file_in_every_format() {
    let dir = installed();
    for format in ["text", "json", "compact"] {
        let log = dir.path().join(format!("{format}.log"));
        zapretctl(dir.path())
            .args(["-v", "--log-format", format, "--log-file"])
            .arg(&log)
            .args(["game-filter", "on"])
            .assert()
            .success();

        let written = fs::read_to_string(&log).unwrap();
        assert!(written.contains("Game filter"), "{format}: {written:?}");
    }
}

#[test]
fn test_ipset_toggle_without_backup_fails() {
    let dir = installed();
    zapretctl(dir.path())
        .args(["ipset", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("any"));

    zapretctl(dir.path())
        .args(["ipset", "toggle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No ipset backup"));
}

#[test]
fn test_lists_roundtrip() {
    let dir = installed();
    zapretctl(dir.path())
        .args(["lists", "add", "list-general", "Example.org", "discord.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 1 entries"));

    zapretctl(dir.path())
        .args(["lists", "show", "list-general.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("example.org"));

    zapretctl(dir.path())
        .args(["lists", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list-general.txt"));

    zapretctl(dir.path())
        .args(["lists", "remove", "list-general", "youtube.com"])
        .assert()
        .success();
    let content = fs::read_to_string(dir.path().join("zapret/lists/list-general.txt")).unwrap();
    assert!(!content.contains("youtube.com"));
}

#[test]
fn test_lists_rejects_path_names() {
    let dir = installed();
    zapretctl(dir.path())
        .args(["lists", "show", "../service.bat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid list name"));
}

#[test]
fn test_config_set_and_show() {
    let dir = installed();
    zapretctl(dir.path())
        .args(["config", "set", "theme", "light"])
        .assert()
        .success();

    zapretctl(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"theme\": \"light\""));

    zapretctl(dir.path())
        .args(["config", "set", "theme", "purple"])
        .assert()
        .failure();

    assert!(dir.path().join("app/zapret_gui_config.json").is_file());
}

#[test]
fn test_completions() {
    Command::cargo_bin("zapretctl")
        .unwrap()
        .args(["--root", ".", "completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("zapretctl"));
}
