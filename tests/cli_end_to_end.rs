use std::io::Write;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use tempfile::NamedTempFile;

const FEED: &str = r#"{
    "flags": {"randomize_names": true},
    "posts": [
        {
            "id": "p1",
            "author": "Alice",
            "avatarUrl": "https://cdn.example.com/alice.png",
            "text": "Sunset over the bay",
            "time": "4h",
            "authorType": "female",
            "topic": "travel"
        },
        {
            "id": "ad-1",
            "author": "Bluepeak Coffee",
            "authorType": "company",
            "adType": "ad"
        }
    ]
}"#;

fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write contents");
    file
}

fn simfeed() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("simfeed"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn resolve_lines(output: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(output)
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect()
}

fn identity_args(cmd: &mut Command) -> &mut Command {
    cmd.args([
        "--run-id", "run-42", "--app-id", "ig", "--project-id", "proj-7", "--feed-id", "feed-3",
    ])
}

#[test]
fn resolve_prints_one_json_line_per_post() {
    let feed = temp_file(".json", FEED);
    let mut cmd = simfeed();
    cmd.arg("resolve").arg("--feed").arg(feed.path());
    let assert = identity_args(&mut cmd).assert().success();

    let lines = resolve_lines(&assert.get_output().stdout);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["postId"], "p1");
    assert_eq!(lines[0]["displayAuthor"], "Sofia Wilson");
    assert_eq!(lines[0]["effectiveAvatarUrl"], "https://cdn.example.com/alice.png");
    assert_eq!(lines[0]["timeLabel"], "4h");
    assert_eq!(lines[1]["postId"], "ad-1");
    assert_eq!(lines[1]["displayAuthor"], "Bluepeak Coffee");
    assert_eq!(lines[1]["timeLabel"], "Just now");
}

#[test]
fn force_randomize_draws_every_facet_from_pools() {
    let feed = temp_file(".json", FEED);
    let mut cmd = simfeed();
    cmd.arg("resolve")
        .arg("--feed")
        .arg(feed.path())
        .arg("--force-randomize");
    let assert = identity_args(&mut cmd).assert().success();

    let lines = resolve_lines(&assert.get_output().stdout);
    assert_eq!(
        lines[0]["effectiveAvatarUrl"],
        "https://cdn.simfeed.dev/avatars/female/06.jpg"
    );
    assert_eq!(lines[0]["timeLabel"], "2d");
    assert_eq!(lines[1]["displayAuthor"], "Bluepeak Coffee");
}

#[test]
fn debug_query_forces_randomization() {
    let feed = temp_file(".json", FEED);
    let mut cmd = simfeed();
    cmd.arg("resolve")
        .arg("--feed")
        .arg(feed.path())
        .args(["--query", "debug=1"]);
    let assert = identity_args(&mut cmd).assert().success();

    let lines = resolve_lines(&assert.get_output().stdout);
    assert_eq!(lines[0]["timeLabel"], "2d");
}

#[test]
fn manifest_pools_are_used_when_configured() {
    let feed = temp_file(".json", FEED);
    let manifest = temp_file(
        ".toml",
        "[avatars]\nfemale = [\"https://pools.example.org/only.jpg\"]\n",
    );
    let mut cmd = simfeed();
    cmd.arg("resolve")
        .arg("--feed")
        .arg(feed.path())
        .arg("--pools")
        .arg(manifest.path())
        .arg("--force-randomize");
    let assert = identity_args(&mut cmd).assert().success();

    let lines = resolve_lines(&assert.get_output().stdout);
    assert_eq!(
        lines[0]["effectiveAvatarUrl"],
        "https://pools.example.org/only.jpg"
    );
    assert_eq!(lines[0]["displayImageUrl"], Value::Null);
}

#[test]
fn unsupported_app_id_fails() {
    let feed = temp_file(".json", FEED);
    simfeed()
        .arg("resolve")
        .arg("--feed")
        .arg(feed.path())
        .args(["--app-id", "tw"])
        .assert()
        .failure()
        .stderr(contains("identity.app_id"));
}

#[test]
fn missing_feed_fails() {
    let dir = tempfile::tempdir().expect("tmp dir");
    simfeed()
        .arg("resolve")
        .arg("--feed")
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(contains("I/O failure"));
}

#[test]
fn schedule_prints_growth_sequence() {
    simfeed()
        .args(["schedule", "--total", "20"])
        .assert()
        .success()
        .stdout("8\n14\n20\n");
}

#[test]
fn schedule_respects_step_override() {
    simfeed()
        .args(["schedule", "--total", "9", "--first-batch", "2", "--step", "3"])
        .assert()
        .success()
        .stdout("2\n5\n8\n9\n");
}
