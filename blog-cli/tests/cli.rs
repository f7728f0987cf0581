use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn blog(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("blog-cli").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("BLOG_SERVER")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn anonymous_identity_is_stable() {
    let dir = TempDir::new().unwrap();

    let first = stdout_of(blog(dir.path()).arg("whoami"));
    let second = stdout_of(blog(dir.path()).arg("whoami"));

    assert!(first.starts_with("user-"));
    assert_eq!(first, second);
}

#[test]
fn offline_list_shows_published_posts() {
    let dir = TempDir::new().unwrap();

    blog(dir.path())
        .args(["--offline", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 1/1 (10 posts)"))
        .stdout(predicate::str::contains("React Hooks in Practice"))
        .stdout(predicate::str::contains("Part Two").not());
}

#[test]
fn offline_list_paginates() {
    let dir = TempDir::new().unwrap();

    blog(dir.path())
        .args(["--offline", "list", "--page-size", "3", "--page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 2/4 (10 posts)"))
        .stdout(predicate::str::contains("Pages: 1 [2] 3 4"));
}

#[test]
fn unknown_sort_mode_fails() {
    let dir = TempDir::new().unwrap();

    blog(dir.path())
        .args(["--offline", "list", "--sort", "sideways"])
        .assert()
        .failure();
}

#[test]
fn searches_are_remembered() {
    let dir = TempDir::new().unwrap();

    blog(dir.path())
        .args(["--offline", "search", "react"])
        .assert()
        .success()
        .stdout(predicate::str::contains("React Hooks in Practice"));
    blog(dir.path())
        .args(["--offline", "search", "docker"])
        .assert()
        .success();

    blog(dir.path())
        .arg("recent")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. docker"))
        .stdout(predicate::str::contains("2. react"));

    blog(dir.path())
        .args(["recent", "--clear"])
        .assert()
        .success();
    blog(dir.path())
        .arg("recent")
        .assert()
        .success()
        .stdout(predicate::str::contains("No recent searches"));
}

#[test]
fn show_and_related() {
    let dir = TempDir::new().unwrap();

    blog(dir.path())
        .args(["--offline", "show", "react-hooks-in-practice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("React Hooks in Practice"));

    blog(dir.path())
        .args(["--offline", "related", "react-hooks-in-practice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. "));

    blog(dir.path())
        .args(["--offline", "show", "no-such-post"])
        .assert()
        .failure();
}

#[test]
fn categories_and_tags() {
    let dir = TempDir::new().unwrap();

    blog(dir.path())
        .args(["--offline", "categories"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(frontend)"))
        .stdout(predicate::str::contains("(career)"));

    blog(dir.path())
        .args(["--offline", "tags", "--limit", "3"])
        .assert()
        .success();
}

#[test]
fn offline_comments_persist_between_runs() {
    let dir = TempDir::new().unwrap();

    blog(dir.path())
        .args(["--offline", "comment", "add", "post-1", "Great write-up, thanks!"])
        .assert()
        .success()
        .stdout(predicate::str::contains("posted"));

    blog(dir.path())
        .args(["--offline", "comments", "post-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 comments"))
        .stdout(predicate::str::contains("Great write-up, thanks!"))
        .stdout(predicate::str::contains("you"));

    blog(dir.path())
        .args(["--offline", "comment", "add", "post-1", "hi"])
        .assert()
        .failure();
}

#[test]
fn offline_like_toggles() {
    let dir = TempDir::new().unwrap();

    blog(dir.path())
        .args(["--offline", "like", "post-1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("♥"));

    blog(dir.path())
        .args(["--offline", "like", "post-1", "--status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("♥"));

    blog(dir.path())
        .args(["--offline", "like", "post-1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("♡"));
}

#[test]
fn token_lifecycle() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("token");

    blog(dir.path())
        .arg("--token-file")
        .arg(&token_file)
        .args(["token", "set", "eyJhbGciOiJIUzI1NiJ9.payload.sig"])
        .assert()
        .success();

    blog(dir.path())
        .arg("--token-file")
        .arg(&token_file)
        .args(["token", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("eyJhbGciOiJI..."));

    blog(dir.path())
        .arg("--token-file")
        .arg(&token_file)
        .args(["token", "clear"])
        .assert()
        .success();
    assert!(!token_file.exists());
}

#[test]
fn explain_error_describes_failures() {
    let dir = TempDir::new().unwrap();

    blog(dir.path())
        .args(["explain-error", "--code", "session_expired", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"SESSION_EXPIRED\""))
        .stdout(predicate::str::contains("\"canRetry\": false"));

    blog(dir.path())
        .args(["explain-error", "--status", "503", "--attempt", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NETWORK_ERROR"))
        .stdout(predicate::str::contains("Retry #3 after 4000 ms"));

    blog(dir.path())
        .args(["explain-error", "--message", "Failed to fetch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NETWORK_ERROR"));
}
