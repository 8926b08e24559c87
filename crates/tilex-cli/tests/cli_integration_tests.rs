//! CLI integration tests for tilex
//!
//! Tests the tilex CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with config and database isolated under `dir`
#[allow(deprecated)]
fn tilex_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tilex").unwrap();
    cmd.env("TILEX_CONFIG_DIR", dir.path().join("config"));
    cmd.env_remove("RUST_LOG");
    cmd.arg("--database").arg(dir.path().join("blog.db"));
    cmd
}

fn create(dir: &TempDir, title: &str, content: &str) -> i64 {
    let output = tilex_cmd(dir)
        .args(["--format", "json", "articles", "create"])
        .args(["--title", title, "--content", content])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    json["id"].as_i64().unwrap()
}

#[test]
fn test_create_and_get_json() {
    let dir = TempDir::new().unwrap();

    let output = tilex_cmd(&dir)
        .args(["--format", "json", "articles", "create"])
        .args(["--title", "My first post", "--content", "Testing upload"])
        .args(["--created-at", "2025-10-08"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let created: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(created["title"], "My first post");
    assert_eq!(created["status"], 1);
    assert_eq!(created["statusName"], "Published");
    assert_eq!(created["createdAt"], "2025-10-08 00:00:00");
    assert_eq!(created["updatedAt"], "2025-10-08 00:00:00");

    let id = created["id"].as_i64().unwrap();
    tilex_cmd(&dir)
        .args(["--format", "json", "articles", "get", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"My first post\""));
}

#[test]
fn test_get_missing_article_fails() {
    let dir = TempDir::new().unwrap();

    tilex_cmd(&dir)
        .args(["articles", "get", "4242"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("tilex articles list"));
}

#[test]
fn test_search_highlights_keyword() {
    let dir = TempDir::new().unwrap();
    create(&dir, "Spring notes", "Spring Boot is great. I love Spring.");
    create(&dir, "Other", "Nothing to see");

    let output = tilex_cmd(&dir)
        .args(["--format", "json", "search", "spring"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Spring notes");
    assert_eq!(results[0]["snippets"].as_array().unwrap().len(), 2);
    assert!(
        results[0]["snippets"][0]
            .as_str()
            .unwrap()
            .contains("<mark>Spring</mark>")
    );

    tilex_cmd(&dir)
        .args(["search", "spring"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<mark>Spring</mark>"));
}

#[test]
fn test_blank_search_is_empty() {
    let dir = TempDir::new().unwrap();
    create(&dir, "Anything", "Some content");

    tilex_cmd(&dir)
        .args(["--format", "json", "search", "  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_overlong_keyword_rejected() {
    let dir = TempDir::new().unwrap();

    tilex_cmd(&dir)
        .args(["search", &"k".repeat(101)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_list_pagination() {
    let dir = TempDir::new().unwrap();
    for n in 1..=3 {
        create(&dir, &format!("Post {n}"), "body");
    }

    let output = tilex_cmd(&dir)
        .args(["--format", "json", "articles", "list", "--page", "2", "--size", "2"])
        .args(["--sort-field", "title", "--sort-order", "asc"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let page: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["total"], 3);
    assert_eq!(page["pageNum"], 2);
    assert_eq!(page["pageSize"], 2);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["records"][0]["title"], "Post 3");
}

#[test]
fn test_list_rejects_bad_page_size() {
    let dir = TempDir::new().unwrap();

    tilex_cmd(&dir)
        .args(["articles", "list", "--size", "101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page_size"));
}

#[test]
fn test_update_and_delete() {
    let dir = TempDir::new().unwrap();
    let id = create(&dir, "Before", "Body").to_string();

    tilex_cmd(&dir)
        .args(["--format", "json", "articles", "update", &id, "--status", "draft"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"statusName\": \"Draft\""));

    tilex_cmd(&dir)
        .args(["articles", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"));

    tilex_cmd(&dir)
        .args(["articles", "delete", &id])
        .assert()
        .failure();
}

#[test]
fn test_config_list_and_set() {
    let dir = TempDir::new().unwrap();

    tilex_cmd(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("search.context_length = 60"))
        .stdout(predicate::str::contains("listing.max_page_size = 100"));

    tilex_cmd(&dir)
        .args(["config", "set", "search.highlight_prefix", "[["])
        .assert()
        .success();

    tilex_cmd(&dir)
        .args(["config", "get", "search.highlight_prefix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[["));

    tilex_cmd(&dir)
        .args(["config", "set", "search.max_snippets", "0"])
        .assert()
        .failure();
}

#[test]
fn test_db_status() {
    let dir = TempDir::new().unwrap();

    tilex_cmd(&dir)
        .args(["db", "migrate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("schema version 1"));

    tilex_cmd(&dir)
        .args(["db", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Up to date"))
        .stdout(predicate::str::contains("Articles: 0"));
}

#[test]
fn test_db_status_counts_articles() {
    let dir = TempDir::new().unwrap();
    create(&dir, "One", "first body");
    create(&dir, "Two", "second body");

    let output = tilex_cmd(&dir)
        .args(["--format", "json", "db", "status"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["needsMigration"], false);
    assert_eq!(status["articles"], 2);

    tilex_cmd(&dir)
        .args(["config", "set", "listing.max_page_size", "1000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tilex config list"));
}
