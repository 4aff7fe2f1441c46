//! Integration tests for `deckhand audit`

mod harness;

use harness::{DeckFixture, CLEAN_DECK};
use predicates::prelude::*;

#[test]
fn test_audit_clean_project_by_name() {
    let fx = DeckFixture::new();
    fx.project("demo", CLEAN_DECK);
    fx.write("projects/demo/images/a.png", [0u8; 16]);

    fx.cmd()
        .args(["audit", "--project", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[OK] Asset audit for"))
        .stdout(predicate::str::contains(
            "Referenced files: 1 | Project asset files: 1",
        ));
}

#[test]
fn test_audit_query_and_fragment_resolve() {
    let fx = DeckFixture::new();
    fx.project("demo", CLEAN_DECK);
    fx.write("projects/demo/images/a.png", [0u8; 16]);

    let json = fx.json(&["audit", "--project", "demo", "--json"]);
    assert_eq!(json["success"], true);
    assert_eq!(json["metadata"]["command"], "audit");
    assert_eq!(json["data"]["referenced_assets"][0], "images/a.png");
    assert_eq!(json["data"]["referenced_file_count"], 1);
    assert_eq!(json["data"]["frontmatter_detected"], true);
}

#[test]
fn test_audit_reports_traversal_and_fails() {
    let fx = DeckFixture::new();
    fx.project("demo", "![x](../../etc/passwd)\n");

    fx.cmd()
        .args(["audit", "--project", "demo"])
        .assert()
        .code(4)
        .stdout(predicate::str::starts_with("[FAIL]"))
        .stdout(predicate::str::contains(
            "Traversal/invalid asset references:\n- ../../etc/passwd",
        ));
}

#[test]
fn test_audit_missing_and_directory_targets() {
    let fx = DeckFixture::new();
    fx.project("demo", "![a](images/gone.png)\n<video poster=\"media\" />\n");
    fx.write("projects/demo/media/clip.mp4", b"mp4");

    let json = fx.json(&["audit", "--project", "demo", "--json"]);
    assert_eq!(json["success"], false);
    let missing = json["data"]["missing_assets"][0].as_str().unwrap();
    assert!(missing.starts_with("images/gone.png -> "));
    let directory = json["data"]["directory_targets"][0].as_str().unwrap();
    assert!(directory.starts_with("media -> "));
    assert_eq!(json["data"]["unused_assets"][0], "media/clip.mp4");
}

#[test]
fn test_audit_unused_only_fails_when_strict() {
    let fx = DeckFixture::new();
    fx.project("demo", "No references here.\n");
    fx.write("projects/demo/data/table.csv", "a,b\n");

    fx.cmd()
        .args(["audit", "--project", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unused asset files:\n- data/table.csv"));

    fx.cmd()
        .args(["audit", "--project", "demo", "--strict-unused"])
        .assert()
        .code(4);
}

#[test]
fn test_audit_largest_files_respects_top() {
    let fx = DeckFixture::new();
    fx.project("demo", "");
    fx.write("projects/demo/images/big.png", vec![0u8; 300]);
    fx.write("projects/demo/images/mid.png", vec![0u8; 200]);
    fx.write("projects/demo/images/small.png", vec![0u8; 100]);

    let json = fx.json(&["audit", "--project", "demo", "--top", "2", "--json"]);
    let largest = json["data"]["largest_files"].as_array().unwrap();
    assert_eq!(largest.len(), 2);
    assert_eq!(largest[0]["path"], "images/big.png");
    assert_eq!(largest[0]["bytes"], 300);
    assert_eq!(largest[1]["path"], "images/mid.png");
}

#[test]
fn test_audit_does_not_flag_project_mismatch() {
    let fx = DeckFixture::new();
    fx.project("other", CLEAN_DECK);
    fx.write("projects/other/images/a.png", [0u8; 16]);

    fx.cmd()
        .args(["audit", "--project", "other", "--strict-unused"])
        .assert()
        .success()
        .stdout(predicate::str::contains("does not match").not());
}

#[test]
fn test_audit_by_project_dir() {
    let fx = DeckFixture::new();
    let dir = fx.project("demo", CLEAN_DECK);
    fx.write("projects/demo/images/a.png", [0u8; 16]);

    fx.cmd()
        .args(["audit", "--project-dir", dir.to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn test_audit_uses_projects_dir_env() {
    let fx = DeckFixture::new();
    fx.write("elsewhere/demo/page.mdx", "");

    fx.cmd()
        .env("DECK_PROJECTS_DIR", fx.root().join("elsewhere"))
        .args(["audit", "--project", "demo"])
        .assert()
        .success();
}

#[test]
fn test_audit_top_from_config() {
    let fx = DeckFixture::new();
    fx.project("demo", "");
    fx.write("projects/demo/images/one.png", [0u8; 10]);
    fx.write("projects/demo/images/two.png", [0u8; 20]);
    fx.write("projects/deckhand.toml", "[audit]\ntop = 1\n");

    let json = fx.json(&["audit", "--project", "demo", "--json"]);
    assert_eq!(json["data"]["largest_files"].as_array().unwrap().len(), 1);
}
