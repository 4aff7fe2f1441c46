//! Integration tests for `deckhand scaffold`

mod harness;

use harness::DeckFixture;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_scaffold_then_validate_passes_strict() {
    let fx = DeckFixture::new();

    fx.cmd()
        .args(["scaffold", "--project", "launch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Project scaffold ready:"))
        .stdout(predicate::str::contains("images/, media/, data/"));

    let dir = fx.projects_dir().join("launch");
    for sub in ["images", "media", "data"] {
        assert!(dir.join(sub).is_dir(), "{sub}");
    }

    fx.cmd()
        .args(["validate", "--project", "launch", "--strict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Slides: 3"));
}

#[test]
fn test_scaffold_escapes_frontmatter_values() {
    let fx = DeckFixture::new();

    fx.cmd()
        .args([
            "scaffold",
            "--project",
            "q3",
            "--title",
            r#"The "Q3" Review"#,
            "--date",
            "Oct 2026",
        ])
        .assert()
        .success();

    let page = fs::read_to_string(fx.projects_dir().join("q3/page.mdx")).unwrap();
    assert!(page.contains(r#"title: "The \"Q3\" Review""#));

    let json = fx.json(&["validate", "--project", "q3", "--json"]);
    assert_eq!(json["data"]["frontmatter"]["values"]["title"], r#"The "Q3" Review"#);
    assert_eq!(json["data"]["frontmatter"]["values"]["date"], "Oct 2026");
}

#[test]
fn test_scaffold_refuses_overwrite_without_force() {
    let fx = DeckFixture::new();
    fx.project("demo", "keep me");

    fx.cmd()
        .args(["scaffold", "--project", "demo"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
    assert_eq!(
        fs::read_to_string(fx.projects_dir().join("demo/page.mdx")).unwrap(),
        "keep me"
    );

    fx.cmd()
        .args(["scaffold", "--project", "demo", "--force"])
        .assert()
        .success();
    assert_ne!(
        fs::read_to_string(fx.projects_dir().join("demo/page.mdx")).unwrap(),
        "keep me"
    );
}

#[test]
fn test_scaffold_project_dir_uses_folder_name_as_key() {
    let fx = DeckFixture::new();
    let dir = fx.root().join("decks/roadmap");

    fx.cmd()
        .args(["scaffold", "--project-dir", dir.to_str().unwrap(), "--json"])
        .assert()
        .success();

    let page = fs::read_to_string(dir.join("page.mdx")).unwrap();
    assert!(page.contains("project: \"roadmap\""));
}

#[test]
fn test_scaffold_quiet_prints_nothing() {
    let fx = DeckFixture::new();

    fx.cmd()
        .args(["-q", "scaffold", "--project", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_scaffold_defaults_from_config() {
    let fx = DeckFixture::new();
    fx.write("projects/deckhand.toml", "[scaffold]\ntitle = \"Board Update\"\n");

    fx.cmd()
        .args(["scaffold", "--project", "board"])
        .assert()
        .success();

    let page = fs::read_to_string(fx.projects_dir().join("board/page.mdx")).unwrap();
    assert!(page.contains("# Board Update"));
}

#[test]
fn test_scaffold_rejects_multiline_title() {
    let fx = DeckFixture::new();

    fx.cmd()
        .args(["scaffold", "--project", "demo", "--title", "Line one\nLine two"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid title"))
        .stderr(predicate::str::contains("single-line"));
    assert!(!fx.projects_dir().join("demo").exists());

    let json = fx.json(&[
        "scaffold",
        "--project",
        "demo",
        "--subtitle",
        "a\r\nb",
        "--json",
    ]);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "INVALID_ARGUMENT");
}
