//! Integration tests for `deckhand validate`

mod harness;

use harness::{DeckFixture, CLEAN_DECK};
use predicates::prelude::*;

#[test]
fn test_validate_clean_deck() {
    let fx = DeckFixture::new();
    fx.project("demo", CLEAN_DECK);
    fx.write("projects/demo/images/a.png", [0u8; 16]);

    fx.cmd()
        .args(["validate", "--project", "demo", "--strict"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[OK] Validation report for"))
        .stdout(predicate::str::contains(
            "Slides: 2 | Asset references checked: 1",
        ))
        .stdout(predicate::str::contains(
            "- Slide 2: words=2, bullets=2, max_paragraph_words=2",
        ));
}

#[test]
fn test_validate_project_mismatch_is_warning() {
    let fx = DeckFixture::new();
    fx.project("other", CLEAN_DECK);
    fx.write("projects/other/images/a.png", [0u8; 16]);

    let json = fx.json(&["validate", "--project", "other", "--json"]);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["frontmatter"]["values"]["project"], "demo");
    assert_eq!(json["data"]["errors"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["warnings"][0]["code"], "project_mismatch");

    fx.cmd()
        .args(["validate", "--project", "other", "--strict"])
        .assert()
        .code(4)
        .stdout(predicate::str::contains(
            "Frontmatter project `demo` does not match folder name `other`.",
        ));
}

#[test]
fn test_validate_unterminated_last_slide() {
    let fx = DeckFixture::new();
    fx.project(
        "demo",
        "---\nproject: demo\ntitle: T\n---\n<section className=\"slide\">one</section>\n<section className=\"slide\">two three four",
    );

    let json = fx.json(&["validate", "--project", "demo", "--json"]);
    let stats = json["data"]["slide_stats"].as_array().unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0]["words"], 1);
    assert_eq!(stats[1]["slide"], 2);
    assert_eq!(stats[1]["words"], 3);
}

#[test]
fn test_validate_plain_document() {
    let fx = DeckFixture::new();
    fx.project("demo", "Just some text.\n");

    let json = fx.json(&["validate", "--project", "demo", "--json"]);
    assert_eq!(json["success"], false);
    assert_eq!(json["data"]["slide_count"], 0);
    assert_eq!(json["data"]["frontmatter"]["detected"], false);
    assert_eq!(json["data"]["errors"][0]["code"], "no_slides");
    assert_eq!(json["data"]["warnings"][0]["code"], "missing_frontmatter");
}

#[test]
fn test_validate_traversal_is_error() {
    let fx = DeckFixture::new();
    fx.project(
        "demo",
        "<section className=\"slide\">\n![x](../../etc/passwd)\n</section>",
    );

    fx.cmd()
        .args(["validate", "--project", "demo"])
        .assert()
        .code(4)
        .stdout(predicate::str::contains(
            "Asset path escapes project folder: ../../etc/passwd",
        ));
}

#[test]
fn test_validate_threshold_flags_override_config() {
    let fx = DeckFixture::new();
    fx.project(
        "demo",
        "---\nproject: demo\ntitle: T\n---\n<section className=\"slide\">\n- a\n- b\n- c\n</section>",
    );
    fx.write("projects/deckhand.toml", "[validate]\nmax_bullets = 2\n");

    let from_config = fx.json(&["validate", "--project", "demo", "--json"]);
    assert_eq!(from_config["data"]["warnings"][0]["code"], "slide_bullets");
    assert_eq!(from_config["data"]["warnings"][0]["slide"], 1);

    let overridden = fx.json(&[
        "validate",
        "--project",
        "demo",
        "--max-bullets",
        "3",
        "--json",
    ]);
    assert_eq!(overridden["data"]["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn test_validate_strict_from_config() {
    let fx = DeckFixture::new();
    fx.project("demo", "<section className=\"slide\">hi</section>");
    let config = fx.write("strict.toml", "[validate]\nstrict = true\n");

    fx.cmd()
        .args(["validate", "--project", "demo"])
        .assert()
        .success();

    fx.cmd()
        .args(["--config", config.to_str().unwrap(), "validate", "--project", "demo"])
        .assert()
        .code(4);
}

#[test]
fn test_validate_structural_markers() {
    let fx = DeckFixture::new();
    fx.project(
        "demo",
        "\"use client\";\nexport const meta = {}\n<section className=\"slide\">hi</section>",
    );

    let json = fx.json(&["validate", "--project", "demo", "--json"]);
    let errors: Vec<_> = json["data"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["code"].as_str().unwrap().to_string())
        .collect();
    let warnings: Vec<_> = json["data"]["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["code"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(errors, vec!["module_statement"]);
    assert!(warnings.contains(&"client_directive".to_string()));
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let fx = DeckFixture::new();
    fx.project("demo", CLEAN_DECK);
    fx.write("projects/demo/images/a.png", [0u8; 16]);

    let output = fx
        .cmd()
        .args(["-v", "validate", "--project", "demo", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice::<serde_json::Value>(&output.stdout).unwrap();
    assert!(String::from_utf8_lossy(&output.stderr).contains("validation finished"));
}
