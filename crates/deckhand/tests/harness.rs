//! Test harness for CLI integration tests
//!
//! Each fixture owns a temp directory laid out as `<tmp>/projects/<name>/...`,
//! and every command runs with that directory as cwd and the projects-dir
//! environment variables cleared, so `./projects` is the default.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CLEAN_DECK: &str = r#"---
project: "demo"
title: "Demo"
---

<main className="deck">
<section className="slide">
# Cover

![hero](images/a.png?v=2#x)
</section>
<section className="slide">
- one
- two
</section>
</main>
"#;

pub struct DeckFixture {
    temp: TempDir,
}

impl DeckFixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("projects")).unwrap();
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.temp.path().join("projects")
    }

    /// Create `projects/<name>/page.mdx` with `page` as content.
    pub fn project(&self, name: &str, page: &str) -> PathBuf {
        let dir = self.projects_dir().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("page.mdx"), page).unwrap();
        dir
    }

    /// Write a file relative to the fixture root, creating parent folders.
    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.temp.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("deckhand"));
        cmd.current_dir(self.temp.path())
            .env_remove("DECK_PROJECTS_DIR")
            .env_remove("FASTSLIDES_PROJECTS_DIR")
            .env_remove("DECKHAND_LOG");
        cmd
    }

    /// Run a command and parse its stdout as JSON.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.cmd().args(args).output().unwrap();
        serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
            panic!(
                "stdout is not JSON ({e}):\n{}\nstderr:\n{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            )
        })
    }
}
