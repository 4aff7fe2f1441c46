//! Confinement of local references to the project folder
//!
//! Security: a reference is only ever reported as [`Outcome::Resolved`] after its
//! canonical path (symlinks followed) has been shown to sit inside the canonical
//! project root, using component-wise comparison. Everything that leaves the root
//! is [`Outcome::Traversal`].

use super::references::AssetReference;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Upper bound on symlink hops followed for paths that don't fully exist.
const MAX_LINK_DEPTH: usize = 40;

/// Result of resolving one normalised local reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// An existing file; `path` is root-relative with forward slashes
    Resolved { path: String },
    /// Inside the root but nothing exists there
    Missing { target: String },
    /// Inside the root but names a directory
    Directory { target: String },
    /// Escapes the project root
    Traversal,
}

/// A local reference together with its resolution outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResolvedAsset {
    #[serde(flatten)]
    pub reference: AssetReference,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ResolvedAsset {
    /// `raw -> target` line used by reports for missing and directory outcomes.
    pub fn describe(&self) -> String {
        match &self.outcome {
            Outcome::Missing { target } | Outcome::Directory { target } => {
                format!("{} -> {}", self.reference.raw, target)
            }
            Outcome::Resolved { path } => format!("{} -> {}", self.reference.raw, path),
            Outcome::Traversal => self.reference.raw.clone(),
        }
    }
}

/// Resolves normalised references against a canonical project root.
///
/// # Example
///
/// ```
/// use deckhand::document::{Outcome, PathResolver};
///
/// let dir = std::env::temp_dir();
/// let resolver = PathResolver::new(&dir).unwrap();
/// assert_eq!(resolver.resolve("../../etc/passwd"), Outcome::Traversal);
/// ```
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Canonicalises `root` once; fails if it doesn't exist.
    pub fn new(root: &Path) -> io::Result<Self> {
        Ok(Self {
            root: root.canonicalize()?,
        })
    }

    /// Canonical project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, normalized: &str) -> Outcome {
        if normalized == ".." || normalized.starts_with("../") {
            tracing::warn!(reference = normalized, "reference climbs above project root");
            return Outcome::Traversal;
        }

        let candidate = canonicalize_lenient(&self.root.join(normalized));
        if !is_within(&self.root, &candidate) {
            tracing::warn!(
                reference = normalized,
                resolved = %candidate.display(),
                "reference resolves outside project root"
            );
            return Outcome::Traversal;
        }

        let target = candidate.display().to_string();
        if !candidate.exists() {
            tracing::debug!(reference = normalized, "missing asset");
            return Outcome::Missing { target };
        }
        if candidate.is_dir() {
            tracing::debug!(reference = normalized, "reference names a directory");
            return Outcome::Directory { target };
        }

        Outcome::Resolved {
            path: relative_posix(&self.root, &candidate),
        }
    }

    /// Resolve a classified reference; external references yield `None`.
    pub fn resolve_reference(&self, reference: &AssetReference) -> Option<ResolvedAsset> {
        reference.is_local().then(|| ResolvedAsset {
            reference: reference.clone(),
            outcome: self.resolve(&reference.normalized),
        })
    }
}

/// Component-wise containment: `/deck` contains `/deck/a.png` but not
/// `/deck-evil/a.png`.
pub fn is_within(root: &Path, target: &Path) -> bool {
    target.starts_with(root)
}

/// `target` relative to `root`, joined with forward slashes.
pub fn relative_posix(root: &Path, target: &Path) -> String {
    target
        .strip_prefix(root)
        .unwrap_or(target)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Canonicalise as much of `path` as exists, then append the rest.
///
/// Dangling symlinks along the way are followed by reading the link, so a link
/// pointing outside the root is still seen as outside even when its target is
/// missing. A relative link target is joined to the fully resolved parent, the
/// same way the kernel walks it.
fn canonicalize_lenient(path: &Path) -> PathBuf {
    resolve_with_depth(path, 0)
}

fn resolve_with_depth(path: &Path, depth: usize) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    if depth < MAX_LINK_DEPTH {
        let is_link = fs::symlink_metadata(path)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);
        if is_link {
            if let Ok(link_target) = fs::read_link(path) {
                // `..` in the link target is relative to where the parent really is
                let base = path
                    .parent()
                    .map(|parent| resolve_with_depth(parent, depth + 1))
                    .unwrap_or_else(|| PathBuf::from("/"));
                let followed = normalize_components(&base.join(link_target));
                return resolve_with_depth(&followed, depth + 1);
            }
        }
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => resolve_with_depth(parent, depth).join(name),
        _ => path.to_path_buf(),
    }
}

/// Normalize a path by resolving `.` and `..` components lexically
fn normalize_components(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            c => components.push(c),
        }
    }
    components.iter().collect()
}
