// ── Ignore rules ──
//
// Literal patterns, not globs. A path is excluded when it contains any
// pattern as a substring or when its last component equals a pattern.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

/// Patterns excluded when nothing else is configured.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] =
    &["node_modules/", ".git/", ".vscode/", ".env", ".env.local"];

/// Ordered, immutable set of ignore patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreSet {
    patterns: Vec<String>,
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_PATTERNS.iter().copied())
    }
}

impl IgnoreSet {
    /// Build a set from patterns. Empty patterns are dropped since they
    /// would match every path.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// A set that ignores nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// This set plus `extra`, keeping order and skipping duplicates.
    pub fn extended<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut patterns = self.patterns.clone();
        for p in extra.into_iter().map(Into::into) {
            if !p.is_empty() && !patterns.contains(&p) {
                patterns.push(p);
            }
        }
        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether `path` matches any pattern, by substring or exact basename.
    pub fn should_ignore(&self, path: &str) -> bool {
        let basename = basename(path);
        self.patterns
            .iter()
            .any(|p| path.contains(p.as_str()) || basename == p.as_str())
    }

    /// Check an entry of the local tree given its path relative to the
    /// source root. Separators are normalized to `/`, and directories get a
    /// trailing `/` so patterns like `node_modules/` prune the directory
    /// itself rather than each file beneath it.
    pub fn should_ignore_entry(&self, relative: &Path, is_dir: bool) -> bool {
        let mut normalized = to_slash(relative);
        if is_dir {
            normalized.push('/');
        }
        self.should_ignore(&normalized)
    }
}

fn basename(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}

/// Join the normal components of `path` with `/`, whatever the host separator.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
