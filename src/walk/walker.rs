//! Tree Walker - recursive directory scan with name matching
//!
//! Visits a directory tree in a stable order (entries sorted by file name in
//! every directory) and reports each entry whose name matches a regular
//! expression. Matches are handed to a callback inline, during the scan.
//!
//! # Usage
//! ```ignore
//! let walker = TreeWalker::new("/var/stats", r"__metric__\.json")?;
//! walker.walk(|m| {
//!     println!("{} at level {}", m.full_path.display(), m.level);
//!     WalkControl::Continue
//! });
//! ```

use crate::walk::error::WalkResult;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Kind of directory entry a walk reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Regular files only
    Files,
    /// Directories only
    Directories,
}

/// Returned by walk callbacks to continue or end the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    Continue,
    Stop,
}

/// One entry found by a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkMatch {
    /// Directory + name of the entry
    pub full_path: PathBuf,
    /// Directory holding the entry
    pub directory: PathBuf,
    /// Entry name
    pub name: String,
    /// Depth below the root (entries directly inside the root are level 1)
    pub level: usize,
    /// Ordinal of this match among the matches of its directory, from 0
    pub index: usize,
}

/// Outcome counters of a single walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Number of matches handed to the callback
    pub matched: usize,
    /// Entries that could not be read and were skipped
    pub skipped: usize,
    /// Whether the callback ended the walk early
    pub stopped: bool,
}

/// Directory tree scanner
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    pattern: Regex,
    recursive: bool,
    kind: MatchKind,
}

impl TreeWalker {
    /// Create a recursive file walker; `pattern` must match the whole entry name
    pub fn new(root: impl Into<PathBuf>, pattern: &str) -> WalkResult<Self> {
        let pattern = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self::with_regex(root, pattern))
    }

    /// Create a recursive file walker from a compiled pattern (matched as given)
    pub fn with_regex(root: impl Into<PathBuf>, pattern: Regex) -> Self {
        Self {
            root: root.into(),
            pattern,
            recursive: true,
            kind: MatchKind::Files,
        }
    }

    /// Builder: descend into subdirectories (default) or stay in the root
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Builder: choose which kind of entry is matched
    pub fn kind(mut self, kind: MatchKind) -> Self {
        self.kind = kind;
        self
    }

    /// Scan the tree, invoking `on_match` for every matching entry
    ///
    /// Each call performs a fresh scan. Unreadable entries are logged and
    /// skipped. Returning [`WalkControl::Stop`] ends the scan immediately.
    pub fn walk<F>(&self, mut on_match: F) -> WalkSummary
    where
        F: FnMut(&WalkMatch) -> WalkControl,
    {
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut summary = WalkSummary::default();
        let mut per_directory: HashMap<PathBuf, usize> = HashMap::new();

        let entries = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(
                        path = ?e.path().unwrap_or(self.root.as_path()),
                        error = %e,
                        "Skipping unreadable entry"
                    );
                    summary.skipped += 1;
                    continue;
                }
            };

            let file_type = entry.file_type();
            let wanted = match self.kind {
                MatchKind::Files => file_type.is_file(),
                MatchKind::Directories => file_type.is_dir(),
            };
            if !wanted {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !self.pattern.is_match(&name) {
                continue;
            }

            let directory = entry
                .path()
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.root.clone());

            let counter = per_directory.entry(directory.clone()).or_insert(0);
            let found = WalkMatch {
                full_path: entry.path().to_path_buf(),
                directory,
                name: name.into_owned(),
                level: entry.depth(),
                index: *counter,
            };
            *counter += 1;
            summary.matched += 1;

            tracing::trace!(path = ?found.full_path, level = found.level, "Walk match");

            if on_match(&found) == WalkControl::Stop {
                summary.stopped = true;
                break;
            }
        }

        summary
    }

    /// Scan the tree and collect every match
    pub fn matches(&self) -> Vec<WalkMatch> {
        let mut found = Vec::new();
        self.walk(|m| {
            found.push(m.clone());
            WalkControl::Continue
        });
        found
    }
}
