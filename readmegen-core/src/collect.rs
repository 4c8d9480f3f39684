//! Tree Collector: a deterministic, bounded walk of a project directory.
//!
//! The walk is top-down. In each directory the eligible files are read first, in
//! lexicographic order of their names, then the non-pruned subdirectories are
//! visited, also in lexicographic order. Two runs over an unchanged tree therefore
//! return identical document lists.
//!
//! Collection stops as soon as the running content total reaches the byte budget.
//! A document that does not fit is clipped so that its text plus the truncation
//! marker fills the remaining budget; if not even one character fits, it is dropped.
//! Whatever was gathered up to that point is a valid result, never an error.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::filter::{is_eligible, is_readme_name, is_skipped_dir};
use crate::sanitize::{read_with_rules, MAX_FILE_BYTES, TRUNCATION_MARKER};

/// Hard ceiling on the summed byte length of all collected content.
pub const MAX_TOTAL_BYTES: usize = 5 * 1024 * 1024;

/// One collected file: slash-normalized relative path plus sanitized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub source_path: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectLimits {
    pub max_file_bytes: usize,
    pub max_total_bytes: usize,
}

impl Default for CollectLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_FILE_BYTES,
            max_total_bytes: MAX_TOTAL_BYTES,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Collect README-like files too. Off by default so a previous README is not copied.
    pub include_readme: bool,
    pub limits: CollectLimits,
}

/// Result of one walk.
#[derive(Debug, Clone)]
pub struct Collection {
    pub root: PathBuf,
    pub documents: Vec<Document>,
    pub total_bytes: usize,
    /// The walk ended because the byte budget was exhausted.
    pub truncated_by_budget: bool,
    /// Eligible files or directories that could not be read.
    pub skipped: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("Path is not a directory: {}", .0.display())]
    InvalidRoot(PathBuf),
    #[error("Failed to resolve {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validate and canonicalize a project root.
pub fn resolve_root(root: &Path) -> Result<PathBuf, CollectError> {
    let resolved = fs::canonicalize(root).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CollectError::InvalidRoot(root.to_path_buf())
        } else {
            CollectError::Io {
                path: root.to_path_buf(),
                source: e,
            }
        }
    })?;
    if !resolved.is_dir() {
        return Err(CollectError::InvalidRoot(resolved));
    }
    Ok(resolved)
}

/// Collect with default limits.
pub fn collect(root: &Path, include_readme: bool) -> Result<Collection, CollectError> {
    collect_with(
        root,
        &CollectOptions {
            include_readme,
            ..CollectOptions::default()
        },
    )
}

pub fn collect_with(root: &Path, options: &CollectOptions) -> Result<Collection, CollectError> {
    let root = resolve_root(root)?;
    info!(root = %root.display(), include_readme = options.include_readme, "Collecting project files");

    let mut run = CollectionRun {
        root: root.clone(),
        options,
        seen: HashSet::new(),
        total_bytes: 0,
        documents: Vec::new(),
        skipped: Vec::new(),
    };
    let flow = run.visit_dir(&root);
    let truncated_by_budget = matches!(flow, Walk::BudgetExhausted);

    info!(
        documents = run.documents.len(),
        total_bytes = run.total_bytes,
        skipped = run.skipped.len(),
        truncated_by_budget,
        "Collection finished"
    );
    Ok(Collection {
        root,
        documents: run.documents,
        total_bytes: run.total_bytes,
        truncated_by_budget,
        skipped: run.skipped,
    })
}

enum Walk {
    Continue,
    BudgetExhausted,
}

struct CollectionRun<'a> {
    root: PathBuf,
    options: &'a CollectOptions,
    seen: HashSet<String>,
    total_bytes: usize,
    documents: Vec<Document>,
    skipped: Vec<String>,
}

impl CollectionRun<'_> {
    fn visit_dir(&mut self, dir: &Path) -> Walk {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, path = %dir.display(), "Skipping unreadable directory");
                let rel = self.relative(dir);
                self.skipped.push(rel);
                return Walk::Continue;
            }
        };

        let mut files: Vec<(String, PathBuf)> = Vec::new();
        let mut dirs: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                if is_skipped_dir(&name) {
                    debug!(path = %path.display(), "Pruning directory");
                } else {
                    dirs.push((name, path));
                }
            } else if path.is_file() {
                // Plain files and symlinks resolving to files; symlinked directories are not followed.
                files.push((name, path));
            }
        }
        files.sort();
        dirs.sort();

        for (name, path) in files {
            if let Walk::BudgetExhausted = self.visit_file(&name, &path) {
                return Walk::BudgetExhausted;
            }
        }
        for (_, path) in dirs {
            if let Walk::BudgetExhausted = self.visit_dir(&path) {
                return Walk::BudgetExhausted;
            }
        }
        Walk::Continue
    }

    fn visit_file(&mut self, name: &str, path: &Path) -> Walk {
        let rel = self.relative(path);
        if !self.options.include_readme && is_readme_name(name) {
            debug!(path = %rel, "Skipping README-like file");
            return Walk::Continue;
        }
        if !is_eligible(path) || self.seen.contains(&rel) {
            return Walk::Continue;
        }

        let mut content = match read_with_rules(path, self.options.limits.max_file_bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, path = %rel, "Skipping unreadable file");
                self.skipped.push(rel);
                return Walk::Continue;
            }
        };

        let budget = self.options.limits.max_total_bytes;
        let remaining = budget.saturating_sub(self.total_bytes);
        let clipped = content.len() > remaining;
        if clipped {
            // Clipped text plus marker must still fit in what is left.
            let keep = floor_char_boundary(
                &content,
                remaining.saturating_sub(TRUNCATION_MARKER.len()),
            );
            if keep == 0 {
                info!(path = %rel, remaining, budget, "Collection budget reached");
                return Walk::BudgetExhausted;
            }
            debug!(path = %rel, remaining, keep, "Clipping document to remaining budget");
            content.truncate(keep);
            content.push_str(TRUNCATION_MARKER);
        }

        debug!(path = %rel, bytes = content.len(), "Collected file");
        self.total_bytes += content.len();
        self.seen.insert(rel.clone());
        self.documents.push(Document {
            source_path: rel,
            content,
        });

        if clipped || self.total_bytes >= budget {
            info!(total_bytes = self.total_bytes, budget, "Collection budget reached");
            Walk::BudgetExhausted
        } else {
            Walk::Continue
        }
    }

    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
