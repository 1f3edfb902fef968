//! Deterministic project file discovery with directory pruning.
//!
//! One walk classifies every entry below the root:
//! - excluded names (`node_modules`, `.git`, build output, package manifests)
//!   are pruned via `WalkDir::filter_entry`, so their subtrees are never read
//! - files with a JavaScript/TypeScript extension are source files
//! - files whose name starts with `.env` are declaration files
//!
//! Entries are sorted by file name, so two walks over an unchanged tree
//! produce identical results.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{EnvDoctorError, EnvDoctorResult};

/// Names skipped anywhere below the root, whatever their entry type.
pub const EXCLUDED_NAMES: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "package.json",
    "package-lock.json",
];

/// Extensions of source files scanned for environment access.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"];

/// File name prefix of declaration files (`.env`, `.env.local`, ...).
pub const DECLARATION_PREFIX: &str = ".env";

/// Why a file contributed nothing to the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    /// Source file unreadable or syntactically invalid
    Parse,
    /// Declaration file unreadable
    Declaration,
    /// Entry below the root could not be visited (permissions, link cycle)
    Traversal,
}

/// A file or directory that was skipped with a recoverable error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub kind: SkipKind,
    pub message: String,
}

impl SkippedFile {
    /// Build a skip record from a recoverable error.
    pub fn from_error(fallback_path: &Path, kind: SkipKind, err: &EnvDoctorError) -> Self {
        Self {
            path: err.path().cloned().unwrap_or_else(|| fallback_path.to_path_buf()),
            kind,
            message: err.to_string(),
        }
    }
}

/// Files discovered below a project root.
#[derive(Debug, Clone, Default)]
pub struct ProjectFiles {
    /// JavaScript/TypeScript sources, in walk order
    pub sources: Vec<PathBuf>,
    /// `.env*` declaration files, in walk order
    pub declarations: Vec<PathBuf>,
    /// Entries that could not be visited
    pub skipped: Vec<SkippedFile>,
}

/// Checks if an entry should be pruned (excluded from traversal).
///
/// The root itself is never pruned, even if its name is on the list.
#[inline]
fn is_excluded(entry: &DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Is `path` a JavaScript/TypeScript source by extension?
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Is `path` a declaration file by name?
pub fn is_declaration_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(DECLARATION_PREFIX))
}

/// Gathers source and declaration files below `root`.
///
/// Automatically excludes [`EXCLUDED_NAMES`]; `extra_excludes` adds more
/// names. Symbolic links are followed. Errors on entries below the root
/// (permission denied, link cycles) are logged and recorded in
/// [`ProjectFiles::skipped`]; an unusable root is a fatal traversal error.
pub fn gather_project_files(root: &Path, extra_excludes: &[String]) -> EnvDoctorResult<ProjectFiles> {
    let meta = fs::metadata(root)
        .map_err(|e| EnvDoctorError::traversal(root, format!("cannot access root: {}", e)))?;
    if !meta.is_dir() {
        return Err(EnvDoctorError::traversal(root, "root is not a directory"));
    }

    let excludes: HashSet<&str> = EXCLUDED_NAMES
        .iter()
        .copied()
        .chain(extra_excludes.iter().map(String::as_str))
        .collect();

    let mut files = ProjectFiles::default();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        // Prunes whole subtrees before they are read
        .filter_entry(|e| !is_excluded(e, &excludes));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                if err.depth() == 0 {
                    return Err(EnvDoctorError::traversal(path, err.to_string()));
                }
                warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                files.skipped.push(SkippedFile {
                    path,
                    kind: SkipKind::Traversal,
                    message: err.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if is_declaration_file(path) {
            debug!(path = %path.display(), "found declaration file");
            files.declarations.push(path.to_path_buf());
        }
        if is_source_file(path) {
            files.sources.push(path.to_path_buf());
        }
    }

    debug!(
        sources = files.sources.len(),
        declarations = files.declarations.len(),
        skipped = files.skipped.len(),
        "project walk finished"
    );

    Ok(files)
}
