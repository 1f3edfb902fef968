//! Builder pattern API for running a scan.
//!
//! ```rust,ignore
//! use envdoctor_core::prelude::*;
//!
//! let report = EnvDoctor::new("/path/to/project")
//!     .exclude_dirs(["coverage"])
//!     .ignore_keys(["NODE_ENV"])
//!     .analyze()?;
//!
//! for key in &report.missing {
//!     println!("Missing: {}", key);
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::EnvDoctorConfig;
use crate::dotenv::{read_declaration_file, DeclarationFormat, DotenvFormat};
use crate::error::{EnvDoctorResult, IoResultExt};
use crate::extract::extract_env_keys;
use crate::keys::{is_ignored_key, KeySet};
use crate::parse::SourceParser;
use crate::reconcile::reconcile;
use crate::report::ScanReport;
use crate::scan::{gather_project_files, SkipKind, SkippedFile};

/// Builder for configuring a scan.
///
/// The root is always explicit; defaulting to the working directory is
/// left to the caller.
#[derive(Debug, Clone)]
pub struct EnvDoctor {
    /// Root directory of the project to scan
    root: PathBuf,

    /// Extra excluded file/directory names
    excluded_dirs: Vec<String>,

    /// Key patterns left out of missing/unused
    ignored_keys: Vec<String>,
}

impl EnvDoctor {
    /// Create a new scan builder for the given path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded_dirs: Vec::new(),
            ignored_keys: Vec::new(),
        }
    }

    /// Apply the lists from an `envdoctor.toml`.
    pub fn with_config(self, config: &EnvDoctorConfig) -> Self {
        self.exclude_dirs(config.excluded_names().iter().cloned())
            .ignore_keys(config.ignore_patterns().iter().cloned())
    }

    /// Add file or directory names to exclude from scanning.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Add key patterns to leave out of the report.
    pub fn ignore_keys(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored_keys.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run the scan and return the report.
    ///
    /// Only an unusable root is an error; unreadable or unparsable files are
    /// recorded in [`ScanReport::skipped`] and the scan carries on.
    pub fn analyze(&self) -> EnvDoctorResult<ScanReport> {
        // 1. Walk the tree
        let files = gather_project_files(&self.root, &self.excluded_dirs)?;
        let mut skipped = files.skipped;

        // 2. Declared keys
        let mut declared = KeySet::new();
        for path in &files.declarations {
            match read_declaration_file(path) {
                Ok(text) => declared.extend(DotenvFormat.keys(&text)),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping declaration file");
                    skipped.push(SkippedFile::from_error(path, SkipKind::Declaration, &err));
                }
            }
        }
        info!(
            files = files.declarations.len(),
            keys = declared.len(),
            "parsed declaration files"
        );

        // 3. Used keys
        let mut parser = SourceParser::new();
        let mut used = KeySet::new();
        for path in &files.sources {
            debug!(path = %path.display(), "scanning source file");
            let result = read_source_file(path)
                .and_then(|content| extract_env_keys(&mut parser, path, &content));
            match result {
                Ok(keys) => used.extend(keys),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping source file");
                    skipped.push(SkippedFile::from_error(path, SkipKind::Parse, &err));
                }
            }
        }
        info!(
            files = files.sources.len(),
            keys = used.len(),
            "scanned source files"
        );

        // 4. Reconcile
        let result = reconcile(&used, &declared);
        let keep = |key: &String| !is_ignored_key(key, &self.ignored_keys);

        Ok(ScanReport {
            root: self.root.clone(),
            declaration_files: files.declarations,
            source_files: files.sources.len(),
            used_keys: used.into_iter().collect(),
            declared_keys: declared.into_iter().collect(),
            missing: result.missing.into_iter().filter(keep).collect(),
            unused: result.unused.into_iter().filter(keep).collect(),
            skipped,
        })
    }
}

/// Read a source file, replacing invalid UTF-8 rather than failing.
fn read_source_file(path: &Path) -> EnvDoctorResult<String> {
    let bytes = fs::read(path).with_path(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_test_project() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "envdoctor_builder_test_{}_{}",
            std::process::id(),
            id
        ));

        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(dir.join("src")).expect("Failed to create test directory");

        fs::write(dir.join(".env"), "API_KEY=x\nNODE_ENV=dev\nOLD_FLAG=1\n")
            .expect("Failed to write .env");
        fs::write(
            dir.join("src/index.js"),
            "fetch(process.env.API_KEY, process.env.NODE_ENV, process.env.NEW_KEY);",
        )
        .expect("Failed to write index.js");

        dir
    }

    #[test]
    fn test_builder_basic() {
        let dir = create_test_project();

        let report = EnvDoctor::new(&dir).analyze().unwrap();

        assert_eq!(report.missing, vec!["NEW_KEY"]);
        assert_eq!(report.unused, vec!["OLD_FLAG"]);
        assert_eq!(report.declaration_file_count(), 1);
        assert_eq!(report.source_files, 1);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_builder_ignore_keys() {
        let dir = create_test_project();

        let report = EnvDoctor::new(&dir)
            .ignore_keys(["NEW_*", "OLD_FLAG"])
            .analyze()
            .unwrap();

        assert!(report.missing.is_empty());
        assert!(report.unused.is_empty());
        // Ignored keys still count as used/declared
        assert_eq!(report.unique_used_count(), 3);
        assert_eq!(report.unique_declared_count(), 3);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_builder_exclude_dirs() {
        let dir = create_test_project();

        let report = EnvDoctor::new(&dir).exclude_dirs(["src"]).analyze().unwrap();

        assert_eq!(report.source_files, 0);
        assert!(report.missing.is_empty());
        assert_eq!(report.unused, vec!["API_KEY", "NODE_ENV", "OLD_FLAG"]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_builder_with_config() {
        let dir = create_test_project();
        let config: EnvDoctorConfig =
            toml::from_str("ignore = [\"OLD_FLAG\"]\nexclude = [\"nothing\"]").unwrap();

        let report = EnvDoctor::new(&dir).with_config(&config).analyze().unwrap();

        assert_eq!(report.missing, vec!["NEW_KEY"]);
        assert!(report.unused.is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_utf8_source_is_still_scanned() {
        let dir = create_test_project();
        let mut bytes = b"const a = process.env.LATIN; // caf".to_vec();
        bytes.push(0xE9);
        bytes.push(b'\n');
        fs::write(dir.join("src/latin1.js"), bytes).unwrap();

        let report = EnvDoctor::new(&dir).analyze().unwrap();
        assert!(report.used_keys.contains(&"LATIN".to_string()));
        assert!(report.skipped.is_empty());

        fs::remove_dir_all(&dir).ok();
    }
}
