//! Scan results and their plaintext / JSON rendering.

use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::scan::SkippedFile;

/// Outcome of one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Root directory that was scanned
    pub root: PathBuf,
    /// Declaration files found, in walk order
    pub declaration_files: Vec<PathBuf>,
    /// Source files walked (including ones that failed to parse)
    pub source_files: usize,
    /// Unique keys referenced in code, in discovery order
    pub used_keys: Vec<String>,
    /// Unique keys declared across all declaration files, in discovery order
    pub declared_keys: Vec<String>,
    /// Used but not declared (ignore patterns applied)
    pub missing: Vec<String>,
    /// Declared but not used (ignore patterns applied)
    pub unused: Vec<String>,
    /// Files that contributed no keys because of a recoverable error
    pub skipped: Vec<SkippedFile>,
}

impl ScanReport {
    pub fn declaration_file_count(&self) -> usize {
        self.declaration_files.len()
    }

    pub fn unique_declared_count(&self) -> usize {
        self.declared_keys.len()
    }

    pub fn unique_used_count(&self) -> usize {
        self.used_keys.len()
    }

    /// No missing and no unused keys.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unused.is_empty()
    }
}

fn write_key_list(out: &mut String, keys: &[String]) {
    for key in keys {
        let _ = writeln!(out, "  - {}", key);
    }
}

/// Renders the report as human-readable text.
pub fn render_plain(report: &ScanReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Found {} .env file(s).", report.declaration_file_count());
    let _ = writeln!(
        out,
        "Parsed .env files: {} unique key(s) declared.",
        report.unique_declared_count()
    );
    let _ = writeln!(
        out,
        "Scanned {} source file(s): {} unique key(s) used.",
        report.source_files,
        report.unique_used_count()
    );

    if !report.skipped.is_empty() {
        let _ = writeln!(out, "\nSKIPPED ({}):", report.skipped.len());
        for skipped in &report.skipped {
            let _ = writeln!(out, "  - {}", skipped.message);
        }
    }

    let _ = writeln!(out, "\nUsed keys in code: {:?}", report.used_keys);
    let _ = writeln!(out, "Keys defined in .env files: {:?}", report.declared_keys);

    if report.missing.is_empty() {
        let _ = writeln!(out, "\nNo missing keys in .env file(s).");
    } else {
        let _ = writeln!(out, "\nMISSING KEYS ({}):", report.missing.len());
        write_key_list(&mut out, &report.missing);
    }

    if report.unused.is_empty() {
        let _ = writeln!(out, "No unused keys in .env file(s).");
    } else {
        let _ = writeln!(out, "UNUSED KEYS ({}):", report.unused.len());
        write_key_list(&mut out, &report.unused);
    }

    out
}

/// Renders the report as pretty JSON.
pub fn render_json(report: &ScanReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Prints the report in plain text format.
pub fn print_plain(report: &ScanReport) {
    print!("{}", render_plain(report));
}

/// Prints the report in JSON format.
///
/// Falls back to a debug dump if serialization fails.
pub fn print_json(report: &ScanReport) {
    match render_json(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::warn!(error = %e, "JSON serialization failed");
            println!(
                "{{\"missing\": {:?}, \"unused\": {:?}}}",
                report.missing, report.unused
            );
        }
    }
}
