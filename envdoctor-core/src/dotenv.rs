//! Declaration (.env) file reading.
//!
//! Parses the line-oriented `KEY=VALUE` convention popularised by `dotenv`:
//! comments, blank lines, `export` prefixes, `KEY: VALUE` lines and quoted
//! (possibly multi-line) values. Lines that do not look like an assignment
//! are skipped rather than rejected.

use indexmap::IndexMap;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{EnvDoctorError, EnvDoctorResult};
use crate::keys::KeySet;

/// Flat key/value mapping of one declaration file, in first-seen key order.
pub type Declarations = IndexMap<String, String>;

/// A textual format that declares environment variables.
pub trait DeclarationFormat {
    /// Parse file text into a key/value mapping.
    fn parse(&self, text: &str) -> Declarations;

    /// Keys declared by `text`.
    fn keys(&self, text: &str) -> KeySet {
        self.parse(text).into_keys().collect()
    }
}

/// The `.env` line format.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotenvFormat;

impl DeclarationFormat for DotenvFormat {
    fn parse(&self, text: &str) -> Declarations {
        parse_dotenv(text)
    }
}

fn line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(concat!(
            r"(?m)^\s*(?:export\s+)?([A-Za-z0-9_.-]+)(?:\s*=\s*?|:\s+?)",
            r#"(\s*'(?:\\'|[^'])*'|\s*"(?:\\"|[^"])*"|\s*`(?:\\`|[^`])*`|[^#\r\n]+)?"#,
            r"\s*(?:#.*)?$",
        ))
        .expect("Hardcoded regex pattern is valid")
    })
}

/// Parse `.env` text into a key/value mapping.
///
/// A key assigned twice keeps its first position and takes the last value.
/// A leading byte-order mark is ignored.
pub fn parse_dotenv(text: &str) -> Declarations {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = Declarations::new();

    for caps in line_regex().captures_iter(&normalized) {
        let key = &caps[1];
        let raw = caps.get(2).map(|m| m.as_str()).unwrap_or("").trim();
        out.insert(key.to_string(), unquote(raw));
    }

    out
}

/// Strip matching outer quotes; expand `\n` and `\r` inside double quotes.
fn unquote(raw: &str) -> String {
    let mut chars = raw.chars();
    let (Some(first), Some(last)) = (chars.next(), raw.chars().last()) else {
        return String::new();
    };

    let quoted = raw.len() >= 2 && matches!(first, '\'' | '"' | '`') && first == last;
    if !quoted {
        return raw.to_string();
    }

    let inner = &raw[1..raw.len() - 1];
    if first == '"' {
        inner.replace("\\n", "\n").replace("\\r", "\r")
    } else {
        inner.to_string()
    }
}

/// Read a declaration file from disk.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn read_declaration_file(path: &Path) -> EnvDoctorResult<String> {
    let bytes = fs::read(path)
        .map_err(|e| EnvDoctorError::declaration(path, format!("cannot read file: {}", e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(text: &str) -> Vec<String> {
        DotenvFormat.keys(text).into_iter().collect()
    }

    #[test]
    fn test_commented_line_is_excluded() {
        assert_eq!(keys("A=1\nB=2\n#C=3"), vec!["A", "B"]);
    }

    #[test]
    fn test_blank_lines_and_indented_comments() {
        let text = "\n\n  # header\nA=1\n\n   \n  B = two  \n";
        let parsed = parse_dotenv(text);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["A"], "1");
        assert_eq!(parsed["B"], "two");
    }

    #[test]
    fn test_inline_comment_and_empty_value() {
        let parsed = parse_dotenv("PORT=3000 # web port\nEMPTY=\nNEXT=x");
        assert_eq!(parsed["PORT"], "3000");
        assert_eq!(parsed["EMPTY"], "");
        assert_eq!(parsed["NEXT"], "x");
    }

    #[test]
    fn test_quoted_values() {
        let text = "SINGLE='a # not comment'\nDOUBLE=\"line1\\nline2\"\nBACK=`tick`";
        let parsed = parse_dotenv(text);
        assert_eq!(parsed["SINGLE"], "a # not comment");
        assert_eq!(parsed["DOUBLE"], "line1\nline2");
        assert_eq!(parsed["BACK"], "tick");
    }

    #[test]
    fn test_multiline_quoted_value() {
        let text = "KEY=\"-----BEGIN-----\nabc\n-----END-----\"\nAFTER=1";
        let parsed = parse_dotenv(text);
        assert_eq!(parsed["KEY"], "-----BEGIN-----\nabc\n-----END-----");
        assert_eq!(parsed["AFTER"], "1");
    }

    #[test]
    fn test_export_prefix_and_colon_syntax() {
        assert_eq!(keys("export TOKEN=abc\nHOST: localhost"), vec!["TOKEN", "HOST"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(keys("A=1\r\nB=2\r\n"), vec!["A", "B"]);
    }

    #[test]
    fn test_leading_byte_order_mark() {
        assert_eq!(keys("\u{feff}BOM=1\nN=2"), vec!["BOM", "N"]);
        assert_eq!(keys("\u{feff}A=1\r\nB=2\r\n"), vec!["A", "B"]);
    }

    #[test]
    fn test_duplicate_key_last_value_wins_first_position() {
        let parsed = parse_dotenv("A=1\nB=2\nA=3");
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(parsed["A"], "3");
    }

    #[test]
    fn test_keys_keep_case_and_punctuation() {
        assert_eq!(keys("lower=1\nsome.dotted-key=2"), vec!["lower", "some.dotted-key"]);
    }

    #[test]
    fn test_garbage_lines_are_skipped() {
        assert_eq!(keys("just some text\n=novalue\nOK=1"), vec!["OK"]);
    }

    #[test]
    fn test_read_missing_file_is_declaration_error() {
        let err = read_declaration_file(Path::new("/definitely/not/here/.env")).unwrap_err();
        assert!(matches!(err, EnvDoctorError::Declaration { .. }));
        assert!(err.is_recoverable());
    }
}
