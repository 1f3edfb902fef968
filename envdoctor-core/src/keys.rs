//! Environment key sets and ignore patterns.

use indexmap::IndexSet;

/// Set of environment variable names in discovery order.
///
/// Keys are case-sensitive and compared verbatim.
pub type KeySet = IndexSet<String>;

/// Checks if a key matches any ignore pattern.
///
/// Supported patterns:
/// - `PREFIX*` matches keys starting with `PREFIX`
/// - `*SUFFIX` matches keys ending with `SUFFIX`
/// - anything else matches the exact key
pub fn is_ignored_key(key: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if let Some(prefix) = pattern.strip_suffix('*') {
            key.starts_with(prefix)
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            key.ends_with(suffix)
        } else {
            key == pattern
        }
    })
}
