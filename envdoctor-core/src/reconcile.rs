//! Missing/unused key reconciliation.

use crate::keys::KeySet;

/// Set differences between used and declared keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Used in code but declared nowhere, in usage discovery order
    pub missing: Vec<String>,
    /// Declared but never used, in declaration discovery order
    pub unused: Vec<String>,
}

/// Computes `used \ declared` and `declared \ used`.
///
/// Pure: no I/O, exact case-sensitive comparison.
pub fn reconcile(used: &KeySet, declared: &KeySet) -> Reconciliation {
    Reconciliation {
        missing: used
            .iter()
            .filter(|k| !declared.contains(k.as_str()))
            .cloned()
            .collect(),
        unused: declared
            .iter()
            .filter(|k| !used.contains(k.as_str()))
            .cloned()
            .collect(),
    }
}
