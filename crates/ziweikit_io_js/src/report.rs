//! Script edit report model.

use std::fmt;
use std::path::PathBuf;

/// Outcome of one file-level script edit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportScriptEdit {
    /// Edited file.
    pub path: PathBuf,
    /// Number of replacements/removals/splices applied.
    pub cnt_replaced: u64,
    /// Whether the file content changed and was written back.
    pub if_changed: bool,
}

impl ReportScriptEdit {
    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} path={} replaced={} changed={}",
            self.path.display(),
            self.cnt_replaced,
            self.if_changed
        )
    }
}

impl fmt::Display for ReportScriptEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[SCRIPT]"))
    }
}
