//! Build report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregate counters and diagnostics for one `build_trans_table` run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTrans {
    /// Number of palace sheets interpreted.
    pub cnt_sheets_scanned: u64,
    /// Number of non-palace sheets skipped.
    pub cnt_sheets_skipped: u64,
    /// Total rows visited in palace sheets.
    pub cnt_rows_scanned: u64,
    /// Rows carrying a header directive.
    pub cnt_headers: u64,
    /// Entries written into the table (including overwrites).
    pub cnt_entries_written: u64,
    /// Writes that replaced an existing `(source, symbol, target)` entry.
    pub cnt_entries_overwritten: u64,
    /// Non-header rows that contributed nothing.
    pub cnt_rows_ignored: u64,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl ReportTrans {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_sheets_scanned".to_string(), self.cnt_sheets_scanned);
        dict_counts.insert("cnt_sheets_skipped".to_string(), self.cnt_sheets_skipped);
        dict_counts.insert("cnt_rows_scanned".to_string(), self.cnt_rows_scanned);
        dict_counts.insert("cnt_headers".to_string(), self.cnt_headers);
        dict_counts.insert("cnt_entries_written".to_string(), self.cnt_entries_written);
        dict_counts.insert(
            "cnt_entries_overwritten".to_string(),
            self.cnt_entries_overwritten,
        );
        dict_counts.insert("cnt_rows_ignored".to_string(), self.cnt_rows_ignored);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} sheets={} skipped={} rows={} headers={} written={} overwritten={} ignored={} warnings={}",
            dict_counts["cnt_sheets_scanned"],
            dict_counts["cnt_sheets_skipped"],
            dict_counts["cnt_rows_scanned"],
            dict_counts["cnt_headers"],
            dict_counts["cnt_entries_written"],
            dict_counts["cnt_entries_overwritten"],
            dict_counts["cnt_rows_ignored"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportTrans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[TRANS]"))
    }
}

/// Mutable accumulator for build statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportTransBuilder {
    /// See [`ReportTrans::cnt_sheets_scanned`].
    pub cnt_sheets_scanned: u64,
    /// See [`ReportTrans::cnt_sheets_skipped`].
    pub cnt_sheets_skipped: u64,
    /// See [`ReportTrans::cnt_rows_scanned`].
    pub cnt_rows_scanned: u64,
    /// See [`ReportTrans::cnt_headers`].
    pub cnt_headers: u64,
    /// See [`ReportTrans::cnt_entries_written`].
    pub cnt_entries_written: u64,
    /// See [`ReportTrans::cnt_entries_overwritten`].
    pub cnt_entries_overwritten: u64,
    /// See [`ReportTrans::cnt_rows_ignored`].
    pub cnt_rows_ignored: u64,
    /// See [`ReportTrans::warnings`].
    pub warnings: Vec<String>,
}

impl ReportTransBuilder {
    /// Increment scanned-sheet count by one.
    pub fn add_sheet_scanned(&mut self) {
        self.cnt_sheets_scanned += 1;
    }

    /// Increment skipped-sheet count by one.
    pub fn add_sheet_skipped(&mut self) {
        self.cnt_sheets_skipped += 1;
    }

    /// Increment scanned-row count by one.
    pub fn add_row_scanned(&mut self) {
        self.cnt_rows_scanned += 1;
    }

    /// Increment header count by one.
    pub fn add_header(&mut self) {
        self.cnt_headers += 1;
    }

    /// Record one table write; `if_overwrite` marks a replaced entry.
    pub fn add_entry_written(&mut self, if_overwrite: bool) {
        self.cnt_entries_written += 1;
        if if_overwrite {
            self.cnt_entries_overwritten += 1;
        }
    }

    /// Record a replaced entry discovered while merging sheets.
    pub fn add_overwritten(&mut self) {
        self.cnt_entries_overwritten += 1;
    }

    /// Increment ignored-row count by one.
    pub fn add_row_ignored(&mut self) {
        self.cnt_rows_ignored += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Fold another builder (e.g. one sheet's) into this one.
    pub fn merge(&mut self, other: ReportTransBuilder) {
        self.cnt_sheets_scanned += other.cnt_sheets_scanned;
        self.cnt_sheets_skipped += other.cnt_sheets_skipped;
        self.cnt_rows_scanned += other.cnt_rows_scanned;
        self.cnt_headers += other.cnt_headers;
        self.cnt_entries_written += other.cnt_entries_written;
        self.cnt_entries_overwritten += other.cnt_entries_overwritten;
        self.cnt_rows_ignored += other.cnt_rows_ignored;
        self.warnings.extend(other.warnings);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportTrans {
        ReportTrans {
            cnt_sheets_scanned: self.cnt_sheets_scanned,
            cnt_sheets_skipped: self.cnt_sheets_skipped,
            cnt_rows_scanned: self.cnt_rows_scanned,
            cnt_headers: self.cnt_headers,
            cnt_entries_written: self.cnt_entries_written,
            cnt_entries_overwritten: self.cnt_entries_overwritten,
            cnt_rows_ignored: self.cnt_rows_ignored,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReportTrans, ReportTransBuilder};

    #[test]
    fn report_trans_to_dict_and_format() {
        let report = ReportTrans {
            cnt_sheets_scanned: 12,
            cnt_sheets_skipped: 1,
            cnt_rows_scanned: 300,
            cnt_headers: 24,
            cnt_entries_written: 200,
            cnt_entries_overwritten: 2,
            cnt_rows_ignored: 76,
            warnings: vec!["w".to_string()],
        };

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_sheets_scanned"], 12);
        assert_eq!(dict_counts["cnt_entries_overwritten"], 2);
        assert_eq!(dict_counts["cnt_warnings"], 1);

        let txt = report.format("[TRANS]");
        assert_eq!(
            txt,
            "[TRANS] sheets=12 skipped=1 rows=300 headers=24 written=200 overwritten=2 ignored=76 warnings=1"
        );
        assert_eq!(report.to_string(), txt);
    }

    #[test]
    fn report_trans_builder_merge_sums_counts() {
        let mut builder_total = ReportTransBuilder::default();
        builder_total.add_sheet_skipped();

        let mut builder_sheet = ReportTransBuilder::default();
        builder_sheet.add_sheet_scanned();
        builder_sheet.add_row_scanned();
        builder_sheet.add_entry_written(true);
        builder_sheet.add_warning("unknown palace".to_string());

        builder_total.merge(builder_sheet);
        let report = builder_total.build();
        assert_eq!(report.cnt_sheets_scanned, 1);
        assert_eq!(report.cnt_sheets_skipped, 1);
        assert_eq!(report.cnt_entries_written, 1);
        assert_eq!(report.cnt_entries_overwritten, 1);
        assert_eq!(report.warnings, vec!["unknown palace".to_string()]);
    }
}
