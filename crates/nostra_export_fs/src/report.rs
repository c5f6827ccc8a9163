//! Copy report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

/// Aggregate counters and diagnostics for one `copy_tree` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportCopy {
    /// Total scanned directory/file entries below the source root.
    pub cnt_scanned: u64,
    /// Entries dropped by an exclude pattern (subtrees are not scanned).
    pub cnt_excluded: u64,
    /// Destination directories created, the root included.
    pub cnt_dirs_created: u64,
    /// Files and symlinks written.
    pub cnt_copied: u64,
    /// Existing destination files kept by the `Skip` conflict rule.
    pub cnt_skipped: u64,
    /// Non-fatal warnings collected during traversal/copy.
    pub warnings: Vec<String>,
}

impl ReportCopy {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_excluded".to_string(), self.cnt_excluded);
        dict_counts.insert("cnt_dirs_created".to_string(), self.cnt_dirs_created);
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} scanned={} excluded={} dirs={} copied={} skipped={} warnings={}",
            self.cnt_scanned,
            self.cnt_excluded,
            self.cnt_dirs_created,
            self.cnt_copied,
            self.cnt_skipped,
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[COPY]"))
    }
}

/// Mutable accumulator for copy statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportCopyBuilder {
    report: ReportCopy,
}

impl ReportCopyBuilder {
    pub fn add_scanned(&mut self) {
        self.report.cnt_scanned += 1;
    }

    pub fn add_excluded(&mut self) {
        self.report.cnt_excluded += 1;
    }

    pub fn add_dir_created(&mut self) {
        self.report.cnt_dirs_created += 1;
    }

    pub fn add_copied(&mut self) {
        self.report.cnt_copied += 1;
    }

    pub fn add_skipped(&mut self) {
        self.report.cnt_skipped += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.report.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportCopy {
        self.report
    }
}
