//! Settlement batch report model.

use std::collections::BTreeMap;
use std::fmt;

/// Aggregate counters and diagnostics for one settlement batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportSettle {
    /// Distinct publisher ids after collision handling.
    pub cnt_publishers: u64,
    /// Documents rendered.
    pub cnt_reports: u64,
    /// Publishers with nothing to settle.
    pub cnt_no_data: u64,
    /// Settlement rows across all documents.
    pub cnt_rows: u64,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl ReportSettle {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_publishers".to_string(), self.cnt_publishers);
        dict_counts.insert("cnt_reports".to_string(), self.cnt_reports);
        dict_counts.insert("cnt_no_data".to_string(), self.cnt_no_data);
        dict_counts.insert("cnt_rows".to_string(), self.cnt_rows);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} publishers={} reports={} no_data={} rows={} warnings={}",
            dict_counts["cnt_publishers"],
            dict_counts["cnt_reports"],
            dict_counts["cnt_no_data"],
            dict_counts["cnt_rows"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportSettle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[SETTLE]"))
    }
}
