/*!
 * Reporting functionality for extcopy
 *
 * Summarizes a finished copy either as console tables rendered with the
 * tabled library or as a JSON document.
 */

use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::error::Result;
use crate::types::WalkStatistics;
use crate::utils::format_file_size;

/// Statistics for a finished copy
#[derive(Debug, Clone, Serialize)]
pub struct CopyReport {
    /// Source directory
    pub source: String,
    /// Destination directory
    pub destination: String,
    /// Time taken by the walk
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
    /// When the report was produced
    pub finished_at: String,
    /// Walk counters and failures
    #[serde(flatten)]
    pub statistics: WalkStatistics,
}

impl CopyReport {
    /// Build a report stamped with the current local time
    pub fn new(
        source: String,
        destination: String,
        duration: Duration,
        statistics: WalkStatistics,
    ) -> Self {
        Self {
            source,
            destination,
            duration,
            finished_at: Local::now().to_rfc3339(),
            statistics,
        }
    }
}

fn serialize_duration<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
    /// Pretty-printed JSON
    Json,
}

/// Report generator for copy results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &CopyReport) -> Result<String> {
        match self.format {
            ReportFormat::ConsoleTable => Ok(self.generate_console_report(report)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &CopyReport) -> Result<()> {
        println!("\n{}", self.generate_report(report)?);
        Ok(())
    }

    fn create_summary_table(&self, report: &CopyReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.statistics;
        let rows = vec![
            SummaryRow {
                key: "📂 Source".to_string(),
                value: report.source.clone(),
            },
            SummaryRow {
                key: "📦 Destination".to_string(),
                value: report.destination.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Copied".to_string(),
                value: format!(
                    "{} ({})",
                    self.format_number(stats.files_copied),
                    format_file_size(stats.bytes_copied)
                ),
            },
            SummaryRow {
                key: "🗂️ Buckets".to_string(),
                value: self.format_number(stats.buckets.len()),
            },
            SummaryRow {
                key: "⏭️ Skipped".to_string(),
                value: self.format_number(stats.entries_skipped),
            },
            SummaryRow {
                key: "⚠️ Failures".to_string(),
                value: self.format_number(stats.failures.len()),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_buckets_table(&self, report: &CopyReport) -> String {
        #[derive(Tabled)]
        struct BucketRow {
            #[tabled(rename = "Bucket")]
            name: String,

            #[tabled(rename = "Files")]
            files: String,

            #[tabled(rename = "Size")]
            size: String,
        }

        // Largest buckets first, ties by name
        let mut buckets: Vec<_> = report.statistics.buckets.iter().collect();
        buckets.sort_by(|(a_name, a), (b_name, b)| {
            b.files.cmp(&a.files).then_with(|| a_name.cmp(b_name))
        });

        let rows: Vec<BucketRow> = buckets
            .into_iter()
            .map(|(name, totals)| BucketRow {
                name: name.clone(),
                files: self.format_number(totals.files),
                size: format_file_size(totals.bytes),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &CopyReport) -> String {
        let buckets_table = self.create_buckets_table(report);
        let summary_table = self.create_summary_table(report);

        let summary_title = if report.statistics.failures.is_empty() {
            "✅  COPY COMPLETE"
        } else {
            "⚠️  COPY COMPLETED WITH FAILURES"
        };

        format!(
            "📋  BUCKETS\n{}\n\n{}\n{}",
            buckets_table, summary_title, summary_table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BucketStats, FailureKind, WalkFailure};

    fn sample_report() -> CopyReport {
        let mut statistics = WalkStatistics {
            directories_visited: 3,
            files_copied: 3,
            bytes_copied: 2048,
            ..Default::default()
        };
        statistics.buckets.insert(
            "txt".to_string(),
            BucketStats {
                files: 2,
                bytes: 1024,
            },
        );
        statistics.buckets.insert(
            "jpg".to_string(),
            BucketStats {
                files: 1,
                bytes: 1024,
            },
        );
        statistics.failures.push(WalkFailure {
            kind: FailureKind::DirectoryAccess,
            path: "src/locked".into(),
            message: "Permission denied (os error 13)".to_string(),
        });

        CopyReport::new(
            "src".to_string(),
            "destination".to_string(),
            Duration::from_millis(1500),
            statistics,
        )
    }

    #[test]
    fn test_console_report() {
        let output = Reporter::new(ReportFormat::ConsoleTable)
            .generate_report(&sample_report())
            .unwrap();

        assert!(output.contains("BUCKETS"));
        assert!(output.contains("COPY COMPLETED WITH FAILURES"));
        assert!(output.contains("1.00 KB"));
        // txt holds more files so it is listed first
        assert!(output.find("txt").unwrap() < output.find("jpg").unwrap());
    }

    #[test]
    fn test_json_report() {
        let output = Reporter::new(ReportFormat::Json)
            .generate_report(&sample_report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["files_copied"], 3);
        assert_eq!(value["duration"], 1.5);
        assert_eq!(value["buckets"]["txt"]["files"], 2);
        assert_eq!(value["failures"][0]["kind"], "directory_access");
        assert_eq!(value["failures"][0]["path"], "src/locked");
    }

    #[test]
    fn test_format_number() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        assert_eq!(reporter.format_number(999), "999");
        assert_eq!(reporter.format_number(1_500), "1.5K");
        assert_eq!(reporter.format_number(2_000_000), "2.0M");
    }
}
