//! Report output: CSV record lists and Markdown summaries
//!
//! Everything here consumes plain reconciliation data and knows nothing
//! about how it was computed.

use crate::config::ReconcileConfig;
use crate::error::{Error, Result};
use crate::reconciler::{Divergence, ReconciliationResult};
use crate::record::{CanonicalRecord, CANONICAL_FIELDS};
use crate::stats::StatsRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const PASSWORD_MASK: &str = "********";

/// Rendering options for the Markdown comparison
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Replace password values with a fixed mask
    pub mask_passwords: bool,
}

/// Paths of the artifacts written by [`write_report`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPaths {
    pub only_in_legacy: PathBuf,
    pub differing: PathBuf,
    pub diff_compare: PathBuf,
    pub stats: PathBuf,
}

impl ReportPaths {
    pub fn all(&self) -> [&Path; 4] {
        [
            self.only_in_legacy.as_path(),
            self.differing.as_path(),
            self.diff_compare.as_path(),
            self.stats.as_path(),
        ]
    }
}

/// Write records as a canonical-shape CSV file
///
/// The header is written even when there are no records.
pub fn write_records_csv<'a, P, I>(path: P, records: I) -> Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let path = path.as_ref();
    let csv_err = |e: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(CANONICAL_FIELDS).map_err(csv_err)?;

    let mut count = 0;
    for record in records {
        writer.write_record(record.values()).map_err(csv_err)?;
        count += 1;
    }
    writer.flush()?;

    log::debug!("Wrote {} records to {}", count, path.display());
    Ok(count)
}

/// Render differing records side by side as Markdown
pub fn render_diff_markdown(differing: &[Divergence], options: ReportOptions) -> String {
    let mut output = String::new();

    output.push_str("# Legacy / reference differences\n\n");
    let _ = writeln!(output, "{} differing record(s).", differing.len());

    for (i, divergence) in differing.iter().enumerate() {
        let legacy = &divergence.legacy;
        let title = if legacy.name.is_empty() {
            legacy.url.as_str()
        } else {
            legacy.name.as_str()
        };

        let _ = writeln!(output, "\n## {}. {}\n", i + 1, md_cell(title));
        output.push_str("| Field | Legacy | Reference | |\n");
        output.push_str("|---|---|---|---|\n");

        let pairs = CANONICAL_FIELDS
            .iter()
            .zip(legacy.values().into_iter().zip(divergence.reference.values()));
        for (field, (lp, rf)) in pairs {
            let (lp, rf) = if *field == "password" && options.mask_passwords {
                (PASSWORD_MASK, PASSWORD_MASK)
            } else {
                (lp, rf)
            };
            let marker = match *field {
                "password" if divergence.password_differs() => "differs",
                "note" if divergence.note_differs() => "differs",
                _ => "",
            };
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                field,
                md_cell(lp),
                md_cell(rf),
                marker
            );
        }
    }

    output
}

/// Render coverage statistics as Markdown
pub fn render_stats_markdown(stats: &StatsRecord, generated_at: DateTime<Utc>) -> String {
    let mut output = String::new();

    output.push_str("# Legacy / reference password statistics\n\n");
    let _ = writeln!(output, "Generated {}\n", generated_at.to_rfc3339());

    for (label, value) in stats.source_counts() {
        let _ = writeln!(output, "- {}: {}", label, value);
    }

    output.push('\n');
    for (label, value) in stats.site_overlap() {
        let _ = writeln!(output, "## {}\n- {}", label, value);
    }

    output
}

/// Write all report artifacts for a run, creating the output directory
pub fn write_report(
    config: &ReconcileConfig,
    result: &ReconciliationResult,
    stats: &StatsRecord,
    generated_at: DateTime<Utc>,
) -> Result<ReportPaths> {
    fs::create_dir_all(&config.output_dir)?;

    let paths = ReportPaths {
        only_in_legacy: config.only_in_legacy_path(),
        differing: config.differing_path(),
        diff_compare: config.diff_compare_path(),
        stats: config.stats_path(),
    };

    write_records_csv(&paths.only_in_legacy, &result.only_in_legacy)?;
    write_records_csv(&paths.differing, result.differing_records())?;

    let options = ReportOptions {
        mask_passwords: config.mask_passwords,
    };
    fs::write(
        &paths.diff_compare,
        render_diff_markdown(&result.differing, options),
    )?;
    fs::write(&paths.stats, render_stats_markdown(stats, generated_at))?;

    log::info!("Wrote report to {}", config.output_dir.display());
    Ok(paths)
}

/// Make a value safe to place inside a Markdown table cell
fn md_cell(s: &str) -> String {
    s.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\r', '\n'], "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv_str;
    use crate::record::{normalize_all, SourceKind};
    use chrono::TimeZone;

    fn divergence() -> Divergence {
        Divergence {
            legacy: CanonicalRecord::new("Acme", "a.com", "u1", "old", "n1"),
            reference: CanonicalRecord::new("Acme", "a.com", "u1", "new", "n1"),
        }
    }

    #[test]
    fn test_md_cell() {
        assert_eq!(md_cell("simple"), "simple");
        assert_eq!(md_cell("a|b"), "a\\|b");
        assert_eq!(md_cell("line1\nline2"), "line1<br>line2");
        assert_eq!(md_cell("line1\r\nline2"), "line1<br>line2");
        assert_eq!(md_cell("line1\rline2"), "line1<br>line2");
    }

    #[test]
    fn test_diff_markdown_row_stays_on_one_line() {
        let mut d = divergence();
        d.legacy.note = "mac\rline".to_string();

        let md = render_diff_markdown(&[d], ReportOptions::default());

        assert!(md.contains("| note | mac<br>line | n1 | differs |"));
        assert!(!md.contains('\r'));
    }

    #[test]
    fn test_diff_markdown_shows_both_sides() {
        let md = render_diff_markdown(&[divergence()], ReportOptions::default());

        assert!(md.contains("1 differing record(s)."));
        assert!(md.contains("## 1. Acme"));
        assert!(md.contains("| password | old | new | differs |"));
        assert!(md.contains("| note | n1 | n1 |  |"));
    }

    #[test]
    fn test_diff_markdown_masks_passwords() {
        let options = ReportOptions {
            mask_passwords: true,
        };
        let md = render_diff_markdown(&[divergence()], options);

        assert!(!md.contains("old"));
        assert!(md.contains("| password | ******** | ******** | differs |"));
    }

    #[test]
    fn test_diff_markdown_title_falls_back_to_url() {
        let mut d = divergence();
        d.legacy.name.clear();

        let md = render_diff_markdown(&[d], ReportOptions::default());

        assert!(md.contains("## 1. a.com"));
    }

    #[test]
    fn test_stats_markdown() {
        let stats = StatsRecord {
            legacy_total: 4,
            reference_total: 2,
            sites_only_in_legacy: 2,
            sites_only_in_reference: 1,
            sites_in_both: 1,
            ..Default::default()
        };
        let at = Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap();

        let md = render_stats_markdown(&stats, at);

        assert!(md.contains("Generated 2025-01-31T12:00:00+00:00"));
        assert!(md.contains("- Legacy records: 4"));
        assert!(md.contains("- Reference records: 2"));
        assert!(md.contains("## Sites only in legacy\n- 2"));
        assert!(md.contains("## Sites only in reference\n- 1"));
        assert!(md.contains("## Sites in both\n- 1"));
    }

    #[test]
    fn test_write_records_csv_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let records = vec![
            CanonicalRecord::new("Acme, Inc", "a.com", "u1", "p\"1", "multi\nline"),
            CanonicalRecord::new("", "b.com", "", "", ""),
        ];

        let written = write_records_csv(&path, &records).unwrap();
        assert_eq!(written, 2);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("name,url,username,password,note\n"));

        let table = parse_csv_str(&content, "out.csv").unwrap();
        assert_eq!(normalize_all(&table, SourceKind::Reference), records);
    }

    #[test]
    fn test_write_records_csv_empty_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        let written = write_records_csv(&path, &Vec::<CanonicalRecord>::new()).unwrap();

        assert_eq!(written, 0);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "name,url,username,password,note\n"
        );
    }
}
