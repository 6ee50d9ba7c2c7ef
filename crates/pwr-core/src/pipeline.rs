//! End-to-end runs: load exports, reconcile, aggregate, report

use crate::config::ReconcileConfig;
use crate::error::Result;
use crate::parser::parse_csv;
use crate::reconciler::{reconcile, ReconciliationResult};
use crate::record::{normalize_all, CanonicalRecord, SourceKind};
use crate::report::{write_records_csv, write_report, ReportPaths};
use crate::stats::{aggregate, StatsRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Summary of a completed reconciliation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of legacy records only in the legacy export
    pub only_in_legacy: usize,
    /// Number of legacy records that differ from the reference
    pub differing: usize,
    pub stats: StatsRecord,
    /// Files written by the run
    pub outputs: ReportPaths,
    pub finished_at: DateTime<Utc>,
}

/// Load an export and normalize it as the given shape
pub fn load_records<P: AsRef<Path>>(path: P, kind: SourceKind) -> Result<Vec<CanonicalRecord>> {
    let table = parse_csv(path)?;
    Ok(normalize_all(&table, kind))
}

/// Reconcile and aggregate already-normalized records
pub fn analyze(
    legacy: &[CanonicalRecord],
    reference: &[CanonicalRecord],
) -> (ReconciliationResult, StatsRecord) {
    (reconcile(legacy, reference), aggregate(legacy, reference))
}

/// Run a full reconciliation as described by `config`
///
/// Both inputs must exist. Once they are loaded the run always completes,
/// whatever their contents.
pub fn run(config: &ReconcileConfig) -> Result<RunSummary> {
    log::info!(
        "Reconciling {} against {}",
        config.legacy_path.display(),
        config.reference_path.display()
    );

    let legacy = load_records(&config.legacy_path, SourceKind::Legacy)?;
    let reference = load_records(&config.reference_path, SourceKind::Reference)?;

    let (result, stats) = analyze(&legacy, &reference);

    let finished_at = Utc::now();
    let outputs = write_report(config, &result, &stats, finished_at)?;

    Ok(RunSummary {
        only_in_legacy: result.only_in_legacy.len(),
        differing: result.differing.len(),
        stats,
        outputs,
        finished_at,
    })
}

/// Convert a legacy export into the canonical (browser) CSV shape
///
/// Columns with no canonical counterpart are dropped. Returns the number of
/// records written.
pub fn convert_legacy<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<usize> {
    let records = load_records(input, SourceKind::Legacy)?;
    let written = write_records_csv(output.as_ref(), &records)?;
    log::info!(
        "Converted {} legacy records to {}",
        written,
        output.as_ref().display()
    );
    Ok(written)
}
