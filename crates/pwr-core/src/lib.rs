//! pwr-core: Core library for reconciling password manager exports
//!
//! This library provides functionality to:
//! - Parse legacy vault and browser password store CSV exports
//! - Normalize both shapes into one canonical record
//! - Find records only in the legacy export, or differing from the browser
//! - Compute coverage statistics across both exports
//! - Write CSV and Markdown reports of the results

pub mod config;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod reconciler;
pub mod record;
pub mod report;
pub mod scanner;
pub mod stats;
pub mod table;

pub use config::{OutputFiles, ReconcileConfig};
pub use error::{Error, Result};
pub use parser::{parse_csv, parse_csv_str};
pub use pipeline::{analyze, convert_legacy, load_records, run, RunSummary};
pub use reconciler::{reconcile, Divergence, ReconciliationResult, ReferenceIndex};
pub use record::{key_of, normalize, normalize_all, CanonicalRecord, JoinKey, SourceKind};
pub use report::{render_diff_markdown, render_stats_markdown, ReportOptions, ReportPaths};
pub use scanner::{scan_exports, DiscoveredExport, ScanResult};
pub use stats::{aggregate, StatsRecord};
pub use table::{Column, RawRow, RawTable};
