//! Directory scanner for discovering password export CSV files

use crate::error::Result;
use crate::parser::read_header;
use crate::record::SourceKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A CSV file found during a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredExport {
    /// Full path to the file
    pub path: PathBuf,
    /// Shape recognised from the header, None if neither shape matched
    pub kind: Option<SourceKind>,
}

/// Result of scanning directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root directories that were scanned
    pub roots: Vec<PathBuf>,
    /// Discovered CSV files, sorted by path
    pub exports: Vec<DiscoveredExport>,
}

impl ScanResult {
    /// Exports recognised as the given shape
    pub fn of_kind(&self, kind: SourceKind) -> Vec<&DiscoveredExport> {
        self.exports
            .iter()
            .filter(|e| e.kind == Some(kind))
            .collect()
    }

    /// CSV files matching neither shape
    pub fn unclassified(&self) -> Vec<&DiscoveredExport> {
        self.exports.iter().filter(|e| e.kind.is_none()).collect()
    }

    /// The single legacy and single reference export, if the scan found
    /// exactly one of each
    pub fn unique_pair(&self) -> Option<(&Path, &Path)> {
        let legacy = self.of_kind(SourceKind::Legacy);
        let reference = self.of_kind(SourceKind::Reference);

        match (legacy.as_slice(), reference.as_slice()) {
            (&[legacy], &[reference]) => Some((legacy.path.as_path(), reference.path.as_path())),
            _ => None,
        }
    }
}

/// Scan one or more directories for CSV files and classify their shape
///
/// A file whose header cannot be read is kept as unclassified, and entries
/// that cannot be walked (dangling links, unreadable directories) are
/// skipped. Only a root that cannot be read fails the scan.
pub fn scan_exports<P: AsRef<Path>>(roots: &[P]) -> Result<ScanResult> {
    let mut exports = Vec::new();

    for root in roots {
        let root = root.as_ref();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                // An unreadable root fails the scan, anything below it is skipped
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    log::warn!("skipping entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            let path = entry.path();

            if !entry.file_type().is_file()
                || !path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            {
                continue;
            }

            let kind = match read_header(path) {
                Ok(columns) => SourceKind::detect(&columns),
                Err(e) => {
                    log::warn!("skipping header of {}: {}", path.display(), e);
                    None
                }
            };

            exports.push(DiscoveredExport {
                path: path.to_path_buf(),
                kind,
            });
        }
    }

    exports.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(ScanResult {
        roots: roots.iter().map(|r| r.as_ref().to_path_buf()).collect(),
        exports,
    })
}
