//! Run configuration: where the exports live and where reports go

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File names of the report artifacts, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    /// Records found only in the legacy export (CSV)
    pub only_in_legacy: String,
    /// Legacy side of records that differ from the reference (CSV)
    pub differing: String,
    /// Side-by-side comparison of differing records (Markdown)
    pub diff_compare: String,
    /// Coverage statistics (Markdown)
    pub stats: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            only_in_legacy: "legacy_only.csv".to_string(),
            differing: "legacy_diff.csv".to_string(),
            diff_compare: "legacy_diff_compare.md".to_string(),
            stats: "stats.md".to_string(),
        }
    }
}

/// Configuration for one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Legacy vault export (CSV)
    pub legacy_path: PathBuf,
    /// Browser password store export (CSV)
    pub reference_path: PathBuf,
    /// Directory the report artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub outputs: OutputFiles,
    /// Hide password values in the Markdown comparison
    #[serde(default)]
    pub mask_passwords: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reconcile-out")
}

impl ReconcileConfig {
    /// Create a config with default output file names
    pub fn new(
        legacy_path: impl Into<PathBuf>,
        reference_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            legacy_path: legacy_path.into(),
            reference_path: reference_path.into(),
            output_dir: output_dir.into(),
            outputs: OutputFiles::default(),
            mask_passwords: false,
        }
    }

    /// Enable or disable password masking
    pub fn with_mask_passwords(mut self, mask: bool) -> Self {
        self.mask_passwords = mask;
        self
    }

    /// Load a config file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the config file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn only_in_legacy_path(&self) -> PathBuf {
        self.output_dir.join(&self.outputs.only_in_legacy)
    }

    pub fn differing_path(&self) -> PathBuf {
        self.output_dir.join(&self.outputs.differing)
    }

    pub fn diff_compare_path(&self) -> PathBuf {
        self.output_dir.join(&self.outputs.diff_compare)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.output_dir.join(&self.outputs.stats)
    }
}
