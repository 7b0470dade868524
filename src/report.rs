//! # Report Module
//!
//! This module collects the per-file results of a run and writes them as a
//! JSON report for tooling.
//!
//! Each file is recorded with its `(success, reason)` pair, where `reason` is
//! the engine's reason code (`match`, `inserted`, `error:<detail>`, ...). The
//! summary counts files per reason.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::engine::Outcome;

/// Information about a processed file for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
  /// Path to the file
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// Whether the verb succeeded
  pub success: bool,
  /// Reason code reported by the engine
  pub reason: String,
}

impl FileReport {
  pub fn new(path: &Path, outcome: &Outcome) -> Self {
    Self {
      path: path.to_path_buf(),
      success: outcome.is_success(),
      reason: outcome.status.to_string(),
    }
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Summary of the processing results
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
  /// Verb that was run
  pub verb: String,
  /// Total number of files processed
  pub total_files: usize,
  /// Number of files whose verb succeeded
  pub succeeded: usize,
  /// Number of files whose verb failed
  pub failed: usize,
  /// Files per reason code; `error:*` reasons are counted under `error`
  pub reasons: BTreeMap<String, usize>,
  /// Total processing time
  #[serde(skip_serializing)]
  pub processing_time: Duration,
  /// Processing time in seconds for serialization
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  /// Local time the report was generated
  pub generated_at: String,
}

impl ProcessingSummary {
  /// Create a ProcessingSummary from a collection of FileReports
  pub fn from_reports(verb: &str, files: &[FileReport], processing_time: Duration) -> Self {
    let mut reasons = BTreeMap::new();
    for file in files {
      let key = if file.reason.starts_with("error:") { "error" } else { file.reason.as_str() };
      *reasons.entry(key.to_string()).or_insert(0) += 1;
    }

    let succeeded = files.iter().filter(|f| f.success).count();

    Self {
      verb: verb.to_string(),
      total_files: files.len(),
      succeeded,
      failed: files.len() - succeeded,
      reasons,
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
  }

  /// Number of files recorded under `reason`.
  pub fn count(&self, reason: &str) -> usize {
    self.reasons.get(reason).copied().unwrap_or(0)
  }
}

#[derive(Serialize)]
struct JsonReport<'a> {
  summary: &'a ProcessingSummary,
  files: &'a [FileReport],
}

/// Renders the report as pretty-printed JSON.
pub fn render_json(files: &[FileReport], summary: &ProcessingSummary) -> Result<String> {
  serde_json::to_string_pretty(&JsonReport { summary, files }).context("Failed to serialize report")
}

/// Writes the JSON report to `output_path`.
pub fn write_json_report(output_path: &Path, files: &[FileReport], summary: &ProcessingSummary) -> Result<()> {
  let content = render_json(files, summary)?;
  fs::write(output_path, content).with_context(|| format!("Failed to write report to {}", output_path.display()))
}
