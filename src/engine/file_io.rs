//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the engine.
//! All operations are synchronous.

use std::path::Path;

use anyhow::{Context, Result};

/// File I/O operations for the engine.
pub struct FileIO;

impl FileIO {
  /// Reads a whole file as strict UTF-8.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or is not valid UTF-8.
  pub fn read_full_content(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Reads a whole file, replacing invalid UTF-8 sequences.
  ///
  /// Used for format detection, where a bad byte somewhere in the file
  /// should not stop the modeline or shebang from being seen.
  pub fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
  }

  /// Write file content.
  pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_strict_read_rejects_invalid_utf8() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("binary.py");
    fs::write(&path, [b'#', b' ', 0xff, 0xfe, b'\n']).expect("write file");

    let err = FileIO::read_full_content(&path).expect_err("invalid UTF-8 should fail");
    assert!(format!("{err:#}").contains("Failed to read file"));

    let lossy = FileIO::read_lossy(&path).expect("lossy read");
    assert!(lossy.starts_with("# "));
    assert!(lossy.contains('\u{FFFD}'));
  }

  #[test]
  fn test_write_then_read() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("out.c");

    FileIO::write_file(&path, "int x;\n").expect("write file");
    assert_eq!(FileIO::read_full_content(&path).expect("read file"), "int x;\n");
  }

  #[test]
  fn test_read_missing_file() {
    let err = FileIO::read_full_content(Path::new("/nonexistent/file.c")).expect_err("should fail");
    assert!(err.to_string().contains("/nonexistent/file.c"));
  }
}
