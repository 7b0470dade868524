#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cr_manager::engine::Engine;
use cr_manager::registry::Registry;
use cr_manager::templates::Template;

/// The single-line notice used by most tests.
pub const NOTICE: &str = "Copyright (c) 2024 Example Corp. All rights reserved.";

/// Builds an engine over the builtin dialects with `template` as its text.
pub fn engine(template: &str) -> Engine {
  Engine::new(Registry::builtin(), Template::from_text(template))
}

/// Builds an engine that never writes.
pub fn dry_run_engine(template: &str) -> Engine {
  engine(template).with_dry_run(true)
}

/// Writes `content` to `name` inside `dir`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
  let path = dir.join(name);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}

/// Reads a file back as a string.
pub fn read_file(path: &Path) -> Result<String> {
  fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Splits file content into owned lines.
pub fn lines_of(content: &str) -> Vec<String> {
  content.lines().map(str::to_string).collect()
}
