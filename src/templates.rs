//! # Templates Module
//!
//! This module loads the copyright template, fills in template variables and
//! normalizes the text into the line list the renderer consumes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use cr_manager::templates::{Template, TemplateData};
//!
//! # fn main() -> anyhow::Result<()> {
//! let data = TemplateData {
//!   year: "2025".to_string(),
//! };
//! let template = Template::load(Path::new("COPYRIGHT"), &data)?;
//!
//! for line in template.lines() {
//!   println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::verbose_log;

/// Data used to fill out a copyright template.
pub struct TemplateData {
  /// Replaces every `{{year}}` placeholder
  pub year: String,
}

/// A loaded, preprocessed copyright template.
///
/// The template is immutable once built and is shared by every operation the
/// engine performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  lines: Vec<String>,
}

impl Template {
  /// Builds a template from raw text.
  pub fn from_text(raw: &str) -> Self {
    Self { lines: preprocess(raw) }
  }

  /// Loads a template file and substitutes its variables.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or is not valid UTF-8.
  pub fn load(path: &Path, data: &TemplateData) -> Result<Self> {
    verbose_log!("Loading template from: {}", path.display());

    let raw =
      fs::read_to_string(path).with_context(|| format!("Failed to read copyright template file: {}", path.display()))?;

    Ok(Self::from_text(&raw.replace("{{year}}", &data.year)))
  }

  /// The preprocessed template lines.
  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  /// Returns `true` if the template has no content at all.
  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }
}

/// Normalizes raw template text.
///
/// Trailing whitespace is removed from each line, runs of blank lines are
/// collapsed to a single blank line, and blank lines at either end are
/// dropped. Leading indentation is kept.
pub fn preprocess(raw: &str) -> Vec<String> {
  let mut processed: Vec<String> = Vec::new();
  let mut prev_blank = false;

  for line in raw.lines() {
    let stripped = line.trim_end();
    let is_blank = stripped.is_empty();

    if is_blank && prev_blank {
      continue;
    }

    processed.push(stripped.to_string());
    prev_blank = is_blank;
  }

  let leading = processed.iter().take_while(|l| l.is_empty()).count();
  processed.drain(..leading);
  while processed.last().is_some_and(|l| l.is_empty()) {
    processed.pop();
  }

  processed
}
