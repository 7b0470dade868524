//! # Engine Module
//!
//! This module composes detection, rendering and block location into the four
//! verbs that operate on a single file: check, add, update and delete.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading and writing operations
//! - `edit` - Pure line-level edits used by the verbs
//!
//! Every verb returns an [`Outcome`] and never an error. Failures are turned
//! into a [`Status`] at the verb boundary so that a caller walking many files
//! can report each one and carry on.

mod edit;
mod file_io;

use std::fmt;
use std::path::Path;

pub use file_io::FileIO;
use thiserror::Error;
use tracing::{debug, trace};

use crate::detect::detect;
use crate::locate::{LocatedBlock, Locator};
use crate::registry::{Dialect, Registry};
use crate::render::{render, render_body};
use crate::templates::Template;

/// Result of a verb, rendered through [`fmt::Display`] as a reason code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
  Match,
  Mismatch,
  NotFound,
  Skipped,
  Updated,
  Inserted,
  Deleted,
  UnsupportedFormat,
  GenerateFailed,
  /// Any other failure, with a human readable detail
  Error(String),
}

impl Status {
  /// Returns `true` for the statuses that count as success.
  pub const fn is_success(&self) -> bool {
    matches!(
      self,
      Status::Match | Status::Skipped | Status::Updated | Status::Inserted | Status::Deleted
    )
  }

  /// Returns `true` if this status is an `error:*` status.
  pub const fn is_error(&self) -> bool {
    matches!(self, Status::Error(_))
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Status::Match => f.write_str("match"),
      Status::Mismatch => f.write_str("mismatch"),
      Status::NotFound => f.write_str("not_found"),
      Status::Skipped => f.write_str("skipped"),
      Status::Updated => f.write_str("updated"),
      Status::Inserted => f.write_str("inserted"),
      Status::Deleted => f.write_str("deleted"),
      Status::UnsupportedFormat => f.write_str("unsupported_format"),
      Status::GenerateFailed => f.write_str("generate_failed"),
      Status::Error(detail) => write!(f, "error:{detail}"),
    }
  }
}

/// Internal failure of a verb.
#[derive(Debug, Error)]
pub enum EngineError {
  #[error("unsupported_format")]
  UnsupportedFormat,

  #[error("generate_failed")]
  GenerateFailed,

  #[error("invalid marker pattern: {0}")]
  Pattern(#[from] regex::Error),

  #[error(transparent)]
  Io(#[from] anyhow::Error),
}

impl From<EngineError> for Status {
  fn from(err: EngineError) -> Self {
    match err {
      EngineError::UnsupportedFormat => Status::UnsupportedFormat,
      EngineError::GenerateFailed => Status::GenerateFailed,
      EngineError::Pattern(e) => Status::Error(format!("invalid marker pattern: {e}")),
      EngineError::Io(e) => Status::Error(format!("{e:#}")),
    }
  }
}

/// The operation to run on a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verb {
  Check,
  #[default]
  Add,
  Update,
  Delete,
}

impl Verb {
  pub const fn as_str(self) -> &'static str {
    match self {
      Verb::Check => "check",
      Verb::Add => "add",
      Verb::Update => "update",
      Verb::Delete => "delete",
    }
  }
}

impl fmt::Display for Verb {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// What a verb did to one file.
///
/// Mutating verbs fill in `before` and `after` with the full file text, which
/// lets a dry run show a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
  pub status: Status,
  pub before: Option<String>,
  pub after: Option<String>,
}

impl Outcome {
  fn edited(status: Status, before: String, after: String) -> Self {
    Self {
      status,
      before: Some(before),
      after: Some(after),
    }
  }

  /// Returns `true` if the verb succeeded.
  pub const fn is_success(&self) -> bool {
    self.status.is_success()
  }

  /// Returns `true` if the verb produced different file content.
  pub fn changed(&self) -> bool {
    matches!((&self.before, &self.after), (Some(before), Some(after)) if before != after)
  }
}

impl From<Status> for Outcome {
  fn from(status: Status) -> Self {
    Self {
      status,
      before: None,
      after: None,
    }
  }
}

/// A file's lines plus the conventions needed to write it back.
struct Document {
  lines: Vec<String>,
  line_ending: &'static str,
  trailing_newline: bool,
}

impl Document {
  fn parse(content: &str) -> Self {
    let line_ending = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let trailing_newline = content.ends_with('\n');

    let body = content.strip_suffix('\n').unwrap_or(content);
    let lines = if content.is_empty() {
      Vec::new()
    } else {
      body
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect()
    };

    Self {
      lines,
      line_ending,
      trailing_newline,
    }
  }

  fn join(&self, lines: &[String], trailing_newline: bool) -> String {
    let mut text = lines.join(self.line_ending);
    if trailing_newline && !lines.is_empty() {
      text.push_str(self.line_ending);
    }
    text
  }
}

/// A file loaded and analysed for one verb.
struct Loaded {
  dialect: &'static Dialect,
  locator: Locator<'static>,
  content: String,
  doc: Document,
  block: Option<LocatedBlock>,
}

/// Runs the header verbs against files.
///
/// The engine owns the registry and the template for its whole lifetime and
/// keeps no state between files.
pub struct Engine {
  registry: Registry,
  template: Template,
  dry_run: bool,
}

impl Engine {
  /// Creates an engine that writes its changes.
  pub const fn new(registry: Registry, template: Template) -> Self {
    Self {
      registry,
      template,
      dry_run: false,
    }
  }

  /// When set, mutating verbs compute their result but never write it.
  pub fn with_dry_run(mut self, dry_run: bool) -> Self {
    self.dry_run = dry_run;
    self
  }

  pub const fn registry(&self) -> &Registry {
    &self.registry
  }

  pub const fn is_dry_run(&self) -> bool {
    self.dry_run
  }

  /// Renders the header for a filetype or suffix without touching any file.
  pub fn preview(&self, filetype: &str) -> Option<Vec<String>> {
    let id = self
      .registry
      .by_filetype(filetype)
      .or_else(|| self.registry.by_suffix(filetype))?;
    Some(render(self.registry.dialect(id), self.template.lines()))
  }

  /// Runs `verb` on one file.
  pub fn run(&self, verb: Verb, path: &Path, forced: Option<&str>) -> Outcome {
    match verb {
      Verb::Check => self.check(path, forced),
      Verb::Add => self.add(path, forced),
      Verb::Update => self.update(path, forced),
      Verb::Delete => self.delete(path, forced),
    }
  }

  /// Compares the file's header with the rendered template.
  ///
  /// Yields `match`, `mismatch` or `not_found`, or a failure status.
  pub fn check(&self, path: &Path, forced: Option<&str>) -> Outcome {
    settle(Verb::Check, path, self.try_check(path, forced))
  }

  /// Makes the file's header match the template.
  ///
  /// A matching header is left alone (`skipped`), a different one is updated
  /// and a missing one is inserted.
  pub fn add(&self, path: &Path, forced: Option<&str>) -> Outcome {
    settle(Verb::Add, path, self.try_add(path, forced))
  }

  /// Replaces the file's header, inserting one if there is none.
  pub fn update(&self, path: &Path, forced: Option<&str>) -> Outcome {
    settle(Verb::Update, path, self.try_update(path, forced))
  }

  /// Removes the file's header.
  pub fn delete(&self, path: &Path, forced: Option<&str>) -> Outcome {
    settle(Verb::Delete, path, self.try_delete(path, forced))
  }

  fn try_check(&self, path: &Path, forced: Option<&str>) -> Result<Outcome, EngineError> {
    let loaded = self.load(path, forced)?;
    self.require_template(loaded.dialect)?;
    Ok(self.compare(&loaded).into())
  }

  fn try_add(&self, path: &Path, forced: Option<&str>) -> Result<Outcome, EngineError> {
    let loaded = self.load(path, forced)?;
    self.require_template(loaded.dialect)?;

    match self.compare(&loaded) {
      Status::Match => Ok(Status::Skipped.into()),
      Status::Mismatch => self.apply_update(path, loaded),
      _ => self.apply_insert(path, loaded),
    }
  }

  fn try_update(&self, path: &Path, forced: Option<&str>) -> Result<Outcome, EngineError> {
    let loaded = self.load(path, forced)?;
    self.require_template(loaded.dialect)?;

    if loaded.block.is_some() {
      self.apply_update(path, loaded)
    } else {
      self.apply_insert(path, loaded)
    }
  }

  fn try_delete(&self, path: &Path, forced: Option<&str>) -> Result<Outcome, EngineError> {
    let loaded = self.load(path, forced)?;
    let Some(block) = loaded.block else {
      return Ok(Status::NotFound.into());
    };
    let Some(new_lines) = edit::remove(loaded.dialect, &loaded.locator, &loaded.doc.lines, &block) else {
      debug!("{}: header shares its block with author tags, leaving it", path.display());
      return Ok(Status::NotFound.into());
    };

    let trailing_newline = loaded.doc.trailing_newline;
    let after = loaded.doc.join(&new_lines, trailing_newline);
    self.commit(path, Status::Deleted, loaded.content, after)
  }

  /// Resolves the dialect, reads the file and locates its header.
  fn load(&self, path: &Path, forced: Option<&str>) -> Result<Loaded, EngineError> {
    let id = detect(&self.registry, path, forced).ok_or(EngineError::UnsupportedFormat)?;
    let dialect = self.registry.dialect(id);
    trace!("{}: using dialect {}", path.display(), id);

    let content = FileIO::read_full_content(path)?;
    let doc = Document::parse(&content);
    let locator = Locator::new(dialect)?;

    let body = render_body(dialect, self.template.lines());
    let block = locator
      .locate(&doc.lines)
      .map(|block| locator.fit(&doc.lines, block, &body));
    trace!("{}: located {:?}", path.display(), block);

    Ok(Loaded {
      dialect,
      locator,
      content,
      doc,
      block,
    })
  }

  fn require_template(&self, dialect: &Dialect) -> Result<(), EngineError> {
    if render(dialect, self.template.lines()).is_empty() {
      return Err(EngineError::GenerateFailed);
    }
    Ok(())
  }

  fn compare(&self, loaded: &Loaded) -> Status {
    let Some(block) = loaded.block else {
      return Status::NotFound;
    };

    let actual = edit::actual_header(&loaded.doc.lines, &block);
    let expected = edit::expected_header(loaded.dialect, self.template.lines(), &block);
    if edit::headers_match(&actual, &expected) {
      Status::Match
    } else {
      Status::Mismatch
    }
  }

  fn apply_update(&self, path: &Path, loaded: Loaded) -> Result<Outcome, EngineError> {
    let Some(block) = loaded.block else {
      return self.apply_insert(path, loaded);
    };

    let new_lines = edit::replace(
      loaded.dialect,
      &loaded.locator,
      &loaded.doc.lines,
      &block,
      self.template.lines(),
    );
    let after = loaded.doc.join(&new_lines, loaded.doc.trailing_newline);
    self.commit(path, Status::Updated, loaded.content, after)
  }

  fn apply_insert(&self, path: &Path, loaded: Loaded) -> Result<Outcome, EngineError> {
    let rendered = render(loaded.dialect, self.template.lines());
    let new_lines = edit::insert(loaded.dialect, &loaded.doc.lines, &rendered);

    let trailing_newline = loaded.doc.trailing_newline || loaded.doc.lines.is_empty();
    let after = loaded.doc.join(&new_lines, trailing_newline);
    self.commit(path, Status::Inserted, loaded.content, after)
  }

  /// Writes the new content unless this is a dry run.
  fn commit(&self, path: &Path, status: Status, before: String, after: String) -> Result<Outcome, EngineError> {
    if self.dry_run {
      debug!("{}: dry run, not writing ({})", path.display(), status);
    } else if before != after {
      FileIO::write_file(path, &after)?;
    }
    Ok(Outcome::edited(status, before, after))
  }
}

fn settle(verb: Verb, path: &Path, result: Result<Outcome, EngineError>) -> Outcome {
  let outcome = result.unwrap_or_else(|e| {
    debug!("{}: {} failed: {:#}", path.display(), verb, e);
    Status::from(e).into()
  });
  debug!("{}: {} -> {}", path.display(), verb, outcome.status);
  outcome
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_reason_codes() {
    assert_eq!(Status::NotFound.to_string(), "not_found");
    assert_eq!(Status::UnsupportedFormat.to_string(), "unsupported_format");
    assert_eq!(Status::Error("disk full".to_string()).to_string(), "error:disk full");
    assert!(Status::Skipped.is_success());
    assert!(!Status::Mismatch.is_success());
    assert!(!Status::GenerateFailed.is_success());
  }

  #[test]
  fn test_document_round_trip() {
    for text in ["", "a", "a\n", "a\nb\n", "\n", "a\r\nb\r\n"] {
      let doc = Document::parse(text);
      assert_eq!(doc.join(&doc.lines, doc.trailing_newline), text, "text {text:?}");
    }
  }

  #[test]
  fn test_document_strips_carriage_returns() {
    let doc = Document::parse("a\r\nb\r\n");
    assert_eq!(doc.lines, vec!["a", "b"]);
    assert_eq!(doc.line_ending, "\r\n");
  }

  #[test]
  fn test_engine_error_to_status() {
    let err = EngineError::from(anyhow::anyhow!("inner").context("Failed to read file: x.py"));
    assert_eq!(Status::from(err), Status::Error("Failed to read file: x.py: inner".to_string()));
    assert_eq!(Status::from(EngineError::GenerateFailed), Status::GenerateFailed);
  }
}
