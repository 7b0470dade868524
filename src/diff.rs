//! # Diff Module
//!
//! Renders the difference between a file's current content and the content a
//! dry run would have written. Used by `crm -d` to preview edits.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Number of unchanged lines shown around each change.
const CONTEXT_RADIUS: usize = 3;

/// Builds a unified diff of `original` against `new`.
///
/// Returns an empty string when the two are identical.
pub fn unified_diff(path: &Path, original: &str, new: &str) -> String {
  if original == new {
    return String::new();
  }

  let name = path.display().to_string();
  TextDiff::from_lines(original, new)
    .unified_diff()
    .context_radius(CONTEXT_RADIUS)
    .header(&format!("a/{name}"), &format!("b/{name}"))
    .to_string()
}

/// Prints a colored line diff to stderr.
pub fn print_diff(path: &Path, original: &str, new: &str) {
  if original == new {
    eprintln!("No changes for {}", path.display());
    return;
  }

  eprintln!("Diff for {}:", path.display());
  let diff = TextDiff::from_lines(original, new);

  for group in diff.grouped_ops(CONTEXT_RADIUS) {
    for op in group {
      for change in diff.iter_changes(&op) {
        let line = change.to_string_lossy();
        let line = line.strip_suffix('\n').unwrap_or(&line);
        match change.tag() {
          ChangeTag::Delete => eprintln!("{}", format!("-{line}").if_supports_color(Stream::Stderr, |t| t.red())),
          ChangeTag::Insert => eprintln!("{}", format!("+{line}").if_supports_color(Stream::Stderr, |t| t.green())),
          ChangeTag::Equal => eprintln!(" {line}"),
        }
      }
    }
  }
}
