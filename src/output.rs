//! # Output Module
//!
//! This module centralizes all user-facing output for `crm`.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! ## Design Goals
//!
//! - **Scannable**: one status line per file, colored by outcome
//! - **Progressive**: a summary block with `-v`, silence with `-q`
//! - **Scriptable**: in quiet mode only the paths that need attention are
//!   printed, one per line

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::engine::{Status, Verb};
use crate::logging::{is_quiet, is_verbose};
use crate::report::ProcessingSummary;

/// Symbols used in output
pub mod symbols {
  /// Success
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Header written or replaced
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// How a status line is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  /// Nothing to do
  Good,
  /// The file was (or would be) changed
  Changed,
  /// The file needs action
  Attention,
  /// The verb failed
  Failure,
}

/// The label printed after a file's path.
pub fn status_label(verb: Verb, status: &Status) -> String {
  match status {
    Status::Match => "OK".to_string(),
    Status::Mismatch => "NEEDS UPDATE".to_string(),
    Status::NotFound if verb == Verb::Delete => "NOT FOUND (nothing to delete)".to_string(),
    Status::NotFound => "NOT FOUND".to_string(),
    Status::Skipped => "SKIPPED (already exists and matches)".to_string(),
    Status::Updated if verb == Verb::Add => "UPDATED (due to mismatch)".to_string(),
    Status::Updated => "UPDATED".to_string(),
    Status::Inserted => "ADDED".to_string(),
    Status::Deleted => "DELETED".to_string(),
    Status::UnsupportedFormat => "UNSUPPORTED".to_string(),
    Status::GenerateFailed => "ERROR: failed to generate copyright for target format".to_string(),
    Status::Error(detail) => format!("ERROR: {detail}"),
  }
}

/// The tone a status is printed in.
pub fn status_tone(verb: Verb, status: &Status) -> Tone {
  match status {
    Status::Match | Status::Skipped => Tone::Good,
    Status::NotFound if verb == Verb::Delete => Tone::Good,
    Status::Updated | Status::Inserted | Status::Deleted => Tone::Changed,
    Status::Mismatch | Status::NotFound | Status::UnsupportedFormat => Tone::Attention,
    Status::GenerateFailed | Status::Error(_) => Tone::Failure,
  }
}

/// Returns `true` if the file counts against the exit status.
pub fn needs_attention(verb: Verb, status: &Status) -> bool {
  match status {
    Status::Mismatch | Status::NotFound => verb == Verb::Check,
    Status::UnsupportedFormat | Status::GenerateFailed | Status::Error(_) => true,
    _ => false,
  }
}

/// Print the "Will process N files..." message (verbose only).
pub fn print_start_message(file_count: usize) {
  if !is_verbose() {
    return;
  }

  let files_word = if file_count == 1 { "file" } else { "files" };
  println!("Will process {file_count} {files_word}...");
}

/// Print the `>> i/N path ... STATUS` line for one file.
///
/// In quiet mode only the path of a file that needs attention is printed.
pub fn print_file_status(index: usize, total: usize, path: &Path, verb: Verb, status: &Status, dry_run: bool) {
  if is_quiet() {
    if needs_attention(verb, status) {
      println!("{}", path.display());
    }
    return;
  }

  let mut label = status_label(verb, status);
  if dry_run && status_tone(verb, status) == Tone::Changed {
    label.push_str(" (dry run)");
  }

  let label = match status_tone(verb, status) {
    Tone::Good => label.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
    Tone::Changed => label.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string(),
    Tone::Attention => label.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string(),
    Tone::Failure => label.if_supports_color(Stream::Stdout, |s| s.red()).to_string(),
  };

  println!(
    ">> {}/{} {} ... {}",
    index.if_supports_color(Stream::Stdout, |s| s.green()),
    total.if_supports_color(Stream::Stdout, |s| s.yellow()),
    path.display().if_supports_color(Stream::Stdout, |s| s.magenta()),
    label
  );
}

/// Print the list of supported filetypes after an unsupported file.
pub fn print_unsupported_hint(supported: &[String]) {
  if is_quiet() {
    return;
  }

  println!(
    "{} supported filetypes include: {}",
    "HINT:".if_supports_color(Stream::Stdout, |s| s.blue()),
    supported.join(", ").if_supports_color(Stream::Stdout, |s| s.blue())
  );
}

/// Print a rendered header preview.
pub fn print_preview(filetype: &str, lines: &[String]) {
  if is_verbose() {
    println!("--- Copyright Format Preview ({filetype}) ---");
  }
  for line in lines {
    println!("{line}");
  }
  if is_verbose() {
    println!("--- End of Preview ---");
  }
}

/// Print the processing summary (verbose only).
pub fn print_summary(summary: &ProcessingSummary, dry_run: bool) {
  if !is_verbose() {
    return;
  }

  println!();
  println!("--------- SUMMARY ---------");
  println!("total files processed: {}", summary.total_files);

  if summary.verb == Verb::Check.as_str() {
    println!(
      "MATCHED/OK : {}",
      summary.count("match").if_supports_color(Stream::Stdout, |s| s.green())
    );
    println!(
      "MISMATCH   : {}",
      summary.count("mismatch").if_supports_color(Stream::Stdout, |s| s.yellow())
    );
    println!(
      "NOT FOUND  : {}",
      summary.count("not_found").if_supports_color(Stream::Stdout, |s| s.yellow())
    );
  } else {
    println!(
      "ADDED   : {}",
      summary.count("inserted").if_supports_color(Stream::Stdout, |s| s.green())
    );
    println!(
      "UPDATED : {}",
      summary.count("updated").if_supports_color(Stream::Stdout, |s| s.cyan())
    );
    println!(
      "DELETED : {}",
      summary.count("deleted").if_supports_color(Stream::Stdout, |s| s.red())
    );
    println!(
      "SKIPPED : {}",
      (summary.count("skipped") + summary.count("not_found")).if_supports_color(Stream::Stdout, |s| s.yellow())
    );
  }

  let failures = summary.count("unsupported_format") + summary.count("generate_failed") + summary.count("error");
  println!(
    "errors or unsupported: {}",
    failures.if_supports_color(Stream::Stdout, |s| s.magenta())
  );
  println!("processing time: {:.2}s", summary.processing_time.as_secs_f64());
  println!("---------------------------");

  let clean = summary.failed == 0 && (summary.verb != Verb::Check.as_str() || summary.count("match") == summary.total_files);
  let symbol = if clean {
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()).to_string()
  } else {
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  };

  if dry_run {
    println!("{} dry run finished; no files were written", symbols::UPDATED);
  } else if clean {
    println!("{symbol} processing completed successfully");
  } else {
    println!("{symbol} processing finished; some files require action");
  }
}
