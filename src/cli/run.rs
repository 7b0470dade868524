//! # Run Command
//!
//! This module implements `crm` itself: it loads configuration and the
//! template, expands the command-line paths into a file list and runs the
//! chosen verb over every file, one after the other.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::Args;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::load_config;
use crate::diff::print_diff;
use crate::engine::{Engine, Status, Verb};
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{
  needs_attention, print_file_status, print_preview, print_start_message, print_summary, print_unsupported_hint,
};
use crate::registry::Registry;
use crate::report::{FileReport, ProcessingSummary, write_json_report};
use crate::templates::{Template, TemplateData};
use crate::{info_log, verbose_log};

/// Template path used when neither the command line nor the config names one.
pub const DEFAULT_COPYRIGHT_FILE: &str = "COPYRIGHT";

/// Arguments for `crm`
#[derive(Args, Debug, Default)]
pub struct RunArgs {
  /// Target files or directories. Glob patterns are expanded.
  #[arg(value_name = "FILES")]
  pub files: Vec<String>,

  /// Check mode: report whether each file's header matches, differs or is
  /// missing
  #[arg(long, short = 'c', group = "verb")]
  pub check: bool,

  /// Delete mode: remove detected copyright headers
  #[arg(long, group = "verb")]
  pub delete: bool,

  /// Update mode: replace the copyright header, adding it if missing
  #[arg(long, short = 'u', group = "verb")]
  pub update: bool,

  /// Copyright template file [default: COPYRIGHT]
  #[arg(long, value_name = "FILE")]
  pub copyright: Option<PathBuf>,

  /// Force a filetype instead of auto-detection. Without files, prints a
  /// preview of the rendered header for that type
  #[arg(long, short = 't', value_name = "TYPE")]
  pub filetype: Option<String>,

  /// Process the contents of directories recursively
  #[arg(long, short = 'r')]
  pub recursive: bool,

  /// Debug mode: show a diff of the result without modifying files
  #[arg(long, short = 'd')]
  pub debug: bool,

  /// Copyright year substituted for {{year}} in the template
  #[arg(long)]
  pub year: Option<String>,

  /// Increase verbosity (-v summary, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors and paths that need attention
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,

  /// Path to config file (default: .crm.toml in the current directory)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Write a JSON report of per-file results to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,
}

impl RunArgs {
  /// The verb selected by the mode flags.
  pub fn verb(&self) -> Verb {
    if self.check {
      Verb::Check
    } else if self.delete {
      Verb::Delete
    } else if self.update {
      Verb::Update
    } else {
      Verb::Add
    }
  }

  /// Returns `true` when only `--filetype` was given: print a preview.
  pub fn is_preview(&self) -> bool {
    self.filetype.is_some() && self.files.is_empty() && !(self.check || self.delete || self.update || self.debug)
  }
}

/// Run `crm` with the given arguments.
///
/// Returns a failing exit code when any file errored, was unsupported, or in
/// check mode did not match.
pub fn run(args: RunArgs) -> Result<ExitCode> {
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let cwd = std::env::current_dir().context("Failed to determine current directory")?;
  let config = load_config(args.config.as_deref(), &cwd, args.no_config)?;

  let registry = config.as_ref().map_or_else(Registry::builtin, |c| c.registry());
  let copyright = args
    .copyright
    .clone()
    .or_else(|| config.as_ref().and_then(|c| c.copyright.clone()))
    .unwrap_or_else(|| PathBuf::from(DEFAULT_COPYRIGHT_FILE));
  let recursive = args.recursive || config.as_ref().and_then(|c| c.recursive).unwrap_or(false);

  let year = args
    .year
    .clone()
    .unwrap_or_else(|| chrono::Local::now().year().to_string());
  let template = Template::load(&copyright, &TemplateData { year })
    .with_context(|| format!("Failed to load copyright template from {}", copyright.display()))?;

  let engine = Engine::new(registry, template).with_dry_run(args.debug);

  if args.is_preview() {
    return Ok(run_preview(&engine, args.filetype.as_deref().unwrap_or_default()));
  }

  if args.files.is_empty() {
    bail!(
      "At least one target file or directory is required for this operation. Use --filetype <TYPE> for a format \
       preview, or -h for help"
    );
  }

  let files = collect_files(&args.files, recursive)?;
  if files.is_empty() {
    bail!("No valid files found to process");
  }

  let verb = args.verb();
  debug!(verb = %verb, files = files.len(), dry_run = args.debug, "Starting run");
  print_start_message(files.len());

  let start_time = Instant::now();
  let supported = engine.registry().supported_filetypes();
  let mut reports = Vec::with_capacity(files.len());
  let mut failed = false;

  for (index, path) in files.iter().enumerate() {
    let outcome = engine.run(verb, path, args.filetype.as_deref());

    print_file_status(index + 1, files.len(), path, verb, &outcome.status, args.debug);
    if outcome.status == Status::UnsupportedFormat {
      print_unsupported_hint(&supported);
    }
    if args.debug
      && let (Some(before), Some(after)) = (&outcome.before, &outcome.after)
    {
      print_diff(path, before, after);
    }

    failed |= needs_attention(verb, &outcome.status);
    reports.push(FileReport::new(path, &outcome));
  }

  let summary = ProcessingSummary::from_reports(verb.as_str(), &reports, start_time.elapsed());
  print_summary(&summary, args.debug);

  if let Some(ref output_path) = args.report_json {
    if let Err(e) = write_json_report(output_path, &reports, &summary) {
      eprintln!("Error generating JSON report: {e:#}");
    } else {
      info_log!("Generated JSON report at {}", output_path.display());
    }
  }

  Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn run_preview(engine: &Engine, filetype: &str) -> ExitCode {
  verbose_log!("Entering format preview mode (since only --filetype was provided)...");

  match engine.preview(filetype) {
    Some(lines) if !lines.is_empty() => {
      print_preview(filetype, &lines);
      ExitCode::SUCCESS
    }
    Some(_) => {
      eprintln!("ERROR: the copyright template is empty");
      ExitCode::FAILURE
    }
    None => {
      eprintln!(
        "ERROR: unsupported filetype '{filetype}'. Supported: {}",
        engine.registry().supported_filetypes().join(", ")
      );
      ExitCode::FAILURE
    }
  }
}

/// Expands command-line paths into the list of files to process.
///
/// Patterns containing glob metacharacters that do not name an existing path
/// are expanded with `glob`. Directories are walked in sorted order when
/// `recursive` is set and skipped with a warning otherwise. Paths that do not
/// exist are skipped with a warning.
pub fn collect_files(patterns: &[String], recursive: bool) -> Result<Vec<PathBuf>> {
  let mut files = Vec::new();

  for pattern in patterns {
    for path in expand_pattern(pattern)? {
      if path.is_dir() {
        if recursive {
          verbose_log!("Recursively scanning directory {} ...", path.display());
          walk_dir(&path, &mut files)?;
        } else {
          warn!(
            "'{}' is a directory but --recursive was not specified. Skipped.",
            path.display()
          );
        }
      } else if path.is_file() {
        files.push(path);
      } else {
        warn!(
          "'{}' does not exist or is not a valid file/directory. Skipped.",
          path.display()
        );
      }
    }
  }

  Ok(files)
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
  let literal = PathBuf::from(pattern);
  if literal.exists() || !pattern.contains(['*', '?', '[']) {
    return Ok(vec![literal]);
  }

  let mut matches = Vec::new();
  for entry in glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))? {
    match entry {
      Ok(path) => matches.push(path),
      Err(e) => warn!("Failed to read glob match for '{}': {}", pattern, e),
    }
  }

  if matches.is_empty() {
    warn!("Pattern '{}' did not match any files. Skipped.", pattern);
  }
  Ok(matches)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
  for entry in WalkDir::new(dir).sort_by_file_name() {
    let entry = entry.with_context(|| format!("Failed to walk directory: {}", dir.display()))?;
    if entry.file_type().is_file() {
      files.push(entry.into_path());
    }
  }
  Ok(())
}
