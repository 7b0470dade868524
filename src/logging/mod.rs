//! # Logging Module
//!
//! Console switches shared by every `crm` run.
//!
//! `crm` talks to the user on three channels:
//! - per-file status lines on stdout, written by [`crate::output`]
//! - [`info_log!`] notices on stdout, such as where a JSON report went, which
//!   `--quiet` silences
//! - [`verbose_log!`] details on stderr, such as which config and template
//!   were loaded, shown only with `-v`
//!
//! Diagnostics from the engine (detection, location, dry runs) go through
//! [`tracing`] instead, filtered by `-v`/`-q` or `RUST_LOG` once
//! [`init_tracing`] has installed the subscriber.
//!
//! ## Example
//!
//! ```rust
//! use cr_manager::logging::{ColorMode, set_verbose};
//! use cr_manager::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Never.apply();
//!
//! verbose_log!("Loading template from: {}", "COPYRIGHT");
//! info_log!("Generated JSON report at {}", "report.json");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Writes a run detail to stderr when `-v` was given.
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            $crate::logging::print_detail(&format!($($arg)*));
        }
    };
}

/// Writes a notice to stdout unless `--quiet` was given.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if !$crate::logging::is_quiet() {
            $crate::logging::print_notice(&format!($($arg)*));
        }
    };
}

/// Prints a [`verbose_log!`] line, dimmed when stderr supports color.
pub fn print_detail(message: &str) {
  eprintln!("{}", message.if_supports_color(Stream::Stderr, |m| m.dimmed()));
}

/// Prints an [`info_log!`] line, in yellow when stdout supports color.
pub fn print_notice(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}
