//! # crm
//!
//! Command-line entry point for the copyright header manager.

use std::process::ExitCode;

use anyhow::Result;
use cr_manager::cli::{Cli, run};

fn main() -> Result<ExitCode> {
  let cli = Cli::parse_args();
  run(cli.args)
}
