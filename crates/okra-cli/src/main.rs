//! # okra CLI
//!
//! Command-line interface for the OKRA answer engine.
//!
//! This binary provides human-friendly access to `okra-core` functionality.
//! Run `okra --help` for usage information.

mod cli;
pub mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
