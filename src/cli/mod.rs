//! CLI module for kinesim.
//!
//! All CLI logic lives here so `main.rs` stays a thin shim and every
//! command can be exercised from tests with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, RunOptions, DEFAULT_FRAMES};
pub use commands::{resolve_config, run_cli, run_scenario, simulate, RunReport};
pub use output::{format_catalog, format_run_report, print_help, print_version};
