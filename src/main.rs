//! kinesim CLI - headless kinematics runs
//!
//! Thin entry point; all command logic lives in [`kinesim::cli`].

use std::process::ExitCode;

use kinesim::cli::{run_cli, Args};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    run_cli(Args::parse())
}
