//! CLI command handlers.

use std::process::ExitCode;

use serde::Serialize;
use tracing::{info, warn};

use super::args::{Args, Command, RunOptions};
use super::output::{format_catalog, format_run_report, print_help, print_version};
use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::host::{CancelToken, FrameLoop, NullSink, ScriptedScheduler};
use crate::render::CommandRenderer;
use crate::scenario::{
    catalog, ChartSeries, Command as ScenarioCommand, DataUpdate, InitialConditions, RunState,
    Scenario, ScenarioKind, StopReason,
};

/// Main CLI entry point.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Run(options) => run_scenario(&options),
        Command::List => {
            print!("{}", format_catalog());
            ExitCode::SUCCESS
        }
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Outcome of a headless run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Scenario variant.
    pub kind: ScenarioKind,
    /// Initial conditions actually used.
    pub initial: InitialConditions,
    /// Scale (px/m).
    pub pixels_per_meter: f64,
    /// Frames ticked.
    pub frames: u64,
    /// Final state and metrics.
    pub last: DataUpdate,
    /// Why the run ended, if it did.
    pub stop: Option<StopReason>,
    /// Height chart series.
    pub height_series: ChartSeries,
    /// Velocity chart series.
    pub velocity_series: ChartSeries,
}

/// Run a scenario from CLI options and print the report.
#[must_use]
pub fn run_scenario(options: &RunOptions) -> ExitCode {
    let report = match simulate(options) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    if options.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(1);
            }
        }
    } else {
        print!("{}", format_run_report(&report));
    }
    ExitCode::SUCCESS
}

/// Resolve the configuration for a run.
///
/// # Errors
///
/// Returns error for unknown scenarios, unreadable or invalid config
/// files, or a config whose scenario contradicts the named one.
pub fn resolve_config(options: &RunOptions) -> SimResult<SimulationConfig> {
    let named = options.scenario.as_deref().map(catalog::lookup).transpose()?;

    match (&options.config_path, named) {
        (Some(path), named) => {
            let config = SimulationConfig::load(path)?;
            if let Some(kind) = named {
                if kind != config.scenario {
                    return Err(SimError::config(format!(
                        "{} configures '{}', not '{}'",
                        path.display(),
                        config.scenario.id(),
                        kind.id()
                    )));
                }
            }
            Ok(config)
        }
        (None, Some(kind)) => Ok(SimulationConfig::preset(kind)),
        (None, None) => Err(SimError::config("no scenario given")),
    }
}

/// Drive a scenario through the frame loop: start, then tick until it
/// settles or the frame budget is spent.
///
/// # Errors
///
/// Returns error if the configuration cannot be resolved or is invalid.
pub fn simulate(options: &RunOptions) -> SimResult<RunReport> {
    let config = resolve_config(options)?;
    let mut scenario = Scenario::new(config)?;

    if let Some(height) = options.height {
        scenario.set_height(height);
    }
    if let Some(velocity) = options.velocity {
        scenario.set_velocity(velocity);
    }

    let token = CancelToken::new();
    let stop_token = token.clone();
    let scheduler = ScriptedScheduler::new()
        .command(ScenarioCommand::Start)
        .frames(options.frames);

    let mut frame_loop = FrameLoop::new(
        scenario,
        scheduler,
        CommandRenderer::new(),
        NullSink,
        move |update: &DataUpdate| {
            if update.state == RunState::Stopped {
                stop_token.cancel();
            }
        },
    )
    .with_token(token);

    let summary = frame_loop.run();
    let scenario = frame_loop.scenario();

    if scenario.state() == RunState::Running {
        warn!(frames = summary.frames, "frame budget spent before the body settled");
    }
    info!(
        frames = summary.frames,
        state = %scenario.state(),
        "headless run finished"
    );

    Ok(RunReport {
        kind: scenario.config().scenario,
        initial: *scenario.initial(),
        pixels_per_meter: scenario.pixels_per_meter(),
        frames: summary.frames,
        last: scenario.data_update(),
        stop: scenario.last_stop(),
        height_series: scenario.samples().height().to_series(),
        velocity_series: scenario.samples().velocity().to_series(),
    })
}
