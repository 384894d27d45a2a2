//! CLI argument parsing.
//!
//! Hand-rolled so parsing stays testable from any iterator of strings.

use std::path::PathBuf;

/// Frames simulated by `run` when `--frames` is absent (20 s at 60 Hz).
pub const DEFAULT_FRAMES: usize = 1200;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run a scenario headlessly until it settles or the frame budget ends.
    Run(RunOptions),
    /// List available scenarios.
    List,
    /// Show help
    Help,
    /// Show version
    Version,
}

/// Options for `run`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Scenario identifier or alias.
    pub scenario: Option<String>,
    /// YAML configuration file.
    pub config_path: Option<PathBuf>,
    /// Initial height override (m).
    pub height: Option<f64>,
    /// Initial velocity override (m/s).
    pub velocity: Option<f64>,
    /// Maximum frames to simulate.
    pub frames: usize,
    /// Emit JSON instead of text.
    pub json: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            scenario: None,
            config_path: None,
            height: None,
            velocity: None,
            frames: DEFAULT_FRAMES,
            json: false,
        }
    }
}

impl Args {
    /// Parse command-line arguments from an iterator.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        let Some(first) = args.get(1) else {
            return Self {
                command: Command::Help,
            };
        };

        let command = match first.as_str() {
            "run" => Self::parse_run_command(&args[2..]),
            "list" | "ls" => Command::List,
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    /// Parse the 'run' command arguments.
    fn parse_run_command(rest: &[String]) -> Command {
        let mut options = RunOptions::default();

        let mut i = 0;
        while i < rest.len() {
            let value = rest.get(i + 1);
            match rest[i].as_str() {
                "--height" | "-H" => {
                    options.height = value.and_then(|v| parse_number(v, "--height"));
                    i += 2;
                }
                "--velocity" | "-v" => {
                    options.velocity = value.and_then(|v| parse_number(v, "--velocity"));
                    i += 2;
                }
                "--config" | "-c" => {
                    options.config_path = value.map(PathBuf::from);
                    i += 2;
                }
                "--frames" | "-n" => {
                    if let Some(frames) = value.and_then(|v| v.parse().ok()) {
                        options.frames = frames;
                    } else {
                        eprintln!("Warning: --frames expects a non-negative integer");
                    }
                    i += 2;
                }
                "--json" => {
                    options.json = true;
                    i += 1;
                }
                flag if flag.starts_with('-') => {
                    eprintln!("Warning: ignoring unknown option {flag}");
                    i += 1;
                }
                name => {
                    if options.scenario.is_none() {
                        options.scenario = Some(name.to_string());
                    }
                    i += 1;
                }
            }
        }

        if options.scenario.is_none() && options.config_path.is_none() {
            eprintln!("Error: 'run' requires a scenario name or --config <file>");
            return Command::Help;
        }

        Command::Run(options)
    }
}

fn parse_number(value: &str, flag: &str) -> Option<f64> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Some(number),
        _ => {
            eprintln!("Warning: {flag} expects a number, got '{value}'");
            None
        }
    }
}
