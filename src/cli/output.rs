//! CLI output formatting.

use std::fmt::Write as _;

use super::commands::RunReport;
use crate::scenario::{ScenarioKind, StopReason, CATALOG};

/// Print version information.
pub fn print_version() {
    println!(
        "kinesim {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("KINESIM_GIT_HASH")
    );
}

/// Print help message.
pub fn print_help() {
    println!(
        r"kinesim - Kinematics simulation engine for free-fall and projectile demos

USAGE:
    kinesim <COMMAND> [OPTIONS]

COMMANDS:
    run <scenario>              Run a scenario headlessly until it settles
        -H, --height <M>        Initial height in meters
        -v, --velocity <M/S>    Initial horizontal velocity in m/s
        -c, --config <FILE>     Load a YAML configuration
        -n, --frames <N>        Frame budget (default: 1200)
        --json                  Print the report and chart series as JSON

    list                        List available scenarios

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    kinesim run free-fall
    kinesim run projectile --height 15 --velocity 12
    kinesim run yatay-atis --json
    kinesim run --config drop.yaml

LOGGING:
    Set RUST_LOG (e.g. RUST_LOG=kinesim=debug) for diagnostics on stderr.
"
    );
}

/// Catalog listing.
#[must_use]
pub fn format_catalog() -> String {
    let mut out = String::from("Available scenarios:\n\n");
    for entry in CATALOG {
        let _ = writeln!(out, "  {:<12} {}", entry.id, entry.title);
        let _ = writeln!(out, "  {:<12} {}", "", entry.summary);
        let _ = writeln!(out, "  {:<12} aliases: {}\n", "", entry.aliases.join(", "));
    }
    out
}

/// Human-readable run report.
#[must_use]
pub fn format_run_report(report: &RunReport) -> String {
    let last = &report.last;
    let title = match report.kind {
        ScenarioKind::FreeFall => "Free Fall",
        ScenarioKind::Projectile => "Projectile Motion",
    };
    let status = match report.stop {
        Some(StopReason::Settled) => "settled",
        Some(StopReason::User) => "stopped",
        None => "frame budget reached",
    };

    let mut out = String::new();
    let _ = writeln!(out, "kinesim - {title}");
    let _ = writeln!(out, "{}", "━".repeat(60));
    let _ = writeln!(out, "Initial height:     {:>8.2} m", report.initial.height);
    let _ = writeln!(out, "Initial velocity:   {:>8.2} m/s", report.initial.velocity_x);
    let _ = writeln!(out, "Scale:              {:>8.2} px/m", report.pixels_per_meter);
    let _ = writeln!(out, "Frames:             {:>8}", report.frames);
    let _ = writeln!(out, "Simulated time:     {:>8}", last.elapsed.to_string());
    let _ = writeln!(out, "Status:             {status}");
    let _ = writeln!(out, "{}", "━".repeat(60));

    let _ = writeln!(out, "Quantity             Final     Maximum    Theory");
    let _ = writeln!(
        out,
        "Height (m)      {:>10.2}  {:>10.2}  {:>8.2}",
        last.readout.height, last.max.max_height, report.initial.height
    );
    let _ = writeln!(
        out,
        "Velocity (m/s)  {:>10.2}  {:>10.2}  {:>8.2}",
        last.readout.velocity, last.max.max_velocity, last.theory.velocity
    );
    if report.kind == ScenarioKind::Projectile {
        let _ = writeln!(
            out,
            "Distance (m)    {:>10.2}  {:>10.2}  {:>8.2}",
            last.readout.distance, last.max.max_distance, last.theory.range
        );
    }
    let _ = writeln!(out, "Fall time (s)   {:>10}  {:>10}  {:>8.2}", "", "", last.theory.time);
    let _ = writeln!(
        out,
        "\nChart samples: {} height, {} velocity",
        report.height_series.values.len(),
        report.velocity_series.values.len()
    );
    out
}
