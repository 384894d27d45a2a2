//! Run-state machine.
//!
//! ```text
//!   Idle ──pointer down──▶ Dragging ──pointer up/leave──▶ Idle
//!   Idle | Stopped ──start──▶ Running ──stop | settled──▶ Stopped
//!   any ──reset──▶ Idle
//! ```
//!
//! The machine also carries the initial conditions a reset rebuilds the
//! body from.

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use crate::config::InitialConditions;

/// Lifecycle state of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Waiting for input; the body sits at its initial position.
    #[default]
    Idle,
    /// The user is repositioning the body.
    Dragging,
    /// The world is being stepped every frame.
    Running,
    /// Halted by the user or by auto-stop; frozen until start or reset.
    Stopped,
}

impl RunState {
    /// Stable label for logs and output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }

    /// Whether ticks advance the world.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Whether pointer interaction is honoured.
    #[must_use]
    pub const fn accepts_pointer(self) -> bool {
        matches!(self, Self::Idle | Self::Dragging)
    }

    /// Whether the numeric height/velocity inputs are editable.
    #[must_use]
    pub const fn accepts_parameter_edit(self) -> bool {
        matches!(self, Self::Idle | Self::Stopped)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// User command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Begin a run from the configured initial conditions.
    Start,
    /// Halt the current run.
    Stop,
    /// Rebuild the scenario and return to idle.
    Reset,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    /// Explicit stop command.
    User,
    /// The body came to rest on the ground.
    Settled,
}

/// Result of asking the machine for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Outcome {
    /// The transition happened.
    Applied {
        /// State before.
        from: RunState,
        /// State after.
        to: RunState,
    },
    /// The transition is illegal in the current state; nothing changed.
    Rejected {
        /// State that refused the request.
        state: RunState,
        /// Short explanation.
        reason: &'static str,
    },
}

impl Outcome {
    /// Whether the transition happened.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Governs which operations are legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStateMachine {
    state: RunState,
    initial: InitialConditions,
    last_stop: Option<StopReason>,
}

impl RunStateMachine {
    /// Create an idle machine.
    #[must_use]
    pub const fn new(initial: InitialConditions) -> Self {
        Self {
            state: RunState::Idle,
            initial,
            last_stop: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Initial conditions used for the next start or reset.
    #[must_use]
    pub const fn initial(&self) -> &InitialConditions {
        &self.initial
    }

    /// Why the last run ended, if it has.
    #[must_use]
    pub const fn last_stop(&self) -> Option<StopReason> {
        self.last_stop
    }

    /// Overwrite the initial height (m). Allowed while idle, stopped or dragging.
    pub fn set_initial_height(&mut self, height: f64) -> Outcome {
        if self.state.is_running() {
            return self.reject("height is locked while running");
        }
        self.initial.height = height;
        self.unchanged()
    }

    /// Overwrite the initial horizontal velocity (m/s).
    pub fn set_initial_velocity(&mut self, velocity_x: f64) -> Outcome {
        if !self.state.accepts_parameter_edit() {
            return self.reject("velocity is locked while running or dragging");
        }
        self.initial.velocity_x = velocity_x;
        self.unchanged()
    }

    /// Overwrite the launch x coordinate (px).
    pub fn set_launch_x(&mut self, launch_x: f64) {
        if !self.state.is_running() {
            self.initial.launch_x = Some(launch_x);
        }
    }

    /// Idle → Dragging.
    pub fn begin_drag(&mut self) -> Outcome {
        match self.state {
            RunState::Idle => self.transition(RunState::Dragging),
            RunState::Dragging => self.reject("already dragging"),
            RunState::Running => self.reject("cannot drag while running"),
            RunState::Stopped => self.reject("reset before dragging"),
        }
    }

    /// Dragging → Idle.
    pub fn end_drag(&mut self) -> Outcome {
        if self.state == RunState::Dragging {
            self.transition(RunState::Idle)
        } else {
            self.reject("not dragging")
        }
    }

    /// Idle | Stopped → Running.
    pub fn start(&mut self) -> Outcome {
        match self.state {
            RunState::Idle | RunState::Stopped => {
                self.last_stop = None;
                self.transition(RunState::Running)
            }
            RunState::Dragging => self.reject("cannot start while dragging"),
            RunState::Running => self.reject("already running"),
        }
    }

    /// Running → Stopped.
    pub fn stop(&mut self, reason: StopReason) -> Outcome {
        if self.state.is_running() {
            self.last_stop = Some(reason);
            self.transition(RunState::Stopped)
        } else {
            self.reject("not running")
        }
    }

    /// Any → Idle. Always legal.
    pub fn reset(&mut self) -> Outcome {
        self.last_stop = None;
        self.transition(RunState::Idle)
    }

    fn transition(&mut self, to: RunState) -> Outcome {
        let from = self.state;
        self.state = to;
        Outcome::Applied { from, to }
    }

    const fn unchanged(&self) -> Outcome {
        Outcome::Applied {
            from: self.state,
            to: self.state,
        }
    }

    fn reject(&self, reason: &'static str) -> Outcome {
        debug!(state = %self.state, reason, "transition rejected");
        Outcome::Rejected {
            state: self.state,
            reason,
        }
    }
}
