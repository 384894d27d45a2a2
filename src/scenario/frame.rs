//! Read-only per-frame outputs handed to the host.

use serde::{Deserialize, Serialize};

use super::metrics::{MaxMetrics, Readout, TheoryReference};
use super::run_state::{RunState, StopReason};
use crate::config::{ScenarioKind, Viewport};
use crate::engine::{BodyRole, BodyShape, KinematicBody, SimTime, Vec2};

/// Body as the renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    /// Centre (px).
    pub position: Vec2,
    /// Radius for circles, half-thickness for slabs (px).
    pub radius: f64,
    /// Footprint.
    pub shape: BodyShape,
    /// Scenario role.
    pub role: BodyRole,
}

impl From<&KinematicBody> for BodySnapshot {
    fn from(body: &KinematicBody) -> Self {
        Self {
            position: body.position,
            radius: body.radius(),
            shape: body.shape,
            role: body.role,
        }
    }
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Bodies in world order.
    pub bodies: Vec<BodySnapshot>,
    /// Horizontal camera offset (px).
    pub camera_offset_x: f64,
    /// Surface size.
    pub viewport: Viewport,
    /// Whether the body is being dragged.
    pub dragging: bool,
    /// Whether the pointer hovers over the body.
    pub hovering: bool,
}

impl FrameSnapshot {
    /// The ball, if present.
    #[must_use]
    pub fn ball(&self) -> Option<&BodySnapshot> {
        self.bodies.iter().find(|b| b.role == BodyRole::Ball)
    }

    /// The ground, if present.
    #[must_use]
    pub fn ground(&self) -> Option<&BodySnapshot> {
        self.bodies.iter().find(|b| b.role == BodyRole::Ground)
    }
}

/// Observational payload for the host's data-update callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataUpdate {
    /// Scenario variant.
    pub kind: ScenarioKind,
    /// Run state after the tick.
    pub state: RunState,
    /// Simulated time of the current run.
    pub elapsed: SimTime,
    /// Live values.
    pub readout: Readout,
    /// Running maxima.
    pub max: MaxMetrics,
    /// Closed-form reference values.
    pub theory: TheoryReference,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickFrame {
    /// Renderer input.
    pub snapshot: FrameSnapshot,
    /// Data-update payload.
    pub data: DataUpdate,
    /// Whether the world was stepped.
    pub stepped: bool,
    /// Whether a chart sample was appended.
    pub sampled: bool,
    /// Set on the tick that auto-stopped the run.
    pub stopped: Option<StopReason>,
}
