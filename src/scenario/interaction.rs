//! Pointer interaction: grabbing and dragging the body to set its
//! initial position.
//!
//! Only honoured while the run state is `Idle` or `Dragging`. Pointer
//! coordinates are clamped to the viewport interior before use.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::run_state::{RunState, RunStateMachine};
use crate::engine::Vec2;

/// Pointer event over the simulation surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    /// Button pressed.
    Down {
        /// Pointer position.
        at: Vec2,
    },
    /// Pointer moved.
    Move {
        /// Pointer position.
        at: Vec2,
    },
    /// Button released.
    Up,
    /// Pointer left the surface.
    Leave,
}

/// Which coordinates a drag may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragAxes {
    /// Both coordinates follow the pointer.
    Free,
    /// Only the height changes; x stays at the launch position.
    VerticalOnly,
}

/// Effect of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DragUpdate {
    /// Nothing to do.
    Ignored,
    /// Pointer interaction is disabled in the current run state.
    Rejected {
        /// State that refused the event.
        state: RunState,
    },
    /// Hover state changed or was re-evaluated.
    Hover {
        /// Whether the pointer is over the body.
        over_body: bool,
    },
    /// Drag began.
    Grabbed,
    /// Body should move to a new clamped centre.
    Moved {
        /// Clamped body centre (px).
        center: Vec2,
    },
    /// Drag ended.
    Released,
}

/// Translates pointer events into body repositioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionController {
    radius: f64,
    hit_margin: f64,
    min: Vec2,
    max: Vec2,
    ground_top: f64,
    axes: DragAxes,
}

impl InteractionController {
    /// Create a controller for a body of `radius` on a `width`-pixel
    /// surface whose ground begins at `ground_top`.
    #[must_use]
    pub fn new(radius: f64, hit_margin: f64, width: f64, ground_top: f64, axes: DragAxes) -> Self {
        Self {
            radius,
            hit_margin,
            min: Vec2::new(radius, radius),
            max: Vec2::new((width - radius).max(radius), (ground_top - radius).max(radius)),
            ground_top,
            axes,
        }
    }

    /// Whether `pointer` is within grabbing distance of `center`.
    #[must_use]
    pub fn hit_test(&self, center: Vec2, pointer: Vec2) -> bool {
        center.distance(&pointer) <= self.radius + self.hit_margin
    }

    /// Clamp a candidate centre to the drag area, keeping `anchor_x` for
    /// vertical-only drags.
    #[must_use]
    pub fn clamp_center(&self, candidate: Vec2, anchor_x: f64) -> Vec2 {
        let x = match self.axes {
            DragAxes::Free => candidate.x,
            DragAxes::VerticalOnly => anchor_x,
        };
        Vec2::new(x, candidate.y).clamp(self.min, self.max)
    }

    /// Initial height (m) of a body centred at `center_y`, via the inverse
    /// scale transform.
    #[must_use]
    pub fn height_at(&self, center_y: f64, pixels_per_meter: f64) -> f64 {
        ((self.ground_top - self.radius - center_y) / pixels_per_meter).max(0.0)
    }

    /// Centre y coordinate (px) for an initial height (m).
    #[must_use]
    pub fn center_y_for(&self, height: f64, pixels_per_meter: f64) -> f64 {
        self.ground_top - self.radius - height * pixels_per_meter
    }

    /// Drag mode.
    #[must_use]
    pub const fn axes(&self) -> DragAxes {
        self.axes
    }

    /// Apply a pointer event. `body_center` is the body's current centre.
    ///
    /// Drives the Idle ⇄ Dragging transitions on `machine`; never mutates
    /// anything while running.
    pub fn handle(
        &self,
        machine: &mut RunStateMachine,
        event: PointerEvent,
        body_center: Vec2,
    ) -> DragUpdate {
        let state = machine.state();
        if !state.accepts_pointer() {
            if matches!(event, PointerEvent::Down { .. }) {
                debug!(%state, "pointer down ignored");
            }
            return match event {
                PointerEvent::Leave => DragUpdate::Hover { over_body: false },
                _ => DragUpdate::Rejected { state },
            };
        }

        match (state, event) {
            (RunState::Idle, PointerEvent::Down { at }) => {
                if self.hit_test(body_center, at) && machine.begin_drag().is_applied() {
                    debug!(x = at.x, y = at.y, "drag started");
                    DragUpdate::Grabbed
                } else {
                    DragUpdate::Ignored
                }
            }
            (RunState::Idle, PointerEvent::Move { at }) => DragUpdate::Hover {
                over_body: self.hit_test(body_center, at),
            },
            (RunState::Dragging, PointerEvent::Move { at } | PointerEvent::Down { at }) => {
                DragUpdate::Moved {
                    center: self.clamp_center(at, body_center.x),
                }
            }
            (RunState::Dragging, PointerEvent::Up | PointerEvent::Leave) => {
                machine.end_drag();
                debug!("drag released");
                DragUpdate::Released
            }
            (_, PointerEvent::Leave) => DragUpdate::Hover { over_body: false },
            _ => DragUpdate::Ignored,
        }
    }
}
