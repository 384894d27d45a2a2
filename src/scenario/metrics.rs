//! Derived metrics: live readout, running maxima and closed-form
//! reference values.
//!
//! The theory values are display-only. They come from the initial height
//! set by the user and never feed back into the integrator, so mid-bounce
//! they will differ from the live readout.

use serde::{Deserialize, Serialize};

use crate::config::{InitialConditions, ScenarioKind};
use crate::engine::KinematicBody;

/// Instantaneous quantities in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Readout {
    /// Height of the body's lower edge above the ground (m).
    pub height: f64,
    /// Vertical speed `|vy|` (m/s).
    pub velocity: f64,
    /// Horizontal velocity (m/s).
    pub velocity_x: f64,
    /// Vertical velocity, positive downward (m/s).
    pub velocity_y: f64,
    /// Horizontal distance from the launch position (m).
    pub distance: f64,
}

impl Readout {
    /// Value plotted on the velocity chart: speed for free fall, signed
    /// vertical velocity for the projectile.
    #[must_use]
    pub fn chart_velocity(&self, kind: ScenarioKind) -> f64 {
        match kind {
            ScenarioKind::FreeFall => self.velocity,
            ScenarioKind::Projectile => self.velocity_y,
        }
    }
}

/// Running maxima, monotonically non-decreasing within a run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaxMetrics {
    /// Largest height seen (m).
    pub max_height: f64,
    /// Largest vertical speed seen, including impact speed (m/s).
    pub max_velocity: f64,
    /// Largest horizontal distance seen (m).
    pub max_distance: f64,
}

impl MaxMetrics {
    /// Elementwise maximum with a readout.
    pub fn absorb(&mut self, readout: &Readout) {
        self.max_height = self.max_height.max(readout.height);
        self.max_velocity = self.max_velocity.max(readout.velocity);
        self.max_distance = self.max_distance.max(readout.distance);
    }
}

/// Closed-form reference values for the configured initial conditions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TheoryReference {
    /// Impact speed `sqrt(2 g h0)` (m/s).
    pub velocity: f64,
    /// Fall time `sqrt(2 h0 / g)` (s).
    pub time: f64,
    /// Horizontal range `v0 * t` (m).
    pub range: f64,
}

impl TheoryReference {
    /// Compute reference values. Non-positive heights give zeros.
    #[must_use]
    pub fn from_initial(initial: &InitialConditions, gravity: f64) -> Self {
        if initial.height <= 0.0 || gravity <= 0.0 {
            return Self::default();
        }
        let time = (2.0 * initial.height / gravity).sqrt();
        Self {
            velocity: (2.0 * gravity * initial.height).sqrt(),
            time,
            range: initial.velocity_x.abs() * time,
        }
    }
}

/// Derives readouts from body state and keeps the running maxima.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsTracker {
    ground_top: f64,
    launch_x: f64,
    pixels_per_meter: f64,
    current: Readout,
    max: MaxMetrics,
}

impl MetricsTracker {
    /// Create a tracker for a world with the given geometry.
    #[must_use]
    pub const fn new(ground_top: f64, launch_x: f64, pixels_per_meter: f64) -> Self {
        Self {
            ground_top,
            launch_x,
            pixels_per_meter,
            current: Readout {
                height: 0.0,
                velocity: 0.0,
                velocity_x: 0.0,
                velocity_y: 0.0,
                distance: 0.0,
            },
            max: MaxMetrics {
                max_height: 0.0,
                max_velocity: 0.0,
                max_distance: 0.0,
            },
        }
    }

    /// Readout for a body, without touching the maxima.
    #[must_use]
    pub fn measure(&self, body: &KinematicBody) -> Readout {
        let ppm = self.pixels_per_meter;
        Readout {
            height: (self.ground_top - body.bottom()).max(0.0) / ppm,
            velocity: body.velocity.y.abs() / ppm,
            velocity_x: body.velocity.x / ppm,
            velocity_y: body.velocity.y / ppm,
            distance: (body.position.x - self.launch_x) / ppm,
        }
    }

    /// Refresh the live readout without updating maxima.
    pub fn refresh(&mut self, body: &KinematicBody) -> Readout {
        self.current = self.measure(body);
        self.current
    }

    /// Refresh the live readout and fold it into the maxima. An impact
    /// speed (px/s) reported by the collision step counts toward
    /// `max_velocity`.
    pub fn observe(&mut self, body: &KinematicBody, impact_speed: Option<f64>) -> Readout {
        let readout = self.refresh(body);
        self.max.absorb(&readout);
        if let Some(speed) = impact_speed {
            self.max.max_velocity = self.max.max_velocity.max(speed.abs() / self.pixels_per_meter);
        }
        readout
    }

    /// Zero the maxima.
    pub fn clear_max(&mut self) {
        self.max = MaxMetrics::default();
    }

    /// Live readout from the last refresh.
    #[must_use]
    pub const fn current(&self) -> Readout {
        self.current
    }

    /// Running maxima.
    #[must_use]
    pub const fn max(&self) -> MaxMetrics {
        self.max
    }
}
