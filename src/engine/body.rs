//! Kinematic body records.

use serde::{Deserialize, Serialize};

use super::vector::Vec2;

/// Role a body plays in a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyRole {
    /// The simulated point mass.
    Ball,
    /// The static ground slab. Exactly one per world.
    Ground,
}

impl BodyRole {
    /// Stable label for the role.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ball => "ball",
            Self::Ground => "ground",
        }
    }
}

/// Collision footprint of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyShape {
    /// Circle centred on the body position.
    Circle {
        /// Radius in pixels.
        radius: f64,
    },
    /// Axis-aligned slab centred on the body position.
    Slab {
        /// Width in pixels.
        width: f64,
        /// Thickness in pixels.
        thickness: f64,
    },
}

impl BodyShape {
    /// Distance from the centre to the top/bottom edge.
    #[must_use]
    pub fn half_height(&self) -> f64 {
        match *self {
            Self::Circle { radius } => radius,
            Self::Slab { thickness, .. } => thickness / 2.0,
        }
    }

    /// Distance from the centre to the left/right edge.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        match *self {
            Self::Circle { radius } => radius,
            Self::Slab { width, .. } => width / 2.0,
        }
    }
}

/// Mutable state record for a point mass or a static obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    /// Centre position (px).
    pub position: Vec2,
    /// Velocity (px/s).
    pub velocity: Vec2,
    /// Collision footprint.
    pub shape: BodyShape,
    /// Static bodies are never integrated.
    pub is_static: bool,
    /// Coefficient of restitution in `[0, 1]`.
    pub restitution: f64,
    /// Scenario role.
    pub role: BodyRole,
}

impl KinematicBody {
    /// Create a dynamic circular ball at rest.
    #[must_use]
    pub fn ball(position: Vec2, radius: f64, restitution: f64) -> Self {
        Self {
            position,
            velocity: Vec2::zero(),
            shape: BodyShape::Circle { radius },
            is_static: false,
            restitution: restitution.clamp(0.0, 1.0),
            role: BodyRole::Ball,
        }
    }

    /// Create the static ground slab, centred horizontally at `center_x`,
    /// with its top edge at `top`.
    #[must_use]
    pub fn ground(center_x: f64, top: f64, width: f64, thickness: f64) -> Self {
        Self {
            position: Vec2::new(center_x, top + thickness / 2.0),
            velocity: Vec2::zero(),
            shape: BodyShape::Slab { width, thickness },
            is_static: true,
            restitution: 0.0,
            role: BodyRole::Ground,
        }
    }

    /// Radius for circles, half-height for slabs.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.shape.half_height()
    }

    /// Y coordinate of the upper edge.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.position.y - self.shape.half_height()
    }

    /// Y coordinate of the lower edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.position.y + self.shape.half_height()
    }

    /// Whether this body is the ground.
    #[must_use]
    pub fn is_ground(&self) -> bool {
        self.role == BodyRole::Ground
    }

    /// Place the body and zero its velocity in one update.
    pub fn place_at_rest(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::zero();
    }
}
