//! Collision policies.
//!
//! Collision correction is discrete and happens at the end of a step: the
//! integrator moves a body freely, then the active policy pulls it back onto
//! the ground surface (and inside the side walls, for the bounce policy).
//!
//! A contact is only resolved while the body moves toward the ground
//! (`velocity.y > 0`), so a body already resting on the surface is never
//! corrected twice.

use serde::{Deserialize, Serialize};

use super::body::KinematicBody;

/// Tuning shared by all policies, in pixel-space units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactParams {
    /// Rebound speeds below this are treated as settled (px/s).
    pub velocity_cutoff: f64,
    /// Horizontal damping applied when a bounce settles.
    pub friction_factor: f64,
    /// Left wall x coordinate (px).
    pub wall_left: f64,
    /// Right wall x coordinate (px).
    pub wall_right: f64,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self {
            velocity_cutoff: 25.0,
            friction_factor: 0.95,
            wall_left: 0.0,
            wall_right: 600.0,
        }
    }
}

/// A resolved ground contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Downward speed at the moment of contact, before correction (px/s).
    pub impact_speed: f64,
    /// Whether the body came to rest vertically.
    pub settled: bool,
}

/// Per-scenario collision rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Bounce with restitution, settle below the cutoff, reflect off side walls.
    #[default]
    Bounce,
    /// Stop dead on ground contact.
    Stick,
}

impl CollisionPolicy {
    /// Resolve contacts for one dynamic body.
    ///
    /// A missing ground means no ground contact this step; motion continues
    /// unobstructed.
    pub fn resolve(
        self,
        body: &mut KinematicBody,
        ground: Option<&KinematicBody>,
        params: &ContactParams,
    ) -> Option<Contact> {
        let contact = ground.and_then(|ground| match self {
            Self::Bounce => bounce_on_ground(body, ground, params),
            Self::Stick => stick_on_ground(body, ground),
        });

        if self == Self::Bounce {
            reflect_off_walls(body, params);
        }

        contact
    }
}

fn touches_ground(body: &KinematicBody, ground: &KinematicBody) -> bool {
    body.bottom() >= ground.top() && body.velocity.y > 0.0
}

fn bounce_on_ground(
    body: &mut KinematicBody,
    ground: &KinematicBody,
    params: &ContactParams,
) -> Option<Contact> {
    if !touches_ground(body, ground) {
        return None;
    }

    let impact_speed = body.velocity.y;
    body.position.y = ground.top() - body.shape.half_height();
    body.velocity.y = -body.velocity.y * body.restitution;

    let settled = body.velocity.y.abs() < params.velocity_cutoff;
    if settled {
        body.velocity.y = 0.0;
        body.velocity.x *= params.friction_factor;
    }

    Some(Contact {
        impact_speed,
        settled,
    })
}

fn stick_on_ground(body: &mut KinematicBody, ground: &KinematicBody) -> Option<Contact> {
    if !touches_ground(body, ground) {
        return None;
    }

    let impact_speed = body.velocity.y;
    body.position.y = ground.top() - body.shape.half_height();
    body.velocity.x = 0.0;
    body.velocity.y = 0.0;

    Some(Contact {
        impact_speed,
        settled: true,
    })
}

fn reflect_off_walls(body: &mut KinematicBody, params: &ContactParams) {
    let half = body.shape.half_width();
    let left = params.wall_left + half;
    let right = params.wall_right - half;

    if body.position.x <= left {
        body.position.x = left;
        body.velocity.x = -body.velocity.x * body.restitution;
    } else if body.position.x >= right {
        body.position.x = right;
        body.velocity.x = -body.velocity.x * body.restitution;
    }
}
