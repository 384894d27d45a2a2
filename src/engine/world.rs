//! Physics world: bodies, gravity, fixed-step integration.

use serde::{Deserialize, Serialize};

use super::body::{BodyRole, KinematicBody};
use super::collision::{CollisionPolicy, Contact, ContactParams};
use super::vector::Vec2;
use crate::error::{SimError, SimResult};

/// Outcome of a single step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Ground contacts resolved this step, by body index.
    pub contacts: Vec<(usize, Contact)>,
}

impl StepReport {
    /// Largest impact speed among this step's contacts (px/s).
    #[must_use]
    pub fn max_impact_speed(&self) -> Option<f64> {
        self.contacts
            .iter()
            .map(|(_, contact)| contact.impact_speed)
            .reduce(f64::max)
    }
}

/// Owns the bodies and advances them by one fixed timestep.
///
/// Gravity is stored in m/s² and converted to pixel space with
/// `pixels_per_meter` on every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsWorld {
    bodies: Vec<KinematicBody>,
    gravity: Vec2,
    dt: f64,
    pixels_per_meter: f64,
    policy: CollisionPolicy,
    contact: ContactParams,
}

impl PhysicsWorld {
    /// Create a world with no bodies.
    #[must_use]
    pub fn empty(
        gravity: Vec2,
        dt: f64,
        pixels_per_meter: f64,
        policy: CollisionPolicy,
        contact: ContactParams,
    ) -> Self {
        Self {
            bodies: Vec::new(),
            gravity,
            dt,
            pixels_per_meter,
            policy,
            contact,
        }
    }

    /// Create a fully set-up world.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::GroundCount`] unless exactly one body is the ground.
    pub fn new(
        bodies: Vec<KinematicBody>,
        gravity: Vec2,
        dt: f64,
        pixels_per_meter: f64,
        policy: CollisionPolicy,
        contact: ContactParams,
    ) -> SimResult<Self> {
        let found = bodies.iter().filter(|b| b.is_ground()).count();
        if found != 1 {
            return Err(SimError::GroundCount { found });
        }

        Ok(Self {
            bodies,
            gravity,
            dt,
            pixels_per_meter,
            policy,
            contact,
        })
    }

    /// Add a body.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::GroundCount`] when adding a second ground.
    pub fn add_body(&mut self, body: KinematicBody) -> SimResult<usize> {
        if body.is_ground() && self.ground().is_some() {
            return Err(SimError::GroundCount { found: 2 });
        }
        self.bodies.push(body);
        Ok(self.bodies.len() - 1)
    }

    /// Advance every dynamic body by one fixed timestep.
    ///
    /// Semi-implicit Euler: velocity first, then position with the new
    /// velocity, then the collision policy against the ground.
    pub fn step(&mut self) -> StepReport {
        let dt = self.dt;
        let dv = self.gravity * (dt * self.pixels_per_meter);
        let ground = self.ground().cloned();
        let mut report = StepReport::default();

        for (index, body) in self.bodies.iter_mut().enumerate() {
            if body.is_static {
                continue;
            }

            body.velocity += dv;
            body.position += body.velocity * dt;

            if let Some(contact) = self.policy.resolve(body, ground.as_ref(), &self.contact) {
                report.contacts.push((index, contact));
            }
        }

        report
    }

    /// All bodies in insertion order.
    #[must_use]
    pub fn bodies(&self) -> &[KinematicBody] {
        &self.bodies
    }

    /// The ground body, if present.
    #[must_use]
    pub fn ground(&self) -> Option<&KinematicBody> {
        self.bodies.iter().find(|b| b.is_ground())
    }

    /// First body with the given role.
    #[must_use]
    pub fn find(&self, role: BodyRole) -> Option<&KinematicBody> {
        self.bodies.iter().find(|b| b.role == role)
    }

    /// Reposition a dynamic body and zero its velocity.
    ///
    /// Static bodies are left untouched.
    pub fn set_body_at_rest(&mut self, role: BodyRole, position: Vec2) {
        if let Some(body) = self.dynamic_mut(role) {
            body.place_at_rest(position);
        }
    }

    /// Overwrite a dynamic body's velocity.
    pub fn set_body_velocity(&mut self, role: BodyRole, velocity: Vec2) {
        if let Some(body) = self.dynamic_mut(role) {
            body.velocity = velocity;
        }
    }

    fn dynamic_mut(&mut self, role: BodyRole) -> Option<&mut KinematicBody> {
        self.bodies
            .iter_mut()
            .find(|b| b.role == role && !b.is_static)
    }

    /// Gravity (m/s²).
    #[must_use]
    pub const fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Fixed timestep (s).
    #[must_use]
    pub const fn dt(&self) -> f64 {
        self.dt
    }

    /// Scale factor (px/m).
    #[must_use]
    pub const fn pixels_per_meter(&self) -> f64 {
        self.pixels_per_meter
    }

    /// Active collision policy.
    #[must_use]
    pub const fn policy(&self) -> CollisionPolicy {
        self.policy
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Pure integration with no ground contact: v_y = g * ppm * dt * n.
        #[test]
        fn prop_free_integration_velocity(
            dt in 0.001f64..0.05,
            n in 1usize..60,
            ppm in 1.0f64..100.0,
        ) {
            let mut world = PhysicsWorld::empty(
                Vec2::new(0.0, 10.0),
                dt,
                ppm,
                CollisionPolicy::Bounce,
                ContactParams { wall_left: -1e12, wall_right: 1e12, ..ContactParams::default() },
            );
            world.add_body(KinematicBody::ball(Vec2::new(0.0, 0.0), 1.0, 0.5)).ok();

            for _ in 0..n {
                world.step();
            }

            let vy = world.find(BodyRole::Ball).map_or(0.0, |b| b.velocity.y);
            let expected = 10.0 * ppm * dt * n as f64;
            prop_assert!((vy - expected).abs() <= 1e-9 * expected.max(1.0));
        }

        /// No penetration: after any step the ball's bottom is at or above the ground top.
        #[test]
        fn prop_no_penetration_after_step(
            y in 20.0f64..340.0,
            vy in -500.0f64..5000.0,
            restitution in 0.0f64..1.0,
            stick in any::<bool>(),
        ) {
            let mut ball = KinematicBody::ball(Vec2::new(300.0, y), 20.0, restitution);
            ball.velocity = Vec2::new(0.0, vy);
            let policy = if stick { CollisionPolicy::Stick } else { CollisionPolicy::Bounce };
            let mut world = PhysicsWorld::new(
                vec![ball, KinematicBody::ground(300.0, 360.0, 600.0, 40.0)],
                Vec2::new(0.0, 10.0),
                1.0 / 60.0,
                50.0,
                policy,
                ContactParams::default(),
            ).map_err(|e| TestCaseError::fail(e.to_string()))?;

            for _ in 0..240 {
                world.step();
                let bottom = world.find(BodyRole::Ball).map_or(0.0, KinematicBody::bottom);
                prop_assert!(bottom <= 360.0 + 1e-9, "penetration: bottom = {}", bottom);
            }
        }
    }
}
