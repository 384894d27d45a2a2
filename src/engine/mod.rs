//! Kinematic simulation core.
//!
//! Implements the fixed-timestep physics used by every scenario:
//! - Pixel-space vectors and body records
//! - Semi-implicit Euler integration under constant gravity
//! - Discrete end-of-step collision policies
//! - Fixed-point simulated-time accounting

pub mod body;
pub mod clock;
pub mod collision;
pub mod vector;
pub mod world;

pub use body::{BodyRole, BodyShape, KinematicBody};
pub use clock::{RunClock, SimTime};
pub use collision::{CollisionPolicy, Contact, ContactParams};
pub use vector::Vec2;
pub use world::{PhysicsWorld, StepReport};
