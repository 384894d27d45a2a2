//! # kinesim
//!
//! Kinematic simulation engine for interactive free-fall and projectile
//! demonstrations.
//!
//! A [`scenario::Scenario`] owns a 2-D physics world (one ball, one ground
//! slab), a run-state machine, drag interaction, live metrics and bounded
//! chart sampling. Hosts drive it one tick per frame through
//! [`host::FrameLoop`] and paint the [`scenario::FrameSnapshot`] it returns.
//!
//! ## Example
//!
//! ```rust
//! use kinesim::prelude::*;
//!
//! let mut scenario = Scenario::from_kind(ScenarioKind::Projectile)?;
//! scenario.set_height(20.0);
//! scenario.start();
//! while scenario.state() == RunState::Running {
//!     scenario.tick();
//! }
//! assert!(scenario.readout().distance > 0.0);
//! # Ok::<(), kinesim::SimError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,
    clippy::missing_const_for_fn,
    clippy::float_cmp,
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod render;
pub mod scenario;

#[cfg(feature = "wasm")]
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ScaleMode, SimulationConfig, SimulationConfigBuilder};
    pub use crate::engine::{CollisionPolicy, KinematicBody, PhysicsWorld, SimTime, Vec2};
    pub use crate::error::{SimError, SimResult};
    pub use crate::host::{CancelToken, FrameLoop, FrameScheduler, ScriptedScheduler};
    pub use crate::render::{render_frame, RenderCommand};
    pub use crate::scenario::{
        Command, DataUpdate, DragUpdate, FrameSnapshot, InitialConditions, Outcome,
        PointerEvent, RunState, Scenario, ScenarioKind, StopReason, TickFrame, UserInput,
    };
}

/// Re-export for public API
pub use error::{SimError, SimResult};
