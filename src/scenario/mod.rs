//! Scenario instances: one physics world plus the run state, interaction,
//! metrics, sampling and camera that turn user input into motion and
//! chart-ready data.
//!
//! A [`Scenario`] owns everything for one mounted demo. Reset rebuilds the
//! world wholesale from the configuration and the current initial
//! conditions. Every frame the host calls [`Scenario::tick`] (or the
//! value-in/value-out [`tick`]) and forwards the returned [`TickFrame`].
//!
//! # Example
//!
//! ```rust
//! use kinesim::prelude::*;
//!
//! let mut scenario = Scenario::from_kind(ScenarioKind::Projectile)?;
//! scenario.start();
//! while scenario.state() == RunState::Running {
//!     scenario.tick();
//! }
//! assert!((scenario.max_metrics().max_distance - 28.28).abs() < 0.5);
//! # Ok::<(), kinesim::SimError>(())
//! ```

pub mod camera;
pub mod catalog;
pub mod frame;
pub mod interaction;
pub mod metrics;
pub mod run_state;
pub mod sampling;

pub use camera::CameraController;
pub use catalog::{CatalogEntry, ScenarioKind, CATALOG};
pub use frame::{BodySnapshot, DataUpdate, FrameSnapshot, TickFrame};
pub use interaction::{DragAxes, DragUpdate, InteractionController, PointerEvent};
pub use metrics::{MaxMetrics, MetricsTracker, Readout, TheoryReference};
pub use run_state::{Command, InitialConditions, Outcome, RunState, RunStateMachine, StopReason};
pub use sampling::{ChartSeries, SampleBuffer, SampleRecorder};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

use crate::config::SimulationConfig;
use crate::engine::{BodyRole, KinematicBody, PhysicsWorld, RunClock, SimTime, Vec2};
use crate::error::SimResult;

/// Input delivered by the host between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserInput {
    /// Pointer activity over the surface.
    Pointer(PointerEvent),
    /// Start, stop or reset.
    Command(Command),
    /// Numeric initial-height entry (m).
    SetHeight(f64),
    /// Numeric initial-velocity entry (m/s).
    SetVelocity(f64),
}

/// Effect of a [`UserInput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEffect {
    /// Command or parameter edit result.
    Transition(Outcome),
    /// Pointer result.
    Pointer(DragUpdate),
}

/// One mounted demonstration.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    config: SimulationConfig,
    world: PhysicsWorld,
    machine: RunStateMachine,
    interaction: InteractionController,
    metrics: MetricsTracker,
    recorder: SampleRecorder,
    camera: CameraController,
    clock: RunClock,
    hovering: bool,
}

impl Scenario {
    /// Build a scenario from a configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration fails validation.
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate_all()?;

        let mut initial = config.initial;
        initial.velocity_x = config.clamp_velocity(initial.velocity_x);
        initial.height = config.clamp_height(initial.height, config.pixels_per_meter(&initial));

        let world = build_world(&config, &initial)?;
        let axes = match config.scenario {
            ScenarioKind::FreeFall => DragAxes::Free,
            ScenarioKind::Projectile => DragAxes::VerticalOnly,
        };

        let mut scenario = Self {
            interaction: InteractionController::new(
                config.body.radius,
                config.interaction.hit_test_margin,
                config.viewport.width,
                config.ground_top(),
                axes,
            ),
            metrics: MetricsTracker::new(
                config.ground_top(),
                config.launch_x(&initial),
                world.pixels_per_meter(),
            ),
            recorder: SampleRecorder::new(config.sampling.capacity, config.sampling.interval)
                .with_timestep(config.physics.dt),
            camera: CameraController::new(
                config.camera.follow,
                config.viewport.width,
                config.camera.follow_fraction,
            ),
            clock: RunClock::new(config.physics.dt),
            machine: RunStateMachine::new(initial),
            world,
            hovering: false,
            config,
        };
        scenario.refresh_readout();

        info!(
            scenario = scenario.config.scenario.id(),
            height = initial.height,
            velocity_x = initial.velocity_x,
            pixels_per_meter = scenario.world.pixels_per_meter(),
            "scenario mounted"
        );
        Ok(scenario)
    }

    /// Build a scenario from a preset.
    ///
    /// # Errors
    ///
    /// Returns error if the preset fails validation.
    pub fn from_kind(kind: ScenarioKind) -> SimResult<Self> {
        Self::new(SimulationConfig::preset(kind))
    }

    // ===== Commands =====

    /// Apply any host input.
    pub fn handle_input(&mut self, input: UserInput) -> InputEffect {
        match input {
            UserInput::Pointer(event) => InputEffect::Pointer(self.pointer(event)),
            UserInput::Command(command) => InputEffect::Transition(self.command(command)),
            UserInput::SetHeight(height) => InputEffect::Transition(self.set_height(height)),
            UserInput::SetVelocity(velocity) => {
                InputEffect::Transition(self.set_velocity(velocity))
            }
        }
    }

    /// Apply a start/stop/reset command.
    pub fn command(&mut self, command: Command) -> Outcome {
        match command {
            Command::Start => self.start(),
            Command::Stop => self.stop(),
            Command::Reset => self.reset(),
        }
    }

    /// Start a run from the configured initial conditions. Clears maxima,
    /// samples, the clock and the camera.
    pub fn start(&mut self) -> Outcome {
        let outcome = self.machine.start();
        if outcome.is_applied() {
            self.rebuild();
            let initial = *self.machine.initial();
            let launch = Vec2::new(initial.velocity_x * self.world.pixels_per_meter(), 0.0);
            self.world.set_body_velocity(BodyRole::Ball, launch);
            self.refresh_readout();
            info!(
                scenario = self.config.scenario.id(),
                height = initial.height,
                velocity_x = initial.velocity_x,
                "run started"
            );
        }
        outcome
    }

    /// Stop the current run. Nothing is rolled back.
    pub fn stop(&mut self) -> Outcome {
        let outcome = self.machine.stop(StopReason::User);
        if outcome.is_applied() {
            info!(elapsed = %self.clock.elapsed(), "run stopped");
        }
        outcome
    }

    /// Return to idle and rebuild the world. Always legal and idempotent.
    pub fn reset(&mut self) -> Outcome {
        let outcome = self.machine.reset();
        self.hovering = false;
        self.rebuild();
        info!(scenario = self.config.scenario.id(), "scenario reset");
        outcome
    }

    /// Enter a new initial height (m), clamped to the allowed range. Only
    /// while idle or stopped; a stopped scenario returns to idle.
    pub fn set_height(&mut self, height: f64) -> Outcome {
        let state = self.state();
        if !state.accepts_parameter_edit() {
            debug!(%state, height, "height edit rejected");
            return Outcome::Rejected {
                state,
                reason: "height is editable only while idle or stopped",
            };
        }

        let mut candidate = *self.machine.initial();
        candidate.height = height;
        let clamped = self
            .config
            .clamp_height(height, self.config.pixels_per_meter(&candidate));
        if clamped.to_bits() != height.to_bits() {
            warn!(requested = height, applied = clamped, "initial height clamped");
        }

        self.machine.set_initial_height(clamped);
        self.apply_parameter_edit(state)
    }

    /// Enter a new initial horizontal velocity (m/s), clamped to the
    /// allowed range. Same state rules as [`Self::set_height`].
    pub fn set_velocity(&mut self, velocity_x: f64) -> Outcome {
        let state = self.state();
        if !state.accepts_parameter_edit() {
            debug!(%state, velocity_x, "velocity edit rejected");
            return Outcome::Rejected {
                state,
                reason: "velocity is editable only while idle or stopped",
            };
        }

        let clamped = self.config.clamp_velocity(velocity_x);
        if clamped.to_bits() != velocity_x.to_bits() {
            warn!(requested = velocity_x, applied = clamped, "initial velocity clamped");
        }

        self.machine.set_initial_velocity(clamped);
        if self.config.scenario == ScenarioKind::FreeFall {
            self.apply_parameter_edit(state)
        } else {
            // Range depends on velocity, so the scale may change too.
            let mut candidate = *self.machine.initial();
            candidate.height = self
                .config
                .clamp_height(candidate.height, self.config.pixels_per_meter(&candidate));
            self.machine.set_initial_height(candidate.height);
            self.apply_parameter_edit(state)
        }
    }

    fn apply_parameter_edit(&mut self, before: RunState) -> Outcome {
        if before == RunState::Stopped {
            self.machine.reset();
        }
        self.rebuild();
        Outcome::Applied {
            from: before,
            to: self.state(),
        }
    }

    /// Apply a pointer event.
    pub fn pointer(&mut self, event: PointerEvent) -> DragUpdate {
        let center = self.ball().map_or_else(Vec2::zero, |ball| ball.position);
        let update = self.interaction.handle(&mut self.machine, event, center);

        match update {
            DragUpdate::Grabbed => {
                self.hovering = false;
                self.metrics.clear_max();
            }
            DragUpdate::Moved { center } => self.drag_to(center),
            DragUpdate::Released => self.rebuild(),
            DragUpdate::Hover { over_body } => self.hovering = over_body,
            DragUpdate::Rejected { .. } => {
                // Dragging is locked, but the cursor feedback still follows the pointer.
                if let PointerEvent::Move { at } = event {
                    self.hovering = self.interaction.hit_test(center, at);
                }
            }
            DragUpdate::Ignored => {}
        }
        update
    }

    fn drag_to(&mut self, center: Vec2) {
        let ppm = self.world.pixels_per_meter();
        let height = self
            .config
            .clamp_height(self.interaction.height_at(center.y, ppm), ppm);
        let position = Vec2::new(center.x, self.interaction.center_y_for(height, ppm));

        self.world.set_body_at_rest(BodyRole::Ball, position);
        self.machine.set_initial_height(height);
        if self.interaction.axes() == DragAxes::Free {
            self.machine.set_launch_x(position.x);
        }
        self.refresh_readout();
        trace!(x = position.x, y = position.y, height, "drag moved");
    }

    // ===== Frame =====

    /// Advance one frame. Steps the world only while running; otherwise
    /// re-derives the readout from the unchanged body.
    pub fn tick(&mut self) -> TickFrame {
        let mut stepped = false;
        let mut sampled = false;
        let mut stopped = None;

        if self.machine.state().is_running() {
            let report = self.world.step();
            let now = self.clock.tick();
            stepped = true;

            if let Some(ball) = self.world.find(BodyRole::Ball) {
                let readout = self.metrics.observe(ball, report.max_impact_speed());
                sampled = self.recorder.record(
                    now,
                    readout.height,
                    readout.chart_velocity(self.config.scenario),
                );
                self.camera.update(ball.position.x);

                trace!(
                    t = %now,
                    height = readout.height,
                    velocity = readout.velocity,
                    distance = readout.distance,
                    "tick"
                );

                if readout.height < self.config.physics.rest_height_epsilon
                    && readout.velocity < self.config.physics.velocity_cutoff
                {
                    self.machine.stop(StopReason::Settled);
                    stopped = Some(StopReason::Settled);
                    info!(
                        elapsed = %now,
                        max_height = self.metrics.max().max_height,
                        max_velocity = self.metrics.max().max_velocity,
                        max_distance = self.metrics.max().max_distance,
                        "auto-stopped: body at rest"
                    );
                }
            }
        } else {
            self.refresh_readout();
        }

        TickFrame {
            snapshot: self.snapshot(),
            data: self.data_update(),
            stepped,
            sampled,
            stopped,
        }
    }

    /// Renderer input for the current state.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            bodies: self.world.bodies().iter().map(BodySnapshot::from).collect(),
            camera_offset_x: self.camera.offset_x(),
            viewport: self.config.viewport,
            dragging: self.state() == RunState::Dragging,
            hovering: self.hovering,
        }
    }

    /// Data-update payload for the current state.
    #[must_use]
    pub fn data_update(&self) -> DataUpdate {
        DataUpdate {
            kind: self.config.scenario,
            state: self.state(),
            elapsed: self.clock.elapsed(),
            readout: self.metrics.current(),
            max: self.metrics.max(),
            theory: self.theory(),
        }
    }

    // ===== Accessors =====

    /// Configuration.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current run state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.machine.state()
    }

    /// Why the last run ended.
    #[must_use]
    pub const fn last_stop(&self) -> Option<StopReason> {
        self.machine.last_stop()
    }

    /// Initial conditions for the next start or reset.
    #[must_use]
    pub const fn initial(&self) -> &InitialConditions {
        self.machine.initial()
    }

    /// Physics world.
    #[must_use]
    pub const fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// The simulated body.
    #[must_use]
    pub fn ball(&self) -> Option<&KinematicBody> {
        self.world.find(BodyRole::Ball)
    }

    /// Current scale (px/m).
    #[must_use]
    pub const fn pixels_per_meter(&self) -> f64 {
        self.world.pixels_per_meter()
    }

    /// Live readout.
    #[must_use]
    pub const fn readout(&self) -> Readout {
        self.metrics.current()
    }

    /// Running maxima.
    #[must_use]
    pub const fn max_metrics(&self) -> MaxMetrics {
        self.metrics.max()
    }

    /// Closed-form reference values for the current initial conditions.
    #[must_use]
    pub fn theory(&self) -> TheoryReference {
        TheoryReference::from_initial(self.machine.initial(), self.config.physics.gravity)
    }

    /// Chart series.
    #[must_use]
    pub const fn samples(&self) -> &SampleRecorder {
        &self.recorder
    }

    /// Horizontal camera offset (px).
    #[must_use]
    pub const fn camera_offset_x(&self) -> f64 {
        self.camera.offset_x()
    }

    /// Simulated time of the current run.
    #[must_use]
    pub const fn elapsed(&self) -> SimTime {
        self.clock.elapsed()
    }

    /// Whether the pointer hovers over the body.
    #[must_use]
    pub const fn is_hovering(&self) -> bool {
        self.hovering
    }

    // ===== Internals =====

    fn rebuild(&mut self) {
        let initial = *self.machine.initial();
        match build_world(&self.config, &initial) {
            Ok(world) => self.world = world,
            Err(err) => error!(%err, "world rebuild failed, keeping previous world"),
        }
        self.metrics = MetricsTracker::new(
            self.config.ground_top(),
            self.config.launch_x(&initial),
            self.world.pixels_per_meter(),
        );
        self.recorder.clear();
        self.clock.reset();
        self.camera.reset();
        self.refresh_readout();
    }

    fn refresh_readout(&mut self) {
        if let Some(ball) = self.world.find(BodyRole::Ball) {
            self.metrics.refresh(ball);
        }
    }
}

/// Value-in/value-out frame step: consumes a scenario and returns its
/// successor together with the frame outputs.
#[must_use]
pub fn tick(mut scenario: Scenario) -> (Scenario, TickFrame) {
    let frame = scenario.tick();
    (scenario, frame)
}

fn build_world(config: &SimulationConfig, initial: &InitialConditions) -> SimResult<PhysicsWorld> {
    let ppm = config.pixels_per_meter(initial);
    let ground_top = config.ground_top();
    let radius = config.body.radius;
    let ground_width = config.ground_width(ppm, initial);

    let ball = KinematicBody::ball(
        Vec2::new(
            config.launch_x(initial),
            ground_top - radius - initial.height * ppm,
        ),
        radius,
        config.body.restitution,
    );
    let ground = KinematicBody::ground(
        ground_width / 2.0,
        ground_top,
        ground_width,
        config.ground.thickness,
    );

    PhysicsWorld::new(
        vec![ball, ground],
        config.gravity_vector(),
        config.physics.dt,
        ppm,
        config.policy,
        config.contact_params(ppm),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_fall() -> Scenario {
        Scenario::from_kind(ScenarioKind::FreeFall).expect("preset")
    }

    fn projectile() -> Scenario {
        Scenario::from_kind(ScenarioKind::Projectile).expect("preset")
    }

    fn run_to_stop(scenario: &mut Scenario, max_ticks: usize) -> usize {
        for n in 1..=max_ticks {
            if scenario.tick().stopped.is_some() {
                return n;
            }
        }
        max_ticks
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn test_free_fall_initial_layout() {
        let s = free_fall();
        let ball = s.ball().expect("ball");
        assert!((ball.position.x - 300.0).abs() < f64::EPSILON);
        assert!((ball.position.y - 50.0).abs() < 1e-9);
        assert_eq!(s.state(), RunState::Idle);
        assert!((s.readout().height - 5.8).abs() < 1e-9);
        assert_eq!(s.world().bodies().iter().filter(|b| b.is_ground()).count(), 1);
    }

    #[test]
    fn test_projectile_initial_layout() {
        let s = projectile();
        let ball = s.ball().expect("ball");
        assert!((ball.position.x - 20.0).abs() < f64::EPSILON);
        assert!((s.pixels_per_meter() - 18.8).abs() < 1e-9);
        let ground = s.world().ground().expect("ground");
        assert!(ground.shape.half_width() * 2.0 >= 1504.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig::builder(ScenarioKind::FreeFall)
            .timestep(0.0)
            .build();
        assert!(Scenario::new(config).is_err());
    }

    // =========================================================================
    // Run state
    // =========================================================================

    #[test]
    fn test_idle_tick_does_not_step() {
        let mut s = free_fall();
        let before = s.ball().cloned();
        let frame = s.tick();
        assert!(!frame.stepped);
        assert_eq!(s.ball().cloned(), before);
        assert!(s.samples().is_empty());
    }

    #[test]
    fn test_start_stop() {
        let mut s = free_fall();
        assert!(s.start().is_applied());
        for _ in 0..10 {
            assert!(s.tick().stepped);
        }
        assert_eq!(s.samples().height().len(), 10);
        assert!(s.stop().is_applied());

        let frozen = s.ball().cloned();
        assert!(!s.tick().stepped);
        assert_eq!(s.ball().cloned(), frozen);
        assert_eq!(s.last_stop(), Some(StopReason::User));
    }

    #[test]
    fn test_start_rejected_while_dragging() {
        let mut s = free_fall();
        let at = s.ball().expect("ball").position;
        assert_eq!(s.pointer(PointerEvent::Down { at }), DragUpdate::Grabbed);
        assert!(!s.start().is_applied());
        assert_eq!(s.state(), RunState::Dragging);
    }

    #[test]
    fn test_restart_restores_initial_conditions() {
        let mut s = free_fall();
        s.start();
        for _ in 0..30 {
            s.tick();
        }
        s.stop();
        s.start();
        let ball = s.ball().expect("ball");
        assert!((ball.position.y - 50.0).abs() < 1e-9);
        assert!(s.samples().is_empty());
        assert_eq!(s.max_metrics(), MaxMetrics::default());
        assert_eq!(s.elapsed(), SimTime::ZERO);
    }

    #[test]
    fn test_reset_idempotent() {
        let mut s = projectile();
        s.start();
        for _ in 0..40 {
            s.tick();
        }
        s.reset();
        let first = s.clone();
        s.reset();
        assert_eq!(s, first);
        assert!(s.samples().is_empty());
        assert_eq!(s.max_metrics(), MaxMetrics::default());
        assert!(s.camera_offset_x().abs() < f64::EPSILON);
    }

    // =========================================================================
    // Auto-stop
    // =========================================================================

    #[test]
    fn test_free_fall_bounces_then_settles() {
        let mut s = free_fall();
        s.start();
        let ticks = run_to_stop(&mut s, 10_000);
        assert!(ticks < 10_000, "never settled");
        assert_eq!(s.state(), RunState::Stopped);
        assert_eq!(s.last_stop(), Some(StopReason::Settled));
        assert!(s.readout().height < 1e-3);
    }

    #[test]
    fn test_projectile_sticks_and_stops() {
        let mut s = projectile();
        s.start();
        let ticks = run_to_stop(&mut s, 1_000);
        assert!(ticks < 1_000);
        let ball = s.ball().expect("ball");
        assert_eq!(ball.velocity, Vec2::zero());
        let range = s.max_metrics().max_distance;
        assert!((range - 28.284).abs() <= s.config().physics.dt * 20.0 + 1e-6);
    }

    #[test]
    fn test_camera_follows_projectile() {
        let mut s = projectile();
        s.start();
        run_to_stop(&mut s, 1_000);
        let ball_x = s.ball().expect("ball").position.x;
        assert!(ball_x > 0.6 * 752.0);
        assert!((s.camera_offset_x() - (ball_x - 0.6 * 752.0)).abs() < 1e-9);
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    #[test]
    fn test_drag_sets_height_and_clears_maxima() {
        let mut s = free_fall();
        s.start();
        for _ in 0..20 {
            s.tick();
        }
        s.reset();
        let at = s.ball().expect("ball").position;
        s.pointer(PointerEvent::Down { at });
        assert_eq!(s.max_metrics(), MaxMetrics::default());

        s.pointer(PointerEvent::Move {
            at: Vec2::new(200.0, 240.0),
        });
        let ball = s.ball().expect("ball");
        assert_eq!(ball.position, Vec2::new(200.0, 240.0));
        assert!((s.initial().height - 2.0).abs() < 1e-9);
        assert!(s.snapshot().dragging);

        s.pointer(PointerEvent::Up);
        assert_eq!(s.state(), RunState::Idle);
        assert!((s.initial().height - 2.0).abs() < 1e-9);
        assert_eq!(s.initial().launch_x, Some(200.0));
        assert_eq!(s.ball().expect("ball").position, Vec2::new(200.0, 240.0));
    }

    #[test]
    fn test_projectile_drag_rescales_on_release() {
        let mut s = projectile();
        let at = s.ball().expect("ball").position;
        s.pointer(PointerEvent::Down { at });
        let frozen = s.pixels_per_meter();
        s.pointer(PointerEvent::Move {
            at: Vec2::new(500.0, 300.0),
        });
        assert!((s.pixels_per_meter() - frozen).abs() < f64::EPSILON);
        assert!((s.ball().expect("ball").position.x - 20.0).abs() < f64::EPSILON);

        s.pointer(PointerEvent::Up);
        let h = s.initial().height;
        let expected = s.config().pixels_per_meter(s.initial());
        assert!(h > 0.0);
        assert!((s.pixels_per_meter() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_pointer_rejected_while_running() {
        let mut s = free_fall();
        s.start();
        s.tick();
        let before = s.ball().cloned();
        let at = before.as_ref().expect("ball").position;
        assert!(matches!(
            s.pointer(PointerEvent::Down { at }),
            DragUpdate::Rejected { .. }
        ));
        assert!(matches!(
            s.pointer(PointerEvent::Move {
                at: Vec2::new(10.0, 10.0)
            }),
            DragUpdate::Rejected { .. }
        ));
        assert_eq!(s.ball().cloned(), before);
        assert_eq!(s.state(), RunState::Running);
    }

    #[test]
    fn test_hover_detection() {
        let mut s = free_fall();
        let at = s.ball().expect("ball").position;
        s.pointer(PointerEvent::Move { at });
        assert!(s.is_hovering());
        s.pointer(PointerEvent::Leave);
        assert!(!s.is_hovering());
    }

    #[test]
    fn test_hover_follows_pointer_during_run() {
        let mut s = projectile();
        let launch = s.ball().expect("ball").position;
        s.pointer(PointerEvent::Move { at: launch });
        assert!(s.is_hovering());

        s.start();
        for _ in 0..60 {
            s.tick();
        }
        let update = s.pointer(PointerEvent::Move {
            at: Vec2::new(5.0, 5.0),
        });
        assert!(matches!(update, DragUpdate::Rejected { .. }));
        assert!(!s.is_hovering());

        let ball = s.ball().expect("ball").position;
        s.pointer(PointerEvent::Move { at: ball });
        assert!(s.is_hovering());
        assert_eq!(s.state(), RunState::Running);
        assert_eq!(s.ball().expect("ball").position, ball);
    }

    // =========================================================================
    // Parameter edits
    // =========================================================================

    #[test]
    fn test_set_height_clamped() {
        let mut s = free_fall();
        let outcome = s.set_height(100.0);
        assert!(outcome.is_applied());
        assert!((s.initial().height - 6.4).abs() < 1e-9);
        let ball = s.ball().expect("ball");
        assert!((ball.top() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_velocity_rescales_projectile() {
        let mut s = projectile();
        s.set_velocity(5.0);
        assert!((s.initial().velocity_x - 5.0).abs() < f64::EPSILON);
        let expected = s.config().pixels_per_meter(s.initial());
        assert!((s.pixels_per_meter() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_edits_rejected_while_running() {
        let mut s = projectile();
        s.start();
        assert!(!s.set_height(3.0).is_applied());
        assert!(!s.set_velocity(3.0).is_applied());
        assert!((s.initial().height - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edit_while_stopped_returns_to_idle() {
        let mut s = free_fall();
        s.start();
        s.tick();
        s.stop();
        let outcome = s.set_height(3.0);
        assert_eq!(
            outcome,
            Outcome::Applied {
                from: RunState::Stopped,
                to: RunState::Idle
            }
        );
    }

    #[test]
    fn test_handle_input_dispatch() {
        let mut s = free_fall();
        let effect = s.handle_input(UserInput::Command(Command::Start));
        assert!(matches!(effect, InputEffect::Transition(o) if o.is_applied()));
        let effect = s.handle_input(UserInput::Pointer(PointerEvent::Up));
        assert!(matches!(effect, InputEffect::Pointer(DragUpdate::Rejected { .. })));
        let effect = s.handle_input(UserInput::Command(Command::Reset));
        assert!(matches!(effect, InputEffect::Transition(o) if o.is_applied()));
        assert_eq!(s.state(), RunState::Idle);
    }

    #[test]
    fn test_pure_tick_matches_in_place_tick() {
        let mut a = projectile();
        a.start();
        let b = a.clone();

        let frame_a = a.tick();
        let (b, frame_b) = tick(b);
        assert_eq!(a, b);
        assert_eq!(frame_a, frame_b);
    }

    #[test]
    fn test_theory_uses_initial_height() {
        let mut s = free_fall();
        s.start();
        for _ in 0..50 {
            s.tick();
        }
        let theory = s.theory();
        assert!((theory.velocity - (2.0 * 10.0 * 5.8_f64).sqrt()).abs() < 1e-12);
        assert!((theory.time - (2.0 * 5.8_f64 / 10.0).sqrt()).abs() < 1e-12);
    }
}
