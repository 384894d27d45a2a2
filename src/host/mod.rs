//! Host adapter: the cooperative frame loop around a [`Scenario`].
//!
//! The loop is single-threaded. It asks a [`FrameScheduler`] for the next
//! event, applies inputs synchronously, ticks the scenario on frames and
//! hands the results to the renderer and sinks. A [`CancelToken`] ends the
//! loop before the next event, and every exit path cancels the scheduler's
//! outstanding frame request.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scenario::{
    Command, DataUpdate, FrameSnapshot, SampleBuffer, Scenario, TickFrame, UserInput,
};

/// Shared cancellation flag for a frame loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    /// Create an uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Takes effect before the next event.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Something that happens between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostEvent {
    /// Animation frame: tick and redraw.
    Frame,
    /// User input, applied immediately.
    Input(UserInput),
    /// The host is tearing the scenario down.
    Shutdown,
}

/// Source of host events.
pub trait FrameScheduler {
    /// Block until the next event.
    fn next_event(&mut self) -> HostEvent;

    /// Drop any outstanding frame request.
    fn cancel_pending(&mut self);
}

/// Paints a frame snapshot. Performs no physics.
pub trait Renderer {
    /// Draw one frame.
    fn render(&mut self, snapshot: &FrameSnapshot);
}

/// Displays the sampled series. Owns no simulation state.
pub trait ChartSink {
    /// Redraw both charts.
    fn redraw(&mut self, height: &SampleBuffer, velocity: &SampleBuffer);
}

/// Receives the per-tick data update.
pub trait DataSink {
    /// Observe one update.
    fn publish(&mut self, update: &DataUpdate);
}

impl<F: FnMut(&FrameSnapshot)> Renderer for F {
    fn render(&mut self, snapshot: &FrameSnapshot) {
        self(snapshot);
    }
}

impl<F: FnMut(&DataUpdate)> DataSink for F {
    fn publish(&mut self, update: &DataUpdate) {
        self(update);
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ChartSink for NullSink {
    fn redraw(&mut self, _height: &SampleBuffer, _velocity: &SampleBuffer) {}
}

/// Why [`FrameLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopExit {
    /// The cancel token was set.
    Cancelled,
    /// The scheduler reported shutdown.
    #[default]
    Shutdown,
}

/// Counters from one [`FrameLoop::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoopSummary {
    /// Frames ticked.
    pub frames: u64,
    /// Inputs applied.
    pub inputs: u64,
    /// Exit reason.
    pub exit: LoopExit,
}

/// Runs a scenario until cancelled or shut down.
#[derive(Debug)]
pub struct FrameLoop<S: FrameScheduler, R: Renderer, C: ChartSink, D: DataSink> {
    scenario: Scenario,
    scheduler: S,
    renderer: R,
    chart: C,
    data: D,
    token: CancelToken,
}

impl<S: FrameScheduler, R: Renderer, C: ChartSink, D: DataSink> FrameLoop<S, R, C, D> {
    /// Assemble a loop with a fresh cancel token.
    pub fn new(scenario: Scenario, scheduler: S, renderer: R, chart: C, data: D) -> Self {
        Self {
            scenario,
            scheduler,
            renderer,
            chart,
            data,
            token: CancelToken::new(),
        }
    }

    /// Use an existing token, e.g. one a sink already holds.
    #[must_use]
    pub fn with_token(mut self, token: CancelToken) -> Self {
        self.token = token;
        self
    }

    /// A handle to this loop's token.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Process events until cancellation or shutdown.
    pub fn run(&mut self) -> LoopSummary {
        let mut summary = LoopSummary::default();

        summary.exit = loop {
            if self.token.is_cancelled() {
                break LoopExit::Cancelled;
            }
            match self.scheduler.next_event() {
                HostEvent::Frame => {
                    self.frame();
                    summary.frames += 1;
                }
                HostEvent::Input(input) => {
                    self.scenario.handle_input(input);
                    summary.inputs += 1;
                }
                HostEvent::Shutdown => break LoopExit::Shutdown,
            }
        };

        self.scheduler.cancel_pending();
        debug!(
            frames = summary.frames,
            inputs = summary.inputs,
            exit = ?summary.exit,
            "frame loop finished"
        );
        summary
    }

    /// Tick once and deliver the results.
    pub fn frame(&mut self) -> TickFrame {
        let frame = self.scenario.tick();
        self.renderer.render(&frame.snapshot);
        let samples = self.scenario.samples();
        self.chart.redraw(samples.height(), samples.velocity());
        self.data.publish(&frame.data);
        frame
    }

    /// The scenario.
    pub const fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Mutable scenario access for hosts that bypass the event queue.
    pub fn scenario_mut(&mut self) -> &mut Scenario {
        &mut self.scenario
    }

    /// The scheduler.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The renderer.
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The chart sink.
    pub const fn chart_sink(&self) -> &C {
        &self.chart
    }

    /// The data sink.
    pub const fn data_sink(&self) -> &D {
        &self.data
    }
}

impl<S: FrameScheduler, R: Renderer, C: ChartSink, D: DataSink> Drop for FrameLoop<S, R, C, D> {
    fn drop(&mut self) {
        self.token.cancel();
        self.scheduler.cancel_pending();
    }
}

/// Scheduler replaying a fixed event script, for headless runs and tests.
///
/// Reports shutdown once the script is exhausted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedScheduler {
    events: VecDeque<HostEvent>,
    cancel_count: usize,
}

impl ScriptedScheduler {
    /// Empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an input event.
    #[must_use]
    pub fn input(mut self, input: UserInput) -> Self {
        self.events.push_back(HostEvent::Input(input));
        self
    }

    /// Append a command.
    #[must_use]
    pub fn command(self, command: Command) -> Self {
        self.input(UserInput::Command(command))
    }

    /// Append `count` frames.
    #[must_use]
    pub fn frames(mut self, count: usize) -> Self {
        self.events
            .extend(std::iter::repeat(HostEvent::Frame).take(count));
        self
    }

    /// Events not yet delivered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    /// How many times pending frames were cancelled.
    #[must_use]
    pub const fn cancel_count(&self) -> usize {
        self.cancel_count
    }
}

impl FrameScheduler for ScriptedScheduler {
    fn next_event(&mut self) -> HostEvent {
        self.events.pop_front().unwrap_or(HostEvent::Shutdown)
    }

    fn cancel_pending(&mut self) {
        self.events.retain(|event| *event != HostEvent::Frame);
        self.cancel_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{RunState, ScenarioKind};

    #[derive(Debug, Default)]
    struct CountingRenderer {
        frames: usize,
        last_offset: f64,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, snapshot: &FrameSnapshot) {
            self.frames += 1;
            self.last_offset = snapshot.camera_offset_x;
        }
    }

    #[derive(Debug, Default)]
    struct LastChart {
        height_len: usize,
        velocity_len: usize,
    }

    impl ChartSink for LastChart {
        fn redraw(&mut self, height: &SampleBuffer, velocity: &SampleBuffer) {
            self.height_len = height.len();
            self.velocity_len = velocity.len();
        }
    }

    fn scenario() -> Scenario {
        Scenario::from_kind(ScenarioKind::FreeFall).expect("preset")
    }

    #[test]
    fn test_runs_script_to_shutdown() {
        let scheduler = ScriptedScheduler::new().command(Command::Start).frames(20);
        let mut updates = Vec::new();
        let summary = {
            let mut frame_loop = FrameLoop::new(
                scenario(),
                scheduler,
                CountingRenderer::default(),
                LastChart::default(),
                |u: &DataUpdate| updates.push(u.state),
            );
            let summary = frame_loop.run();
            assert_eq!(frame_loop.renderer().frames, 20);
            assert_eq!(frame_loop.chart_sink().height_len, 20);
            assert_eq!(frame_loop.chart_sink().velocity_len, 20);
            assert_eq!(frame_loop.scheduler().cancel_count(), 1);
            summary
        };

        assert_eq!(summary.frames, 20);
        assert_eq!(summary.inputs, 1);
        assert_eq!(summary.exit, LoopExit::Shutdown);
        assert_eq!(updates.len(), 20);
        assert!(updates.iter().all(|s| *s == RunState::Running));
    }

    #[test]
    fn test_cancel_token_stops_before_next_event() {
        let token = CancelToken::new();
        let sink_token = token.clone();
        let mut seen = 0usize;
        let scheduler = ScriptedScheduler::new().command(Command::Start).frames(100);

        let mut frame_loop = FrameLoop::new(
            scenario(),
            scheduler,
            |_: &FrameSnapshot| {},
            NullSink,
            move |_: &DataUpdate| {
                seen += 1;
                if seen == 5 {
                    sink_token.cancel();
                }
            },
        )
        .with_token(token.clone());

        let summary = frame_loop.run();
        assert_eq!(summary.exit, LoopExit::Cancelled);
        assert_eq!(summary.frames, 5);
        assert_eq!(frame_loop.scheduler().remaining(), 0);
        assert_eq!(frame_loop.scheduler().cancel_count(), 1);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_drop_cancels_token() {
        let token = {
            let frame_loop = FrameLoop::new(
                scenario(),
                ScriptedScheduler::new(),
                |_: &FrameSnapshot| {},
                NullSink,
                |_: &DataUpdate| {},
            );
            frame_loop.cancel_token()
        };
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_inputs_between_frames_apply_synchronously() {
        let scheduler = ScriptedScheduler::new()
            .command(Command::Start)
            .frames(3)
            .command(Command::Stop)
            .frames(3);
        let mut frame_loop = FrameLoop::new(
            scenario(),
            scheduler,
            |_: &FrameSnapshot| {},
            NullSink,
            |_: &DataUpdate| {},
        );
        let summary = frame_loop.run();
        assert_eq!(summary.frames, 6);
        assert_eq!(frame_loop.scenario().state(), RunState::Stopped);
        assert_eq!(frame_loop.scenario().samples().height().len(), 3);
    }

    #[test]
    fn test_single_frame_step() {
        let mut frame_loop = FrameLoop::new(
            scenario(),
            ScriptedScheduler::new(),
            CountingRenderer::default(),
            NullSink,
            |_: &DataUpdate| {},
        );
        frame_loop.scenario_mut().start();
        let frame = frame_loop.frame();
        assert!(frame.stepped);
        assert_eq!(frame_loop.renderer().frames, 1);
        assert!(frame_loop.renderer().last_offset.abs() < f64::EPSILON);
    }
}
