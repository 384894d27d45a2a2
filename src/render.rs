//! Platform-agnostic render commands for kinematics scenes.
//!
//! Turns a [`FrameSnapshot`] into a flat command list so any raster
//! backend (canvas, terminal, image) can paint the same frame.

use serde::{Deserialize, Serialize};

use crate::engine::{BodyRole, BodyShape};
use crate::host::Renderer;
use crate::scenario::FrameSnapshot;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Create new color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Canvas background.
    pub const SKY: Self = Self::rgb(240, 248, 255);
    /// Ground slab.
    pub const GROUND: Self = Self::rgb(102, 102, 102);
    /// Ball at rest or in flight.
    pub const BALL: Self = Self::rgb(255, 68, 68);
    /// Ball while dragged.
    pub const BALL_DRAGGING: Self = Self::rgb(0, 120, 255);
    /// Hover outline.
    pub const HOVER: Self = Self::rgb(255, 165, 0);
}

/// Platform-agnostic render command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Fill the whole surface.
    Clear {
        /// Fill color.
        color: Color,
    },
    /// Shift everything drawn afterwards by `-offset_x`.
    Translate {
        /// Horizontal camera offset (px).
        offset_x: f64,
    },
    /// Axis-aligned filled rectangle.
    FillRect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// Fill color.
        color: Color,
    },
    /// Circle.
    DrawCircle {
        /// Centre x.
        x: f64,
        /// Centre y.
        y: f64,
        /// Radius.
        radius: f64,
        /// Color.
        color: Color,
        /// Filled or outline.
        filled: bool,
    },
    /// Undo the last translate.
    Restore,
}

/// Generate render commands for one frame.
#[must_use]
pub fn render_frame(snapshot: &FrameSnapshot) -> Vec<RenderCommand> {
    let mut commands = vec![
        RenderCommand::Clear { color: Color::SKY },
        RenderCommand::Translate {
            offset_x: snapshot.camera_offset_x,
        },
    ];

    for body in &snapshot.bodies {
        match (body.role, body.shape) {
            (_, BodyShape::Slab { width, thickness }) => {
                commands.push(RenderCommand::FillRect {
                    x: body.position.x - width / 2.0,
                    y: body.position.y - thickness / 2.0,
                    width,
                    height: thickness,
                    color: Color::GROUND,
                });
            }
            (role, BodyShape::Circle { radius }) => {
                let color = if role == BodyRole::Ball && snapshot.dragging {
                    Color::BALL_DRAGGING
                } else {
                    Color::BALL
                };
                commands.push(RenderCommand::DrawCircle {
                    x: body.position.x,
                    y: body.position.y,
                    radius,
                    color,
                    filled: true,
                });
                if snapshot.hovering && !snapshot.dragging {
                    commands.push(RenderCommand::DrawCircle {
                        x: body.position.x,
                        y: body.position.y,
                        radius: radius + 2.0,
                        color: Color::HOVER,
                        filled: false,
                    });
                }
            }
        }
    }

    commands.push(RenderCommand::Restore);
    commands
}

/// [`Renderer`] that keeps the command list of the last frame.
#[derive(Debug, Clone, Default)]
pub struct CommandRenderer {
    commands: Vec<RenderCommand>,
    frames: u64,
}

impl CommandRenderer {
    /// Create an empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the last frame.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Frames rendered so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for CommandRenderer {
    fn render(&mut self, snapshot: &FrameSnapshot) {
        self.commands = render_frame(snapshot);
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{PointerEvent, Scenario, ScenarioKind};

    fn free_fall() -> Scenario {
        Scenario::from_kind(ScenarioKind::FreeFall).expect("preset")
    }

    #[test]
    fn test_color_constants() {
        assert_eq!(Color::rgb(1, 2, 3), Color::new(1, 2, 3, 255));
        assert_ne!(Color::BALL, Color::BALL_DRAGGING);
    }

    #[test]
    fn test_frame_layout() {
        let commands = render_frame(&free_fall().snapshot());
        assert_eq!(commands.first(), Some(&RenderCommand::Clear { color: Color::SKY }));
        assert_eq!(commands.last(), Some(&RenderCommand::Restore));
        assert!(commands.contains(&RenderCommand::FillRect {
            x: 0.0,
            y: 360.0,
            width: 600.0,
            height: 40.0,
            color: Color::GROUND,
        }));
        assert!(commands.iter().any(|c| matches!(
            c,
            RenderCommand::DrawCircle { color, filled: true, .. } if *color == Color::BALL
        )));
    }

    #[test]
    fn test_dragging_recolors_ball() {
        let mut scenario = free_fall();
        let at = scenario.ball().expect("ball").position;
        scenario.pointer(PointerEvent::Down { at });
        let commands = render_frame(&scenario.snapshot());
        assert!(commands.iter().any(|c| matches!(
            c,
            RenderCommand::DrawCircle { color, .. } if *color == Color::BALL_DRAGGING
        )));
    }

    #[test]
    fn test_hover_outline() {
        let mut scenario = free_fall();
        let at = scenario.ball().expect("ball").position;
        scenario.pointer(PointerEvent::Move { at });
        let commands = render_frame(&scenario.snapshot());
        assert!(commands.iter().any(|c| matches!(
            c,
            RenderCommand::DrawCircle { filled: false, color, .. } if *color == Color::HOVER
        )));
    }

    #[test]
    fn test_camera_translate() {
        let mut scenario = Scenario::from_kind(ScenarioKind::Projectile).expect("preset");
        scenario.start();
        for _ in 0..80 {
            scenario.tick();
        }
        let offset = scenario.camera_offset_x();
        assert!(offset > 0.0);
        let commands = render_frame(&scenario.snapshot());
        assert_eq!(commands[1], RenderCommand::Translate { offset_x: offset });
    }

    #[test]
    fn test_command_renderer_keeps_last_frame() {
        let mut renderer = CommandRenderer::new();
        let snapshot = free_fall().snapshot();
        renderer.render(&snapshot);
        renderer.render(&snapshot);
        assert_eq!(renderer.frames(), 2);
        assert_eq!(renderer.commands(), render_frame(&snapshot).as_slice());
    }

    #[test]
    fn test_commands_serialize() {
        let json = serde_json::to_string(&RenderCommand::Restore).expect("serialize");
        assert_eq!(json, r#"{"op":"restore"}"#);
    }
}
