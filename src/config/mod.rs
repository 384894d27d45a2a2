//! Scenario configuration with YAML loading and validation.
//!
//! A configuration is immutable for the lifetime of a scenario instance.
//! Every scenario starts from a preset ([`SimulationConfig::free_fall`],
//! [`SimulationConfig::projectile`]); YAML files name the preset with
//! `scenario:` and override only the fields they mention.
//!
//! ```yaml
//! scenario: projectile
//! initial:
//!   height: 15.0
//!   velocity_x: 12.0
//! sampling:
//!   capacity: 300
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::engine::{CollisionPolicy, ContactParams, Vec2};
use crate::error::{SimError, SimResult};

/// Which demonstration a scenario instance runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Vertical drop with bouncing.
    #[default]
    FreeFall,
    /// Horizontal launch that sticks on landing.
    Projectile,
}

/// Top-level scenario configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Demonstration variant.
    pub scenario: ScenarioKind,

    /// Raster surface size.
    #[validate(nested)]
    pub viewport: Viewport,

    /// World-to-pixel scale.
    pub scale: ScaleMode,

    /// Collision rule set.
    pub policy: CollisionPolicy,

    /// Simulated body.
    #[validate(nested)]
    pub body: BodyConfig,

    /// Ground slab.
    #[validate(nested)]
    pub ground: GroundConfig,

    /// Integrator and settling constants.
    #[validate(nested)]
    pub physics: PhysicsConfig,

    /// Pointer interaction.
    #[validate(nested)]
    pub interaction: InteractionConfig,

    /// Chart sampling.
    #[validate(nested)]
    pub sampling: SamplingConfig,

    /// Horizontal camera follow.
    #[validate(nested)]
    pub camera: CameraConfig,

    /// Allowed ranges for user-entered parameters.
    #[validate(nested)]
    pub inputs: InputRanges,

    /// Initial conditions applied on start and reset.
    #[validate(nested)]
    pub initial: InitialConditions,
}

/// Raster surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Viewport {
    /// Width (px).
    #[validate(range(min = 1.0))]
    pub width: f64,
    /// Height (px).
    #[validate(range(min = 1.0))]
    pub height: f64,
}

/// How meters map to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScaleMode {
    /// Constant scale.
    Fixed {
        /// Pixels per meter.
        pixels_per_meter: f64,
    },
    /// Derived from the initial height and velocity so the whole trajectory fits.
    FitToRange,
}

/// Simulated body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BodyConfig {
    /// Radius (px).
    #[validate(range(min = 0.5))]
    pub radius: f64,
    /// Coefficient of restitution.
    #[validate(range(min = 0.0, max = 1.0))]
    pub restitution: f64,
}

/// Ground slab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GroundConfig {
    /// Thickness (px).
    #[validate(range(min = 1.0))]
    pub thickness: f64,
}

/// Integrator and settling constants, in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PhysicsConfig {
    /// Downward gravitational acceleration (m/s²).
    #[validate(range(min = 0.001))]
    pub gravity: f64,
    /// Fixed timestep (s).
    #[validate(range(min = 0.000_001, max = 1.0))]
    pub dt: f64,
    /// Rebound speed below which a bounce settles (m/s).
    #[validate(range(min = 0.0))]
    pub velocity_cutoff: f64,
    /// Horizontal damping applied when a bounce settles.
    #[validate(range(min = 0.0, max = 1.0))]
    pub friction_factor: f64,
    /// Height below which the body counts as grounded (m).
    #[validate(range(min = 0.0))]
    pub rest_height_epsilon: f64,
}

/// Pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct InteractionConfig {
    /// Extra grab distance beyond the radius (px).
    #[validate(range(min = 0.0))]
    pub hit_test_margin: f64,
}

/// Chart sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SamplingConfig {
    /// Maximum samples kept per series.
    #[validate(range(min = 1))]
    pub capacity: usize,
    /// Minimum simulated time between samples (s).
    #[validate(range(min = 0.0))]
    pub interval: f64,
}

/// Horizontal camera follow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    /// Whether the camera tracks the body.
    pub follow: bool,
    /// Fraction of the viewport width the body is pinned at.
    #[validate(range(min = 0.0, max = 1.0))]
    pub follow_fraction: f64,
}

/// Closed interval for a user-entered parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct InputRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl InputRange {
    /// Create a range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the range. Non-finite inputs map to `min`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.max(self.min).min(self.max)
    }

    /// Whether the value lies inside the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Allowed ranges for user-entered parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct InputRanges {
    /// Initial height (m).
    pub height: InputRange,
    /// Initial horizontal velocity (m/s).
    pub velocity: InputRange,
}

/// Initial conditions applied on start and reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct InitialConditions {
    /// Height of the body's lower edge above the ground (m).
    #[validate(range(min = 0.0))]
    pub height: f64,
    /// Horizontal launch velocity (m/s).
    pub velocity_x: f64,
    /// Launch x coordinate of the body centre (px). Defaults per scenario.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_x: Option<f64>,
}

impl SimulationConfig {
    /// Free-fall preset: bouncing ball on a 600×400 surface at 50 px/m.
    #[must_use]
    pub fn free_fall() -> Self {
        Self {
            scenario: ScenarioKind::FreeFall,
            viewport: Viewport {
                width: 600.0,
                height: 400.0,
            },
            scale: ScaleMode::Fixed {
                pixels_per_meter: 50.0,
            },
            policy: CollisionPolicy::Bounce,
            body: BodyConfig {
                radius: 20.0,
                restitution: 0.75,
            },
            ground: GroundConfig { thickness: 40.0 },
            physics: PhysicsConfig::default(),
            interaction: InteractionConfig {
                hit_test_margin: 10.0,
            },
            sampling: SamplingConfig::default(),
            camera: CameraConfig {
                follow: false,
                follow_fraction: 0.6,
            },
            inputs: InputRanges {
                height: InputRange::new(0.0, 6.4),
                velocity: InputRange::new(-10.0, 10.0),
            },
            initial: InitialConditions {
                height: 5.8,
                velocity_x: 0.0,
                launch_x: None,
            },
        }
    }

    /// Projectile preset: horizontal launch with a following camera.
    #[must_use]
    pub fn projectile() -> Self {
        Self {
            scenario: ScenarioKind::Projectile,
            viewport: Viewport {
                width: 752.0,
                height: 400.0,
            },
            scale: ScaleMode::FitToRange,
            policy: CollisionPolicy::Stick,
            body: BodyConfig {
                radius: 10.0,
                restitution: 0.0,
            },
            ground: GroundConfig { thickness: 20.0 },
            physics: PhysicsConfig::default(),
            interaction: InteractionConfig {
                hit_test_margin: 10.0,
            },
            sampling: SamplingConfig::default(),
            camera: CameraConfig {
                follow: true,
                follow_fraction: 0.6,
            },
            inputs: InputRanges {
                height: InputRange::new(0.0, 50.0),
                velocity: InputRange::new(0.0, 50.0),
            },
            initial: InitialConditions {
                height: 10.0,
                velocity_x: 20.0,
                launch_x: None,
            },
        }
    }

    /// Preset for a scenario kind.
    #[must_use]
    pub fn preset(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::FreeFall => Self::free_fall(),
            ScenarioKind::Projectile => Self::projectile(),
        }
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsing fails, or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML, layered over the named preset.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        let overlay: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let kind = match overlay.get("scenario") {
            Some(value) => serde_yaml::from_value(value.clone())?,
            None => ScenarioKind::default(),
        };

        let mut merged = serde_yaml::to_value(Self::preset(kind))?;
        merge_yaml(&mut merged, overlay);

        let config: Self = serde_yaml::from_value(merged)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> SimResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder starting from a preset.
    #[must_use]
    pub fn builder(kind: ScenarioKind) -> SimulationConfigBuilder {
        SimulationConfigBuilder::new(kind)
    }

    /// Field and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate_all(&self) -> SimResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    fn validate_semantic(&self) -> SimResult<()> {
        if let ScaleMode::Fixed { pixels_per_meter } = self.scale {
            if !(pixels_per_meter.is_finite() && pixels_per_meter > 0.0) {
                return Err(SimError::config("pixels_per_meter must be positive"));
            }
        }

        for (name, range) in [
            ("height", self.inputs.height),
            ("velocity", self.inputs.velocity),
        ] {
            if !(range.min.is_finite() && range.max.is_finite()) || range.min > range.max {
                return Err(SimError::config(format!(
                    "input range for {name} is empty: [{}, {}]",
                    range.min, range.max
                )));
            }
        }
        if self.inputs.height.min < 0.0 {
            return Err(SimError::config("height range must not go below the ground"));
        }

        if 2.0 * self.body.radius + self.ground.thickness >= self.viewport.height {
            return Err(SimError::config(format!(
                "body (radius {}) and ground ({} px) do not fit a {} px tall viewport",
                self.body.radius, self.ground.thickness, self.viewport.height
            )));
        }
        if 2.0 * self.body.radius >= self.viewport.width {
            return Err(SimError::config("body is wider than the viewport"));
        }

        if !self.inputs.height.contains(self.initial.height) {
            return Err(SimError::config(format!(
                "initial height {} outside [{}, {}]",
                self.initial.height, self.inputs.height.min, self.inputs.height.max
            )));
        }
        if !self.inputs.velocity.contains(self.initial.velocity_x) {
            return Err(SimError::config(format!(
                "initial velocity {} outside [{}, {}]",
                self.initial.velocity_x, self.inputs.velocity.min, self.inputs.velocity.max
            )));
        }

        Ok(())
    }

    /// Y coordinate of the ground's upper edge (px).
    #[must_use]
    pub fn ground_top(&self) -> f64 {
        self.viewport.height - self.ground.thickness
    }

    /// Gravity vector in m/s² (positive y is down).
    #[must_use]
    pub fn gravity_vector(&self) -> Vec2 {
        Vec2::new(0.0, self.physics.gravity)
    }

    /// Scale factor for the given initial conditions (px/m).
    #[must_use]
    pub fn pixels_per_meter(&self, initial: &InitialConditions) -> f64 {
        match self.scale {
            ScaleMode::Fixed { pixels_per_meter } => pixels_per_meter,
            ScaleMode::FitToRange => {
                let range = self.theoretical_range(initial);
                let required_width = (2.0 * initial.velocity_x.abs())
                    .max(range * 1.1)
                    .max(1.0);
                let required_height = (initial.height * 1.2).max(1.0);
                (self.viewport.width / required_width).min(self.viewport.height / required_height)
            }
        }
    }

    /// Closed-form horizontal range `v0 * sqrt(2h/g)` (m).
    #[must_use]
    pub fn theoretical_range(&self, initial: &InitialConditions) -> f64 {
        initial.velocity_x.abs() * (2.0 * initial.height.max(0.0) / self.physics.gravity).sqrt()
    }

    /// Default launch x coordinate of the body centre (px).
    #[must_use]
    pub fn launch_x(&self, initial: &InitialConditions) -> f64 {
        initial.launch_x.unwrap_or(match self.scenario {
            ScenarioKind::FreeFall => self.viewport.width / 2.0,
            ScenarioKind::Projectile => 2.0 * self.body.radius,
        })
    }

    /// Ground slab width (px). Wide enough for the full trajectory when
    /// the camera follows the body.
    #[must_use]
    pub fn ground_width(&self, pixels_per_meter: f64, initial: &InitialConditions) -> f64 {
        if self.camera.follow {
            let trajectory = self.theoretical_range(initial) * pixels_per_meter * 2.0;
            (self.viewport.width * 2.0).max(trajectory)
        } else {
            self.viewport.width
        }
    }

    /// Largest height whose body still fits above the ground (m).
    #[must_use]
    pub fn max_fitting_height(&self, pixels_per_meter: f64) -> f64 {
        match self.scale {
            ScaleMode::Fixed { .. } => {
                ((self.ground_top() - 2.0 * self.body.radius) / pixels_per_meter).max(0.0)
            }
            ScaleMode::FitToRange => f64::INFINITY,
        }
    }

    /// Clamp a requested initial height to the configured range and to
    /// what fits the viewport.
    #[must_use]
    pub fn clamp_height(&self, height: f64, pixels_per_meter: f64) -> f64 {
        let fitted = self.inputs.height.clamp(height);
        fitted.min(self.max_fitting_height(pixels_per_meter).max(self.inputs.height.min))
    }

    /// Clamp a requested initial horizontal velocity.
    #[must_use]
    pub fn clamp_velocity(&self, velocity: f64) -> f64 {
        self.inputs.velocity.clamp(velocity)
    }

    /// Contact parameters in pixel space.
    #[must_use]
    pub fn contact_params(&self, pixels_per_meter: f64) -> ContactParams {
        ContactParams {
            velocity_cutoff: self.physics.velocity_cutoff * pixels_per_meter,
            friction_factor: self.physics.friction_factor,
            wall_left: 0.0,
            wall_right: self.viewport.width,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::free_fall()
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 10.0,
            dt: 1.0 / 60.0,
            velocity_cutoff: 0.5,
            friction_factor: 0.95,
            rest_height_epsilon: 1e-3,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            capacity: 150,
            interval: 1.0 / 60.0,
        }
    }
}

/// Recursively overlay `overlay` onto `base`; mappings merge, everything
/// else replaces.
fn merge_yaml(base: &mut serde_yaml::Value, overlay: serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base_map), serde_yaml::Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_yaml(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Clone)]
pub struct SimulationConfigBuilder {
    config: SimulationConfig,
}

impl SimulationConfigBuilder {
    /// Start from a preset.
    #[must_use]
    pub fn new(kind: ScenarioKind) -> Self {
        Self {
            config: SimulationConfig::preset(kind),
        }
    }

    /// Set the initial height (m).
    #[must_use]
    pub const fn initial_height(mut self, height: f64) -> Self {
        self.config.initial.height = height;
        self
    }

    /// Set the initial horizontal velocity (m/s).
    #[must_use]
    pub const fn initial_velocity(mut self, velocity_x: f64) -> Self {
        self.config.initial.velocity_x = velocity_x;
        self
    }

    /// Set the allowed height range (m).
    #[must_use]
    pub const fn height_range(mut self, min: f64, max: f64) -> Self {
        self.config.inputs.height = InputRange::new(min, max);
        self
    }

    /// Set the allowed velocity range (m/s).
    #[must_use]
    pub const fn velocity_range(mut self, min: f64, max: f64) -> Self {
        self.config.inputs.velocity = InputRange::new(min, max);
        self
    }

    /// Use a fixed scale (px/m).
    #[must_use]
    pub const fn pixels_per_meter(mut self, pixels_per_meter: f64) -> Self {
        self.config.scale = ScaleMode::Fixed { pixels_per_meter };
        self
    }

    /// Set the coefficient of restitution.
    #[must_use]
    pub const fn restitution(mut self, restitution: f64) -> Self {
        self.config.body.restitution = restitution;
        self
    }

    /// Set gravity (m/s²).
    #[must_use]
    pub const fn gravity(mut self, gravity: f64) -> Self {
        self.config.physics.gravity = gravity;
        self
    }

    /// Set the fixed timestep (s).
    #[must_use]
    pub const fn timestep(mut self, dt: f64) -> Self {
        self.config.physics.dt = dt;
        self
    }

    /// Set the sample capacity per series.
    #[must_use]
    pub const fn sample_capacity(mut self, capacity: usize) -> Self {
        self.config.sampling.capacity = capacity;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> SimulationConfig {
        self.config
    }
}
