//! Horizontal camera follow for far-travelling bodies.

use serde::{Deserialize, Serialize};

/// Keeps the body pinned at a fixed fraction of the viewport width once it
/// passes that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraController {
    enabled: bool,
    threshold: f64,
    offset_x: f64,
}

impl CameraController {
    /// Create a controller. `follow_fraction` is relative to `viewport_width`.
    #[must_use]
    pub fn new(enabled: bool, viewport_width: f64, follow_fraction: f64) -> Self {
        Self {
            enabled,
            threshold: viewport_width * follow_fraction,
            offset_x: 0.0,
        }
    }

    /// Recompute the offset for a body at `body_x`. Returns the new offset.
    pub fn update(&mut self, body_x: f64) -> f64 {
        if self.enabled && body_x > self.threshold {
            self.offset_x = (body_x - self.threshold).max(0.0);
        }
        self.offset_x
    }

    /// Back to the origin.
    pub fn reset(&mut self) {
        self.offset_x = 0.0;
    }

    /// Current horizontal offset (px).
    #[must_use]
    pub const fn offset_x(&self) -> f64 {
        self.offset_x
    }

    /// Whether following is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}
