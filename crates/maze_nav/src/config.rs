//! Navigator run configuration

use crate::error::{NavError, NavResult};
use serde::{Deserialize, Serialize};

/// Movement parameters and behaviour flags for one traversal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Pause between steps
    #[serde(alias = "animatePath")]
    pub animate_path: bool,
    /// Render the grid after every step
    #[serde(alias = "showPath")]
    pub show_path: bool,
    /// Initial heading in degrees
    pub heading: i32,
    /// Wheel speed for straight moves (0-1000 scale)
    #[serde(alias = "driveSpeed")]
    pub drive_speed: u32,
    /// Wheel speed for turns in place (0-1000 scale)
    #[serde(alias = "turnSpeed")]
    pub turn_speed: u32,
    /// Physical size of one cell in centimeters
    #[serde(alias = "blockSizeCm", alias = "block_size")]
    pub block_size_cm: f32,
    /// Step ceiling; `None` means width x height of the course
    #[serde(alias = "maxSteps")]
    pub max_steps: Option<usize>,
    /// Length of the animation pause in milliseconds
    #[serde(alias = "animateDelayMs")]
    pub animate_delay_ms: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            animate_path: false,
            show_path: true,
            heading: 0,
            drive_speed: 500,
            turn_speed: 300,
            block_size_cm: 1.0,
            max_steps: None,
            animate_delay_ms: 1000,
        }
    }
}

impl NavConfig {
    pub fn with_animate_path(mut self, animate: bool) -> Self {
        self.animate_path = animate;
        self
    }

    pub fn with_show_path(mut self, show: bool) -> Self {
        self.show_path = show;
        self
    }

    pub fn with_heading(mut self, degrees: i32) -> Self {
        self.heading = degrees;
        self
    }

    pub fn with_drive_speed(mut self, speed: u32) -> Self {
        self.drive_speed = speed;
        self
    }

    pub fn with_turn_speed(mut self, speed: u32) -> Self {
        self.turn_speed = speed;
        self
    }

    pub fn with_block_size(mut self, block_size_cm: f32) -> Self {
        self.block_size_cm = block_size_cm;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Step ceiling for a course of the given size
    pub fn step_limit(&self, width: usize, height: usize) -> usize {
        self.max_steps.unwrap_or(width * height)
    }

    /// Reject settings the drive cannot execute
    pub fn validate(&self) -> NavResult<()> {
        if self.drive_speed == 0 {
            return Err(NavError::InvalidConfig("drive_speed must be positive".into()));
        }
        if self.turn_speed == 0 {
            return Err(NavError::InvalidConfig("turn_speed must be positive".into()));
        }
        if !(self.block_size_cm.is_finite() && self.block_size_cm > 0.0) {
            return Err(NavError::InvalidConfig(format!(
                "block_size_cm must be positive, got {}",
                self.block_size_cm
            )));
        }
        Ok(())
    }
}
