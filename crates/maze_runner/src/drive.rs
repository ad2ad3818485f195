//! Timed open-loop drive
//!
//! The base has no odometry feedback: a move is a wheel speed held for a
//! computed time. Speeds use the controller's 0-1000 scale, which is half
//! that in mm/s at the wheels.

use maze_nav::{DriveActuator, DriveError};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::time::Duration;

/// Highest speed on the controller scale
pub const MAX_SPEED: u32 = 1000;

/// Drive geometry and timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Distance between the two drive wheels
    pub wheel_base_mm: f32,
    /// Sleep for the computed duration of every command
    pub simulate_timing: bool,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            wheel_base_mm: 258.0,
            simulate_timing: true,
        }
    }
}

/// Wheel speed in mm/s for a controller speed
pub fn wheel_speed_mm_s(speed: u32) -> Result<f32, DriveError> {
    if speed == 0 || speed > MAX_SPEED {
        return Err(DriveError::InvalidSpeed(speed));
    }
    Ok(speed as f32 / 2.0)
}

/// Actuator that converts commands into timed wheel motions
#[derive(Debug, Clone, Default)]
pub struct TimedDrive {
    config: DriveConfig,
    elapsed: Duration,
    distance_cm: f32,
}

impl TimedDrive {
    pub fn new(config: DriveConfig) -> Self {
        Self {
            config,
            elapsed: Duration::ZERO,
            distance_cm: 0.0,
        }
    }

    /// Time to cover `distance_cm` in either direction
    pub fn drive_duration(&self, distance_cm: f32, speed: u32) -> Result<Duration, DriveError> {
        let mm_s = wheel_speed_mm_s(speed)?;
        Ok(Duration::from_secs_f32(10.0 * distance_cm.abs() / mm_s))
    }

    /// Time to spin in place by `degrees`
    pub fn turn_duration(&self, degrees: i32, speed: u32) -> Result<Duration, DriveError> {
        let mm_s = wheel_speed_mm_s(speed)?;
        let arc_mm = PI * self.config.wheel_base_mm * degrees.unsigned_abs() as f32 / 360.0;
        Ok(Duration::from_secs_f32(arc_mm / mm_s))
    }

    /// Motion time issued so far
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Net straight-line distance driven
    pub fn distance_cm(&self) -> f32 {
        self.distance_cm
    }

    fn hold(&mut self, duration: Duration) {
        self.elapsed += duration;
        if self.config.simulate_timing {
            std::thread::sleep(duration);
        }
    }
}

impl DriveActuator for TimedDrive {
    fn turn(&mut self, delta_degrees: i32, turn_speed: u32) -> Result<(), DriveError> {
        let duration = self.turn_duration(delta_degrees, turn_speed)?;
        log::debug!(
            "Spin {} deg at {} mm/s for {:.2}s",
            delta_degrees,
            turn_speed / 2,
            duration.as_secs_f32()
        );
        self.hold(duration);
        Ok(())
    }

    fn drive(&mut self, distance_cm: f32, drive_speed: u32) -> Result<(), DriveError> {
        let duration = self.drive_duration(distance_cm, drive_speed)?;
        let reverse = distance_cm < 0.0;
        log::debug!(
            "Drive {} {:.1} cm at {} mm/s for {:.2}s",
            if reverse { "back" } else { "forward" },
            distance_cm.abs(),
            drive_speed / 2,
            duration.as_secs_f32()
        );
        self.distance_cm += distance_cm;
        self.hold(duration);
        Ok(())
    }
}
