//! Drive actuator contract
//!
//! The navigator issues at most one turn and exactly one drive per accepted
//! move. Both calls block until the robot has finished the motion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Drive subsystem errors
#[derive(Debug, Error)]
pub enum DriveError {
    /// Speed outside what the drive can execute
    #[error("invalid speed: {0}")]
    InvalidSpeed(u32),
    /// Connection to the drive controller was lost
    #[error("drive controller disconnected")]
    Disconnected,
    /// Any other controller fault
    #[error("drive hardware fault: {0}")]
    Hardware(String),
}

/// Physical motion executor
pub trait DriveActuator {
    /// Rotate in place by `delta_degrees` (positive = counter-clockwise)
    fn turn(&mut self, delta_degrees: i32, turn_speed: u32) -> Result<(), DriveError>;

    /// Drive straight ahead for `distance_cm` (negative = reverse)
    fn drive(&mut self, distance_cm: f32, drive_speed: u32) -> Result<(), DriveError>;
}

impl<A: DriveActuator + ?Sized> DriveActuator for &mut A {
    fn turn(&mut self, delta_degrees: i32, turn_speed: u32) -> Result<(), DriveError> {
        (**self).turn(delta_degrees, turn_speed)
    }

    fn drive(&mut self, distance_cm: f32, drive_speed: u32) -> Result<(), DriveError> {
        (**self).drive(distance_cm, drive_speed)
    }
}

impl<A: DriveActuator + ?Sized> DriveActuator for Box<A> {
    fn turn(&mut self, delta_degrees: i32, turn_speed: u32) -> Result<(), DriveError> {
        (**self).turn(delta_degrees, turn_speed)
    }

    fn drive(&mut self, distance_cm: f32, drive_speed: u32) -> Result<(), DriveError> {
        (**self).drive(distance_cm, drive_speed)
    }
}

/// One command issued to an actuator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DriveCommand {
    Turn { degrees: i32, speed: u32 },
    Drive { distance_cm: f32, speed: u32 },
}

/// Actuator that only records what it was asked to do
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    commands: Vec<DriveCommand>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in the order they were issued
    pub fn commands(&self) -> &[DriveCommand] {
        &self.commands
    }

    pub fn turns(&self) -> impl Iterator<Item = i32> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DriveCommand::Turn { degrees, .. } => Some(*degrees),
            DriveCommand::Drive { .. } => None,
        })
    }

    pub fn drive_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DriveCommand::Drive { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl DriveActuator for RecordingActuator {
    fn turn(&mut self, delta_degrees: i32, turn_speed: u32) -> Result<(), DriveError> {
        self.commands.push(DriveCommand::Turn {
            degrees: delta_degrees,
            speed: turn_speed,
        });
        Ok(())
    }

    fn drive(&mut self, distance_cm: f32, drive_speed: u32) -> Result<(), DriveError> {
        self.commands.push(DriveCommand::Drive {
            distance_cm,
            speed: drive_speed,
        });
        Ok(())
    }
}
