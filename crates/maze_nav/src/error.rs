//! Navigation errors

use crate::actuator::DriveError;
use maze_grid::{Course, GridError, GridPos};
use std::fmt;
use thiserror::Error;

/// Why a run ended without reaching the finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StuckReason {
    /// The step ceiling was reached
    StepLimit(usize),
    /// No decision rule produced a move from the current cell
    NoMove,
}

impl fmt::Display for StuckReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepLimit(limit) => write!(f, "step limit of {} reached", limit),
            Self::NoMove => write!(f, "no eligible move"),
        }
    }
}

/// Navigation errors
#[derive(Debug, Error)]
pub enum NavError {
    /// The course has no start cell
    #[error("course has no start cell")]
    MissingStart,

    /// The course has no finish
    #[error("course has no finish")]
    MissingFinish,

    /// Run aborted without reaching the finish
    #[error("stuck at ({position}) after {steps} steps: {reason}")]
    Stuck {
        reason: StuckReason,
        steps: usize,
        position: GridPos,
        /// Grid as it was when the run stopped
        snapshot: Box<Course>,
    },

    /// Cancellation was requested
    #[error("cancelled after {steps} steps")]
    Cancelled { steps: usize },

    #[error("drive error: {0}")]
    Drive(#[from] DriveError),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NavError {
    /// Last grid state, for errors that carry one
    pub fn snapshot(&self) -> Option<&Course> {
        match self {
            Self::Stuck { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }
}

/// Result type for navigation
pub type NavResult<T> = Result<T, NavError>;
