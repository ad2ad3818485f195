//! Grid and course errors

use crate::cell::CellKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the grid model and the course loader
#[derive(Debug, Error)]
pub enum GridError {
    /// Coordinate outside the grid extents
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A mutation that would break cell monotonicity
    #[error("cell ({x}, {y}) cannot change from {from:?} to {to:?}")]
    InvalidTransition {
        x: usize,
        y: usize,
        from: CellKind,
        to: CellKind,
    },

    /// Course file could not be read
    #[error("cannot read course {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Course text has no rows
    #[error("course is empty")]
    EmptyCourse,
}

impl GridError {
    /// Whether this error comes from reading the course source
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::EmptyCourse)
    }
}

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;
