//! # maze_grid - Maze Grid Model
//!
//! Data side of the maze navigator:
//! - CellKind: what a single cell holds
//! - Direction / DirectionSet: the four cardinal moves
//! - Grid: flat, bounds-checked cell storage
//! - Course: a grid plus its start and finish markers, loaded from text
//! - ObstacleOracle: one-cell-radius wall/visited queries
//! - render: text output of a grid

pub mod cell;
pub mod course;
pub mod direction;
pub mod error;
pub mod grid;
pub mod oracle;
pub mod render;

pub use cell::CellKind;
pub use course::Course;
pub use direction::{Axis, Direction, DirectionSet};
pub use error::{GridError, GridResult};
pub use grid::{Grid, GridPos};
pub use oracle::ObstacleOracle;

pub mod prelude {
    pub use crate::cell::CellKind;
    pub use crate::course::Course;
    pub use crate::direction::{Axis, Direction, DirectionSet};
    pub use crate::error::{GridError, GridResult};
    pub use crate::grid::{Grid, GridPos};
    pub use crate::oracle::ObstacleOracle;
}
