//! Maze Nav - Greedy Local Maze Navigator
//!
//! Drives a robot cell by cell from the start of a [`Course`] to its finish,
//! looking only at the four neighbouring cells at every step.
//!
//! # Features
//!
//! - Greedy axis-first decision cascade with dead-end escape and wall following
//! - Visited-cell marking so loops are not re-entered
//! - Step ceiling and external cancellation so every run terminates
//! - Pluggable [`DriveActuator`] for the physical turn + drive commands
//!
//! # Example
//!
//! ```
//! use maze_nav::prelude::*;
//!
//! let mut course = Course::parse("s..f\n").unwrap();
//! let mut drive = RecordingActuator::new();
//! let mut nav = Navigator::new(&mut course, &mut drive, NavConfig::default().with_show_path(false)).unwrap();
//!
//! let report = nav.run(&mut NoopObserver).unwrap();
//! assert_eq!(report.moves, 3);
//! ```
//!
//! [`Course`]: maze_grid::Course

pub mod actuator;
pub mod cancel;
pub mod config;
pub mod error;
pub mod navigator;
pub mod policy;

pub use maze_grid;

pub mod prelude {
    pub use crate::actuator::{DriveActuator, DriveCommand, DriveError, RecordingActuator};
    pub use crate::cancel::CancelToken;
    pub use crate::config::NavConfig;
    pub use crate::error::{NavError, NavResult, StuckReason};
    pub use crate::navigator::{
        Navigator, NavigatorState, NoopObserver, RunReport, RunStatus, StepObserver,
        StepOutcome,
    };
    pub use crate::policy::{decide, Decision, Rule};
    pub use maze_grid::prelude::*;
}

pub use prelude::*;
