//! One complete run: mount, load, navigate, report, unmount

use crate::boot_config::{ConfigError, RunnerConfig};
use crate::console::ConsoleRenderer;
use crate::drive::TimedDrive;
use crate::storage::{MountGuard, NoMount, ShellMount, StorageError, StorageMount};
use maze_grid::{Course, GridError};
use maze_nav::{
    CancelToken, DriveActuator, NavError, Navigator, RecordingActuator, RunReport, StepObserver,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("course error: {0}")]
    Grid(#[from] GridError),

    #[error("navigation error: {0}")]
    Nav(#[from] NavError),

    #[error("failed to write report {path:?}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SessionError {
    /// Grid as it was when navigation stopped, if the run got stuck
    pub fn snapshot(&self) -> Option<&Course> {
        match self {
            Self::Nav(e) => e.snapshot(),
            _ => None,
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Orchestrates a run from a [`RunnerConfig`]
pub struct Session;

impl Session {
    /// Run with the console renderer and the configured storage
    pub fn run(config: &RunnerConfig, cancel: CancelToken) -> SessionResult<RunReport> {
        let mount: Box<dyn StorageMount> = if config.storage.enabled {
            Box::new(ShellMount::new(config.storage.clone()))
        } else {
            Box::new(NoMount)
        };
        Self::run_with(config, cancel, mount, &mut ConsoleRenderer::stdout())
    }

    /// Run with an explicit storage and observer
    pub fn run_with(
        config: &RunnerConfig,
        cancel: CancelToken,
        mount: Box<dyn StorageMount>,
        observer: &mut dyn StepObserver,
    ) -> SessionResult<RunReport> {
        let guard = MountGuard::new(mount)?;

        let path = config.course_path().ok_or(ConfigError::MissingCourse)?;
        let mut course = Course::load(&path)?;
        apply_overrides(&mut course, config)?;

        let report = if config.dry_run {
            let mut drive = RecordingActuator::new();
            let report = navigate(&mut course, &mut drive, config, cancel, observer)?;
            log::info!("Dry run issued {} drive commands", drive.commands().len());
            report
        } else {
            let mut drive = TimedDrive::new(config.drive.clone());
            let report = navigate(&mut course, &mut drive, config, cancel, observer)?;
            log::info!(
                "Drove {:.1} cm in {:.1}s",
                drive.distance_cm(),
                drive.elapsed().as_secs_f32()
            );
            report
        };

        if let Some(report_path) = &config.report {
            write_report(report_path, &report)?;
        }

        guard.release()?;
        Ok(report)
    }
}

fn apply_overrides(course: &mut Course, config: &RunnerConfig) -> SessionResult<()> {
    if let Some([x, y]) = config.course.start {
        course.set_start(x, y)?;
        log::info!("Start moved to {}, {}", x, y);
    }
    if let Some([x, y]) = config.course.finish {
        course.set_finish(x, y)?;
        log::info!("Finish moved to {}, {}", x, y);
    }
    Ok(())
}

fn navigate<A: DriveActuator>(
    course: &mut Course,
    drive: A,
    config: &RunnerConfig,
    cancel: CancelToken,
    observer: &mut dyn StepObserver,
) -> SessionResult<RunReport> {
    let mut nav = Navigator::new(course, drive, config.navigator.clone())?.with_cancel(cancel);
    Ok(nav.run(observer)?)
}

/// Write a run report as pretty JSON
pub fn write_report(path: &Path, report: &RunReport) -> SessionResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|source| SessionError::Report {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Run report written to {:?}", path);
    Ok(())
}
