//! Runner Configuration
//!
//! Everything a run needs: which course to load, how the navigator behaves,
//! where the course medium lives and how the drive is timed.
//!
//! # Configuration Sources (later sources win)
//!
//! 1. Config file: `--config PATH`, else `maze_runner.toml` if present
//! 2. Environment variables: `MAZE_FILE`, `MAZE_SHOW_PATH`, `MAZE_ANIMATE`,
//!    `MAZE_DRIVE_SPEED`, `MAZE_TURN_SPEED`, `MAZE_BLOCK_SIZE`, `MAZE_MOUNT`
//! 3. Command line: `--start X,Y`, `--finish X,Y`, `--quiet`, `--animate`,
//!    `--mount`, `--dry-run`, `--report PATH` and the course file as the
//!    first positional argument
//!
//! # Example Config File
//!
//! ```toml
//! dry_run = false
//!
//! [course]
//! file = "/mnt/usercode/course.txt"
//! finish = [4, 0]
//!
//! [navigator]
//! show_path = true
//! drive_speed = 500
//! turn_speed = 300
//! block_size_cm = 30.0
//!
//! [storage]
//! enabled = true
//! device = "/dev/sdb1"
//!
//! [drive]
//! wheel_base_mm = 258.0
//! ```

use crate::drive::DriveConfig;
use crate::storage::StorageConfig;
use maze_nav::NavConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File picked up when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "maze_runner.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("{0} expects a value")]
    MissingValue(String),

    #[error("no course file given")]
    MissingCourse,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which course to load and optional marker overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseConfig {
    pub file: Option<PathBuf>,
    pub start: Option<[usize; 2]>,
    pub finish: Option<[usize; 2]>,
}

/// Complete runner configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub course: CourseConfig,
    pub navigator: NavConfig,
    pub storage: StorageConfig,
    pub drive: DriveConfig,
    /// Record drive commands instead of timing them
    pub dry_run: bool,
    /// Write a JSON run report here
    pub report: Option<PathBuf>,
    /// Config file path (for the summary)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl RunnerConfig {
    /// Load from the process environment and arguments
    pub fn load() -> ConfigResult<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    /// Load from explicit arguments and an environment lookup
    pub fn from_sources(args: &[String], env: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        // 1. Config file
        let explicit = args
            .iter()
            .position(|a| a == "--config")
            .map(|i| {
                args.get(i + 1)
                    .map(PathBuf::from)
                    .ok_or_else(|| ConfigError::MissingValue("--config".into()))
            })
            .transpose()?;

        let mut config = match explicit {
            Some(path) => Self::load_from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        // 2. Environment
        config.apply_env(env)?;

        // 3. Command line
        config.apply_args(args)?;

        if config.course.file.is_none() {
            return Err(ConfigError::MissingCourse);
        }
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_path = Some(path.to_path_buf());
        log::info!("Loaded runner config from {:?}", path);
        Ok(config)
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(file) = env("MAZE_FILE").filter(|f| !f.is_empty()) {
            log::info!("Course file from env: {}", file);
            self.course.file = Some(PathBuf::from(file));
        }
        if let Some(v) = env("MAZE_SHOW_PATH") {
            self.navigator.show_path = parse_flag(&v);
        }
        if let Some(v) = env("MAZE_ANIMATE") {
            self.navigator.animate_path = parse_flag(&v);
        }
        if let Some(v) = env("MAZE_DRIVE_SPEED") {
            self.navigator.drive_speed = parse_value("MAZE_DRIVE_SPEED", &v)?;
        }
        if let Some(v) = env("MAZE_TURN_SPEED") {
            self.navigator.turn_speed = parse_value("MAZE_TURN_SPEED", &v)?;
        }
        if let Some(v) = env("MAZE_BLOCK_SIZE") {
            self.navigator.block_size_cm = parse_value("MAZE_BLOCK_SIZE", &v)?;
        }
        if let Some(v) = env("MAZE_MOUNT") {
            self.storage.enabled = parse_flag(&v);
        }
        Ok(())
    }

    fn apply_args(&mut self, args: &[String]) -> ConfigResult<()> {
        let mut positional = None;
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| {
                iter.next()
                    .cloned()
                    .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
            };

            match arg.as_str() {
                "--config" => {
                    value("--config")?;
                }
                "--start" => self.course.start = Some(parse_pos("--start", &value("--start")?)?),
                "--finish" => self.course.finish = Some(parse_pos("--finish", &value("--finish")?)?),
                "--report" => self.report = Some(PathBuf::from(value("--report")?)),
                "--quiet" => self.navigator.show_path = false,
                "--animate" => self.navigator.animate_path = true,
                "--mount" => self.storage.enabled = true,
                "--dry-run" => self.dry_run = true,
                flag if flag.starts_with("--") => log::warn!("Ignoring unknown option {}", flag),
                file => {
                    if positional.is_none() {
                        positional = Some(PathBuf::from(file));
                    }
                }
            }
        }

        if let Some(file) = positional {
            log::info!("Course file from args: {:?}", file);
            self.course.file = Some(file);
        }
        Ok(())
    }

    /// Course file, resolved under the mount point when storage is mounted
    /// and the path is relative
    pub fn course_path(&self) -> Option<PathBuf> {
        let file = self.course.file.as_ref()?;
        if self.storage.enabled && file.is_relative() {
            Some(Path::new(&self.storage.mount_point).join(file))
        } else {
            Some(file.clone())
        }
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        let nav = &self.navigator;
        log::info!("Runner Configuration:");
        log::info!("  Course: {:?}", self.course_path());
        if let Some([x, y]) = self.course.start {
            log::info!("  Start override: {}, {}", x, y);
        }
        if let Some([x, y]) = self.course.finish {
            log::info!("  Finish override: {}, {}", x, y);
        }
        log::info!(
            "  Speeds: drive {}, turn {}; block {} cm; heading {}",
            nav.drive_speed,
            nav.turn_speed,
            nav.block_size_cm,
            nav.heading
        );
        log::info!("  Show path: {}, animate: {}", nav.show_path, nav.animate_path);
        if self.storage.enabled {
            log::info!(
                "  Storage: {} at {}",
                self.storage.device,
                self.storage.mount_point
            );
        }
        if self.dry_run {
            log::info!("  Dry run: drive commands are recorded only");
        }
        if let Some(path) = &self.config_path {
            log::info!("  Config: {:?}", path);
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_pos(key: &str, value: &str) -> ConfigResult<[usize; 2]> {
    let invalid = || ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok([x, y])
}
