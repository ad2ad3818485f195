//! Removable storage
//!
//! Course files live on a flash drive that has to be mounted before the run
//! and released afterwards so the controller can write to the mount point
//! again.

use serde::{Deserialize, Serialize};
use std::process::Command;
use std::time::Duration;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {status:?}")]
    CommandFailed { command: String, status: Option<i32> },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Where the course medium lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Mount the device before loading the course
    pub enabled: bool,
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    /// Wait after each mount command
    pub settle_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            device: "/dev/sdb1".to_string(),
            mount_point: "/mnt/usercode".to_string(),
            fs_type: "vfat".to_string(),
            settle_ms: 1000,
        }
    }
}

/// Something that can be attached and detached
pub trait StorageMount {
    fn mount(&mut self) -> StorageResult<()>;
    fn unmount(&mut self) -> StorageResult<()>;
}

/// Mounts through the system `chmod`/`mount`/`umount` commands
#[derive(Debug, Clone)]
pub struct ShellMount {
    config: StorageConfig,
}

impl ShellMount {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Commands `mount()` runs, in order
    pub fn mount_commands(&self) -> Vec<Vec<String>> {
        let c = &self.config;
        vec![
            vec!["chmod".into(), "777".into(), c.device.clone()],
            vec![
                "mount".into(),
                "-t".into(),
                c.fs_type.clone(),
                "-o".into(),
                "rw".into(),
                c.device.clone(),
                c.mount_point.clone(),
            ],
        ]
    }

    pub fn unmount_command(&self) -> Vec<String> {
        vec!["umount".into(), self.config.device.clone()]
    }

    fn run(&self, argv: &[String]) -> StorageResult<()> {
        let command = argv.join(" ");
        let Some((program, args)) = argv.split_first() else {
            return Ok(());
        };

        log::debug!("Running `{}`", command);
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| StorageError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(StorageError::CommandFailed {
                command,
                status: status.code(),
            });
        }
        Ok(())
    }

    fn settle(&self) {
        if self.config.settle_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.config.settle_ms));
        }
    }
}

impl StorageMount for ShellMount {
    fn mount(&mut self) -> StorageResult<()> {
        for argv in self.mount_commands() {
            self.run(&argv)?;
        }
        log::info!(
            "Mounted {} at {}",
            self.config.device,
            self.config.mount_point
        );
        self.settle();
        Ok(())
    }

    fn unmount(&mut self) -> StorageResult<()> {
        self.run(&self.unmount_command())?;
        log::info!("Unmounted {}", self.config.device);
        self.settle();
        Ok(())
    }
}

/// Storage that is always there
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMount;

impl StorageMount for NoMount {
    fn mount(&mut self) -> StorageResult<()> {
        Ok(())
    }

    fn unmount(&mut self) -> StorageResult<()> {
        Ok(())
    }
}

/// Keeps a medium mounted; unmounts on drop if not released explicitly
pub struct MountGuard {
    mount: Box<dyn StorageMount>,
    mounted: bool,
}

impl MountGuard {
    pub fn new(mut mount: Box<dyn StorageMount>) -> StorageResult<Self> {
        mount.mount()?;
        Ok(Self {
            mount,
            mounted: true,
        })
    }

    /// Unmount now and report the result
    pub fn release(mut self) -> StorageResult<()> {
        self.mounted = false;
        self.mount.unmount()
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        if self.mounted {
            if let Err(e) = self.mount.unmount() {
                log::warn!("Failed to unmount storage: {}", e);
            }
        }
    }
}
