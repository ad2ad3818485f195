//! Maze Runner
//!
//! Loads a course file, then drives the robot from the start marker to the
//! finish one cell at a time.
//!
//! Run with: cargo run -p maze_runner -- course.txt
//!       or: maze_runner --mount --quiet course.txt

mod boot_config;
mod console;
mod drive;
mod session;
mod storage;

use boot_config::RunnerConfig;
use maze_nav::CancelToken;
use session::{Session, SessionError};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = match RunnerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("usage: maze_runner [--config PATH] [--start X,Y] [--finish X,Y] [--quiet] [--animate] [--mount] [--dry-run] [--report PATH] COURSE");
            return ExitCode::from(2);
        }
    };
    config.print_summary();

    let cancel = CancelToken::new();
    let c = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, stopping after the current move...");
        c.cancel();
    }) {
        log::warn!("Failed to set Ctrl+C handler: {}", e);
    }

    match Session::run(&config, cancel) {
        Ok(report) => {
            log::info!("Reached finish in {} moves ({} steps)", report.moves, report.steps);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Run failed: {}", e);
            if let Some(snapshot) = e.snapshot() {
                println!("{}", snapshot);
            }
            match e {
                SessionError::Nav(maze_nav::NavError::Cancelled { .. }) => ExitCode::from(130),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
