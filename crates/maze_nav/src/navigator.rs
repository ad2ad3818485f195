//! Navigator state machine
//!
//! One logical state, `Seeking`, re-entered every step until the robot either
//! stands on the finish (`Reached`) or cannot make progress (`Stuck`).

use crate::actuator::DriveActuator;
use crate::cancel::CancelToken;
use crate::config::NavConfig;
use crate::error::{NavError, NavResult, StuckReason};
use crate::policy::{self, Decision};
use maze_grid::{CellKind, Course, Direction, GridPos};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle of a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    Seeking,
    Reached,
    Stuck,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Seeking)
    }
}

/// Robot pose and movement parameters for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigatorState {
    /// Cell the robot stands on
    pub position: GridPos,
    /// Direction of the last move, or the configured initial heading
    pub heading: Option<Direction>,
    /// Heading in degrees, what turn deltas are computed from
    pub heading_degrees: i32,
    pub drive_speed: u32,
    pub turn_speed: u32,
    pub block_size_cm: f32,
    pub animate_path: bool,
    pub show_path: bool,
}

impl NavigatorState {
    fn new(position: GridPos, config: &NavConfig) -> Self {
        Self {
            position,
            heading: Direction::from_degrees(config.heading),
            heading_degrees: config.heading,
            drive_speed: config.drive_speed,
            turn_speed: config.turn_speed,
            block_size_cm: config.block_size_cm,
            animate_path: config.animate_path,
            show_path: config.show_path,
        }
    }
}

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved one cell, finish not reached yet
    Moved(Decision),
    /// Moved onto the finish
    Arrived(Decision),
    /// Already at the finish, nothing done
    Idle,
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Accepted moves
    pub moves: usize,
    /// Decision cycles executed
    pub steps: usize,
    /// Every cell stood on, start first
    pub path: Vec<GridPos>,
    pub final_position: GridPos,
    pub heading: Option<Direction>,
}

/// Hooks for rendering or tracing a run
pub trait StepObserver {
    /// Before the first step
    fn on_start(&mut self, _course: &Course, _state: &NavigatorState) {}

    /// After each accepted move, when `show_path` is set
    fn on_step(&mut self, _course: &Course, _state: &NavigatorState, _decision: &Decision) {}

    /// After the finish is reached
    fn on_finish(&mut self, _course: &Course, _state: &NavigatorState) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {}

/// Greedy local navigator.
///
/// Borrows the course mutably for the whole run: the cell being left turns
/// `Visited`, the cell entered turns `Path`.
pub struct Navigator<'c, A: DriveActuator> {
    course: &'c mut Course,
    actuator: A,
    state: NavigatorState,
    finish: GridPos,
    status: RunStatus,
    stuck_reason: Option<StuckReason>,
    steps: usize,
    step_limit: usize,
    animate_delay: Duration,
    path: Vec<GridPos>,
    cancel: Option<CancelToken>,
}

impl<'c, A: DriveActuator> Navigator<'c, A> {
    /// Seed a run from the course's start cell, which is rewritten to `Path`
    pub fn new(course: &'c mut Course, actuator: A, config: NavConfig) -> NavResult<Self> {
        config.validate()?;

        let start = course
            .grid()
            .position_of(CellKind::Start)
            .ok_or(NavError::MissingStart)?;
        let finish = course.finish().ok_or(NavError::MissingFinish)?;

        course.set_cell(start.x, start.y, CellKind::Path)?;

        let step_limit = config.step_limit(course.width(), course.height());
        let status = if start == finish {
            RunStatus::Reached
        } else {
            RunStatus::Seeking
        };

        log::debug!(
            "Navigator seeded at ({}), finish ({}), step limit {}",
            start,
            finish,
            step_limit
        );

        Ok(Self {
            course,
            actuator,
            state: NavigatorState::new(start, &config),
            finish,
            status,
            stuck_reason: None,
            steps: 0,
            step_limit,
            animate_delay: Duration::from_millis(config.animate_delay_ms),
            path: vec![start],
            cancel: None,
        })
    }

    /// Attach a cancellation token checked before every step
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn state(&self) -> &NavigatorState {
        &self.state
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn course(&self) -> &Course {
        &*self.course
    }

    pub fn finish(&self) -> GridPos {
        self.finish
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    /// Cells stood on so far, start first
    pub fn path(&self) -> &[GridPos] {
        &self.path
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn into_actuator(self) -> A {
        self.actuator
    }

    /// What the next step would do, without doing it
    pub fn peek(&self) -> Option<Decision> {
        if self.status.is_terminal() {
            return None;
        }
        policy::decide(self.course.grid(), self.state.position, self.finish)
    }

    /// Run one decide-move-mark cycle
    pub fn step(&mut self) -> NavResult<StepOutcome> {
        match self.status {
            RunStatus::Reached => return Ok(StepOutcome::Idle),
            RunStatus::Stuck => {
                let reason = self.stuck_reason.unwrap_or(StuckReason::NoMove);
                return Err(self.stuck_error(reason));
            }
            RunStatus::Seeking => {}
        }

        if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            log::warn!("Run cancelled after {} steps", self.steps);
            return Err(NavError::Cancelled { steps: self.steps });
        }

        if self.steps >= self.step_limit {
            return Err(self.fail(StuckReason::StepLimit(self.step_limit)));
        }
        self.steps += 1;

        let Some(decision) = policy::decide(self.course.grid(), self.state.position, self.finish)
        else {
            return Err(self.fail(StuckReason::NoMove));
        };

        log::debug!(
            "Step {}: {} via {} from ({})",
            self.steps,
            decision.direction,
            decision.rule,
            self.state.position
        );
        self.execute(decision.direction)?;

        if self.state.position == self.finish {
            self.status = RunStatus::Reached;
            log::info!(
                "Finish ({}) reached in {} moves",
                self.finish,
                self.path.len() - 1
            );
            Ok(StepOutcome::Arrived(decision))
        } else {
            Ok(StepOutcome::Moved(decision))
        }
    }

    /// Step until the finish is reached or the run fails
    pub fn run(&mut self, observer: &mut dyn StepObserver) -> NavResult<RunReport> {
        observer.on_start(&*self.course, &self.state);

        while !self.status.is_terminal() {
            if self.state.animate_path && !self.animate_delay.is_zero() {
                std::thread::sleep(self.animate_delay);
            }

            match self.step()? {
                StepOutcome::Moved(decision) | StepOutcome::Arrived(decision) => {
                    if self.state.show_path {
                        observer.on_step(&*self.course, &self.state, &decision);
                    }
                }
                StepOutcome::Idle => {}
            }
        }

        observer.on_finish(&*self.course, &self.state);
        Ok(self.report())
    }

    /// Summary of the run so far
    pub fn report(&self) -> RunReport {
        RunReport {
            moves: self.path.len() - 1,
            steps: self.steps,
            path: self.path.clone(),
            final_position: self.state.position,
            heading: self.state.heading,
        }
    }

    fn execute(&mut self, direction: Direction) -> NavResult<()> {
        let from = self.state.position;
        let to = self.course.grid().neighbor(from, direction).unwrap_or(from);

        self.course.set_cell(from.x, from.y, CellKind::Visited)?;
        self.state.position = to;
        self.course.set_cell(to.x, to.y, CellKind::Path)?;
        self.path.push(to);

        let previous_degrees = self.state.heading_degrees;
        let target_degrees = direction.degrees();
        self.state.heading = Some(direction);
        self.state.heading_degrees = target_degrees;

        if target_degrees != previous_degrees {
            self.actuator
                .turn(target_degrees - previous_degrees, self.state.turn_speed)?;
        }
        self.actuator
            .drive(self.state.block_size_cm, self.state.drive_speed)?;
        Ok(())
    }

    fn fail(&mut self, reason: StuckReason) -> NavError {
        self.status = RunStatus::Stuck;
        self.stuck_reason = Some(reason);
        log::warn!(
            "Stuck at ({}) after {} steps: {}",
            self.state.position,
            self.steps,
            reason
        );
        self.stuck_error(reason)
    }

    fn stuck_error(&self, reason: StuckReason) -> NavError {
        NavError::Stuck {
            reason,
            steps: self.steps,
            position: self.state.position,
            snapshot: Box::new(self.course.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::{DriveCommand, RecordingActuator};
    use crate::policy::Rule;

    fn quiet() -> NavConfig {
        NavConfig::default().with_show_path(false)
    }

    #[test]
    fn test_seeding_rewrites_start() {
        let mut course = Course::parse("s.f\n").unwrap();
        let mut rec = RecordingActuator::new();
        let nav = Navigator::new(&mut course, &mut rec, quiet()).unwrap();

        assert_eq!(nav.state().position, GridPos::new(0, 0));
        assert_eq!(nav.status(), RunStatus::Seeking);
        assert_eq!(nav.course().cell_at(0, 0).unwrap(), CellKind::Path);
        assert_eq!(nav.step_limit(), 3);
    }

    #[test]
    fn test_missing_markers() {
        let mut course = Course::parse("..f\n").unwrap();
        let err = Navigator::new(&mut course, RecordingActuator::new(), quiet()).err();
        assert!(matches!(err, Some(NavError::MissingStart)));

        let mut course = Course::parse("s..\n").unwrap();
        let err = Navigator::new(&mut course, RecordingActuator::new(), quiet()).err();
        assert!(matches!(err, Some(NavError::MissingFinish)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut course = Course::parse("s.f\n").unwrap();
        let err = Navigator::new(
            &mut course,
            RecordingActuator::new(),
            quiet().with_drive_speed(0),
        )
        .err();
        assert!(matches!(err, Some(NavError::InvalidConfig(_))));
        // nothing touched
        assert_eq!(course.cell_at(0, 0).unwrap(), CellKind::Start);
    }

    #[test]
    fn test_step_marks_cells() {
        let mut course = Course::parse("s..f\n").unwrap();
        let mut nav = Navigator::new(&mut course, RecordingActuator::new(), quiet()).unwrap();

        let outcome = nav.step().unwrap();
        assert_eq!(
            outcome,
            StepOutcome::Moved(Decision { direction: Direction::Right, rule: Rule::Greedy })
        );
        assert_eq!(nav.course().cell_at(0, 0).unwrap(), CellKind::Visited);
        assert_eq!(nav.course().cell_at(1, 0).unwrap(), CellKind::Path);
        assert_eq!(nav.state().position, GridPos::new(1, 0));
        assert_eq!(nav.state().heading, Some(Direction::Right));
    }

    #[test]
    fn test_straight_run_issues_no_turn() {
        let mut course = Course::parse("s...f\n").unwrap();
        let mut rec = RecordingActuator::new();
        let report = {
            let mut nav = Navigator::new(&mut course, &mut rec, quiet()).unwrap();
            nav.run(&mut NoopObserver).unwrap()
        };

        assert_eq!(report.moves, 4);
        assert_eq!(report.steps, 4);
        assert_eq!(report.final_position, GridPos::new(4, 0));
        // default heading 0 is already Right
        assert_eq!(rec.turns().count(), 0);
        assert_eq!(rec.drive_count(), 4);
        assert_eq!(course.to_string(), "oooot\n");
    }

    #[test]
    fn test_turn_delta_uses_previous_heading() {
        let mut course = Course::parse("s.\n.f\n").unwrap();
        let mut rec = RecordingActuator::new();
        {
            let mut nav = Navigator::new(&mut course, &mut rec, quiet().with_heading(90)).unwrap();
            nav.run(&mut NoopObserver).unwrap();
        }

        // Right (0) from 90, then Down (270) from 0
        assert_eq!(rec.turns().collect::<Vec<_>>(), vec![-90, 270]);
        assert_eq!(
            rec.commands()[1],
            DriveCommand::Drive { distance_cm: 1.0, speed: 500 }
        );
    }

    #[test]
    fn test_enclosed_start_is_stuck() {
        let mut course = Course::parse("xxx\nxsx\nxxx\n..f\n").unwrap();
        let mut nav = Navigator::new(&mut course, RecordingActuator::new(), quiet()).unwrap();

        let err = nav.run(&mut NoopObserver).unwrap_err();
        match &err {
            NavError::Stuck { reason, steps, position, snapshot } => {
                assert_eq!(*reason, StuckReason::NoMove);
                assert_eq!(*steps, 1);
                assert_eq!(*position, GridPos::new(1, 1));
                assert_eq!(snapshot.cell_at(1, 1).unwrap(), CellKind::Path);
            }
            other => panic!("expected Stuck, got {:?}", other),
        }
        assert!(err.snapshot().is_some());
        assert_eq!(nav.status(), RunStatus::Stuck);
        assert!(nav.step().is_err());
        assert!(nav.actuator().commands().is_empty());
    }

    #[test]
    fn test_step_limit() {
        let mut course = Course::parse("s....f\n").unwrap();
        let mut nav =
            Navigator::new(&mut course, RecordingActuator::new(), quiet().with_max_steps(2)).unwrap();

        let err = nav.run(&mut NoopObserver).unwrap_err();
        assert!(matches!(
            err,
            NavError::Stuck { reason: StuckReason::StepLimit(2), steps: 2, .. }
        ));
        assert_eq!(nav.path().len(), 3);
    }

    #[test]
    fn test_cancel_before_step() {
        let mut course = Course::parse("s..f\n").unwrap();
        let token = CancelToken::new();
        let mut nav = Navigator::new(&mut course, RecordingActuator::new(), quiet())
            .unwrap()
            .with_cancel(token.clone());

        nav.step().unwrap();
        token.cancel();
        assert!(matches!(nav.step(), Err(NavError::Cancelled { steps: 1 })));
        assert_eq!(nav.state().position, GridPos::new(1, 0));
    }

    #[test]
    fn test_finish_coordinate_outlives_marker() {
        let mut grid = maze_grid::Grid::new(2, 1);
        grid.set_cell(0, 0, CellKind::Start).unwrap();
        let mut course = Course::from_grid(grid);
        course.set_finish(1, 0).unwrap();
        course.set_cell(1, 0, CellKind::Open).unwrap();
        // marker overwritten, coordinate still the target
        let mut nav = Navigator::new(&mut course, RecordingActuator::new(), quiet()).unwrap();
        assert_eq!(nav.step().unwrap(), StepOutcome::Arrived(Decision {
            direction: Direction::Right,
            rule: Rule::Greedy,
        }));
        assert_eq!(nav.step().unwrap(), StepOutcome::Idle);
    }

    struct CountingObserver {
        started: usize,
        steps: usize,
        finished: usize,
    }

    impl StepObserver for CountingObserver {
        fn on_start(&mut self, _: &Course, _: &NavigatorState) {
            self.started += 1;
        }
        fn on_step(&mut self, _: &Course, _: &NavigatorState, _: &Decision) {
            self.steps += 1;
        }
        fn on_finish(&mut self, _: &Course, _: &NavigatorState) {
            self.finished += 1;
        }
    }

    #[test]
    fn test_observer_follows_show_path() {
        let mut counter = CountingObserver { started: 0, steps: 0, finished: 0 };
        let mut course = Course::parse("s..f\n").unwrap();
        let mut nav =
            Navigator::new(&mut course, RecordingActuator::new(), NavConfig::default()).unwrap();
        nav.run(&mut counter).unwrap();
        assert_eq!((counter.started, counter.steps, counter.finished), (1, 3, 1));

        let mut counter = CountingObserver { started: 0, steps: 0, finished: 0 };
        let mut course = Course::parse("s..f\n").unwrap();
        let mut nav = Navigator::new(&mut course, RecordingActuator::new(), quiet()).unwrap();
        nav.run(&mut counter).unwrap();
        assert_eq!((counter.started, counter.steps, counter.finished), (1, 0, 1));
    }
}
