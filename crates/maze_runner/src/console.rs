//! Console output of a run

use maze_grid::Course;
use maze_nav::{Decision, NavigatorState, StepObserver};
use std::io::{self, Write};

/// Prints the grid and the robot position as the run progresses
pub struct ConsoleRenderer<W: Write> {
    out: W,
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) {
        if let Err(e) = f(&mut self.out).and_then(|_| self.out.flush()) {
            log::warn!("Console write failed: {}", e);
        }
    }
}

impl<W: Write> StepObserver for ConsoleRenderer<W> {
    fn on_start(&mut self, course: &Course, state: &NavigatorState) {
        let finish = course.finish();
        self.emit(|out| {
            write!(out, "{}", course)?;
            writeln!(out, "Start: {}", state.position)?;
            match finish {
                Some(f) => writeln!(out, "Finish: {}", f)?,
                None => writeln!(out, "Finish: none")?,
            }
            writeln!(out)
        });
    }

    fn on_step(&mut self, course: &Course, state: &NavigatorState, _decision: &Decision) {
        self.emit(|out| {
            write!(out, "{}", course)?;
            writeln!(out, "Current: {}", state.position)?;
            writeln!(out)
        });
    }

    fn on_finish(&mut self, course: &Course, _state: &NavigatorState) {
        self.emit(|out| {
            write!(out, "{}", course)?;
            writeln!(out, "Done")
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_nav::{Navigator, NavConfig, RecordingActuator};

    #[test]
    fn test_transcript() {
        let mut course = Course::parse("s.f\n").unwrap();
        let mut console = ConsoleRenderer::new(Vec::new());
        Navigator::new(&mut course, RecordingActuator::new(), NavConfig::default())
            .unwrap()
            .run(&mut console)
            .unwrap();

        let text = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(
            text,
            "t.f\nStart: 0, 0\nFinish: 2, 0\n\n\
             otf\nCurrent: 1, 0\n\n\
             oot\nCurrent: 2, 0\n\n\
             oot\nDone\n"
        );
    }

    #[test]
    fn test_quiet_run_prints_ends_only() {
        let mut course = Course::parse("s.f\n").unwrap();
        let mut console = ConsoleRenderer::new(Vec::new());
        Navigator::new(
            &mut course,
            RecordingActuator::new(),
            NavConfig::default().with_show_path(false),
        )
        .unwrap()
        .run(&mut console)
        .unwrap();

        let text = String::from_utf8(console.into_inner()).unwrap();
        assert!(!text.contains("Current"));
        assert_eq!(text.matches("Done").count(), 1);
    }
}
