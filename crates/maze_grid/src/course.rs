//! Course: a grid with its start and finish markers
//!
//! # Course file format
//!
//! One line per row, one character per column:
//!
//! ```text
//! x.x.f
//! x...x
//! s.xxx
//! ```
//!
//! `x` is a wall, `.` open floor, `s` the start and `f` the finish. Any other
//! character is read as open floor.

use crate::cell::CellKind;
use crate::error::{GridError, GridResult};
use crate::grid::{Grid, GridPos};
use std::path::{Path, PathBuf};

/// A maze grid together with where it was read from and its markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    source: Option<PathBuf>,
    grid: Grid,
    start: Option<GridPos>,
    finish: Option<GridPos>,
}

impl Course {
    /// Wrap an existing grid, picking up any start/finish markers already in it
    pub fn from_grid(grid: Grid) -> Self {
        let start = grid.position_of(CellKind::Start);
        let finish = grid.position_of(CellKind::Finish);
        Self {
            source: None,
            grid,
            start,
            finish,
        }
    }

    /// Parse course text.
    ///
    /// Width is the character count of the first line, height the number of
    /// lines. Trailing blank lines are dropped, short rows are padded with
    /// open floor and characters past the width are ignored.
    pub fn parse(text: &str) -> GridResult<Self> {
        let mut lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        let width = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(GridError::EmptyCourse);
        }
        let height = lines.len();

        let mut course = Self {
            source: None,
            grid: Grid::new(width, height),
            start: None,
            finish: None,
        };

        for (y, line) in lines.iter().enumerate() {
            for (x, c) in line.chars().take(width).enumerate() {
                match CellKind::from_marker(c) {
                    Some(CellKind::Start) => course.set_start(x, y)?,
                    Some(CellKind::Finish) => course.set_finish(x, y)?,
                    Some(kind) => course.grid.set_cell(x, y, kind)?,
                    None => {}
                }
            }
        }

        log::debug!(
            "Parsed {}x{} course, start {:?}, finish {:?}",
            width,
            height,
            course.start,
            course.finish
        );
        Ok(course)
    }

    /// Read and parse a course file
    pub fn load(path: impl AsRef<Path>) -> GridResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GridError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut course = Self::parse(&text)?;
        course.source = Some(path.to_path_buf());
        log::info!(
            "Loaded course {:?} ({}x{})",
            path,
            course.width(),
            course.height()
        );
        Ok(course)
    }

    /// Where this course was loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn start(&self) -> Option<GridPos> {
        self.start
    }

    pub fn finish(&self) -> Option<GridPos> {
        self.finish
    }

    pub fn cell_at(&self, x: usize, y: usize) -> GridResult<CellKind> {
        self.grid.cell_at(x, y)
    }

    /// Write a cell. `Start` and `Finish` go through their setters so only
    /// one of each can exist.
    pub fn set_cell(&mut self, x: usize, y: usize, kind: CellKind) -> GridResult<()> {
        match kind {
            CellKind::Start => self.set_start(x, y),
            CellKind::Finish => self.set_finish(x, y),
            _ => self.grid.set_cell(x, y, kind),
        }
    }

    /// Move the start marker to `(x, y)`, clearing any previous one
    pub fn set_start(&mut self, x: usize, y: usize) -> GridResult<()> {
        self.place_marker(x, y, CellKind::Start)?;
        let pos = GridPos::new(x, y);
        if self.finish == Some(pos) {
            self.finish = None;
        }
        self.start = Some(pos);
        Ok(())
    }

    /// Move the finish marker to `(x, y)`, clearing any previous one
    pub fn set_finish(&mut self, x: usize, y: usize) -> GridResult<()> {
        self.place_marker(x, y, CellKind::Finish)?;
        let pos = GridPos::new(x, y);
        if self.start == Some(pos) {
            self.start = None;
        }
        self.finish = Some(pos);
        Ok(())
    }

    fn place_marker(&mut self, x: usize, y: usize, marker: CellKind) -> GridResult<()> {
        // Validate before clearing so a bad coordinate leaves the grid untouched
        let current = self.grid.cell_at(x, y)?;
        if current == CellKind::Visited {
            return Err(GridError::InvalidTransition {
                x,
                y,
                from: current,
                to: marker,
            });
        }
        self.grid.replace_all(marker, CellKind::Open);
        self.grid.set_cell(x, y, marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_markers() {
        let course = Course::parse("s.f\nxxx\n...\n").unwrap();
        assert_eq!(course.width(), 3);
        assert_eq!(course.height(), 3);
        assert_eq!(course.start(), Some(GridPos::new(0, 0)));
        assert_eq!(course.finish(), Some(GridPos::new(2, 0)));
        assert_eq!(course.cell_at(1, 1).unwrap(), CellKind::Wall);
        assert_eq!(course.cell_at(1, 2).unwrap(), CellKind::Open);
    }

    #[test]
    fn test_parse_dimensions_from_first_line() {
        let course = Course::parse("....\n.s\n..f..x\n").unwrap();
        assert_eq!(course.width(), 4);
        assert_eq!(course.height(), 3);
        // short row padded with open floor
        assert_eq!(course.cell_at(3, 1).unwrap(), CellKind::Open);
        // characters past the width are dropped
        assert_eq!(course.grid().count(CellKind::Wall), 0);
        assert_eq!(course.finish(), Some(GridPos::new(2, 2)));
    }

    #[test]
    fn test_parse_single_column() {
        let course = Course::parse(".\n.\ns\n.\nf").unwrap();
        assert_eq!(course.width(), 1);
        assert_eq!(course.height(), 5);
        assert_eq!(course.start(), Some(GridPos::new(0, 2)));
        assert_eq!(course.finish(), Some(GridPos::new(0, 4)));
    }

    #[test]
    fn test_parse_is_permissive() {
        let course = Course::parse("s#t\r\no?f\r\n\n\n").unwrap();
        assert_eq!(course.height(), 2);
        assert_eq!(course.cell_at(1, 0).unwrap(), CellKind::Open);
        assert_eq!(course.cell_at(2, 0).unwrap(), CellKind::Open);
        assert_eq!(course.cell_at(0, 1).unwrap(), CellKind::Open);
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Course::parse(""), Err(GridError::EmptyCourse)));
        assert!(matches!(Course::parse("\n\n"), Err(GridError::EmptyCourse)));
    }

    #[test]
    fn test_duplicate_markers_last_wins() {
        let course = Course::parse("s.s\nf.f\n").unwrap();
        assert_eq!(course.grid().count(CellKind::Start), 1);
        assert_eq!(course.grid().count(CellKind::Finish), 1);
        assert_eq!(course.start(), Some(GridPos::new(2, 0)));
        assert_eq!(course.finish(), Some(GridPos::new(2, 1)));
    }

    #[test]
    fn test_set_start_and_finish_idempotent() {
        let mut course = Course::parse("s...\n...f\n").unwrap();

        for _ in 0..3 {
            course.set_start(1, 1).unwrap();
            course.set_finish(3, 0).unwrap();
        }

        assert_eq!(course.grid().count(CellKind::Start), 1);
        assert_eq!(course.grid().count(CellKind::Finish), 1);
        assert_eq!(course.cell_at(1, 1).unwrap(), CellKind::Start);
        assert_eq!(course.cell_at(3, 0).unwrap(), CellKind::Finish);
        assert_eq!(course.cell_at(0, 0).unwrap(), CellKind::Open);
        assert_eq!(course.cell_at(3, 1).unwrap(), CellKind::Open);
        assert_eq!(course.finish(), Some(GridPos::new(3, 0)));
    }

    #[test]
    fn test_set_finish_uses_given_coordinate() {
        let mut course = Course::parse("s..\n..f\n").unwrap();
        course.set_finish(1, 0).unwrap();
        assert_eq!(course.cell_at(1, 0).unwrap(), CellKind::Finish);
        assert_eq!(course.cell_at(2, 1).unwrap(), CellKind::Open);
    }

    #[test]
    fn test_set_start_out_of_bounds_leaves_grid() {
        let mut course = Course::parse("s.f\n").unwrap();
        assert!(matches!(
            course.set_start(9, 0),
            Err(GridError::OutOfBounds { .. })
        ));
        assert_eq!(course.start(), Some(GridPos::new(0, 0)));
        assert_eq!(course.cell_at(0, 0).unwrap(), CellKind::Start);
    }

    #[test]
    fn test_start_over_finish_clears_finish() {
        let mut course = Course::parse("s.f\n").unwrap();
        course.set_start(2, 0).unwrap();
        assert_eq!(course.finish(), None);
        assert_eq!(course.grid().count(CellKind::Finish), 0);
    }

    #[test]
    fn test_set_cell_routes_markers() {
        let mut course = Course::parse("s..\n").unwrap();
        course.set_cell(2, 0, CellKind::Start).unwrap();
        assert_eq!(course.grid().count(CellKind::Start), 1);
        assert_eq!(course.start(), Some(GridPos::new(2, 0)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "s.\n.f\n").unwrap();

        let course = Course::load(file.path()).unwrap();
        assert_eq!(course.source(), Some(file.path()));
        assert_eq!(course.finish(), Some(GridPos::new(1, 1)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Course::load(dir.path().join("missing.txt")).unwrap_err();
        assert!(err.is_file_error());
        assert!(matches!(err, GridError::Io { .. }));
    }

    #[test]
    fn test_load_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = Course::load(file.path()).unwrap_err();
        assert!(matches!(err, GridError::EmptyCourse));
        assert!(err.is_file_error());
    }
}
