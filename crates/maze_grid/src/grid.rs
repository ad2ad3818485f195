//! Flat row-major cell storage

use crate::cell::CellKind;
use crate::direction::Direction;
use crate::error::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: usize,
    pub y: usize,
}

impl GridPos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Signed distance `(other.x - x, other.y - y)` to another cell
    pub fn delta_to(&self, other: GridPos) -> (i64, i64) {
        (
            other.x as i64 - self.x as i64,
            other.y as i64 - self.y as i64,
        )
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

impl From<(usize, usize)> for GridPos {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// Rectangular maze storage.
///
/// Cells live in a single buffer indexed `y * width + x`. Every access goes
/// through a bounds check; there is no unchecked path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Create a grid filled with `Open` cells
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellKind::Open; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: usize, y: usize) -> GridResult<usize> {
        if self.contains(x, y) {
            Ok(y * self.width + x)
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Read a cell
    pub fn cell_at(&self, x: usize, y: usize) -> GridResult<CellKind> {
        let idx = self.index(x, y)?;
        Ok(self.cells[idx])
    }

    /// Write a cell.
    ///
    /// A `Visited` cell may only become `Path` or stay `Visited`; turning it
    /// back into `Open` or `Wall` is rejected.
    pub fn set_cell(&mut self, x: usize, y: usize, kind: CellKind) -> GridResult<()> {
        let idx = self.index(x, y)?;
        let current = self.cells[idx];
        if current == CellKind::Visited && matches!(kind, CellKind::Open | CellKind::Wall) {
            return Err(GridError::InvalidTransition {
                x,
                y,
                from: current,
                to: kind,
            });
        }
        self.cells[idx] = kind;
        Ok(())
    }

    /// Cell one step away in `direction`, or `None` when it would leave the grid
    pub fn neighbor(&self, pos: GridPos, direction: Direction) -> Option<GridPos> {
        let (dx, dy) = direction.offset();
        let x = pos.x.checked_add_signed(dx)?;
        let y = pos.y.checked_add_signed(dy)?;
        self.contains(x, y).then_some(GridPos::new(x, y))
    }

    /// Kind of the neighbouring cell, `None` when off-grid
    pub fn neighbor_kind(&self, pos: GridPos, direction: Direction) -> Option<CellKind> {
        let n = self.neighbor(pos, direction)?;
        Some(self.cells[n.y * self.width + n.x])
    }

    /// Iterate over every cell in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, CellKind)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &kind)| (GridPos::new(i % width, i / width), kind))
    }

    /// Count cells of a given kind
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&k| k == kind).count()
    }

    /// First cell of a given kind in row-major order
    pub fn position_of(&self, kind: CellKind) -> Option<GridPos> {
        self.iter().find(|&(_, k)| k == kind).map(|(pos, _)| pos)
    }

    /// Rewrite every `from` cell to `to`, returning how many changed
    pub(crate) fn replace_all(&mut self, from: CellKind, to: CellKind) -> usize {
        let mut changed = 0;
        for cell in self.cells.iter_mut().filter(|c| **c == from) {
            *cell = to;
            changed += 1;
        }
        changed
    }

    /// Row `y` as a slice
    pub fn row(&self, y: usize) -> Option<&[CellKind]> {
        if y < self.height {
            Some(&self.cells[y * self.width..(y + 1) * self.width])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_open() {
        let grid = Grid::new(3, 2);
        assert_eq!(grid.area(), 6);
        assert_eq!(grid.count(CellKind::Open), 6);
        assert_eq!(grid.cell_at(2, 1).unwrap(), CellKind::Open);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::new(3, 2);
        assert!(matches!(
            grid.cell_at(3, 0),
            Err(GridError::OutOfBounds { x: 3, y: 0, width: 3, height: 2 })
        ));
        assert!(grid.cell_at(0, 2).is_err());
        assert!(grid.set_cell(5, 5, CellKind::Wall).is_err());
    }

    #[test]
    fn test_row_major_layout() {
        let mut grid = Grid::new(3, 2);
        grid.set_cell(1, 1, CellKind::Wall).unwrap();
        assert_eq!(grid.row(1).unwrap()[1], CellKind::Wall);
        assert_eq!(grid.position_of(CellKind::Wall), Some(GridPos::new(1, 1)));
    }

    #[test]
    fn test_visited_never_reverts() {
        let mut grid = Grid::new(2, 2);
        grid.set_cell(0, 0, CellKind::Visited).unwrap();

        assert!(matches!(
            grid.set_cell(0, 0, CellKind::Open),
            Err(GridError::InvalidTransition { .. })
        ));
        assert!(grid.set_cell(0, 0, CellKind::Wall).is_err());
        assert_eq!(grid.cell_at(0, 0).unwrap(), CellKind::Visited);

        grid.set_cell(0, 0, CellKind::Path).unwrap();
        assert_eq!(grid.cell_at(0, 0).unwrap(), CellKind::Path);
    }

    #[test]
    fn test_neighbors_at_edges() {
        let grid = Grid::new(2, 2);
        let corner = GridPos::new(0, 0);
        assert_eq!(grid.neighbor(corner, Direction::Up), None);
        assert_eq!(grid.neighbor(corner, Direction::Left), None);
        assert_eq!(grid.neighbor(corner, Direction::Right), Some(GridPos::new(1, 0)));
        assert_eq!(grid.neighbor(corner, Direction::Down), Some(GridPos::new(0, 1)));

        let far = GridPos::new(1, 1);
        assert_eq!(grid.neighbor(far, Direction::Right), None);
        assert_eq!(grid.neighbor(far, Direction::Down), None);
    }

    #[test]
    fn test_delta_to() {
        let a = GridPos::new(4, 1);
        assert_eq!(a.delta_to(GridPos::new(1, 3)), (-3, 2));
    }
}
