//! Local obstacle queries around a position

use crate::direction::{Direction, DirectionSet};
use crate::grid::{Grid, GridPos};

/// Read-only one-cell-radius view of a grid.
///
/// A neighbour that would lie outside the grid answers `true` to every query:
/// the edge of the maze is impassable.
#[derive(Debug, Clone, Copy)]
pub struct ObstacleOracle<'g> {
    grid: &'g Grid,
}

impl<'g> ObstacleOracle<'g> {
    pub fn new(grid: &'g Grid) -> Self {
        Self { grid }
    }

    /// Neighbour in `direction` is a wall
    pub fn is_wall(&self, pos: GridPos, direction: Direction) -> bool {
        self.grid
            .neighbor_kind(pos, direction)
            .map_or(true, |kind| kind.is_wall())
    }

    /// Neighbour in `direction` was already left behind
    pub fn is_visited(&self, pos: GridPos, direction: Direction) -> bool {
        self.grid
            .neighbor_kind(pos, direction)
            .map_or(true, |kind| kind.is_visited())
    }

    /// Neighbour in `direction` is a wall or visited
    pub fn is_obstacle(&self, pos: GridPos, direction: Direction) -> bool {
        self.is_wall(pos, direction) || self.is_visited(pos, direction)
    }

    /// Every direction that is an obstacle
    pub fn blocked(&self, pos: GridPos) -> DirectionSet {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.is_obstacle(pos, d))
            .collect()
    }

    /// Every direction that is a wall (visited cells not counted)
    pub fn walls(&self, pos: GridPos) -> DirectionSet {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.is_wall(pos, d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellKind;
    use crate::course::Course;

    #[test]
    fn test_queries() {
        let mut course = Course::parse("...\n.sx\n...\n").unwrap();
        course.set_cell(1, 0, CellKind::Visited).unwrap();
        let oracle = ObstacleOracle::new(course.grid());
        let pos = GridPos::new(1, 1);

        assert!(oracle.is_wall(pos, Direction::Right));
        assert!(!oracle.is_visited(pos, Direction::Right));
        assert!(oracle.is_obstacle(pos, Direction::Right));

        assert!(!oracle.is_wall(pos, Direction::Up));
        assert!(oracle.is_visited(pos, Direction::Up));
        assert!(oracle.is_obstacle(pos, Direction::Up));

        assert!(!oracle.is_obstacle(pos, Direction::Left));
        assert!(!oracle.is_obstacle(pos, Direction::Down));

        assert_eq!(
            oracle.blocked(pos),
            DirectionSet::of(&[Direction::Up, Direction::Right])
        );
        assert_eq!(oracle.walls(pos), DirectionSet::of(&[Direction::Right]));
    }

    #[test]
    fn test_edges_are_impassable() {
        let course = Course::parse("s.\n.f\n").unwrap();
        let oracle = ObstacleOracle::new(course.grid());
        let corner = GridPos::new(0, 0);

        for d in [Direction::Up, Direction::Left] {
            assert!(oracle.is_wall(corner, d));
            assert!(oracle.is_visited(corner, d));
            assert!(oracle.is_obstacle(corner, d));
        }
        assert_eq!(
            oracle.blocked(corner),
            DirectionSet::of(&[Direction::Up, Direction::Left])
        );
    }

    #[test]
    fn test_single_cell_grid_fully_blocked() {
        let course = Course::parse("s\n").unwrap();
        let oracle = ObstacleOracle::new(course.grid());
        assert!(oracle.blocked(GridPos::new(0, 0)).is_full());
    }
}
