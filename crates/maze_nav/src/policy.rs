//! Move selection
//!
//! Given the grid, the current cell and the finish, pick the next direction.
//! The cascade, first match wins:
//!
//! 1. **Escape** - all four neighbours are obstacles: move toward the finish
//!    through any non-wall neighbour, visited cells included.
//! 2. **Greedy** - move toward the finish, x-axis first, into a non-obstacle.
//! 3. **Fallback** - classify the blocked directions:
//!    - three blocked: take the only opening
//!    - both of one axis blocked: follow the corridor, toward the finish if possible
//!    - two adjacent blocked: take the free direction on the axis with the
//!      larger remaining distance (x on a tie)
//!
//! Anything else yields no decision.

use maze_grid::{Axis, Direction, DirectionSet, Grid, GridPos, ObstacleOracle};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the cascade produced a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    Escape,
    Greedy,
    OnlyOpening,
    Corridor,
    Corner,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Escape => write!(f, "escape"),
            Self::Greedy => write!(f, "greedy"),
            Self::OnlyOpening => write!(f, "only-opening"),
            Self::Corridor => write!(f, "corridor"),
            Self::Corner => write!(f, "corner"),
        }
    }
}

/// A chosen move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub direction: Direction,
    pub rule: Rule,
}

impl Decision {
    fn new(direction: Direction, rule: Rule) -> Self {
        Self { direction, rule }
    }
}

/// Shape of the blocked set when the greedy step found nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fallback {
    Only(Direction),
    Corridor(Axis),
    Corner {
        horizontal: Direction,
        vertical: Direction,
    },
}

impl Fallback {
    fn classify(blocked: DirectionSet) -> Option<Self> {
        let open = blocked.complement();
        let mut free = open.iter();
        match (free.next(), free.next(), free.next()) {
            (Some(only), None, None) => Some(Self::Only(only)),
            (Some(a), Some(b), None) if a.axis() == b.axis() => Some(Self::Corridor(a.axis())),
            (Some(a), Some(b), None) => {
                let (horizontal, vertical) = if a.axis() == Axis::Horizontal {
                    (a, b)
                } else {
                    (b, a)
                };
                Some(Self::Corner {
                    horizontal,
                    vertical,
                })
            }
            _ => None,
        }
    }

    fn resolve(self, oracle: &ObstacleOracle<'_>, pos: GridPos, finish: GridPos) -> Option<Decision> {
        match self {
            Self::Only(direction) => Some(Decision::new(direction, Rule::OnlyOpening)),
            Self::Corridor(axis) => {
                let toward = toward_on_axis(axis, pos, finish);
                [toward, toward.opposite()]
                    .into_iter()
                    .find(|&d| !oracle.is_obstacle(pos, d))
                    .map(|d| Decision::new(d, Rule::Corridor))
            }
            Self::Corner {
                horizontal,
                vertical,
            } => {
                let (dx, dy) = pos.delta_to(finish);
                let direction = if dy.abs() > dx.abs() {
                    vertical
                } else {
                    horizontal
                };
                Some(Decision::new(direction, Rule::Corner))
            }
        }
    }
}

/// Direction along `axis` that closes the gap to the finish.
/// When already aligned, the negative direction (Left / Up).
fn toward_on_axis(axis: Axis, pos: GridPos, finish: GridPos) -> Direction {
    match axis {
        Axis::Horizontal if pos.x < finish.x => Direction::Right,
        Axis::Horizontal => Direction::Left,
        Axis::Vertical if pos.y < finish.y => Direction::Down,
        Axis::Vertical => Direction::Up,
    }
}

/// Directions that reduce the distance to the finish, x-axis first
pub fn preferred_directions(pos: GridPos, finish: GridPos) -> impl Iterator<Item = Direction> {
    [
        (pos.x < finish.x, Direction::Right),
        (pos.x > finish.x, Direction::Left),
        (pos.y < finish.y, Direction::Down),
        (pos.y > finish.y, Direction::Up),
    ]
    .into_iter()
    .filter_map(|(wanted, d)| wanted.then_some(d))
}

/// Pick the next move from `pos`, or `None` when no rule applies
pub fn decide(grid: &Grid, pos: GridPos, finish: GridPos) -> Option<Decision> {
    let oracle = ObstacleOracle::new(grid);
    let blocked = oracle.blocked(pos);

    if blocked.is_full() {
        if let Some(d) = preferred_directions(pos, finish).find(|&d| !oracle.is_wall(pos, d)) {
            return Some(Decision::new(d, Rule::Escape));
        }
    }

    if let Some(d) = preferred_directions(pos, finish).find(|&d| !blocked.contains(d)) {
        return Some(Decision::new(d, Rule::Greedy));
    }

    Fallback::classify(blocked)?.resolve(&oracle, pos, finish)
}
