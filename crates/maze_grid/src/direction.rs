//! Cardinal directions and small direction sets

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four grid moves.
///
/// `Up` decreases `y`, `Down` increases it; `Left` decreases `x`, `Right`
/// increases it. Row 0 is the first line of the course file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Axis a direction moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Left / Right
    Horizontal,
    /// Up / Down
    Vertical,
}

impl Direction {
    /// Query order used everywhere a direction set is walked
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset `(dx, dy)` of one move
    #[inline]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// The two directions at right angles to this one
    pub fn perpendicular(self) -> [Direction; 2] {
        match self.axis() {
            Axis::Horizontal => [Self::Up, Self::Down],
            Axis::Vertical => [Self::Left, Self::Right],
        }
    }

    /// Compass heading of this direction in degrees.
    ///
    /// Right is 0, angles grow counter-clockwise. This is a separate mapping
    /// from the enum itself; turn deltas are computed from it explicitly.
    pub fn degrees(self) -> i32 {
        match self {
            Self::Right => 0,
            Self::Up => 90,
            Self::Left => 180,
            Self::Down => 270,
        }
    }

    /// Reverse of [`Direction::degrees`], for exact quarter headings only
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::Right),
            90 => Some(Self::Up),
            180 => Some(Self::Left),
            270 => Some(Self::Down),
            _ => None,
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Self::Up => 0b0001,
            Self::Down => 0b0010,
            Self::Left => 0b0100,
            Self::Right => 0b1000,
        }
    }
}

impl Axis {
    /// The pair of directions along this axis, negative first
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::Horizontal => [Direction::Left, Direction::Right],
            Axis::Vertical => [Direction::Up, Direction::Down],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Set of directions packed into four bits
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const EMPTY: DirectionSet = DirectionSet(0);
    pub const ALL: DirectionSet = DirectionSet(0b1111);

    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Build a set from a list of directions
    pub fn of(directions: &[Direction]) -> Self {
        let mut set = Self::EMPTY;
        for &d in directions {
            set.insert(d);
        }
        set
    }

    #[inline]
    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    #[inline]
    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    #[inline]
    pub fn contains(&self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Number of directions in the set
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_full(&self) -> bool {
        self.0 == Self::ALL.0
    }

    /// Directions not in this set
    pub fn complement(&self) -> Self {
        DirectionSet(!self.0 & Self::ALL.0)
    }

    /// Iterate in [`Direction::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for d in iter {
            set.insert(d);
        }
        set
    }
}

impl fmt::Debug for DirectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
