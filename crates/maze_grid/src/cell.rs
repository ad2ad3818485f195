//! Cell contents

use serde::{Deserialize, Serialize};

/// What a single grid cell holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Impassable
    Wall,
    /// Free floor
    Open,
    /// Where the robot begins
    Start,
    /// Where the robot must end
    Finish,
    /// Cell the robot currently stands on, or the finish once reached
    Path,
    /// Cell the robot has already left
    Visited,
}

impl Default for CellKind {
    fn default() -> Self {
        Self::Open
    }
}

impl CellKind {
    /// All kinds, in declaration order
    pub const ALL: [CellKind; 6] = [
        CellKind::Wall,
        CellKind::Open,
        CellKind::Start,
        CellKind::Finish,
        CellKind::Path,
        CellKind::Visited,
    ];

    /// Character used when rendering this cell
    pub fn marker(self) -> char {
        match self {
            Self::Wall => 'x',
            Self::Open => '.',
            Self::Start => 's',
            Self::Finish => 'f',
            Self::Path => 't',
            Self::Visited => 'o',
        }
    }

    /// Parse an input marker.
    ///
    /// Only `x`, `.`, `s` and `f` are valid in a course file. The path and
    /// visited markers are output-only and yield `None`, like any other
    /// unrecognized character.
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            'x' => Some(Self::Wall),
            '.' => Some(Self::Open),
            's' => Some(Self::Start),
            'f' => Some(Self::Finish),
            _ => None,
        }
    }

    #[inline]
    pub fn is_wall(self) -> bool {
        self == Self::Wall
    }

    #[inline]
    pub fn is_visited(self) -> bool {
        self == Self::Visited
    }

    /// Whether the normal-mode heuristic may step onto this cell
    #[inline]
    pub fn is_passable(self) -> bool {
        !matches!(self, Self::Wall | Self::Visited)
    }
}
