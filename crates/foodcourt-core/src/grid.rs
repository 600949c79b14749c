//! Grid primitives: floor/rack positions, facing directions, and bounds.
//!
//! Rows grow downward, so `Direction::Down` increases the row and products
//! leave the factory through the bottom edge of the output module.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A `(column, row)` cell on the floor or rack grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub column: i32,
    pub row: i32,
}

impl Position {
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// The neighbouring cell one step in `direction`.
    pub fn shifted(self, direction: Direction) -> Self {
        let (dc, dr) = direction.offset();
        Self {
            column: self.column + dc,
            row: self.row + dr,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Absolute facing of a module or direction of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Up,
    Down,
    Left,
}

/// A direction classified against a base facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelativeDirection {
    Front,
    Right,
    Back,
    Left,
}

impl Direction {
    pub fn all() -> [Direction; 4] {
        [
            Direction::Right,
            Direction::Up,
            Direction::Down,
            Direction::Left,
        ]
    }

    /// `(column, row)` offset for one step.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Rotate 90 degrees counter-clockwise.
    pub fn left(self) -> Self {
        match self {
            Direction::Right => Direction::Up,
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
        }
    }

    /// Rotate 90 degrees clockwise.
    pub fn right(self) -> Self {
        match self {
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Up => Direction::Right,
        }
    }

    pub fn back(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Classify `self` relative to `base`.
    pub fn relative_to(self, base: Direction) -> RelativeDirection {
        if self == base {
            RelativeDirection::Front
        } else if self == base.right() {
            RelativeDirection::Right
        } else if self == base.back() {
            RelativeDirection::Back
        } else {
            RelativeDirection::Left
        }
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Rectangular bounds of a grid, anchored at `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    pub columns: i32,
    pub rows: i32,
}

impl GridBounds {
    /// Floor size used by the reference puzzle set.
    pub const FLOOR: GridBounds = GridBounds { columns: 6, rows: 7 };
    /// Rack size used by the reference puzzle set.
    pub const RACK: GridBounds = GridBounds {
        columns: 11,
        rows: 3,
    };

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.columns).contains(&pos.column) && (0..self.rows).contains(&pos.row)
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::FLOOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotations_compose() {
        for d in Direction::all() {
            assert_eq!(d.left().right(), d);
            assert_eq!(d.right().right(), d.back());
            assert_eq!(d.left().left().left().left(), d);
        }
    }

    #[test]
    fn relative_classification() {
        let base = Direction::Down;
        assert_eq!(Direction::Down.relative_to(base), RelativeDirection::Front);
        assert_eq!(Direction::Left.relative_to(base), RelativeDirection::Right);
        assert_eq!(Direction::Up.relative_to(base), RelativeDirection::Back);
        assert_eq!(Direction::Right.relative_to(base), RelativeDirection::Left);
        for d in Direction::all() {
            assert_eq!(d.right().relative_to(d), RelativeDirection::Right);
            assert_eq!(d.left().relative_to(d), RelativeDirection::Left);
        }
    }

    #[test]
    fn shifting_moves_one_cell() {
        let p = Position::new(2, 3);
        assert_eq!(p.shifted(Direction::Down), Position::new(2, 4));
        assert_eq!(p.shifted(Direction::Up), Position::new(2, 2));
        assert_eq!(p.shifted(Direction::Right), Position::new(3, 3));
        assert_eq!(p.shifted(Direction::Left).shifted(Direction::Right), p);
    }

    #[test]
    fn reference_floor_bounds() {
        let floor = GridBounds::FLOOR;
        assert!(floor.contains(Position::new(0, 0)));
        assert!(floor.contains(Position::new(5, 6)));
        assert!(!floor.contains(Position::new(6, 0)));
        assert!(!floor.contains(Position::new(0, 7)));
        assert!(!floor.contains(Position::new(-1, 2)));
    }
}
