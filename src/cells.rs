use std::convert::From;
use std::fmt;
use std::ops::{BitOr, Not};

use crate::units::{ColumnIndex, RowIndex, Width};

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, width: Width) -> Cartesian2DCoordinate {
        let Width(w) = width;
        let x = index % w;
        let y = index / w;

        Cartesian2DCoordinate::new(x as u32, y as u32)
    }

    #[inline]
    pub fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Self {
        let (ColumnIndex(col), RowIndex(row)) = (col_index, row_index);
        Cartesian2DCoordinate::new(col as u32, row as u32)
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// The four edges of a square cell.
///
/// `Up` points towards increasing `y` and `Down` towards decreasing `y`, so row 0 is the bottom
/// row of the maze.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    Left,
    Right,
    Up,
    Down,
}

/// Every direction, in the order neighbours are scanned while carving.
pub const DIRECTIONS: [CompassPrimary; 4] = [CompassPrimary::Left,
                                             CompassPrimary::Down,
                                             CompassPrimary::Up,
                                             CompassPrimary::Right];

impl CompassPrimary {
    /// The direction of the same wall as seen from the neighbouring cell.
    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::Left => CompassPrimary::Right,
            CompassPrimary::Right => CompassPrimary::Left,
            CompassPrimary::Up => CompassPrimary::Down,
            CompassPrimary::Down => CompassPrimary::Up,
        }
    }

    /// The single wall flag for this direction.
    #[inline]
    pub fn wall(self) -> WallSet {
        match self {
            CompassPrimary::Left => WallSet::LEFT,
            CompassPrimary::Right => WallSet::RIGHT,
            CompassPrimary::Up => WallSet::UP,
            CompassPrimary::Down => WallSet::DOWN,
        }
    }
}

/// The set of walls standing around a cell.
///
/// The bit values (`LEFT = 1`, `RIGHT = 2`, `UP = 4`, `DOWN = 8`) are part of the public contract,
/// consumers reading `bits()` can rely on them.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Default)]
pub struct WallSet(u8);

impl WallSet {
    pub const NONE: WallSet = WallSet(0);
    pub const LEFT: WallSet = WallSet(1);
    pub const RIGHT: WallSet = WallSet(2);
    pub const UP: WallSet = WallSet(4);
    pub const DOWN: WallSet = WallSet(8);
    pub const ALL: WallSet = WallSet(1 | 2 | 4 | 8);

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, direction: CompassPrimary) -> bool {
        self.0 & direction.wall().0 != 0
    }

    #[inline]
    pub fn insert(&mut self, direction: CompassPrimary) {
        self.0 |= direction.wall().0;
    }

    #[inline]
    pub fn remove(&mut self, direction: CompassPrimary) {
        self.0 &= !direction.wall().0;
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }
}

impl From<CompassPrimary> for WallSet {
    fn from(direction: CompassPrimary) -> WallSet {
        direction.wall()
    }
}

impl BitOr for WallSet {
    type Output = WallSet;

    fn bitor(self, rhs: WallSet) -> WallSet {
        WallSet(self.0 | rhs.0)
    }
}

impl Not for WallSet {
    type Output = WallSet;

    fn not(self) -> WallSet {
        WallSet(!self.0 & WallSet::ALL.0)
    }
}

impl fmt::Debug for WallSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const NAMES: [(CompassPrimary, &str); 4] = [(CompassPrimary::Left, "LEFT"),
                                                    (CompassPrimary::Right, "RIGHT"),
                                                    (CompassPrimary::Up, "UP"),
                                                    (CompassPrimary::Down, "DOWN")];
        let names = NAMES.iter()
            .filter(|&&(dir, _)| self.contains(dir))
            .map(|&(_, name)| name)
            .collect::<Vec<_>>();
        if names.is_empty() {
            write!(f, "WallSet(NONE)")
        } else {
            write!(f, "WallSet({})", names.join(" | "))
        }
    }
}

/// One grid cell: the walls still standing plus the carving traversal's visited marker.
/// The markers are bookkeeping only and never count as walls.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellState {
    pub walls: WallSet,
    pub visited: bool,
    pub exit: bool,
}

impl CellState {
    /// A cell with all four walls up that the traversal has not reached.
    pub fn walled() -> CellState {
        CellState {
            walls: WallSet::ALL,
            visited: false,
            exit: false,
        }
    }
}

impl Default for CellState {
    fn default() -> CellState {
        CellState::walled()
    }
}
