use std::convert::TryFrom;
use std::fmt;

use rand::Rng;
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, CellState, CompassPrimary, WallSet, DIRECTIONS};
use crate::errors::*;
use crate::grid_iterators::{BatchIter, CellIter};
use crate::units::{Height, Width};

/// An in-bounds cell next to another one, and the wall (from the first cell's side) between them.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Neighbour {
    pub coord: Cartesian2DCoordinate,
    pub shared_wall: CompassPrimary,
}

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;
pub type NeighbourSmallVec = SmallVec<[Neighbour; 4]>;
pub type Link = (Cartesian2DCoordinate, Cartesian2DCoordinate);

/// A dense rectangular grid of cell wall states, stored row major.
///
/// Once a maze has been generated the grid is read only from outside the crate: the wall
/// carving operations are only available to the generators.
#[derive(Clone, Eq, PartialEq)]
pub struct WallGrid {
    width: u32,
    height: u32,
    cells: Vec<CellState>,
    exits: Vec<Cartesian2DCoordinate>,
}

impl fmt::Debug for WallGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "WallGrid :: width: {:?}, height: {:?}, exits: {:?}",
               self.width,
               self.height,
               self.exits)
    }
}

impl WallGrid {
    /// A `width` by `height` grid with every wall standing and no cell visited.
    ///
    /// Fails with `InvalidDimension` if either dimension is zero or does not fit the `u32`
    /// coordinate space.
    pub fn new(width: Width, height: Height) -> Result<WallGrid> {
        let (Width(w), Height(h)) = (width, height);
        let invalid = || Error::from(ErrorKind::InvalidDimension(w, h));

        let (grid_width, grid_height) = match (u32::try_from(w), u32::try_from(h)) {
            (Ok(gw), Ok(gh)) if gw > 0 && gh > 0 => (gw, gh),
            _ => return Err(invalid()),
        };
        let size = w.checked_mul(h).ok_or_else(invalid)?;

        Ok(WallGrid {
            width: grid_width,
            height: grid_height,
            cells: vec![CellState::walled(); size],
            exits: Vec::new(),
        })
    }

    #[inline]
    pub fn width(&self) -> Width {
        Width(self.width as usize)
    }

    #[inline]
    pub fn height(&self) -> Height {
        Height(self.height as usize)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Is the grid coordinate within this grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }

    pub fn cell_state(&self, coord: Cartesian2DCoordinate) -> Option<CellState> {
        self.grid_coordinate_to_index(coord).map(|index| self.cells[index])
    }

    pub fn walls(&self, coord: Cartesian2DCoordinate) -> Option<WallSet> {
        self.cell_state(coord).map(|cell| cell.walls)
    }

    /// Is there a wall on the `direction` side of a cell?
    /// Coordinates outside the grid are reported as walled.
    pub fn has_wall(&self, coord: Cartesian2DCoordinate, direction: CompassPrimary) -> bool {
        self.walls(coord).map_or(true, |walls| walls.contains(direction))
    }

    pub fn is_visited(&self, coord: Cartesian2DCoordinate) -> bool {
        self.cell_state(coord).map_or(false, |cell| cell.visited)
    }

    /// Boundary cells opened up as exits, in the order they were chosen.
    #[inline]
    pub fn exits(&self) -> &[Cartesian2DCoordinate] {
        &self.exits
    }

    pub fn is_exit(&self, coord: Cartesian2DCoordinate) -> bool {
        self.cell_state(coord).map_or(false, |cell| cell.exit)
    }

    /// A uniformly random cell of the grid.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cartesian2DCoordinate {
        let index = rng.gen_range(0..self.size());
        Cartesian2DCoordinate::from_row_major_index(index, self.width())
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }

        let (x, y) = (coord.x, coord.y);
        match direction {
            CompassPrimary::Left if x > 0 => Some(Cartesian2DCoordinate::new(x - 1, y)),
            CompassPrimary::Right if x + 1 < self.width => {
                Some(Cartesian2DCoordinate::new(x + 1, y))
            }
            CompassPrimary::Down if y > 0 => Some(Cartesian2DCoordinate::new(x, y - 1)),
            CompassPrimary::Up if y + 1 < self.height => Some(Cartesian2DCoordinate::new(x, y + 1)),
            _ => None,
        }
    }

    /// Cells to the left, below, above or to the right of a cell, but not necessarily linked by
    /// a passage.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> NeighbourSmallVec {
        DIRECTIONS.iter()
            .filter_map(|&direction| {
                self.neighbour_at_direction(coord, direction)
                    .map(|neighbour_coord| {
                        Neighbour {
                            coord: neighbour_coord,
                            shared_wall: direction,
                        }
                    })
            })
            .collect()
    }

    pub(crate) fn unvisited_neighbours(&self, coord: Cartesian2DCoordinate) -> NeighbourSmallVec {
        self.neighbours(coord)
            .into_iter()
            .filter(|neighbour| !self.is_visited(neighbour.coord))
            .collect()
    }

    /// Is the wall between a cell and its neighbour in `direction` removed from both sides?
    pub fn is_neighbour_linked(&self,
                               coord: Cartesian2DCoordinate,
                               direction: CompassPrimary)
                               -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour_coord| {
                !self.has_wall(coord, direction) &&
                !self.has_wall(neighbour_coord, direction.opposite())
            })
    }

    /// Are two cells in the grid joined by a passage? Order of the arguments does not matter.
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        self.neighbours(a)
            .iter()
            .find(|neighbour| neighbour.coord == b)
            .map_or(false, |neighbour| self.is_neighbour_linked(a, neighbour.shared_wall))
    }

    /// Cells that are linked to a particular cell by a passage.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }

        let linked = self.neighbours(coord)
            .into_iter()
            .filter(|neighbour| self.is_neighbour_linked(coord, neighbour.shared_wall))
            .map(|neighbour| neighbour.coord)
            .collect();
        Some(linked)
    }

    /// Every passage in the grid exactly once, as a pair of cells.
    pub fn iter_links<'a>(&'a self) -> impl Iterator<Item = Link> + 'a {
        self.iter().flat_map(move |coord| {
            [CompassPrimary::Right, CompassPrimary::Up]
                .iter()
                .filter(|&&direction| self.is_neighbour_linked(coord, direction))
                .filter_map(|&direction| self.neighbour_at_direction(coord, direction))
                .map(|neighbour_coord| (coord, neighbour_coord))
                .collect::<SmallVec<[Link; 2]>>()
        })
    }

    pub fn passages_count(&self) -> usize {
        self.iter_links().count()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width(), self.height())
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter {
        BatchIter::rows(self.width(), self.height())
    }

    #[inline]
    pub fn iter_column(&self) -> BatchIter {
        BatchIter::columns(self.width(), self.height())
    }

    pub(crate) fn mark_visited(&mut self, coord: Cartesian2DCoordinate) {
        self.cell_mut(coord).visited = true;
    }

    /// Knock down every wall of a cell and take it out of the carving traversal.
    pub(crate) fn open_exit(&mut self, coord: Cartesian2DCoordinate) {
        let already_exit = {
            let cell = self.cell_mut(coord);
            cell.walls = WallSet::NONE;
            cell.visited = true;
            std::mem::replace(&mut cell.exit, true)
        };
        if !already_exit {
            self.exits.push(coord);
        }
    }

    /// Remove the wall on the `direction` side of a cell and the matching wall of the neighbour.
    /// Returns the neighbour.
    ///
    /// Panics if there is no neighbour in that direction.
    pub(crate) fn carve_passage(&mut self,
                                coord: Cartesian2DCoordinate,
                                direction: CompassPrimary)
                                -> Cartesian2DCoordinate {
        let neighbour_coord = self.expect_neighbour(coord, direction);
        self.cell_mut(coord).walls.remove(direction);
        self.cell_mut(neighbour_coord).walls.remove(direction.opposite());
        neighbour_coord
    }

    /// Put back the wall on the `direction` side of a cell and the matching wall of the
    /// neighbour.
    ///
    /// Panics if there is no neighbour in that direction.
    pub(crate) fn raise_wall(&mut self, coord: Cartesian2DCoordinate, direction: CompassPrimary) {
        let neighbour_coord = self.expect_neighbour(coord, direction);
        self.cell_mut(coord).walls.insert(direction);
        self.cell_mut(neighbour_coord).walls.insert(direction.opposite());
    }

    fn expect_neighbour(&self,
                        coord: Cartesian2DCoordinate,
                        direction: CompassPrimary)
                        -> Cartesian2DCoordinate {
        match self.neighbour_at_direction(coord, direction) {
            Some(neighbour_coord) => neighbour_coord,
            None => panic!("No neighbour {:?} of {:?} in a {}x{} grid",
                           direction, coord, self.width, self.height),
        }
    }

    fn cell_mut(&mut self, coord: Cartesian2DCoordinate) -> &mut CellState {
        match self.grid_coordinate_to_index(coord) {
            Some(index) => &mut self.cells[index],
            None => panic!("{:?} is outside a {}x{} grid", coord, self.width, self.height),
        }
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn small_grid(w: usize, h: usize) -> WallGrid {
        WallGrid::new(Width(w), Height(h)).expect("valid grid dimensions")
    }

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn new_grid_is_fully_walled() {
        for &(w, h) in &[(1, 1), (1, 7), (7, 1), (4, 9)] {
            let g = small_grid(w, h);
            assert_eq!(g.size(), w * h);
            for coord in g.iter() {
                assert_eq!(g.walls(coord), Some(WallSet::ALL));
                assert!(!g.is_visited(coord));
            }
            assert!(g.exits().is_empty());
            assert_eq!(g.passages_count(), 0);
        }
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        for &(w, h) in &[(0, 0), (0, 3), (3, 0)] {
            match WallGrid::new(Width(w), Height(h)) {
                Err(Error(ErrorKind::InvalidDimension(ew, eh), _)) => {
                    assert_eq!((ew, eh), (w, h));
                }
                other => panic!("expected InvalidDimension, got {:?}", other),
            }
        }
    }

    #[test]
    fn dimensions_outside_u32_are_rejected() {
        let too_wide = u32::MAX as u64 + 1;
        if too_wide <= usize::MAX as u64 {
            let result = WallGrid::new(Width(too_wide as usize), Height(1));
            match result {
                Err(Error(ErrorKind::InvalidDimension(..), _)) => {}
                other => panic!("expected InvalidDimension, got {:?}", other),
            }
        }
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[Cartesian2DCoordinate]| {
            let neighbours: Vec<Cartesian2DCoordinate> =
                g.neighbours(coord).iter().map(|n| n.coord).sorted().collect();
            let expected: Vec<Cartesian2DCoordinate> =
                expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(0, 2), gc(1, 1)]);
        check_expected_neighbours(gc(9, 8), &[gc(9, 7), gc(9, 9), gc(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);

        // Outside the grid there is nothing
        check_expected_neighbours(gc(10, 10), &[]);
    }

    #[test]
    fn neighbours_come_in_scan_order_with_their_shared_wall() {
        let g = small_grid(3, 3);
        let neighbours = g.neighbours(gc(1, 1));
        assert_eq!(&*neighbours,
                   &[Neighbour { coord: gc(0, 1), shared_wall: CompassPrimary::Left },
                     Neighbour { coord: gc(1, 0), shared_wall: CompassPrimary::Down },
                     Neighbour { coord: gc(1, 2), shared_wall: CompassPrimary::Up },
                     Neighbour { coord: gc(2, 1), shared_wall: CompassPrimary::Right }]);
    }

    #[test]
    fn neighbour_at_dir() {
        let g = small_grid(2, 2);
        let check_neighbour = |coord, dir: CompassPrimary, expected| {
            assert_eq!(g.neighbour_at_direction(coord, dir), expected);
        };
        check_neighbour(gc(0, 0), CompassPrimary::Down, None);
        check_neighbour(gc(0, 0), CompassPrimary::Up, Some(gc(0, 1)));
        check_neighbour(gc(0, 0), CompassPrimary::Right, Some(gc(1, 0)));
        check_neighbour(gc(0, 0), CompassPrimary::Left, None);

        check_neighbour(gc(1, 1), CompassPrimary::Down, Some(gc(1, 0)));
        check_neighbour(gc(1, 1), CompassPrimary::Up, None);
        check_neighbour(gc(1, 1), CompassPrimary::Right, None);
        check_neighbour(gc(1, 1), CompassPrimary::Left, Some(gc(0, 1)));
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = small_grid(3, 3);
        let coords = &[gc(0, 0), gc(1, 0), gc(2, 0), gc(0, 1), gc(1, 1), gc(2, 1), gc(0, 2),
                       gc(1, 2), gc(2, 2)];
        let indices: Vec<Option<usize>> = coords.iter()
            .map(|coord| g.grid_coordinate_to_index(*coord))
            .collect();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);

        assert_eq!(g.grid_coordinate_to_index(gc(2, 3)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(3, 2)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(u32::MAX, u32::MAX)), None);
    }

    #[test]
    fn random_cell() {
        let g = small_grid(4, 3);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let coord = g.random_cell(&mut rng);
            assert!(g.is_valid_coordinate(coord));
        }
    }

    #[test]
    fn cell_iter() {
        let g = small_grid(2, 2);
        assert_eq!(g.iter().len(), 4);
        assert_eq!(g.iter().collect::<Vec<Cartesian2DCoordinate>>(),
                   &[gc(0, 0), gc(1, 0), gc(0, 1), gc(1, 1)]);
    }

    #[test]
    fn row_iter() {
        let g = small_grid(2, 3);
        assert_eq!(g.iter_row().len(), 3);
        assert_eq!(g.iter_row().collect::<Vec<Vec<Cartesian2DCoordinate>>>(),
                   &[&[gc(0, 0), gc(1, 0)], &[gc(0, 1), gc(1, 1)], &[gc(0, 2), gc(1, 2)]]);
    }

    #[test]
    fn column_iter() {
        let g = small_grid(2, 3);
        assert_eq!(g.iter_column().len(), 2);
        assert_eq!(g.iter_column().collect::<Vec<Vec<Cartesian2DCoordinate>>>(),
                   &[vec![gc(0, 0), gc(0, 1), gc(0, 2)], vec![gc(1, 0), gc(1, 1), gc(1, 2)]]);
    }

    #[test]
    fn carving_removes_the_wall_from_both_sides() {
        let mut g = small_grid(4, 4);
        let a = gc(0, 1);
        let b = gc(0, 2);
        let c = gc(0, 3);

        assert!(!g.is_linked(a, b));
        assert_eq!(g.links(a), Some(CoordinateSmallVec::new()));

        let carved_to = g.carve_passage(a, CompassPrimary::Up);
        assert_eq!(carved_to, b);
        assert!(g.is_linked(a, b) && g.is_linked(b, a));
        assert!(!g.has_wall(a, CompassPrimary::Up));
        assert!(!g.has_wall(b, CompassPrimary::Down));
        assert!(g.has_wall(a, CompassPrimary::Down));
        assert!(g.is_neighbour_linked(a, CompassPrimary::Up));
        assert!(g.is_neighbour_linked(b, CompassPrimary::Down));

        g.carve_passage(c, CompassPrimary::Down);
        assert!(g.is_linked(b, c));
        assert!(!g.is_linked(a, c));
        assert_eq!(&*g.links(b).unwrap(), &[a, c]);
        assert_eq!(g.passages_count(), 2);
        assert_eq!(g.iter_links().collect::<Vec<_>>(), vec![(a, b), (b, c)]);

        g.raise_wall(b, CompassPrimary::Down);
        assert!(!g.is_linked(a, b));
        assert_eq!(g.walls(a), Some(WallSet::ALL));
        assert_eq!(g.passages_count(), 1);
    }

    #[test]
    fn links_to_invalid_coordinates() {
        let g = small_grid(2, 2);
        assert_eq!(g.links(gc(5, 5)), None);
        assert!(!g.is_linked(gc(0, 0), gc(5, 5)));
        assert!(!g.is_linked(gc(0, 0), gc(1, 1)));
        assert!(g.has_wall(gc(5, 5), CompassPrimary::Left));
    }

    #[test]
    #[should_panic]
    fn carving_through_the_boundary_panics() {
        let mut g = small_grid(2, 2);
        g.carve_passage(gc(0, 0), CompassPrimary::Left);
    }

    #[test]
    fn opening_an_exit() {
        let mut g = small_grid(3, 3);
        g.open_exit(gc(0, 1));
        g.open_exit(gc(0, 1));
        assert_eq!(g.exits(), &[gc(0, 1)]);
        assert!(g.is_exit(gc(0, 1)));
        assert!(!g.is_exit(gc(1, 1)));
        assert!(!g.is_exit(gc(9, 9)));
        assert_eq!(g.walls(gc(0, 1)), Some(WallSet::NONE));
        assert!(g.is_visited(gc(0, 1)));
        // The neighbour keeps its wall, so the exit is not linked to anything yet.
        assert!(!g.is_linked(gc(0, 1), gc(1, 1)));
        assert_eq!(&*g.unvisited_neighbours(gc(1, 1))
                       .iter()
                       .map(|n| n.coord)
                       .collect::<Vec<_>>(),
                   &[gc(1, 0), gc(1, 2), gc(2, 1)]);
    }

    #[test]
    fn reading_is_idempotent() {
        let mut g = small_grid(3, 2);
        g.carve_passage(gc(1, 0), CompassPrimary::Right);
        let first = g.iter().map(|c| g.cell_state(c)).collect::<Vec<_>>();
        let second = g.iter().map(|c| g.cell_state(c)).collect::<Vec<_>>();
        assert_eq!(first, second);
    }
}
