use fnv::FnvHashMap;
use log::{debug, trace};
use petgraph::unionfind::UnionFind;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, WallSet};
use crate::errors::*;
use crate::grid::{Neighbour, WallGrid};
use crate::units::{ExitsCount, Height, Width};

/// Generate a perfect maze with `exits` openings on its boundary.
///
/// The grid starts fully walled, `exits` distinct boundary cells are knocked open, then the
/// recursive backtracker carves passages until every cell is connected to every other cell
/// by exactly one path.
///
/// All randomness comes from `rng`, so a seeded rng gives the same maze every time. Generating
/// several mazes in parallel needs one rng per maze.
pub fn generate<R>(width: Width,
                   height: Height,
                   exits: ExitsCount,
                   rng: &mut R)
                   -> Result<WallGrid>
    where R: Rng + ?Sized
{
    debug!("Generating a {}x{} maze with {} exits", width.0, height.0, exits.0);

    let mut grid = WallGrid::new(width, height)?;
    place_exits(&mut grid, exits, rng)?;
    recursive_backtracker(&mut grid, rng);

    debug!("Generated maze with {} passages", grid.passages_count());
    Ok(grid)
}

/// The cells on the outer edge of the grid, each listed once.
pub fn boundary_cells(grid: &WallGrid) -> Vec<Cartesian2DCoordinate> {
    let (Width(w), Height(h)) = (grid.width(), grid.height());
    let (w, h) = (w as u32, h as u32);

    let mut cells = Vec::with_capacity(boundary_cells_count(grid));
    for x in 0..w {
        cells.push(Cartesian2DCoordinate::new(x, 0));
        if h > 1 {
            cells.push(Cartesian2DCoordinate::new(x, h - 1));
        }
    }
    for y in 1..h.saturating_sub(1) {
        cells.push(Cartesian2DCoordinate::new(0, y));
        if w > 1 {
            cells.push(Cartesian2DCoordinate::new(w - 1, y));
        }
    }
    cells
}

pub fn boundary_cells_count(grid: &WallGrid) -> usize {
    let (Width(w), Height(h)) = (grid.width(), grid.height());
    if w == 1 || h == 1 {
        w * h
    } else {
        2 * (w + h) - 4
    }
}

/// Open up `exits` boundary cells chosen uniformly at random without replacement.
///
/// Each exit loses all four walls and is marked visited, so the carving pass treats it as
/// already part of the maze. Cells that are already exits are not chosen again.
/// Fails with `ExitCountExceedsBoundary`, leaving the grid untouched, if there are not enough
/// boundary cells.
pub fn place_exits<R>(grid: &mut WallGrid,
                      exits: ExitsCount,
                      rng: &mut R)
                      -> Result<Vec<Cartesian2DCoordinate>>
    where R: Rng + ?Sized
{
    let mut candidates = boundary_cells(grid);
    candidates.retain(|coord| !grid.is_exit(*coord));

    let ExitsCount(count) = exits;
    if count > candidates.len() {
        return Err(ErrorKind::ExitCountExceedsBoundary(count, candidates.len()).into());
    }

    let mut chosen = Vec::with_capacity(count);
    for _ in 0..count {
        let index = rng.gen_range(0..candidates.len());
        let coord = candidates.swap_remove(index);
        grid.open_exit(coord);
        chosen.push(coord);
    }

    trace!("Placed exits at {:?}", chosen);
    Ok(chosen)
}

/// Apply the recursive backtracker maze generation algorithm to a grid.
///
/// Starting from a random cell (which may be an exit) it walks to a random unvisited neighbour,
/// knocking down the wall between them, and backtracks along its path when it reaches a dead
/// end. It uses an explicit stack rather than recursion so large grids cannot overflow the
/// call stack.
///
/// Exits already count as visited so the walk never enters them. On thin grids they can cut
/// the rest of the cells into separate regions, in which case each unreached region gets its
/// own walk. Finally every exit is joined to the regions around it, one passage per region, and
/// its remaining inner walls are put back. Its outward facing walls stay open.
pub fn recursive_backtracker<R>(grid: &mut WallGrid, rng: &mut R)
    where R: Rng + ?Sized
{
    let mut carver = Carver::new(grid);

    let start = carver.grid.random_cell(rng);
    carver.walk_from(start, rng);

    for index in 0..carver.grid.size() {
        let coord = Cartesian2DCoordinate::from_row_major_index(index, carver.grid.width());
        if !carver.grid.is_visited(coord) {
            trace!("Exits cut off {:?} from the first walk, walking again from there", coord);
            carver.walk_from(coord, rng);
        }
    }

    carver.join_exits(rng);
}

/// Carving state shared by the walks and the exit joining.
struct Carver<'a> {
    grid: &'a mut WallGrid,
    // Cells already connected to one another by passages.
    regions: UnionFind<usize>,
    // Passages opened from each exit. Exits start with no walls at all, so the walls alone
    // cannot tell a real passage from a gap.
    exit_openings: FnvHashMap<Cartesian2DCoordinate, WallSet>,
}

impl<'a> Carver<'a> {
    fn new(grid: &'a mut WallGrid) -> Carver<'a> {
        let regions = UnionFind::new(grid.size());
        let exit_openings = grid.exits()
            .iter()
            .map(|&exit| (exit, WallSet::NONE))
            .collect();
        Carver {
            grid,
            regions,
            exit_openings,
        }
    }

    fn walk_from<R>(&mut self, start: Cartesian2DCoordinate, rng: &mut R)
        where R: Rng + ?Sized
    {
        self.grid.mark_visited(start);
        let mut stack = vec![start];

        while let Some(&current) = stack.last() {
            let unvisited = self.grid.unvisited_neighbours(current);

            if let Some(&Neighbour { coord, shared_wall }) = unvisited.choose(rng) {
                self.carve(current, shared_wall);
                self.grid.mark_visited(coord);
                stack.push(coord);
            } else {
                // dead end
                stack.pop();
            }
        }
    }

    fn join_exits<R>(&mut self, rng: &mut R)
        where R: Rng + ?Sized
    {
        let exits = self.grid.exits().to_vec();

        for &exit in &exits {
            let mut neighbours = self.grid.neighbours(exit);
            neighbours.shuffle(rng);
            for neighbour in neighbours {
                if !self.regions.equiv(self.index(exit), self.index(neighbour.coord)) {
                    self.carve(exit, neighbour.shared_wall);
                }
            }
        }

        for &exit in &exits {
            let openings = self.exit_openings[&exit];
            for neighbour in self.grid.neighbours(exit) {
                if !openings.contains(neighbour.shared_wall) {
                    self.grid.raise_wall(exit, neighbour.shared_wall);
                }
            }
        }
    }

    fn carve(&mut self, from: Cartesian2DCoordinate, direction: CompassPrimary) {
        let to = self.grid.carve_passage(from, direction);
        let (from_index, to_index) = (self.index(from), self.index(to));
        self.regions.union(from_index, to_index);

        if let Some(openings) = self.exit_openings.get_mut(&from) {
            openings.insert(direction);
        }
        if let Some(openings) = self.exit_openings.get_mut(&to) {
            openings.insert(direction.opposite());
        }
    }

    fn index(&self, coord: Cartesian2DCoordinate) -> usize {
        match self.grid.grid_coordinate_to_index(coord) {
            Some(index) => index,
            None => panic!("Carving reached {:?} outside the grid", coord),
        }
    }
}
