// Flood fill distances over the passages of a generated maze.
//
// In a perfect maze there is exactly one path between any two cells, so a breadth first flood
// fill from a start cell gives both the distance to every other cell and, walking back down
// the distances, the path to it. A cell missing from the distances is unreachable.

use std::fmt::{Debug, Display};
use std::ops::Add;

use fnv::FnvHashMap;
use itertools::Itertools;
use num::traits::{Bounded, One, Unsigned, Zero};
use smallvec::SmallVec;

use crate::cells::Cartesian2DCoordinate;
use crate::grid::WallGrid;

// Trait (hack) used purely as a generic type parameter alias because it looks ugly to type this
// out each time.
pub trait MaxDistance
    : Zero + One + Bounded + Unsigned + Add + Debug + Clone + Copy + Display + Ord
    {
}
impl<T> MaxDistance for T
    where T: Zero + One + Bounded + Unsigned + Add + Debug + Clone + Copy + Display + Ord
{
}

#[derive(Debug, Clone)]
pub struct Distances<MaxDistanceT = u32> {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, MaxDistanceT>,
    max_distance: MaxDistanceT,
}

impl<MaxDistanceT> Distances<MaxDistanceT>
    where MaxDistanceT: MaxDistance
{
    /// Distances from `start_coordinate` to every cell reachable from it.
    /// Returns None if the start is not on the grid.
    ///
    /// `MaxDistanceT` must be wide enough for the longest path in the maze.
    pub fn new(grid: &WallGrid,
               start_coordinate: Cartesian2DCoordinate)
               -> Option<Distances<MaxDistanceT>> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut max = Zero::zero();
        let mut distances = FnvHashMap::with_capacity_and_hasher(grid.size(), Default::default());
        distances.insert(start_coordinate, Zero::zero());

        // No weights on the passages, every step is one from the previous cell, so the first
        // distance recorded for a cell is already the shortest and the map doubles as the
        // visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell: MaxDistanceT = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                let links = grid.links(*cell_coord)
                    .expect("Frontier cells are always on the grid.");
                for link_coordinate in links {
                    if !distances.contains_key(&link_coordinate) {
                        distances.insert(link_coordinate, distance_to_cell + One::one());
                        new_frontier.push(link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<MaxDistanceT> {
        self.distances.get(&coord).cloned()
    }

    /// How many cells, the start included, can be reached from the start.
    #[inline]
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// The cells at the maximum distance from the start, in coordinate order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let furthest_distance = self.max();

        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .sorted()
            .collect()
    }
}

/// The path from the start of `distances_from_start` to `end_point`, both ends included.
/// Returns None if the end point cannot be reached.
pub fn shortest_path<MaxDistanceT>(grid: &WallGrid,
                                   distances_from_start: &Distances<MaxDistanceT>,
                                   end_point: Cartesian2DCoordinate)
                                   -> Option<Vec<Cartesian2DCoordinate>>
    where MaxDistanceT: MaxDistance
{
    distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {

        let current_distance_to_start = distances_from_start.distance_from_start_to(current_coord)?;

        let closest_to_start = grid.links(current_coord)?
            .into_iter()
            .filter_map(|coord| {
                distances_from_start.distance_from_start_to(coord).map(|distance| (coord, distance))
            })
            .min_by_key(|&(_, distance)| distance);

        match closest_to_start {
            Some((closer_coord, closer_distance))
                if closer_distance < current_distance_to_start => {
                current_coord = closer_coord;
                path.push(current_coord);
            }
            // Not getting any closer: the distances do not belong to this grid.
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}

/// The longest path in a perfect maze.
///
/// The cell furthest from any cell is one end of the longest path, and the cell furthest from
/// that is the other end. On a maze with cycles or unreachable regions the result is just some
/// long path.
pub fn dijkstra_longest_path<MaxDistanceT>(grid: &WallGrid) -> Option<Vec<Cartesian2DCoordinate>>
    where MaxDistanceT: MaxDistance
{
    let arbitrary_start_point = Cartesian2DCoordinate::new(0, 0);
    let first_distances = Distances::<MaxDistanceT>::new(grid, arbitrary_start_point)?;

    let long_path_start_coordinate = first_distances.furthest_points_on_grid()[0];

    let distances_from_start = Distances::<MaxDistanceT>::new(grid, long_path_start_coordinate)?;
    let end_point = distances_from_start.furthest_points_on_grid()[0];

    shortest_path(grid, &distances_from_start, end_point)
}
