// Breadth first search over the passages of a grid.
//
// The generated mazes are trees, so there is exactly one simple path between two cells and
// the first time the search reaches a cell it has found that path. Both metrics below can
// therefore share the same FIFO flood fill: no cell is ever relaxed twice.

use std::collections::VecDeque;

use log::error;
use smallvec::SmallVec;

use crate::cells::Cartesian2DCoordinate;
use crate::errors::MazeError;
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap};

/// How the cost of a path is counted.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum PathMetric {
    /// Number of steps between cells.
    Hops,
    /// Sum of the weights of every cell on the path, both end points included.
    CellWeights,
}

impl PathMetric {
    fn start_cost(self, grid: &Grid, start: Cartesian2DCoordinate) -> u32 {
        match self {
            PathMetric::Hops => 0,
            PathMetric::CellWeights => grid.weight(start).unwrap_or(0) as u32,
        }
    }

    fn step_cost(self, grid: &Grid, into: Cartesian2DCoordinate) -> u32 {
        match self {
            PathMetric::Hops => 1,
            PathMetric::CellWeights => grid.weight(into).unwrap_or(0) as u32,
        }
    }
}

/// Costs from one start cell to every cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: Cartesian2DCoordinate,
    metric: PathMetric,
    distances: FnvHashMap<Cartesian2DCoordinate, u32>,
    predecessors: FnvHashMap<Cartesian2DCoordinate, Cartesian2DCoordinate>,
    max_distance: u32,
}

impl Distances {
    pub fn for_grid(grid: &Grid,
                    start_coordinate: Cartesian2DCoordinate,
                    metric: PathMetric)
                    -> Result<Distances, MazeError> {
        Distances::flood(grid, start_coordinate, metric, None)
    }

    /// The flood fill. Cells are marked on enqueue, and the search stops early once
    /// `stop_at` has been reached.
    fn flood(grid: &Grid,
             start_coordinate: Cartesian2DCoordinate,
             metric: PathMetric,
             stop_at: Option<Cartesian2DCoordinate>)
             -> Result<Distances, MazeError> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return Err(MazeError::InvalidCoordinate(start_coordinate));
        }

        let cells_count = grid.size();
        let mut distances = utils::fnv_hashmap(cells_count);
        let mut predecessors = utils::fnv_hashmap(cells_count);
        let start_cost = metric.start_cost(grid, start_coordinate);
        let mut max = start_cost;
        distances.insert(start_coordinate, start_cost);

        let mut frontier = VecDeque::with_capacity(cells_count);
        frontier.push_back(start_coordinate);

        'search: while let Some(cell_coord) = frontier.pop_front() {
            let distance_to_cell = distances[&cell_coord];

            for neighbour in grid.neighbours(cell_coord).iter().cloned() {
                if distances.contains_key(&neighbour) || !grid.is_linked(cell_coord, neighbour) {
                    continue;
                }

                let distance_to_link = distance_to_cell + metric.step_cost(grid, neighbour);
                if distance_to_link > max {
                    max = distance_to_link;
                }
                distances.insert(neighbour, distance_to_link);
                predecessors.insert(neighbour, cell_coord);
                frontier.push_back(neighbour);

                if stop_at == Some(neighbour) {
                    break 'search;
                }
            }
        }

        Ok(Distances {
            start_coordinate,
            metric,
            distances,
            predecessors,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn metric(&self) -> PathMetric {
        self.metric
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    /// Every reached cell at the maximum distance, in coordinate order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let furthest_distance = self.max();
        let mut furthest = self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .collect::<SmallVec<[Cartesian2DCoordinate; 8]>>();
        furthest.sort();
        furthest
    }

    /// The cells from the start to `end` inclusive, or None if `end` was never reached.
    pub fn path_to(&self, end: Cartesian2DCoordinate) -> Option<Vec<Cartesian2DCoordinate>> {
        if !self.distances.contains_key(&end) {
            return None;
        }
        let mut path = vec![end];
        let mut current = end;
        while current != self.start_coordinate {
            current = *self.predecessors.get(&current)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

/// The cost of the unique path between two cells.
///
/// `Ok(None)` means `end` cannot be reached from `start`. A grid built by the origin shift
/// walk never does that, so it is logged as an error: the maze invariant was broken.
pub fn shortest_path_cost(grid: &Grid,
                          start: Cartesian2DCoordinate,
                          end: Cartesian2DCoordinate,
                          metric: PathMetric)
                          -> Result<Option<u32>, MazeError> {
    if !grid.is_valid_coordinate(end) {
        return Err(MazeError::InvalidCoordinate(end));
    }
    let distances = Distances::flood(grid, start, metric, Some(end))?;
    let cost = distances.distance_from_start_to(end);
    if cost.is_none() {
        error!("no path from {:?} to {:?}: the grid is not a perfect maze", start, end);
    }
    Ok(cost)
}

/// The cells along the path from the distance map's start to `end`.
pub fn shortest_path(distances_from_start: &Distances,
                     end_point: Cartesian2DCoordinate)
                     -> Option<Vec<Cartesian2DCoordinate>> {
    distances_from_start.path_to(end_point)
}

/// The longest path (by hops) in a perfect maze: the furthest cell from an arbitrary cell
/// is one end of it, and the furthest cell from that end is the other.
pub fn longest_path(grid: &Grid) -> Option<Vec<Cartesian2DCoordinate>> {
    let arbitrary_start_point = Cartesian2DCoordinate::new(0, 0);
    let first_distances = Distances::for_grid(grid, arbitrary_start_point, PathMetric::Hops).ok()?;

    let long_path_start_coordinate = *first_distances.furthest_points_on_grid().first()?;
    let distances_from_start =
        Distances::for_grid(grid, long_path_start_coordinate, PathMetric::Hops).ok()?;
    let end_point = *distances_from_start.furthest_points_on_grid().first()?;

    shortest_path(&distances_from_start, end_point)
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::cells::CompassPrimary;
    use crate::generators::{self, MazeOptionsBuilder};
    use crate::units::{Height, Width};

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn small_grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("valid grid dimensions")
    }

    #[test]
    fn hop_cost_on_initial_two_by_two() {
        let g = small_grid(2, 2);
        assert_eq!(shortest_path_cost(&g, gc(0, 0), gc(1, 1), PathMetric::Hops), Ok(Some(2)));
        // (0,0) and (0,1) are neighbours but walled off, the way round is 3 steps
        assert_eq!(shortest_path_cost(&g, gc(0, 0), gc(0, 1), PathMetric::Hops), Ok(Some(3)));
        assert_eq!(shortest_path_cost(&g, gc(1, 0), gc(1, 0), PathMetric::Hops), Ok(Some(0)));
    }

    #[test]
    fn weighted_cost_includes_both_ends() {
        let mut g = small_grid(2, 2);
        g.set_weight(gc(0, 0), 1).unwrap();
        g.set_weight(gc(1, 0), 2).unwrap();
        g.set_weight(gc(1, 1), 3).unwrap();
        g.set_weight(gc(0, 1), 9).unwrap();
        let cost = |a, b| shortest_path_cost(&g, a, b, PathMetric::CellWeights);
        assert_eq!(cost(gc(0, 0), gc(1, 1)), Ok(Some(6)));
        assert_eq!(cost(gc(1, 1), gc(0, 0)), Ok(Some(6)));
        assert_eq!(cost(gc(0, 0), gc(0, 1)), Ok(Some(15)));
        assert_eq!(cost(gc(0, 1), gc(0, 1)), Ok(Some(9)));
    }

    #[test]
    fn invalid_end_points_are_errors() {
        let g = small_grid(3, 3);
        assert_eq!(shortest_path_cost(&g, gc(3, 0), gc(0, 0), PathMetric::Hops),
                   Err(MazeError::InvalidCoordinate(gc(3, 0))));
        assert_eq!(shortest_path_cost(&g, gc(0, 0), gc(0, 3), PathMetric::Hops),
                   Err(MazeError::InvalidCoordinate(gc(0, 3))));
        assert!(Distances::for_grid(&g, gc(5, 5), PathMetric::Hops).is_err());
    }

    #[test]
    fn broken_grid_reports_unreachable() {
        let mut g = small_grid(2, 2);
        // (1,0) stops pointing south and (0,0) already points at it: (1,0)-(1,1) walled off,
        // and the top row now only links to itself
        g.cell_mut(gc(1, 0)).unwrap().set_direction(Some(CompassPrimary::West));
        assert_eq!(shortest_path_cost(&g, gc(0, 0), gc(1, 1), PathMetric::Hops), Ok(None));
        assert_eq!(shortest_path_cost(&g, gc(0, 0), gc(1, 0), PathMetric::Hops), Ok(Some(1)));
    }

    #[test]
    fn start() {
        let g = small_grid(3, 3);
        let start_coordinate = gc(1, 1);
        let distances = Distances::for_grid(&g, start_coordinate, PathMetric::Hops).unwrap();
        assert_eq!(start_coordinate, distances.start());
        assert_eq!(distances.metric(), PathMetric::Hops);
        assert_eq!(distances.distance_from_start_to(start_coordinate), Some(0));
    }

    #[test]
    fn distances_on_initial_grid() {
        let g = small_grid(3, 2);
        let distances = Distances::for_grid(&g, gc(0, 0), PathMetric::Hops).unwrap();
        // the initial tree is the top row, the last column, then the bottom row
        assert_eq!(distances.distance_from_start_to(gc(2, 0)), Some(2));
        assert_eq!(distances.distance_from_start_to(gc(2, 1)), Some(3));
        assert_eq!(distances.distance_from_start_to(gc(0, 1)), Some(5));
        assert_eq!(distances.max(), 5);
        assert_eq!(&*distances.furthest_points_on_grid(), &[gc(0, 1)]);
        assert_eq!(distances.distance_from_start_to(gc(9, 9)), None);
    }

    #[test]
    fn path_on_initial_grid() {
        let g = small_grid(3, 2);
        let distances = Distances::for_grid(&g, gc(0, 0), PathMetric::Hops).unwrap();
        assert_eq!(shortest_path(&distances, gc(1, 1)),
                   Some(vec![gc(0, 0), gc(1, 0), gc(2, 0), gc(2, 1), gc(1, 1)]));
        assert_eq!(shortest_path(&distances, gc(0, 0)), Some(vec![gc(0, 0)]));
    }

    #[test]
    fn longest_path_on_initial_grid() {
        let g = small_grid(3, 2);
        let path = longest_path(&g).unwrap();
        assert_eq!(path.len(), 6);
        let ends = [path[0], path[5]];
        assert!(ends.contains(&gc(0, 0)) && ends.contains(&gc(0, 1)));
    }

    #[test]
    fn longest_path_on_single_cell() {
        let g = small_grid(1, 1);
        assert_eq!(longest_path(&g), Some(vec![gc(0, 0)]));
    }

    #[test]
    fn every_pair_reachable_after_generation() {
        let options = MazeOptionsBuilder::new(Width(6), Height(5)).seed(Some(21)).build();
        let g = generators::generate(&options).unwrap();
        for a in g.iter() {
            let distances = Distances::for_grid(&g, a, PathMetric::Hops).unwrap();
            for b in g.iter() {
                assert!(distances.distance_from_start_to(b).is_some());
            }
        }
    }

    #[test]
    fn quickcheck_generated_mazes_fully_connected() {
        fn prop(w: u8, h: u8, seed: u64) -> TestResult {
            let (w, h) = (w as usize % 12, h as usize % 12);
            if w == 0 || h == 0 {
                return TestResult::discard();
            }
            let options = MazeOptionsBuilder::new(Width(w), Height(h))
                .seed(Some(seed))
                .weighted(true)
                .build();
            let g = generators::generate(&options).unwrap();
            let mut rng = XorShiftRng::seed_from_u64(seed);
            let (start, end) = generators::random_start_and_finish(&g, &mut rng);

            let hops = shortest_path_cost(&g, start, end, PathMetric::Hops).unwrap();
            let back = shortest_path_cost(&g, end, start, PathMetric::Hops).unwrap();
            let sum = shortest_path_cost(&g, start, end, PathMetric::CellWeights).unwrap();
            let path = Distances::for_grid(&g, start, PathMetric::Hops)
                .unwrap()
                .path_to(end)
                .unwrap();
            let path_weights = path.iter().map(|c| g.weight(*c).unwrap() as u32).sum::<u32>();

            TestResult::from_bool(hops.is_some() && hops == back &&
                                  hops == Some(path.len() as u32 - 1) &&
                                  sum == Some(path_weights))
        }
        quickcheck(prop as fn(u8, u8, u64) -> TestResult);
    }

    #[test]
    fn quickcheck_path_steps_are_connected() {
        fn prop(seed: u64) -> bool {
            let options = MazeOptionsBuilder::new(Width(7), Height(4)).seed(Some(seed)).build();
            let g = generators::generate(&options).unwrap();
            match longest_path(&g) {
                Some(path) => path.windows(2).all(|pair| g.connected(pair[0], pair[1]) == Ok(true)),
                None => false,
            }
        }
        quickcheck(prop as fn(u64) -> bool);
    }

    #[test]
    fn generated_mazes_are_symmetric_and_fully_reachable() {
        let sizes = [(1, 1), (1, 7), (7, 1), (5, 9)];
        for seed in 0..50 {
            for &(w, h) in &sizes {
                let options = MazeOptionsBuilder::new(Width(w), Height(h))
                    .seed(Some(seed))
                    .weighted(true)
                    .build();
                let g = generators::generate(&options).unwrap();
                for a in g.iter() {
                    for b in g.neighbours(a).iter() {
                        assert_eq!(g.connected(a, *b), g.connected(*b, a));
                    }
                    for b in g.iter() {
                        let cost = shortest_path_cost(&g, a, b, PathMetric::CellWeights).unwrap();
                        assert!(cost.is_some(), "{:?} unreachable from {:?}", b, a);
                    }
                }
            }
        }
    }
}
