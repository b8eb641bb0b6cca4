use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, SquareCell};
use crate::errors::MazeError;
use crate::grid::Grid;
use crate::units::{Height, Width};

/// Walk length per cell used when no explicit iteration count is given.
pub const ITERATIONS_PER_CELL: usize = 20;

/// Moves the origin one cell in `direction`, the deterministic half of an origin shift step.
///
/// The old origin starts pointing at the new one and the new origin loses its pointer,
/// so the pointers stay a spanning in-tree. A direction leading off the grid changes
/// nothing. Returns whether the origin moved.
pub fn shift_origin(grid: &mut Grid, direction: CompassPrimary) -> bool {
    let origin = grid.origin();
    let next_origin = match grid.neighbour_at_direction(origin, direction) {
        Some(coord) => coord,
        None => {
            trace!("origin {:?} cannot move {:?}", origin, direction);
            return false;
        }
    };

    if let Some(cell) = grid.cell_mut(origin) {
        cell.set_direction(Some(direction));
    }
    if let Some(cell) = grid.cell_mut(next_origin) {
        cell.set_direction(None);
    }
    grid.set_origin(next_origin);
    true
}

/// One step of the origin shift random walk: pick one of the four directions uniformly
/// and try to move the origin that way. Off-grid draws are wasted, not retried.
pub fn origin_shift_step<R: Rng>(grid: &mut Grid, rng: &mut R) -> bool {
    let direction = CompassPrimary::rand_direction(rng);
    shift_origin(grid, direction)
}

/// Runs `iterations` origin shift steps. Every intermediate grid is already a perfect maze,
/// more steps only randomise it further. Returns how many steps moved the origin.
pub fn origin_shift<R: Rng>(grid: &mut Grid, iterations: usize, rng: &mut R) -> usize {
    let mut shifts = 0;
    for _ in 0..iterations {
        if origin_shift_step(grid, rng) {
            shifts += 1;
        }
    }
    debug!("origin shift: {} of {} steps moved the origin, now at {:?}",
           shifts,
           iterations,
           grid.origin());
    shifts
}

pub fn default_iterations(grid: &Grid) -> usize {
    grid.size() * ITERATIONS_PER_CELL
}

/// Gives every cell a uniform random weight in `0..=9` for the arithmetic mazes.
pub fn assign_random_weights<R: Rng>(grid: &mut Grid, rng: &mut R) {
    for coord in grid.iter() {
        let weight = rng.gen_range(0..=SquareCell::MAX_WEIGHT);
        if let Some(cell) = grid.cell_mut(coord) {
            cell.set_weight(weight);
        }
    }
}

/// A random (start, finish) pair for the navigation mazes. The two differ unless the grid
/// has a single cell.
pub fn random_start_and_finish<R: Rng>(grid: &Grid,
                                       rng: &mut R)
                                       -> (Cartesian2DCoordinate, Cartesian2DCoordinate) {
    let finish = grid.random_cell(rng);
    let mut start = grid.random_cell(rng);
    while start == finish && grid.size() > 1 {
        start = grid.random_cell(rng);
    }
    (start, finish)
}

/// Everything needed to build one maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeOptions {
    width: Width,
    height: Height,
    iterations: Option<usize>,
    seed: Option<u64>,
    weighted: bool,
}

impl MazeOptions {
    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    /// The explicit walk length, or `width * height * ITERATIONS_PER_CELL`.
    pub fn iterations(&self) -> usize {
        self.iterations
            .unwrap_or_else(|| self.width.0 * self.height.0 * ITERATIONS_PER_CELL)
    }

    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[inline]
    pub fn weighted(&self) -> bool {
        self.weighted
    }

    /// The random source for the walk and the weights.
    fn walk_rng(&self) -> XorShiftRng {
        match self.seed {
            Some(seed) => XorShiftRng::seed_from_u64(seed),
            None => XorShiftRng::from_entropy(),
        }
    }

    /// A random source for choosing start and finish cells after `generate`. Seeded runs get
    /// a stream distinct from the walk's, so the placement does not replay the walk's draws.
    pub fn placement_rng(&self) -> XorShiftRng {
        match self.seed {
            Some(seed) => XorShiftRng::seed_from_u64(seed.wrapping_add(1)),
            None => XorShiftRng::from_entropy(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MazeOptionsBuilder {
    options: MazeOptions,
}

impl MazeOptionsBuilder {
    pub fn new(width: Width, height: Height) -> MazeOptionsBuilder {
        MazeOptionsBuilder {
            options: MazeOptions {
                width,
                height,
                iterations: None,
                seed: None,
                weighted: false,
            },
        }
    }
    pub fn iterations(mut self, iterations: Option<usize>) -> MazeOptionsBuilder {
        self.options.iterations = iterations;
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> MazeOptionsBuilder {
        self.options.seed = seed;
        self
    }
    pub fn weighted(mut self, weighted: bool) -> MazeOptionsBuilder {
        self.options.weighted = weighted;
        self
    }
    pub fn build(self) -> MazeOptions {
        self.options
    }
}

/// Builds the initial grid and randomises it with the origin shift walk.
///
/// The same options with the same seed always give the same maze (and weights).
pub fn generate(options: &MazeOptions) -> Result<Grid, MazeError> {
    let mut grid = Grid::new(options.width(), options.height())?;
    let mut rng = options.walk_rng();

    origin_shift(&mut grid, options.iterations(), &mut rng);
    if options.weighted() {
        assign_random_weights(&mut grid, &mut rng);
    }
    Ok(grid)
}
