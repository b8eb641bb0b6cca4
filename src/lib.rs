//! **origin_shift_mazes** generates perfect mazes with the origin shift random walk and
//! answers connectivity and shortest path queries over them.
//!
//! A maze is a [`grid::Grid`] holding one pointer per cell. The pointers always form a
//! spanning tree rooted at the origin cell, and a wall exists between two neighbouring cells
//! exactly when neither points at the other.
//!
//! ```
//! use origin_shift_mazes::{cells::Cartesian2DCoordinate, generators, pathing, units};
//!
//! let options = generators::MazeOptionsBuilder::new(units::Width(6), units::Height(6))
//!     .seed(Some(7))
//!     .build();
//! let maze = generators::generate(&options).unwrap();
//! let cost = pathing::shortest_path_cost(&maze,
//!                                        Cartesian2DCoordinate::new(0, 0),
//!                                        Cartesian2DCoordinate::new(5, 5),
//!                                        pathing::PathMetric::Hops).unwrap();
//! assert!(cost.is_some());
//! ```

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod pathing;
pub mod units;
mod utils;
