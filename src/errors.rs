use thiserror::Error;

use crate::cells::Cartesian2DCoordinate;

/// Caller mistakes reported by grid construction and the connectivity queries.
///
/// None of these are produced by the generator itself, it cannot make an invalid grid.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Error)]
pub enum MazeError {
    /// Width or height of zero.
    #[error("grid width and height must both be at least 1")]
    InvalidDimensions,
    /// The coordinate lies outside the grid.
    #[error("coordinate ({}, {}) is outside the grid", .0.x, .0.y)]
    InvalidCoordinate(Cartesian2DCoordinate),
    /// The two cells are not north/south/east/west neighbours.
    #[error("cells ({}, {}) and ({}, {}) are not adjacent", .0.x, .0.y, .1.x, .1.y)]
    NotAdjacent(Cartesian2DCoordinate, Cartesian2DCoordinate),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_cells() {
        let gc = Cartesian2DCoordinate::new;
        assert_eq!(MazeError::InvalidDimensions.to_string(),
                   "grid width and height must both be at least 1");
        assert_eq!(MazeError::InvalidCoordinate(gc(7, 3)).to_string(),
                   "coordinate (7, 3) is outside the grid");
        assert_eq!(MazeError::NotAdjacent(gc(0, 0), gc(1, 1)).to_string(),
                   "cells (0, 0) and (1, 1) are not adjacent");
    }

    #[test]
    fn usable_as_boxed_std_error() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(MazeError::InvalidDimensions);
        assert!(boxed.source().is_none());
    }
}
