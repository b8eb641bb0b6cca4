use rand::Rng;
use smallvec::SmallVec;

use crate::units::Width;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, row_width: Width) -> Cartesian2DCoordinate {
        let Width(width) = row_width;
        let x = index % width;
        let y = index / width;
        Cartesian2DCoordinate::new(x as u32, y as u32)
    }

    /// The compass direction leading from `self` to an orthogonally adjacent `other`.
    pub fn direction_to(&self, other: Cartesian2DCoordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|dir| offset_coordinate(*self, *dir) == Some(other))
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// The four unit moves. `y` grows southwards, so North is `(0, -1)`.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::West,
                                          CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South];

    /// The `(dx, dy)` unit vector of this direction.
    pub fn vector(self) -> (i8, i8) {
        match self {
            CompassPrimary::North => (0, -1),
            CompassPrimary::South => (0, 1),
            CompassPrimary::East => (1, 0),
            CompassPrimary::West => (-1, 0),
        }
    }

    pub fn from_vector(dx: i8, dy: i8) -> Option<CompassPrimary> {
        match (dx, dy) {
            (0, -1) => Some(CompassPrimary::North),
            (0, 1) => Some(CompassPrimary::South),
            (1, 0) => Some(CompassPrimary::East),
            (-1, 0) => Some(CompassPrimary::West),
            _ => None,
        }
    }

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// Uniform choice among the four directions.
    pub fn rand_direction<R: Rng>(rng: &mut R) -> CompassPrimary {
        const DIRS_COUNT: usize = 4;
        let dir_index = rng.gen::<usize>() % DIRS_COUNT;
        CompassPrimary::ALL[dir_index]
    }
}

/// One grid cell: its single outgoing tree edge plus an optional arithmetic cost.
///
/// `direction == None` marks the origin, the `(0, 0)` vector.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct SquareCell {
    direction: Option<CompassPrimary>,
    weight: u8,
}

impl SquareCell {
    pub const MAX_WEIGHT: u8 = 9;

    pub fn pointing(direction: Option<CompassPrimary>) -> SquareCell {
        SquareCell { direction, weight: 0 }
    }

    #[inline]
    pub fn direction(&self) -> Option<CompassPrimary> {
        self.direction
    }

    #[inline]
    pub fn set_direction(&mut self, direction: Option<CompassPrimary>) {
        self.direction = direction;
    }

    /// `(dx, dy)`, with `(0, 0)` for the origin.
    pub fn direction_vector(&self) -> (i8, i8) {
        self.direction.map_or((0, 0), CompassPrimary::vector)
    }

    #[inline]
    pub fn is_origin(&self) -> bool {
        self.direction.is_none()
    }

    #[inline]
    pub fn weight(&self) -> u8 {
        self.weight
    }

    /// Weights are clamped into `0..=MAX_WEIGHT`.
    pub fn set_weight(&mut self, weight: u8) {
        self.weight = weight.min(Self::MAX_WEIGHT);
    }
}

/// Creates a new coordinate offset 1 cell away in the given direction.
/// Returns None if the coordinate is not representable, it may still be outside a grid.
pub fn offset_coordinate(coord: Cartesian2DCoordinate,
                         dir: CompassPrimary)
                         -> Option<Cartesian2DCoordinate> {
    let (x, y) = (coord.x, coord.y);
    match dir {
        CompassPrimary::North => {
            if y > 0 {
                Some(Cartesian2DCoordinate { x, y: y - 1 })
            } else {
                None
            }
        }
        CompassPrimary::South => y.checked_add(1).map(|y| Cartesian2DCoordinate { x, y }),
        CompassPrimary::East => x.checked_add(1).map(|x| Cartesian2DCoordinate { x, y }),
        CompassPrimary::West => {
            if x > 0 {
                Some(Cartesian2DCoordinate { x: x - 1, y })
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn vectors_round_trip_through_directions() {
        for dir in CompassPrimary::ALL.iter().cloned() {
            let (dx, dy) = dir.vector();
            assert_eq!(CompassPrimary::from_vector(dx, dy), Some(dir));
        }
        assert_eq!(CompassPrimary::from_vector(0, 0), None);
        assert_eq!(CompassPrimary::from_vector(1, 1), None);
    }

    #[test]
    fn opposite_vectors_cancel() {
        for dir in CompassPrimary::ALL.iter().cloned() {
            let (dx, dy) = dir.vector();
            let (ox, oy) = dir.opposite().vector();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn offsets_at_the_representable_edges() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(offset_coordinate(gc(0, 0), CompassPrimary::North), None);
        assert_eq!(offset_coordinate(gc(0, 0), CompassPrimary::West), None);
        assert_eq!(offset_coordinate(gc(0, 0), CompassPrimary::East), Some(gc(1, 0)));
        assert_eq!(offset_coordinate(gc(0, 0), CompassPrimary::South), Some(gc(0, 1)));
        assert_eq!(offset_coordinate(gc(u32::MAX, 3), CompassPrimary::East), None);
    }

    #[test]
    fn direction_between_neighbours() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(gc(1, 1).direction_to(gc(1, 0)), Some(CompassPrimary::North));
        assert_eq!(gc(1, 1).direction_to(gc(0, 1)), Some(CompassPrimary::West));
        assert_eq!(gc(1, 1).direction_to(gc(2, 2)), None);
        assert_eq!(gc(1, 1).direction_to(gc(1, 1)), None);
    }

    #[test]
    fn row_major_index_conversion() {
        assert_eq!(Cartesian2DCoordinate::from_row_major_index(7, Width(3)),
                   Cartesian2DCoordinate::new(1, 2));
        assert_eq!(Cartesian2DCoordinate::from((4, 2)), Cartesian2DCoordinate::new(4, 2));
    }

    #[test]
    fn weights_are_clamped() {
        let mut cell = SquareCell::pointing(Some(CompassPrimary::East));
        cell.set_weight(200);
        assert_eq!(cell.weight(), SquareCell::MAX_WEIGHT);
        assert_eq!(cell.direction_vector(), (1, 0));
        assert!(!cell.is_origin());
        assert_eq!(SquareCell::pointing(None).direction_vector(), (0, 0));
    }

    #[test]
    fn random_directions_cover_all_four() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        let mut seen = Vec::new();
        for _ in 0..200 {
            let dir = CompassPrimary::rand_direction(&mut rng);
            if !seen.contains(&dir) {
                seen.push(dir);
            }
        }
        assert_eq!(seen.len(), 4);
    }
}
