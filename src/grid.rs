use std::fmt;
use std::rc::Rc;

use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;

use crate::cells::{self, Cartesian2DCoordinate, CompassPrimary, CoordinateSmallVec, SquareCell};
use crate::errors::MazeError;
use crate::grid_displays::GridDisplay;
use crate::grid_iterators::{BatchIter, CellIter};
use crate::units::{ColumnsCount, EdgesCount, Height, NodesCount, RowsCount, Width};

/// A rectangular maze stored as one outgoing pointer per cell.
///
/// The pointers always form a spanning in-tree rooted at the origin cell, so the
/// passages derived from them (see `connected`) form a perfect maze.
#[derive(Clone)]
pub struct Grid {
    cells: Vec<SquareCell>,
    row_width: Width,
    column_height: Height,
    origin: Cartesian2DCoordinate,
    grid_display: Option<Rc<dyn GridDisplay>>,
}

/// Result of trying to walk one step from a cell.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Movement {
    Moved(Cartesian2DCoordinate),
    /// A wall separates the two cells.
    Blocked,
    /// The step would leave the grid.
    OutOfBounds,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Grid :: width: {:?}, height: {:?}, origin: {:?}, cells: {:?}",
               self.row_width,
               self.column_height,
               self.origin,
               self.cells)
    }
}

// Equality is over the maze itself, any display overlay is ignored.
impl PartialEq for Grid {
    fn eq(&self, other: &Grid) -> bool {
        self.row_width == other.row_width && self.column_height == other.column_height &&
        self.origin == other.origin && self.cells == other.cells
    }
}
impl Eq for Grid {}

impl Grid {
    /// Builds the starting spanning tree: every cell points east except the last
    /// column which points south, and the bottom right cell is the origin.
    pub fn new(row_width: Width, column_height: Height) -> Result<Grid, MazeError> {
        let (Width(width), Height(height)) = (row_width, column_height);
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions);
        }
        if width.checked_mul(height).is_none() || width > u32::MAX as usize ||
           height > u32::MAX as usize {
            return Err(MazeError::InvalidDimensions);
        }

        let mut cells = Vec::with_capacity(width * height);
        for _ in 0..height {
            for _ in 0..(width - 1) {
                cells.push(SquareCell::pointing(Some(CompassPrimary::East)));
            }
            cells.push(SquareCell::pointing(Some(CompassPrimary::South)));
        }
        let origin = Cartesian2DCoordinate::new(width as u32 - 1, height as u32 - 1);
        if let Some(last) = cells.last_mut() {
            last.set_direction(None);
        }

        debug!("new {}x{} grid, origin at {:?}", width, height, origin);

        Ok(Grid {
            cells,
            row_width,
            column_height,
            origin,
            grid_display: None,
        })
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay>> {
        &self.grid_display
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.row_width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.column_height
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        RowsCount(self.column_height.0)
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        ColumnsCount(self.row_width.0)
    }

    /// Node count and the passage count of any perfect maze on this grid.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let cells_count = self.size();
        (NodesCount(cells_count), EdgesCount(cells_count - 1))
    }

    /// The current root of the spanning tree.
    #[inline]
    pub fn origin(&self) -> Cartesian2DCoordinate {
        self.origin
    }

    pub fn cell(&self, coord: Cartesian2DCoordinate) -> Option<&SquareCell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    pub(crate) fn cell_mut(&mut self, coord: Cartesian2DCoordinate) -> Option<&mut SquareCell> {
        match self.grid_coordinate_to_index(coord) {
            Some(index) => Some(&mut self.cells[index]),
            None => None,
        }
    }

    pub(crate) fn set_origin(&mut self, coord: Cartesian2DCoordinate) {
        self.origin = coord;
    }

    /// The `(dx, dy)` pointer stored at a cell, `(0, 0)` at the origin.
    pub fn direction_vector(&self, coord: Cartesian2DCoordinate) -> Result<(i8, i8), MazeError> {
        self.cell(coord)
            .map(SquareCell::direction_vector)
            .ok_or(MazeError::InvalidCoordinate(coord))
    }

    pub fn weight(&self, coord: Cartesian2DCoordinate) -> Option<u8> {
        self.cell(coord).map(SquareCell::weight)
    }

    pub fn set_weight(&mut self, coord: Cartesian2DCoordinate, weight: u8) -> Result<(), MazeError> {
        self.cell_mut(coord)
            .map(|cell| cell.set_weight(weight))
            .ok_or(MazeError::InvalidCoordinate(coord))
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cartesian2DCoordinate {
        let index = rng.gen::<usize>() % self.size();
        Cartesian2DCoordinate::from_row_major_index(index, self.row_width)
    }

    /// Cells that are to the North, South, East or West of a particular cell, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        cells::offset_coordinate(coord, direction)
            .filter(|neighbour_coord| self.is_valid_coordinate(*neighbour_coord))
    }

    /// Is there a passage (no wall) between two adjacent cells?
    ///
    /// Derived on every call from the live pointers: the cells are connected if either
    /// one points at the other. Coordinates outside the grid or cells that are not
    /// neighbours are a caller error.
    pub fn connected(&self,
                     a: Cartesian2DCoordinate,
                     b: Cartesian2DCoordinate)
                     -> Result<bool, MazeError> {
        let cell_a = self.cell(a).ok_or(MazeError::InvalidCoordinate(a))?;
        let cell_b = self.cell(b).ok_or(MazeError::InvalidCoordinate(b))?;
        let a_to_b = a.direction_to(b).ok_or(MazeError::NotAdjacent(a, b))?;

        Ok(cell_a.direction() == Some(a_to_b) || cell_b.direction() == Some(a_to_b.opposite()))
    }

    /// Lenient form of `connected`: anything invalid is simply not linked.
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        self.connected(a, b).unwrap_or(false)
    }

    /// Is the neighbour in `direction` reachable without crossing a wall?
    /// Always false at the outer boundary.
    pub fn is_neighbour_linked(&self,
                               coord: Cartesian2DCoordinate,
                               direction: CompassPrimary)
                               -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// Cells linked to a particular cell by a passage.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        if self.is_valid_coordinate(coord) {
            Some(self.neighbours(coord)
                .into_iter()
                .filter(|neighbour| self.is_linked(coord, *neighbour))
                .collect())
        } else {
            None
        }
    }

    /// Every passage exactly once, as (west or north cell, east or south cell) pairs.
    pub fn iter_links(&self) -> LinksIter {
        LinksIter {
            grid: self,
            cells: self.iter(),
            pending_south: None,
        }
    }

    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    /// Attempts one step from `from`, the movement contract used by gameplay.
    pub fn try_move(&self,
                    from: Cartesian2DCoordinate,
                    direction: CompassPrimary)
                    -> Result<Movement, MazeError> {
        if !self.is_valid_coordinate(from) {
            return Err(MazeError::InvalidCoordinate(from));
        }
        match self.neighbour_at_direction(from, direction) {
            None => Ok(Movement::OutOfBounds),
            Some(to) => {
                if self.connected(from, to)? {
                    Ok(Movement::Moved(to))
                } else {
                    Ok(Movement::Blocked)
                }
            }
        }
    }

    /// Follows the stored pointers from `coord` until the origin.
    ///
    /// `Ok(None)` means the pointers leave the grid or revisit a cell, which only a
    /// corrupted grid can do.
    pub fn path_to_origin(&self,
                          coord: Cartesian2DCoordinate)
                          -> Result<Option<Vec<Cartesian2DCoordinate>>, MazeError> {
        if !self.is_valid_coordinate(coord) {
            return Err(MazeError::InvalidCoordinate(coord));
        }

        let mut path = vec![coord];
        let mut current = coord;
        while let Some(direction) = self.cells[self.index_unchecked(current)].direction() {
            if path.len() > self.size() {
                return Ok(None);
            }
            match self.neighbour_at_direction(current, direction) {
                Some(next) => {
                    current = next;
                    path.push(current);
                }
                None => return Ok(None),
            }
        }
        Ok(Some(path))
    }

    /// Checks the spanning in-tree invariant: one origin marker, at the cached origin,
    /// reachable from every cell.
    pub fn is_perfect(&self) -> bool {
        let origins_count = self.cells.iter().filter(|cell| cell.is_origin()).count();
        if origins_count != 1 || !self.cell(self.origin).map_or(false, SquareCell::is_origin) {
            return false;
        }

        // reaches[i] marks cells already known to lead to the origin
        let mut reaches = vec![false; self.size()];
        reaches[self.index_unchecked(self.origin)] = true;
        for start in self.iter() {
            let mut walked = Vec::new();
            let mut current = start;
            loop {
                let index = self.index_unchecked(current);
                if reaches[index] {
                    break;
                }
                if walked.len() > self.size() {
                    return false;
                }
                walked.push(index);
                let next = self.cells[index]
                    .direction()
                    .and_then(|dir| self.neighbour_at_direction(current, dir));
                match next {
                    Some(next_coord) => current = next_coord,
                    None => return false,
                }
            }
            for index in walked {
                reaches[index] = true;
            }
        }
        true
    }

    /// The passages as an undirected graph. Node `i` is the cell at row-major index `i`
    /// and carries its coordinate.
    pub fn passage_graph(&self) -> UnGraph<Cartesian2DCoordinate, ()> {
        let (NodesCount(nodes), EdgesCount(edges)) = self.graph_size();
        let mut graph = UnGraph::with_capacity(nodes, edges);
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in self.iter_links() {
            let a_index = NodeIndex::new(self.index_unchecked(a));
            let b_index = NodeIndex::new(self.index_unchecked(b));
            let _ = graph.add_edge(a_index, b_index, ());
        }
        graph
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(self.index_unchecked(coord))
        } else {
            None
        }
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.row_width.0 && (coord.y as usize) < self.column_height.0
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.row_width, self.column_height)
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter {
        BatchIter::rows(self.row_width, self.column_height)
    }

    #[inline]
    fn index_unchecked(&self, coord: Cartesian2DCoordinate) -> usize {
        coord.y as usize * self.row_width.0 + coord.x as usize
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = Cartesian2DCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterates the passages of a grid, checking the east then the south side of each cell.
#[derive(Debug)]
pub struct LinksIter<'a> {
    grid: &'a Grid,
    cells: CellIter,
    pending_south: Option<Cartesian2DCoordinate>,
}

impl<'a> Iterator for LinksIter<'a> {
    type Item = (Cartesian2DCoordinate, Cartesian2DCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(coord) = self.pending_south.take() {
                if let Some(south) = self.grid.neighbour_at_direction(coord, CompassPrimary::South) {
                    if self.grid.is_linked(coord, south) {
                        return Some((coord, south));
                    }
                }
            }

            let coord = self.cells.next()?;
            self.pending_south = Some(coord);
            if let Some(east) = self.grid.neighbour_at_direction(coord, CompassPrimary::East) {
                if self.grid.is_linked(coord, east) {
                    return Some((coord, east));
                }
            }
        }
    }
}
