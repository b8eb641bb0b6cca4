use crate::cells::Cartesian2DCoordinate;
use crate::units::{Height, Width};

/// Row-major iteration over every coordinate of a rectangular grid.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    row_width: Width,
    cells_count: usize,
}

impl CellIter {
    pub fn new(row_width: Width, column_height: Height) -> CellIter {
        CellIter {
            current_cell_number: 0,
            row_width,
            cells_count: row_width.0 * column_height.0,
        }
    }
}

impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Cartesian2DCoordinate::from_row_major_index(self.current_cell_number,
                                                                     self.row_width);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

/// Yields whole rows at a time, north to south.
#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    current_index: usize,
    row_width: Width,
    column_height: Height,
}

impl BatchIter {
    pub fn rows(row_width: Width, column_height: Height) -> BatchIter {
        BatchIter {
            current_index: 0,
            row_width,
            column_height,
        }
    }
}

impl Iterator for BatchIter {
    type Item = Vec<Cartesian2DCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index < self.column_height.0 {
            let y = self.current_index as u32;
            self.current_index += 1;
            Some((0..self.row_width.0)
                .map(|x| Cartesian2DCoordinate::new(x as u32, y))
                .collect())
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.column_height.0 - self.current_index;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for BatchIter {}
