use std::fmt;

use crate::cells::Cartesian2DCoordinate;
use crate::units::{ColumnIndex, Height, RowIndex, Width};

/// Iterates every cell coordinate of a rectangular grid in row major order.
#[derive(Clone)]
pub struct CellIter {
    width: Width,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(width: Width, height: Height) -> CellIter {
        CellIter {
            width,
            current_cell_number: 0,
            cells_count: width.0 * height.0,
        }
    }
}

impl fmt::Debug for CellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Cartesian2DCoordinate::from_row_major_index(self.current_cell_number,
                                                                    self.width);
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

#[derive(Debug, Copy, Clone)]
enum BatchIterType {
    Row,
    Column,
}

/// Iterates a grid a whole row (bottom row first) or a whole column (left column first) at a time.
#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    iter_type: BatchIterType,
    batches_count: usize,
    current_index: usize,
    width: Width,
    height: Height,
}

impl BatchIter {
    pub(crate) fn rows(width: Width, height: Height) -> BatchIter {
        BatchIter::new(BatchIterType::Row, width, height)
    }

    pub(crate) fn columns(width: Width, height: Height) -> BatchIter {
        BatchIter::new(BatchIterType::Column, width, height)
    }

    fn new(iter_type: BatchIterType, width: Width, height: Height) -> BatchIter {
        let batches_count = match iter_type {
            BatchIterType::Row => height.0,
            BatchIterType::Column => width.0,
        };
        BatchIter {
            iter_type,
            batches_count,
            current_index: 0,
            width,
            height,
        }
    }
}

impl ExactSizeIterator for BatchIter {} // default impl using size_hint()
impl Iterator for BatchIter {
    type Item = Vec<Cartesian2DCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.batches_count {
            return None;
        }

        let batch_index = self.current_index;
        let coords = match self.iter_type {
            BatchIterType::Row => {
                (0..self.width.0)
                    .map(|i: usize| {
                        Cartesian2DCoordinate::from_row_column_indices(ColumnIndex(i),
                                                                       RowIndex(batch_index))
                    })
                    .collect()
            }
            BatchIterType::Column => {
                (0..self.height.0)
                    .map(|i: usize| {
                        Cartesian2DCoordinate::from_row_column_indices(ColumnIndex(batch_index),
                                                                       RowIndex(i))
                    })
                    .collect()
            }
        };
        self.current_index += 1;
        Some(coords)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.batches_count - self.current_index;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
