// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Rectangular `threads × resources` matrices of resource units.

use crate::error::StateError;
use crate::vector::{ResourceVector, Units};
use serde::{Serialize, Serializer};

/// A row-major `rows × cols` matrix of resource units.
///
/// Rows are threads and columns are resource types. The shape is fixed when
/// the matrix is built, so every row is guaranteed to have `cols` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Units>,
}

impl ResourceMatrix {
    /// Creates a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Builds a matrix from nested rows, checking that it is `rows × cols`.
    ///
    /// `what` names the matrix in the returned error.
    pub fn from_rows(
        what: &'static str,
        rows: usize,
        cols: usize,
        values: &[Vec<Units>],
    ) -> Result<Self, StateError> {
        if values.len() != rows {
            return Err(StateError::DimensionMismatch {
                what,
                expected: rows,
                actual: values.len(),
            });
        }
        let mut data = Vec::with_capacity(rows * cols);
        for row in values {
            if row.len() != cols {
                return Err(StateError::DimensionMismatch {
                    what,
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { rows, cols, data })
    }

    /// Number of rows (threads).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (resource types).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns row `i` as a slice.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    #[inline]
    pub fn row(&self, i: usize) -> &[Units] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Returns row `i` as an owned vector.
    pub fn row_vector(&self, i: usize) -> ResourceVector {
        ResourceVector::from(self.row(i))
    }

    /// Returns the entry at `(thread, resource)`.
    #[inline]
    pub fn get(&self, thread: usize, resource: usize) -> Units {
        self.data[thread * self.cols + resource]
    }

    /// Iterates over the rows in thread order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Units]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Sum of column `resource` across all rows, or `None` on overflow.
    pub fn column_sum(&self, resource: usize) -> Option<Units> {
        (0..self.rows).try_fold(0 as Units, |acc, i| acc.checked_add(self.get(i, resource)))
    }

    /// Replaces row `i` with `values`.
    pub(crate) fn set_row(&mut self, i: usize, values: &[Units]) {
        assert_eq!(values.len(), self.cols, "matrix row length mismatch");
        self.data[i * self.cols..(i + 1) * self.cols].copy_from_slice(values);
    }

    /// Returns the matrix as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<Units>> {
        self.iter_rows().map(<[Units]>::to_vec).collect()
    }
}

impl Serialize for ResourceMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}
