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

//! Per-resource-type unit vectors and the domination test used by the oracle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// A count of resource units. Counts are never negative.
pub type Units = u32;

/// An `m`-length vector of resource units, one entry per resource type.
///
/// Used for `available`, for single rows of the allocation/need matrices, and
/// for request and release vectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVector(Vec<Units>);

impl ResourceVector {
    /// Creates a vector of `len` zero entries.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    /// Returns the number of resource types covered by this vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the vector covers no resource types.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the entries as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Units] {
        &self.0
    }

    /// Returns an iterator over the entries in resource-type order.
    pub fn iter(&self) -> std::slice::Iter<'_, Units> {
        self.0.iter()
    }

    /// Returns `true` if every entry of `self` is less than or equal to the
    /// matching entry of `other`.
    ///
    /// # Panics
    /// Panics if the two vectors differ in length. Well-formed states never
    /// compare vectors of different shapes, so a mismatch is a bug upstream.
    pub fn lte(&self, other: &ResourceVector) -> bool {
        lte(&self.0, &other.0)
    }

    /// Element-wise addition. Returns `None` if any entry overflows.
    pub fn checked_add(&self, rhs: &[Units]) -> Option<ResourceVector> {
        assert_eq!(self.len(), rhs.len(), "resource vector length mismatch");
        self.0
            .iter()
            .zip(rhs)
            .map(|(a, b)| a.checked_add(*b))
            .collect::<Option<Vec<_>>>()
            .map(ResourceVector)
    }

    /// Element-wise subtraction. Returns `None` if any entry would go negative.
    pub fn checked_sub(&self, rhs: &[Units]) -> Option<ResourceVector> {
        assert_eq!(self.len(), rhs.len(), "resource vector length mismatch");
        self.0
            .iter()
            .zip(rhs)
            .map(|(a, b)| a.checked_sub(*b))
            .collect::<Option<Vec<_>>>()
            .map(ResourceVector)
    }

    /// Adds `rhs` into `self` element-wise.
    ///
    /// Callers guarantee the sum fits; the conservation invariant bounds every
    /// entry by the per-type total, which is checked at construction.
    pub(crate) fn add_in_place(&mut self, rhs: &[Units]) {
        assert_eq!(self.len(), rhs.len(), "resource vector length mismatch");
        for (a, b) in self.0.iter_mut().zip(rhs) {
            *a += *b;
        }
    }
}

/// Slice form of [`ResourceVector::lte`].
///
/// # Panics
/// Panics if `a` and `b` differ in length.
pub fn lte(a: &[Units], b: &[Units]) -> bool {
    assert_eq!(
        a.len(),
        b.len(),
        "vector domination test on vectors of different lengths"
    );
    a.iter().zip(b).all(|(x, y)| x <= y)
}

impl From<Vec<Units>> for ResourceVector {
    fn from(values: Vec<Units>) -> Self {
        Self(values)
    }
}

impl From<&[Units]> for ResourceVector {
    fn from(values: &[Units]) -> Self {
        Self(values.to_vec())
    }
}

impl<const N: usize> From<[Units; N]> for ResourceVector {
    fn from(values: [Units; N]) -> Self {
        Self(values.to_vec())
    }
}

impl Index<usize> for ResourceVector {
    type Output = Units;

    #[inline]
    fn index(&self, resource: usize) -> &Self::Output {
        &self.0[resource]
    }
}

impl AsRef<[Units]> for ResourceVector {
    fn as_ref(&self) -> &[Units] {
        &self.0
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}
