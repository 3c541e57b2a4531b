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

//! The allocation state of `n` threads over `m` resource types.
//!
//! A [`SystemState`] is only ever replaced wholesale: every mutation builds a
//! complete new state and the owner swaps it in. No caller can observe a state
//! where `available`, `allocation` and `need` disagree.

use crate::error::StateError;
use crate::matrix::ResourceMatrix;
use crate::vector::{ResourceVector, Units};
use serde::{Deserialize, Serialize};

/// Snapshot of available units, declared maxima, allocations and needs.
///
/// Invariants, checked on construction and preserved by every transition:
/// - `need[i][j] == maximum[i][j] - allocation[i][j]` (so `allocation <= maximum`),
/// - `available[j] + sum_i allocation[i][j] == total[j]`, where `total` is
///   fixed when the state is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemState {
    threads: usize,
    resources: usize,
    available: ResourceVector,
    maximum: ResourceMatrix,
    allocation: ResourceMatrix,
    need: ResourceMatrix,
    total: ResourceVector,
}

impl SystemState {
    /// Creates an empty state for `threads` threads and `resources` resource
    /// types. All counts start at zero until [`populate`](Self::populate).
    pub fn new(threads: usize, resources: usize) -> Self {
        Self {
            threads,
            resources,
            available: ResourceVector::zeros(resources),
            maximum: ResourceMatrix::zeros(threads, resources),
            allocation: ResourceMatrix::zeros(threads, resources),
            need: ResourceMatrix::zeros(threads, resources),
            total: ResourceVector::zeros(resources),
        }
    }

    /// Builds a populated state, inferring the shape from `available`
    /// (resource types) and `maximum` (threads).
    pub fn from_parts(
        available: &[Units],
        maximum: &[Vec<Units>],
        allocation: &[Vec<Units>],
    ) -> Result<Self, StateError> {
        let mut state = Self::new(maximum.len(), available.len());
        state.populate(available, maximum, allocation)?;
        Ok(state)
    }

    /// Fills the state from the input collaborator's vectors and matrices.
    ///
    /// Derives `need` and records the per-type totals. Rejects any shape that
    /// does not match `threads × resources`, any allocation above its declared
    /// maximum, and totals that do not fit in [`Units`]. On error `self` is
    /// left untouched.
    pub fn populate(
        &mut self,
        available: &[Units],
        maximum: &[Vec<Units>],
        allocation: &[Vec<Units>],
    ) -> Result<(), StateError> {
        let (n, m) = (self.threads, self.resources);
        if available.len() != m {
            return Err(StateError::DimensionMismatch {
                what: "available",
                expected: m,
                actual: available.len(),
            });
        }
        let maximum = ResourceMatrix::from_rows("maximum", n, m, maximum)?;
        let allocation = ResourceMatrix::from_rows("allocation", n, m, allocation)?;

        let mut need = ResourceMatrix::zeros(n, m);
        for i in 0..n {
            let mut row = Vec::with_capacity(m);
            for j in 0..m {
                let (max, held) = (maximum.get(i, j), allocation.get(i, j));
                let remaining = max.checked_sub(held).ok_or(
                    StateError::AllocationExceedsMaximum {
                        thread: i,
                        resource: j,
                        allocated: held,
                        maximum: max,
                    },
                )?;
                row.push(remaining);
            }
            need.set_row(i, &row);
        }

        let mut total = Vec::with_capacity(m);
        for (j, free) in available.iter().enumerate() {
            let sum = allocation
                .column_sum(j)
                .and_then(|held| held.checked_add(*free))
                .ok_or(StateError::Overflow { resource: j })?;
            total.push(sum);
        }

        *self = Self {
            threads: n,
            resources: m,
            available: ResourceVector::from(available),
            maximum,
            allocation,
            need,
            total: ResourceVector::from(total),
        };
        log::debug!(
            "SystemState: populated {} threads x {} resource types, total={}",
            n,
            m,
            self.total
        );
        Ok(())
    }

    /// Number of threads, `n`.
    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Number of resource types, `m`.
    #[inline]
    pub fn resources(&self) -> usize {
        self.resources
    }

    /// Units of each resource type not held by any thread.
    pub fn available(&self) -> &ResourceVector {
        &self.available
    }

    /// Declared maximum claim of each thread.
    pub fn maximum(&self) -> &ResourceMatrix {
        &self.maximum
    }

    /// Units currently held by each thread.
    pub fn allocation(&self) -> &ResourceMatrix {
        &self.allocation
    }

    /// Remaining claim of each thread (`maximum - allocation`).
    pub fn need(&self) -> &ResourceMatrix {
        &self.need
    }

    /// Installed units of each resource type, held or free.
    pub fn total_installed(&self) -> &ResourceVector {
        &self.total
    }

    /// Checks that `thread` is a valid index.
    pub fn check_thread(&self, thread: usize) -> Result<(), StateError> {
        if thread < self.threads {
            Ok(())
        } else {
            Err(StateError::ThreadOutOfRange {
                thread,
                threads: self.threads,
            })
        }
    }

    /// Checks that a caller-supplied vector covers exactly `m` resource types.
    pub fn check_vector(&self, what: &'static str, units: &[Units]) -> Result<(), StateError> {
        if units.len() == self.resources {
            Ok(())
        } else {
            Err(StateError::DimensionMismatch {
                what,
                expected: self.resources,
                actual: units.len(),
            })
        }
    }

    /// Returns a copy of this state with `units` moved from `available` to
    /// `thread`'s allocation (and taken off its need).
    ///
    /// Returns `Ok(None)` if `units` exceeds either the thread's need or what
    /// is available, and an error if `thread` or the length of `units` is
    /// out of shape.
    pub fn with_granted(
        &self,
        thread: usize,
        units: &[Units],
    ) -> Result<Option<SystemState>, StateError> {
        self.check_thread(thread)?;
        self.check_vector("request", units)?;

        let Some(available) = self.available.checked_sub(units) else {
            return Ok(None);
        };
        let Some(need_row) = ResourceVector::from(self.need.row(thread)).checked_sub(units)
        else {
            return Ok(None);
        };
        // Bounded by maximum because need was bounded above.
        let mut alloc_row = self.allocation.row_vector(thread);
        alloc_row.add_in_place(units);

        let mut next = self.clone();
        next.available = available;
        next.allocation.set_row(thread, alloc_row.as_slice());
        next.need.set_row(thread, need_row.as_slice());
        Ok(Some(next))
    }

    /// Returns a copy of this state with `units` returned from `thread`'s
    /// allocation to `available` (and added back to its need).
    ///
    /// Fails if the thread does not hold that many units of some type.
    pub fn with_released(&self, thread: usize, units: &[Units]) -> Result<SystemState, StateError> {
        self.check_thread(thread)?;
        self.check_vector("release", units)?;

        let held = self.allocation.row(thread);
        if let Some(resource) = (0..self.resources).find(|&j| units[j] > held[j]) {
            return Err(StateError::ReleaseExceedsAllocation {
                thread,
                resource,
                requested: units[resource],
                held: held[resource],
            });
        }

        // Cannot underflow after the check above; cannot overflow because
        // available + allocation is bounded by the recorded totals, and need
        // + allocation by the declared maximum.
        let alloc_row = ResourceVector::from(held)
            .checked_sub(units)
            .ok_or_else(|| StateError::InvariantViolated("release underflow".into()))?;
        let mut available = self.available.clone();
        available.add_in_place(units);
        let mut need_row = self.need.row_vector(thread);
        need_row.add_in_place(units);

        let mut next = self.clone();
        next.available = available;
        next.allocation.set_row(thread, alloc_row.as_slice());
        next.need.set_row(thread, need_row.as_slice());
        Ok(next)
    }

    /// Verifies the need and conservation invariants.
    pub fn check_invariants(&self) -> Result<(), StateError> {
        for i in 0..self.threads {
            for j in 0..self.resources {
                let (max, held, need) = (
                    self.maximum.get(i, j),
                    self.allocation.get(i, j),
                    self.need.get(i, j),
                );
                if held.checked_add(need) != Some(max) {
                    return Err(StateError::InvariantViolated(format!(
                        "P{i} resource {j}: allocation {held} + need {need} != maximum {max}"
                    )));
                }
            }
        }
        for j in 0..self.resources {
            let in_use = self.allocation.column_sum(j);
            let sum = in_use.and_then(|u| u.checked_add(self.available[j]));
            if sum != Some(self.total[j]) {
                return Err(StateError::InvariantViolated(format!(
                    "resource {j}: available {} + allocated {:?} != total {}",
                    self.available[j], in_use, self.total[j]
                )));
            }
        }
        Ok(())
    }

    /// Returns the plain description this state can be rebuilt from.
    pub fn describe(&self) -> StateDescription {
        StateDescription {
            available: self.available.as_slice().to_vec(),
            maximum: self.maximum.to_rows(),
            allocation: self.allocation.to_rows(),
        }
    }
}

/// Plain, serializable description of a state as supplied by the input
/// collaborator. `need` is always derived, never supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDescription {
    /// Free units per resource type (`m` entries).
    pub available: Vec<Units>,
    /// Declared maximum per thread (`n` rows of `m` entries).
    pub maximum: Vec<Vec<Units>>,
    /// Units held per thread (`n` rows of `m` entries).
    pub allocation: Vec<Vec<Units>>,
}

impl TryFrom<StateDescription> for SystemState {
    type Error = StateError;

    fn try_from(desc: StateDescription) -> Result<Self, Self::Error> {
        SystemState::from_parts(&desc.available, &desc.maximum, &desc.allocation)
    }
}

impl TryFrom<&StateDescription> for SystemState {
    type Error = StateError;

    fn try_from(desc: &StateDescription) -> Result<Self, Self::Error> {
        SystemState::from_parts(&desc.available, &desc.maximum, &desc.allocation)
    }
}
