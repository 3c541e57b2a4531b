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

//! Defines the error type for malformed states and caller misuse.
//!
//! These are precondition violations. The ordinary outcomes of a request
//! (granted, must wait, exceeds claim) are not errors and live in
//! [`crate::decision`].

use crate::vector::Units;
use std::fmt;

/// An error raised when input or a call would break the state invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A vector or matrix does not have the shape the state was built with.
    DimensionMismatch {
        /// What was being checked (e.g. `"available"`, `"request"`).
        what: &'static str,
        /// The expected length.
        expected: usize,
        /// The length actually supplied.
        actual: usize,
    },
    /// A thread index outside `0..threads`.
    ThreadOutOfRange {
        /// The offending index.
        thread: usize,
        /// The number of threads in the state.
        threads: usize,
    },
    /// A thread holds more units than its declared maximum, which would make
    /// its need negative.
    AllocationExceedsMaximum {
        /// The offending thread.
        thread: usize,
        /// The offending resource type.
        resource: usize,
        /// Units allocated.
        allocated: Units,
        /// Declared maximum.
        maximum: Units,
    },
    /// A release asks to return more units than the thread holds.
    ReleaseExceedsAllocation {
        /// The releasing thread.
        thread: usize,
        /// The offending resource type.
        resource: usize,
        /// Units the caller tried to release.
        requested: Units,
        /// Units the thread actually holds.
        held: Units,
    },
    /// The total installed units of a resource type do not fit in [`Units`].
    Overflow {
        /// The offending resource type.
        resource: usize,
    },
    /// A consistency check found the matrices out of step with each other.
    InvariantViolated(String),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::DimensionMismatch {
                what,
                expected,
                actual,
            } => {
                write!(f, "Dimension mismatch for {what}: expected {expected}, got {actual}")
            }
            StateError::ThreadOutOfRange { thread, threads } => {
                write!(f, "Thread index {thread} out of range (state has {threads} threads)")
            }
            StateError::AllocationExceedsMaximum {
                thread,
                resource,
                allocated,
                maximum,
            } => write!(
                f,
                "Thread P{thread} holds {allocated} units of resource {resource} \
                 but declared a maximum of {maximum}"
            ),
            StateError::ReleaseExceedsAllocation {
                thread,
                resource,
                requested,
                held,
            } => write!(
                f,
                "Thread P{thread} cannot release {requested} units of resource {resource}: \
                 only {held} held"
            ),
            StateError::Overflow { resource } => {
                write!(f, "Total units of resource {resource} overflow the unit counter")
            }
            StateError::InvariantViolated(msg) => write!(f, "State invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for StateError {}
