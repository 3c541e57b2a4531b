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

//! Types describing the oracle's answers: safe sequences, safety reports and
//! request decisions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a thread in a state, `0..threads`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub usize);

impl ThreadId {
    /// Returns the raw index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// An ordering of thread completions under which every thread can finish.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafeSequence(Vec<ThreadId>);

impl SafeSequence {
    /// Wraps an ordering of thread ids.
    pub fn new(order: Vec<ThreadId>) -> Self {
        Self(order)
    }

    /// The threads in completion order.
    pub fn threads(&self) -> &[ThreadId] {
        &self.0
    }

    /// The raw indices in completion order.
    pub fn indices(&self) -> Vec<usize> {
        self.0.iter().map(|t| t.0).collect()
    }

    /// Number of threads in the sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the sequence is empty (a state with no threads).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-separated labels, e.g. `P1,P3,P4,P0,P2`.
    pub fn labels(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Renders as `<P1, P3, P4, P0, P2>`.
impl fmt::Display for SafeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, t) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{t}")?;
        }
        write!(f, ">")
    }
}

/// Result of checking whether a state is safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyReport {
    /// The state is safe; the sequence witnesses it.
    Safe(SafeSequence),
    /// No completion order lets every thread finish.
    Unsafe,
}

impl SafetyReport {
    /// Returns `true` for [`SafetyReport::Safe`].
    pub fn is_safe(&self) -> bool {
        matches!(self, SafetyReport::Safe(_))
    }

    /// Returns the witnessing sequence, if safe.
    pub fn sequence(&self) -> Option<&SafeSequence> {
        match self {
            SafetyReport::Safe(seq) => Some(seq),
            SafetyReport::Unsafe => None,
        }
    }
}

impl From<Option<SafeSequence>> for SafetyReport {
    fn from(value: Option<SafeSequence>) -> Self {
        value.map_or(SafetyReport::Unsafe, SafetyReport::Safe)
    }
}

impl fmt::Display for SafetyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafetyReport::Safe(seq) => write!(f, "safe {seq}"),
            SafetyReport::Unsafe => write!(f, "not safe"),
        }
    }
}

/// Why a request has to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaitReason {
    /// The requested units are not currently free.
    Unavailable,
    /// The units are free, but granting them would leave the state unsafe.
    Unsafe,
}

/// The outcome of a resource request.
///
/// None of these are errors: callers branch on them. A `MustWait` request may
/// be resubmitted later; the oracle attaches no retry policy to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestDecision {
    /// The request was committed. The sequence witnesses the new safe state.
    Granted {
        /// Safe sequence of the post-commit state.
        sequence: SafeSequence,
    },
    /// The request was not applied and may be retried later.
    MustWait {
        /// Which gate turned the request away.
        reason: WaitReason,
    },
    /// The thread asked for more than its declared maximum still allows.
    ExceedsClaim,
}

impl RequestDecision {
    /// Returns `true` for [`RequestDecision::Granted`].
    pub fn is_granted(&self) -> bool {
        matches!(self, RequestDecision::Granted { .. })
    }

    /// Returns `true` for [`RequestDecision::MustWait`], whatever the reason.
    pub fn is_wait(&self) -> bool {
        matches!(self, RequestDecision::MustWait { .. })
    }
}

impl fmt::Display for RequestDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestDecision::Granted { sequence } => write!(f, "granted, safe sequence {sequence}"),
            RequestDecision::MustWait {
                reason: WaitReason::Unavailable,
            } => write!(f, "must wait: resources not available"),
            RequestDecision::MustWait {
                reason: WaitReason::Unsafe,
            } => write!(f, "must wait: granting would leave the state unsafe"),
            RequestDecision::ExceedsClaim => write!(f, "rejected: exceeds declared maximum claim"),
        }
    }
}
