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

//! Running counts of the decisions an oracle has made.

use serde::Serialize;
use std::fmt;
use warden_core::{RequestDecision, WaitReason};

/// Decision counters kept by a [`ResourceOracle`](crate::ResourceOracle).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecisionStats {
    /// Requests committed.
    pub granted: u64,
    /// Requests turned away because the units were not free.
    pub waited_unavailable: u64,
    /// Requests turned away because granting would leave the state unsafe.
    pub waited_unsafe: u64,
    /// Requests above the thread's remaining claim.
    pub exceeded_claim: u64,
    /// Releases committed.
    pub releases: u64,
}

impl DecisionStats {
    /// Counts one request decision.
    pub fn record(&mut self, decision: &RequestDecision) {
        match decision {
            RequestDecision::Granted { .. } => self.granted += 1,
            RequestDecision::MustWait {
                reason: WaitReason::Unavailable,
            } => self.waited_unavailable += 1,
            RequestDecision::MustWait {
                reason: WaitReason::Unsafe,
            } => self.waited_unsafe += 1,
            RequestDecision::ExceedsClaim => self.exceeded_claim += 1,
        }
    }

    /// Total number of request decisions counted.
    pub fn requests(&self) -> u64 {
        self.granted + self.waited_unavailable + self.waited_unsafe + self.exceeded_claim
    }
}

impl fmt::Display for DecisionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} requests ({} granted, {} waited on availability, {} waited on safety, \
             {} over claim), {} releases",
            self.requests(),
            self.granted,
            self.waited_unavailable,
            self.waited_unsafe,
            self.exceeded_claim,
            self.releases
        )
    }
}
