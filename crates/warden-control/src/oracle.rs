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

//! The Resource State Oracle.
//!
//! The oracle owns the committed [`SystemState`] and is its only mutator.
//! A request passes through four gates, in order:
//!
//! 1. Claim bound: the request must fit in the thread's remaining need.
//! 2. Availability: the request must fit in the free units.
//! 3. Tentative application on a full copy of the state.
//! 4. Safety re-check of the copy; commit by swapping it in, or drop it.
//!
//! The first failing gate decides the outcome, and nothing is mutated unless
//! all four pass.

use crate::config::OracleConfig;
use crate::safety::is_safe;
use crate::stats::DecisionStats;
use warden_core::{
    RequestDecision, SafetyReport, StateDescription, StateError, SystemState, Units, WaitReason,
};

/// Decides resource requests for a fixed population of threads.
///
/// Calls are sequential: the oracle is not internally synchronized, and an
/// embedding scheduler must serialize [`request`](Self::request) and
/// [`release`](Self::release).
#[derive(Debug, Clone)]
pub struct ResourceOracle {
    state: SystemState,
    config: OracleConfig,
    stats: DecisionStats,
}

impl ResourceOracle {
    /// Creates an oracle over a populated state with the default configuration.
    pub fn new(state: SystemState) -> Self {
        Self::with_config(state, OracleConfig::default())
    }

    /// Creates an oracle over a populated state.
    pub fn with_config(state: SystemState, config: OracleConfig) -> Self {
        log::debug!(
            "Oracle: managing {} threads over {} resource types",
            state.threads(),
            state.resources()
        );
        Self {
            state,
            config,
            stats: DecisionStats::default(),
        }
    }

    /// Builds the state from a plain description and wraps it in an oracle.
    pub fn from_description(
        description: &StateDescription,
        config: OracleConfig,
    ) -> Result<Self, StateError> {
        let state = SystemState::try_from(description)?;
        Ok(Self::with_config(state, config))
    }

    /// The committed state.
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// The active configuration.
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Decision counters since construction.
    pub fn stats(&self) -> &DecisionStats {
        &self.stats
    }

    /// Consumes the oracle and returns the committed state.
    pub fn into_state(self) -> SystemState {
        self.state
    }

    /// Runs the safety check against the committed state. Read-only.
    pub fn is_safe_state(&self) -> SafetyReport {
        SafetyReport::from(is_safe(&self.state))
    }

    /// Decides whether `thread` may take `units` now, committing if so.
    ///
    /// # Errors
    /// Returns [`StateError`] if `thread` is out of range or `units` does not
    /// cover exactly the state's resource types. Every other outcome,
    /// including refusals, is an `Ok` decision.
    pub fn request(
        &mut self,
        thread: usize,
        units: &[Units],
    ) -> Result<RequestDecision, StateError> {
        self.state.check_thread(thread)?;
        self.state.check_vector("request", units)?;

        let decision = self.decide(thread, units);
        self.stats.record(&decision);
        Ok(decision)
    }

    fn decide(&mut self, thread: usize, units: &[Units]) -> RequestDecision {
        // ── 1. Claim bound ───────────────────────────────────────────────
        if !warden_core::vector::lte(units, self.state.need().row(thread)) {
            log::debug!(
                "Oracle: P{} request {:?} exceeds remaining claim {:?}",
                thread,
                units,
                self.state.need().row(thread)
            );
            return RequestDecision::ExceedsClaim;
        }

        // ── 2. Availability ──────────────────────────────────────────────
        if !warden_core::vector::lte(units, self.state.available().as_slice()) {
            log::debug!(
                "Oracle: P{} request {:?} exceeds available {}",
                thread,
                units,
                self.state.available()
            );
            return RequestDecision::MustWait {
                reason: WaitReason::Unavailable,
            };
        }

        // ── 3. Tentative application ─────────────────────────────────────
        // Shape was validated by `request`; gates 1 and 2 bound the units.
        let Ok(Some(tentative)) = self.state.with_granted(thread, units) else {
            unreachable!("request passed both bounds but could not be applied");
        };

        // ── 4. Safety re-check ───────────────────────────────────────────
        match is_safe(&tentative) {
            Some(sequence) => {
                self.commit(tentative);
                log::info!(
                    "Oracle: granted P{} {:?}, safe sequence {}",
                    thread,
                    units,
                    sequence
                );
                RequestDecision::Granted { sequence }
            }
            None => {
                log::debug!(
                    "Oracle: P{} request {:?} would leave the state unsafe",
                    thread,
                    units
                );
                RequestDecision::MustWait {
                    reason: WaitReason::Unsafe,
                }
            }
        }
    }

    /// Returns `units` held by `thread` to the free pool.
    ///
    /// Releasing only grows the free pool and shrinks allocations, which can
    /// never make a safe state unsafe, so no safety re-check runs.
    ///
    /// # Errors
    /// Returns [`StateError::ReleaseExceedsAllocation`] if the thread holds
    /// fewer units than it tries to release, and the usual range and shape
    /// errors. The state is unchanged on error.
    pub fn release(&mut self, thread: usize, units: &[Units]) -> Result<(), StateError> {
        let next = self.state.with_released(thread, units).inspect_err(|e| {
            log::warn!("Oracle: release rejected: {}", e);
        })?;
        self.commit(next);
        self.stats.releases += 1;
        log::info!("Oracle: P{} released {:?}", thread, units);
        Ok(())
    }

    /// Swaps in a fully built state.
    fn commit(&mut self, next: SystemState) {
        if self.config.verify_invariants {
            if let Err(e) = next.check_invariants() {
                panic!("Oracle: refusing to commit inconsistent state: {e}");
            }
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::ResourceVector;

    // ── Fixtures ─────────────────────────────────────────────────────

    fn classic_oracle() -> ResourceOracle {
        let state = SystemState::from_parts(
            &[3, 3, 2],
            &[
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            &[
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ],
        )
        .expect("classic state is well formed");
        ResourceOracle::with_config(
            state,
            OracleConfig {
                verify_invariants: true,
            },
        )
    }

    // ── Tests ────────────────────────────────────────────────────────

    #[test]
    fn test_classic_state_is_safe() {
        let oracle = classic_oracle();
        let report = oracle.is_safe_state();
        assert_eq!(report.sequence().unwrap().labels(), "P1,P3,P0,P2,P4");
    }

    #[test]
    fn test_grant_commits_all_three_arrays() {
        let mut oracle = classic_oracle();
        let decision = oracle.request(1, &[1, 0, 2]).unwrap();
        assert!(decision.is_granted());

        let state = oracle.state();
        assert_eq!(state.available(), &ResourceVector::from([2, 3, 0]));
        assert_eq!(state.allocation().row(1), &[3, 0, 2]);
        assert_eq!(state.need().row(1), &[0, 2, 0]);
        assert!(oracle.is_safe_state().is_safe());
        assert_eq!(oracle.stats().granted, 1);
    }

    #[test]
    fn test_exceeds_claim_leaves_state() {
        let mut oracle = classic_oracle();
        let before = oracle.state().clone();
        // P3 needs (0,1,1); asking for a unit of resource 0 is over its claim.
        assert_eq!(
            oracle.request(3, &[1, 0, 0]).unwrap(),
            RequestDecision::ExceedsClaim
        );
        assert_eq!(oracle.state(), &before);
        assert_eq!(oracle.stats().exceeded_claim, 1);
    }

    #[test]
    fn test_claim_gate_precedes_availability_gate() {
        let mut oracle = classic_oracle();
        // Exceeds both P0's need (7,4,3) and available (3,3,2).
        assert_eq!(
            oracle.request(0, &[8, 5, 4]).unwrap(),
            RequestDecision::ExceedsClaim
        );
    }

    #[test]
    fn test_unavailable_must_wait() {
        let mut oracle = classic_oracle();
        let before = oracle.state().clone();
        // P2 needs (6,0,0); 4 units of resource 0 is within claim but only 3 are free.
        assert_eq!(
            oracle.request(2, &[4, 0, 0]).unwrap(),
            RequestDecision::MustWait {
                reason: WaitReason::Unavailable
            }
        );
        assert_eq!(oracle.state(), &before);
    }

    #[test]
    fn test_unsafe_request_rolled_back() {
        let mut oracle = classic_oracle();
        assert!(oracle.request(1, &[1, 0, 2]).unwrap().is_granted());
        let before = oracle.state().clone();

        // With (2,3,0) free, giving P0 two units of resource 1 leaves (2,1,0):
        // no thread's remaining need fits, so the request must be dropped.
        assert_eq!(
            oracle.request(0, &[0, 2, 0]).unwrap(),
            RequestDecision::MustWait {
                reason: WaitReason::Unsafe
            }
        );
        assert_eq!(oracle.state(), &before);
        assert_eq!(oracle.stats().waited_unsafe, 1);
    }

    #[test]
    fn test_request_bad_thread() {
        let mut oracle = classic_oracle();
        assert_eq!(
            oracle.request(5, &[0, 0, 0]),
            Err(StateError::ThreadOutOfRange {
                thread: 5,
                threads: 5
            })
        );
        assert_eq!(oracle.stats().requests(), 0);
    }

    #[test]
    fn test_request_bad_length() {
        let mut oracle = classic_oracle();
        assert_eq!(
            oracle.request(0, &[0, 0]),
            Err(StateError::DimensionMismatch {
                what: "request",
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_release_round_trip() {
        let mut oracle = classic_oracle();
        let before = oracle.state().clone();
        assert!(oracle.request(1, &[1, 0, 2]).unwrap().is_granted());
        oracle.release(1, &[1, 0, 2]).unwrap();
        assert_eq!(oracle.state(), &before);
        assert_eq!(oracle.stats().releases, 1);
    }

    #[test]
    fn test_release_over_allocation_rejected() {
        let mut oracle = classic_oracle();
        let before = oracle.state().clone();
        let err = oracle.release(4, &[0, 0, 3]).unwrap_err();
        assert_eq!(
            err,
            StateError::ReleaseExceedsAllocation {
                thread: 4,
                resource: 2,
                requested: 3,
                held: 2
            }
        );
        assert_eq!(oracle.state(), &before);
        assert_eq!(oracle.stats().releases, 0);
    }

    #[test]
    fn test_release_bad_thread() {
        let mut oracle = classic_oracle();
        let before = oracle.state().clone();
        assert_eq!(
            oracle.release(7, &[0, 0, 0]),
            Err(StateError::ThreadOutOfRange {
                thread: 7,
                threads: 5
            })
        );
        assert_eq!(oracle.state(), &before);
        assert_eq!(oracle.stats().releases, 0);
    }

    #[test]
    fn test_release_bad_length() {
        let mut oracle = classic_oracle();
        let before = oracle.state().clone();
        assert_eq!(
            oracle.release(1, &[2, 0, 0, 0]),
            Err(StateError::DimensionMismatch {
                what: "release",
                expected: 3,
                actual: 4
            })
        );
        assert_eq!(oracle.state(), &before);
        assert_eq!(oracle.stats().releases, 0);
    }

    #[test]
    fn test_zero_request_on_unsafe_state_waits() {
        let state = SystemState::from_parts(&[0], &[vec![2], vec![2]], &[vec![1], vec![1]])
            .unwrap();
        let mut oracle = ResourceOracle::new(state);
        assert!(!oracle.is_safe_state().is_safe());
        assert_eq!(
            oracle.request(0, &[0]).unwrap(),
            RequestDecision::MustWait {
                reason: WaitReason::Unsafe
            }
        );
    }

    #[test]
    fn test_from_description() {
        let desc = StateDescription {
            available: vec![1, 1],
            maximum: vec![vec![1, 1]],
            allocation: vec![vec![0, 0]],
        };
        let mut oracle = ResourceOracle::from_description(&desc, OracleConfig::default()).unwrap();
        assert!(oracle.request(0, &[1, 1]).unwrap().is_granted());
        assert_eq!(oracle.into_state().need().row(0), &[0, 0]);
    }
}
