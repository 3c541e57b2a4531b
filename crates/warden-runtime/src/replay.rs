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

//! Replays a scenario's operations against a fresh oracle.

use crate::scenario::{Operation, Scenario};
use anyhow::{Context, Result};
use std::fmt;
use warden_control::ResourceOracle;
use warden_core::{RequestDecision, ResourceVector, SafetyReport, SystemState};

/// What one operation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Result of a safety check.
    Checked(SafetyReport),
    /// Decision on a request.
    Requested {
        /// Requesting thread.
        thread: usize,
        /// Requested units.
        units: ResourceVector,
        /// The oracle's decision.
        decision: RequestDecision,
    },
    /// A committed release.
    Released {
        /// Releasing thread.
        thread: usize,
        /// Released units.
        units: ResourceVector,
    },
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Checked(SafetyReport::Safe(seq)) => {
                write!(f, "check: safe, sequence {seq}")
            }
            StepOutcome::Checked(SafetyReport::Unsafe) => write!(f, "check: not safe"),
            StepOutcome::Requested {
                thread,
                units,
                decision,
            } => write!(f, "request P{thread} {units}: {decision}"),
            StepOutcome::Released { thread, units } => write!(f, "release P{thread} {units}: done"),
        }
    }
}

/// A finished replay.
#[derive(Debug)]
pub struct Replay {
    /// The scenario's state before any operation ran.
    pub initial: SystemState,
    /// The oracle after the last operation.
    pub oracle: ResourceOracle,
    /// One outcome per operation, in order.
    pub outcomes: Vec<StepOutcome>,
}

/// Builds the scenario's oracle and applies every operation in order.
///
/// Stops at the first operation the oracle rejects as malformed (bad thread
/// index, wrong vector length, release above allocation); the error names the
/// offending step.
pub fn replay(scenario: &Scenario) -> Result<Replay> {
    let mut oracle = ResourceOracle::from_description(&scenario.state, scenario.config.clone())
        .context("Scenario state is malformed")?;
    let initial = oracle.state().clone();

    let mut outcomes = Vec::with_capacity(scenario.operations.len());
    for (step, operation) in scenario.operations.iter().enumerate() {
        let outcome = match operation {
            Operation::Check => StepOutcome::Checked(oracle.is_safe_state()),
            Operation::Request { thread, units } => {
                let decision = oracle
                    .request(*thread, units)
                    .with_context(|| format!("Operation {step} (request) is malformed"))?;
                StepOutcome::Requested {
                    thread: *thread,
                    units: ResourceVector::from(units.as_slice()),
                    decision,
                }
            }
            Operation::Release { thread, units } => {
                oracle
                    .release(*thread, units)
                    .with_context(|| format!("Operation {step} (release) is malformed"))?;
                StepOutcome::Released {
                    thread: *thread,
                    units: ResourceVector::from(units.as_slice()),
                }
            }
        };
        log::debug!("Step {}: {}", step, outcome);
        outcomes.push(outcome);
    }
    Ok(Replay {
        initial,
        oracle,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioFormat;
    use warden_core::{StateError, WaitReason};

    const CLASSIC: &str = include_str!("../scenarios/classic.ron");

    #[test]
    fn test_replay_classic_scenario() {
        let scenario = Scenario::parse(CLASSIC, ScenarioFormat::Ron).unwrap();
        let Replay {
            initial,
            oracle,
            outcomes,
        } = replay(&scenario).unwrap();
        assert_eq!(
            initial,
            SystemState::try_from(&scenario.state).expect("bundled state is valid")
        );

        assert_eq!(outcomes.len(), scenario.operations.len());
        assert_eq!(
            outcomes[0].to_string(),
            "check: safe, sequence <P1, P3, P0, P2, P4>"
        );
        assert!(matches!(
            &outcomes[1],
            StepOutcome::Requested { decision, .. } if decision.is_granted()
        ));
        assert!(matches!(
            &outcomes[2],
            StepOutcome::Requested {
                decision: RequestDecision::MustWait {
                    reason: WaitReason::Unsafe
                },
                ..
            }
        ));
        assert!(oracle.state().check_invariants().is_ok());
        assert_eq!(oracle.stats().requests(), 4);
    }

    #[test]
    fn test_replay_stops_on_malformed_step() {
        let json = r#"{
            "state": { "available": [1], "maximum": [[1]], "allocation": [[1]] },
            "operations": [ "Check", { "Release": { "thread": 0, "units": [2] } }, "Check" ]
        }"#;
        let scenario = Scenario::parse(json, ScenarioFormat::Json).unwrap();
        let err = replay(&scenario).unwrap_err();
        assert!(err.to_string().contains("Operation 1 (release)"));
        assert!(matches!(
            err.root_cause().downcast_ref::<StateError>(),
            Some(StateError::ReleaseExceedsAllocation { .. })
        ));
    }

    #[test]
    fn test_replay_rejects_malformed_state() {
        let json = r#"{ "state": { "available": [1], "maximum": [[1]], "allocation": [[2]] } }"#;
        let scenario = Scenario::parse(json, ScenarioFormat::Json).unwrap();
        assert!(replay(&scenario).is_err());
    }
}
