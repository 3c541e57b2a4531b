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

//! Configuration for the Resource State Oracle.

use serde::{Deserialize, Serialize};

/// Configuration for a [`ResourceOracle`](crate::ResourceOracle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Re-verify the need and conservation invariants after every commit.
    ///
    /// A failed verification means a bug in the oracle, so it panics rather
    /// than continuing with inconsistent matrices. On by default in debug
    /// builds.
    pub verify_invariants: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            verify_invariants: cfg!(debug_assertions),
        }
    }
}
