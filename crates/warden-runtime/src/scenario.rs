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

//! Scenario files: an initial state plus a script of operations to replay.
//!
//! Scenarios are read from `.ron` or `.json` files. A RON scenario looks like:
//!
//! ```ron
//! (
//!     state: (
//!         available: [3, 3, 2],
//!         maximum: [[7, 5, 3], [3, 2, 2]],
//!         allocation: [[0, 1, 0], [2, 0, 0]],
//!     ),
//!     operations: [
//!         Check,
//!         Request(thread: 1, units: [1, 0, 2]),
//!         Release(thread: 1, units: [1, 0, 2]),
//!     ],
//! )
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use warden_control::OracleConfig;
use warden_core::{StateDescription, Units};

/// A single step of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Ask whether the committed state is safe.
    Check,
    /// Submit a resource request.
    Request {
        /// Requesting thread index.
        thread: usize,
        /// Units per resource type.
        units: Vec<Units>,
    },
    /// Return units held by a thread.
    Release {
        /// Releasing thread index.
        thread: usize,
        /// Units per resource type.
        units: Vec<Units>,
    },
}

/// Initial state, oracle configuration and the operations to replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// The state the oracle starts from.
    pub state: StateDescription,
    /// Oracle configuration. Defaults apply when omitted.
    #[serde(default)]
    pub config: OracleConfig,
    /// Operations applied in order.
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// Supported scenario encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFormat {
    /// Rusty Object Notation.
    Ron,
    /// JSON.
    Json,
}

impl ScenarioFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Ok(ScenarioFormat::Ron),
            Some("json") => Ok(ScenarioFormat::Json),
            other => bail!(
                "Unsupported scenario extension {:?} for '{}' (expected .ron or .json)",
                other,
                path.display()
            ),
        }
    }
}

impl Scenario {
    /// Parses a scenario from a string in the given format.
    pub fn parse(source: &str, format: ScenarioFormat) -> Result<Self> {
        let scenario = match format {
            ScenarioFormat::Ron => ron::from_str(source).context("Invalid RON scenario")?,
            ScenarioFormat::Json => {
                serde_json::from_str(source).context("Invalid JSON scenario")?
            }
        };
        Ok(scenario)
    }

    /// Loads a scenario file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let format = ScenarioFormat::from_path(path)?;
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario '{}'", path.display()))?;
        let scenario = Self::parse(&source, format)
            .with_context(|| format!("Failed to parse scenario '{}'", path.display()))?;
        log::debug!(
            "Loaded scenario '{}' with {} operations",
            path.display(),
            scenario.operations.len()
        );
        Ok(scenario)
    }
}
