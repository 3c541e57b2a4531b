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

//! # Warden Control
//!
//! The Resource State Oracle. It owns a [`SystemState`](warden_core::SystemState)
//! and answers two questions about it:
//!
//! 1. Is the current state safe? ([`ResourceOracle::is_safe_state`])
//! 2. Can this request be granted without risking deadlock?
//!    ([`ResourceOracle::request`])
//!
//! The oracle never blocks and never touches real resources; it only decides.
//! Callers embedding it in a scheduler must serialize calls to `request` and
//! `release`.

#![warn(missing_docs)]

pub mod config;
pub mod oracle;
pub mod safety;
pub mod stats;

pub use config::OracleConfig;
pub use oracle::ResourceOracle;
pub use safety::is_safe;
pub use stats::DecisionStats;
