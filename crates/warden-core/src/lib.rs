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

//! # Warden Core
//!
//! Foundational crate containing the resource state model, the decision types
//! returned by the oracle, and the error contracts shared across the workspace.
//!
//! A state describes `n` threads competing for `m` reusable resource types:
//! the units still free (`available`), each thread's declared ceiling
//! (`maximum`), what each thread holds (`allocation`), and the derived
//! remaining claim (`need = maximum - allocation`).

#![warn(missing_docs)]

pub mod decision;
pub mod error;
pub mod matrix;
pub mod state;
pub mod vector;

pub use decision::{RequestDecision, SafeSequence, SafetyReport, ThreadId, WaitReason};
pub use error::StateError;
pub use matrix::ResourceMatrix;
pub use state::{StateDescription, SystemState};
pub use vector::{ResourceVector, Units};
