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

// Warden Runtime
// Replays a scenario file against the resource state oracle and prints the
// state tables and every decision.

mod render;
mod replay;
mod scenario;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::render::render_state;
use crate::replay::{replay, Replay};
use crate::scenario::Scenario;

/// Replays resource requests and releases against the deadlock-avoidance oracle.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Scenario file (`.ron` or `.json`).
    scenario: PathBuf,

    /// Only print decisions, not the state tables.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let scenario = Scenario::load(&args.scenario)?;
    let Replay {
        initial,
        oracle,
        outcomes,
    } = replay(&scenario)?;

    if !args.quiet {
        println!("Initial state:");
        print!("{}", render_state(&initial));
        println!();
    }

    for (step, outcome) in outcomes.iter().enumerate() {
        println!("[{step}] {outcome}");
    }

    if !args.quiet {
        println!("\nFinal state:");
        print!("{}", render_state(oracle.state()));
    }
    println!("\n{}", oracle.stats());
    Ok(())
}
