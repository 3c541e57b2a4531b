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

//! The safety check.
//!
//! Simulates reclamation greedily: repeatedly pick the lowest-index unfinished
//! thread whose remaining need fits in the working pool, let it finish, and
//! return its allocation to the pool. The state is safe iff every thread
//! finishes this way.

use warden_core::vector::lte;
use warden_core::{SafeSequence, SystemState, ThreadId, Units};

/// Runs the safety check on `state` and returns a safe sequence, or `None` if
/// no completion order lets every thread finish.
///
/// Ties are broken by lowest thread index, so the same state always yields
/// the same sequence. `state` is only read. Worst case `O(n² · m)`.
pub fn is_safe(state: &SystemState) -> Option<SafeSequence> {
    let n = state.threads();
    let need = state.need();
    let allocation = state.allocation();

    let mut work: Vec<Units> = state.available().as_slice().to_vec();
    let mut finished = vec![false; n];
    let mut order = Vec::with_capacity(n);

    for _pass in 0..n {
        let candidate = (0..n).find(|&i| !finished[i] && lte(need.row(i), &work));
        let Some(i) = candidate else {
            log::trace!(
                "Safety: no eligible thread after {} of {} finished, work={:?}",
                order.len(),
                n,
                work
            );
            return None;
        };

        // Bounded by the per-type totals of the state.
        for (w, held) in work.iter_mut().zip(allocation.row(i)) {
            *w += *held;
        }
        finished[i] = true;
        order.push(ThreadId(i));
    }

    Some(SafeSequence::new(order))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(available: &[Units], maximum: &[Vec<Units>], allocation: &[Vec<Units>]) -> SystemState {
        SystemState::from_parts(available, maximum, allocation).expect("well-formed state")
    }

    fn classic() -> SystemState {
        state(
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
    }

    #[test]
    fn test_classic_sequence_is_first_fit() {
        // After P1 and P3 return their units the pool is (7, 4, 3), which
        // exactly covers P0's need, so P0 wins over P4 on index.
        let seq = is_safe(&classic()).expect("classic state is safe");
        assert_eq!(seq.indices(), vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let s = classic();
        let before = s.clone();
        let first = is_safe(&s);
        let second = is_safe(&s);
        assert_eq!(first, second);
        assert_eq!(s, before);
    }

    #[test]
    fn test_unsafe_state() {
        // Two threads each hold one unit and each need one more; nothing free.
        let s = state(&[0], &[vec![2], vec![2]], &[vec![1], vec![1]]);
        assert_eq!(is_safe(&s), None);
    }

    #[test]
    fn test_partial_progress_then_stuck() {
        // P0 can finish but holds nothing to give back; P1 needs 3.
        let s = state(&[1], &[vec![1], vec![4]], &[vec![0], vec![1]]);
        assert_eq!(is_safe(&s), None);
    }

    #[test]
    fn test_no_threads_is_trivially_safe() {
        let s = state(&[5, 5], &[], &[]);
        let seq = is_safe(&s).expect("empty state is safe");
        assert!(seq.is_empty());
    }

    #[test]
    fn test_zero_resource_types() {
        // With no resource types every need is the empty vector.
        let s = state(&[], &[vec![], vec![], vec![]], &[vec![], vec![], vec![]]);
        assert_eq!(is_safe(&s).unwrap().indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_restart_from_lowest_index() {
        // P1 finishes first; its release makes P0 eligible, and the next scan
        // restarts at P0 so it is picked ahead of P2.
        let s = state(
            &[1, 1],
            &[vec![2, 1], vec![1, 0], vec![1, 1]],
            &[vec![0, 0], vec![1, 0], vec![0, 0]],
        );
        assert_eq!(is_safe(&s).unwrap().indices(), vec![1, 0, 2]);
    }

    #[test]
    fn test_stuck_after_releases_insufficient() {
        // P1 and P2 finish but free nothing; P0 still needs (2,1).
        let s = state(
            &[1, 0],
            &[vec![2, 1], vec![1, 0], vec![1, 0]],
            &[vec![0, 0], vec![0, 0], vec![0, 0]],
        );
        assert_eq!(is_safe(&s), None);
    }
}
