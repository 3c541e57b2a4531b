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

//! Text rendering of oracle state.

use warden_core::SystemState;

const TITLES: [&str; 4] = ["Allocation", "Maximum", "Need", "Available"];

/// Renders the four state tables side by side, one row per thread:
///
/// ```text
///     Allocation  Maximum     Need        Available
///       A  B  C     A  B  C     A  B  C     A  B  C
/// P0    0  1  0     7  5  3     7  4  3     3  3  2
/// P1    2  0  0     3  2  2     1  2  2
/// ```
pub fn render_state(state: &SystemState) -> String {
    let cell = column_width(state) + 2;
    let block = (state.resources() * cell).max(TITLES[0].len()) + 2;

    let mut lines = Vec::with_capacity(state.threads() + 2);

    let mut line = String::from("    ");
    for title in TITLES {
        line.push_str(&format!("{title:<block$}"));
    }
    lines.push(line);

    let labels: Vec<String> = (0..state.resources()).map(resource_label).collect();
    let header = cells(&labels, cell);
    lines.push(format!("    {}", format!("{header:<block$}").repeat(TITLES.len())));

    for i in 0..state.threads() {
        let mut line = format!("{:<4}", format!("P{i}"));
        for matrix in [state.allocation(), state.maximum(), state.need()] {
            line.push_str(&format!("{:<block$}", cells(matrix.row(i), cell)));
        }
        if i == 0 {
            line.push_str(&cells(state.available().as_slice(), cell));
        }
        lines.push(line);
    }
    if state.threads() == 0 {
        let blank = " ".repeat(4 + 3 * block);
        lines.push(format!("{blank}{}", cells(state.available().as_slice(), cell)));
    }

    let mut out = String::new();
    for line in lines {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Widest value the tables can hold; every entry is bounded by the totals
/// or the declared maxima.
fn column_width(state: &SystemState) -> usize {
    state
        .total_installed()
        .iter()
        .chain(state.maximum().iter_rows().flatten())
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1)
}

/// Column labels `A`, `B`, ... `Z`, then `R26`, `R27`, ...
fn resource_label(j: usize) -> String {
    match u8::try_from(j) {
        Ok(k) if k < 26 => char::from(b'A' + k).to_string(),
        _ => format!("R{j}"),
    }
}

fn cells<T: ToString>(values: &[T], width: usize) -> String {
    values
        .iter()
        .map(|v| format!("{:>width$}", v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_small_state() {
        let state = SystemState::from_parts(
            &[3, 3, 2],
            &[vec![7, 5, 3], vec![3, 2, 2]],
            &[vec![0, 1, 0], vec![2, 0, 0]],
        )
        .unwrap();
        let text = render_state(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "    Allocation  Maximum     Need        Available",
                "      A  B  C     A  B  C     A  B  C     A  B  C",
                "P0    0  1  0     7  5  3     7  4  3     3  3  2",
                "P1    2  0  0     3  2  2     1  2  2",
            ]
        );
    }

    #[test]
    fn test_wide_values_widen_columns() {
        let state = SystemState::from_parts(&[100], &[vec![120]], &[vec![20]]).unwrap();
        let text = render_state(&state);
        assert!(text.contains("P0     20         120         100         100"));
    }

    #[test]
    fn test_available_shown_without_threads() {
        let state = SystemState::from_parts(&[5, 5], &[], &[]).unwrap();
        let text = render_state(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], format!("{}  5  5", " ".repeat(40)));
        // Lines up under the Available header.
        assert_eq!(lines[2].len(), lines[1].len());
    }

    #[test]
    fn test_resource_labels() {
        assert_eq!(resource_label(0), "A");
        assert_eq!(resource_label(25), "Z");
        assert_eq!(resource_label(26), "R26");
    }
}
