// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual reordering of a fitted line's runs: reuses
//! [`crate::bidi::reverse_level_runs`], the same UAX #9 L2 primitive the
//! paragraph-level bidi resolution pass is built on.

use std::ops::Range;

use crate::bidi::reverse_level_runs;
use crate::runs::Run;

/// Returns the visual order of run indices within `run_range`: maximal
/// subspans at level `>= level` reversed, applied from the line's highest
/// level down to 1.
pub fn reorder_line(runs: &[Run], run_range: Range<usize>) -> Vec<usize> {
    let mut order: Vec<usize> = run_range.clone().collect();
    let max_level = run_range.clone().map(|i| runs[i].level).max().unwrap_or(0);
    for level in (1..=max_level).rev() {
        reverse_level_runs(&mut order, |i| runs[i].level, level);
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::fake_font_handle;
    use crate::linebreak::BreakClass;
    use crate::runs::{LinkSegment, RunFragment};

    fn run_at_level(level: u8) -> Run {
        Run {
            range: 0..1,
            level,
            trailing_break: BreakClass::NoBreak,
            font: fake_font_handle(),
            is_space: false,
            is_soft_hyphen: false,
            ascender: 0,
            descender: 0,
            width: 64,
            fragments: Vec::<RunFragment>::new(),
            links: Vec::<LinkSegment>::new(),
            trailing_hyphen: None,
        }
    }

    #[test]
    fn reverses_only_the_embedded_rtl_span() {
        let runs = vec![run_at_level(0), run_at_level(1), run_at_level(1), run_at_level(0)];
        let order = reorder_line(&runs, 0..4);
        assert_eq!(order, vec![0, 2, 1, 3]);
    }

    #[test]
    fn pure_ltr_line_is_unchanged() {
        let runs = vec![run_at_level(0), run_at_level(0)];
        let order = reorder_line(&runs, 0..2);
        assert_eq!(order, vec![0, 1]);
    }
}
