// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unicode bidirectional embedding levels.
//!
//! `unicode-bidi` already implements the full UBA, so resolution here is a
//! thin layer over it rather than a from-scratch reimplementation.

use smallvec::SmallVec;
use unicode_bidi::{BidiInfo, Level};

use crate::BaseDirection;

/// A paragraph's embedding level, one per codepoint, plus the highest level
/// reached (needed by the line fitter's reorder pass, 4).
#[derive(Clone, Debug, Default)]
pub struct BidiLevels {
    levels: SmallVec<[u8; 64]>,
    max_level: u8,
}

impl BidiLevels {
    /// Resolves embedding levels for `text`, treating bidi control
    /// codepoints (U+202A/202B/202C and friends) as ordinary input per the
    /// embedding/override controls they are.
    pub fn resolve(text: &str, base: BaseDirection) -> Self {
        let default_level = match base {
            BaseDirection::Ltr => Level::ltr(),
            BaseDirection::Rtl => Level::rtl(),
        };
        let info = BidiInfo::new(text, Some(default_level));
        let mut levels: SmallVec<[u8; 64]> = SmallVec::with_capacity(text.chars().count());
        let mut max_level = default_level.number();
        for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
            let level = info.levels[byte_idx].number();
            levels.push(level);
            max_level = max_level.max(level);
            let _ = char_idx;
        }
        Self { levels, max_level }
    }

    /// The embedding level of the `i`-th codepoint.
    pub fn level(&self, i: usize) -> u8 {
        self.levels[i]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.levels
    }
}

/// Reverses maximal subspans whose level is `>= level`, for one pass of the
/// UAX #9 L2 reorder. Applied for `level` from
/// [`BidiLevels::max_level`] down to 1 by the line fitter.
pub fn reverse_level_runs(order: &mut [usize], levels: impl Fn(usize) -> u8, level: u8) {
    let len = order.len();
    let mut i = 0;
    while i < len {
        if levels(order[i]) >= level {
            let mut end = i + 1;
            while end < len && levels(order[end]) >= level {
                end += 1;
            }
            order[i..end].reverse();
            i = end;
        } else {
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_ltr_text_is_all_even_levels() {
        let levels = BidiLevels::resolve("Test Text", BaseDirection::Ltr);
        assert_eq!(levels.len(), "Test Text".chars().count());
        assert!(levels.as_slice().iter().all(|l| l % 2 == 0));
    }

    #[test]
    fn rtl_base_direction_is_odd_for_neutral_only_text() {
        // Arabic letters resolve to odd (R) levels under an RTL base.
        let levels = BidiLevels::resolve("\u{0643}\u{0623}\u{0633}", BaseDirection::Rtl);
        assert!(levels.as_slice().iter().all(|l| l % 2 == 1));
    }

    #[test]
    fn reorder_reverses_high_level_subspan() {
        let mut order: Vec<usize> = (0..5).collect();
        let lv = [0u8, 1, 1, 1, 0];
        reverse_level_runs(&mut order, |i| lv[i], 1);
        assert_eq!(order, vec![0, 3, 2, 1, 4]);
    }

    #[test]
    fn reordering_back_reproduces_logical_order() {
        // Fixed logical levels for "abc كأس xyz"-shaped input: LTR run,
        // nested RTL run, LTR run.
        let lv = [0u8, 0, 0, 1, 1, 1, 0, 0, 0];
        let max_level = *lv.iter().max().unwrap();

        let mut order: Vec<usize> = (0..lv.len()).collect();
        for level in (1..=max_level).rev() {
            reverse_level_runs(&mut order, |i| lv[i], level);
        }

        // Each reversed span is its own inverse: re-running the identical
        // max-to-1 pass over the already-reordered sequence restores the
        // logical (identity) order.
        for level in (1..=max_level).rev() {
            reverse_level_runs(&mut order, |i| lv[i], level);
        }
        assert_eq!(order, (0..lv.len()).collect::<Vec<_>>());
    }
}
