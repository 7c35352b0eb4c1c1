// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line-break opportunity classification and hyphenation.

pub mod hyphenate;

pub use hyphenate::{HyphenationDictionary, HyphenationRegistry};

use icu_properties::props::LineBreak as IcuLineBreak;
use icu_properties::CodePointMapData;
use icu_segmenter::LineSegmenter;

/// Classification of the gap between two adjacent codepoints.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BreakClass {
    /// Forced break, e.g. after LF.
    Must,
    /// Soft opportunity.
    Allow,
    NoBreak,
    /// Grapheme-internal; the fitter treats this as [`BreakClass::NoBreak`].
    InsideChar,
}

/// One [`BreakClass`] per codepoint in a paragraph, naming the gap
/// immediately following that codepoint. The gap after the last codepoint
/// is always [`BreakClass::Must`] (end of paragraph).
#[derive(Clone, Debug, Default)]
pub struct BreakOpportunities {
    classes: Vec<BreakClass>,
    /// Parallel to `classes`: set for a gap that was upgraded to `Allow` by
    /// hyphenation rather than by ordinary line-break classification.
    hyphenated: Vec<bool>,
}

impl BreakOpportunities {
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn class_at(&self, i: usize) -> BreakClass {
        self.classes[i]
    }

    /// Whether the gap after codepoint `i` is an `Allow` opportunity that
    /// came from hyphenation (as opposed to ordinary word breaking).
    pub fn is_hyphenated_break(&self, i: usize) -> bool {
        self.hyphenated.get(i).copied().unwrap_or(false)
    }

    /// Classifies a whole paragraph that is uniformly one language (no
    /// per-codepoint language sub-segmentation needed).
    pub fn classify(text: &str) -> Self {
        Self::classify_with_languages(text, |_| "")
    }

    /// Classifies `text`, re-running the break classifier independently on
    /// every maximal run of codepoints that share a language tag.
    /// `language_at(i)` returns the language tag of the `i`-th codepoint.
    pub fn classify_with_languages(text: &str, language_at: impl Fn(usize) -> &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Self::default();
        }
        let mut classes = Vec::with_capacity(chars.len());
        let mut run_start = 0;
        while run_start < chars.len() {
            let lang = language_at(run_start);
            let mut run_end = run_start + 1;
            while run_end < chars.len() && language_at(run_end) == lang {
                run_end += 1;
            }
            // Include one extra trailing codepoint as context so the
            // classifier doesn't force a spurious break at the segment
            // boundary.
            let context_end = (run_end + 1).min(chars.len());
            let segment: String = chars[run_start..context_end].iter().collect();
            let mut segment_classes = classify_segment(&segment);
            segment_classes.truncate(run_end - run_start);
            classes.extend(segment_classes);
            run_start = run_end;
        }
        classes[chars.len() - 1] = BreakClass::Must;
        let hyphenated = vec![false; classes.len()];
        Self { classes, hyphenated }
    }

    /// Applies hyphenation opportunities from `dict` to word interiors,
    /// upgrading interior `NoBreak` gaps to `Allow` where the dictionary
    /// permits a break.
    ///
    /// `word_at` returns `(start, word)` for the word containing codepoint
    /// index `i`, or `None` if `i` is not inside a word.
    pub fn apply_hyphenation(
        &mut self,
        text: &str,
        dict: &HyphenationDictionary,
        is_word_char: impl Fn(char) -> bool,
    ) {
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if !is_word_char(chars[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < chars.len() && is_word_char(chars[i]) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            for offset in dict.hyphenate(&word) {
                self.allow_hyphenated_break_at(start + offset);
            }
        }
    }

    /// Upgrades the gap after codepoint `i` from `NoBreak` to `Allow`.
    /// Exposed so callers that scope hyphenation dictionaries per
    /// per-codepoint language themselves (rather than per whole-text call,
    /// 2) can drive word-by-word hyphenation one language run at a
    /// time.
    pub fn allow_break_at(&mut self, i: usize) {
        if i < self.classes.len() && self.classes[i] == BreakClass::NoBreak {
            self.classes[i] = BreakClass::Allow;
        }
    }

    /// Like [`Self::allow_break_at`], but also records the gap as
    /// hyphenation-derived (see [`Self::is_hyphenated_break`]) so the run
    /// builder knows to draw a hyphen glyph if this opportunity is chosen as
    /// a line end.
    pub fn allow_hyphenated_break_at(&mut self, i: usize) {
        if i < self.classes.len() && self.classes[i] == BreakClass::NoBreak {
            self.classes[i] = BreakClass::Allow;
            self.hyphenated[i] = true;
        }
    }
}

fn is_mandatory_break_char(ch: char) -> bool {
    matches!(
        CodePointMapData::<IcuLineBreak>::new().get(ch),
        IcuLineBreak::MandatoryBreak | IcuLineBreak::CarriageReturn | IcuLineBreak::LineFeed | IcuLineBreak::NextLine
    )
}

/// Classifies one self-contained segment (which may include one codepoint
/// of borrowed trailing context); returns one class per codepoint in
/// `segment`.
fn classify_segment(segment: &str) -> Vec<BreakClass> {
    let chars: Vec<char> = segment.chars().collect();
    let byte_offsets: Vec<usize> = segment.char_indices().map(|(b, _)| b).collect();
    let mut classes = vec![BreakClass::NoBreak; chars.len()];

    let mut boundary_after: Vec<bool> = vec![false; chars.len()];
    let boundaries: Vec<usize> = LineSegmenter::new_auto().segment_str(segment).collect();
    for &byte_pos in &boundaries {
        if byte_pos == 0 || byte_pos == segment.len() {
            continue;
        }
        if let Ok(char_idx) = byte_offsets.binary_search(&byte_pos) {
            if char_idx > 0 {
                boundary_after[char_idx - 1] = true;
            }
        }
    }

    for (i, &ch) in chars.iter().enumerate() {
        if i + 1 >= chars.len() {
            continue;
        }
        if is_mandatory_break_char(ch) {
            classes[i] = BreakClass::Must;
        } else if boundary_after[i] {
            classes[i] = BreakClass::Allow;
        } else {
            classes[i] = BreakClass::NoBreak;
        }
    }
    classes
}
