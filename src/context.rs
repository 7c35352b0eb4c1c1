// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout entry point: [`LayoutContext::layout_paragraph`] turns
//! codepoints + attributes + shape + [`LayoutProperties`] into a
//! [`Layout`].

use crate::attributes::AttributeIndex;
use crate::bidi::BidiLevels;
use crate::emit::emit_lines;
use crate::error::LayoutError;
use crate::font::FontHandle;
use crate::layout::Layout;
use crate::line::{fit_greedy, fit_optimizing};
use crate::linebreak::{BreakOpportunities, HyphenationRegistry};
use crate::region::Region;
use crate::runs::build_runs;
use crate::shape::TextShaper;
use crate::{Alignment, BaseDirection, Fixed};

/// Per-call layout configuration.
#[derive(Clone, Debug)]
pub struct LayoutProperties {
    pub align: Alignment,
    /// First-line indent in 1/64 px; ignored when `align` is `Center`.
    pub indent: Fixed,
    pub base_direction: BaseDirection,
    /// Overrides per-glyph underline metrics when set.
    pub underline_font: Option<FontHandle>,
    /// `CodepointAttribute::link_id` is `1 + index` into this table.
    pub url_table: Vec<String>,
    pub optimize_line_breaks: bool,
    /// Divisor of 64; positions snap to multiples of `64 / round`.
    pub round: i32,
}

impl Default for LayoutProperties {
    fn default() -> Self {
        Self {
            align: Alignment::default(),
            indent: 0,
            base_direction: BaseDirection::default(),
            underline_font: None,
            url_table: Vec::new(),
            optimize_line_breaks: false,
            round: 1,
        }
    }
}

/// Owns the shaper and the hyphenation-dictionary registry across layout
/// calls.
pub struct LayoutContext {
    shaper: Box<dyn TextShaper>,
    hyphenation: HyphenationRegistry,
}

impl std::fmt::Debug for LayoutContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutContext").finish_non_exhaustive()
    }
}

impl LayoutContext {
    pub fn new(shaper: Box<dyn TextShaper>) -> Self {
        Self {
            shaper,
            hyphenation: HyphenationRegistry::new(),
        }
    }

    pub fn hyphenation_registry_mut(&mut self) -> &mut HyphenationRegistry {
        &mut self.hyphenation
    }

    /// Lays out one paragraph of `text` starting at `start_y`: bidi levels
    /// → break opportunities (+ hyphenation) → runs → shaped runs → fitted
    /// lines → reordered, justified, emitted layout.
    pub fn layout_paragraph(
        &mut self,
        text: &str,
        attrs: &AttributeIndex,
        region: &dyn Region,
        properties: &LayoutProperties,
        start_y: Fixed,
    ) -> Result<Layout, LayoutError> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Ok(Layout::new());
        }

        let levels = BidiLevels::resolve(text, properties.base_direction);
        let mut breaks =
            BreakOpportunities::classify_with_languages(text, |i| language_at(attrs, i));
        self.apply_hyphenation(&chars, attrs, &mut breaks);

        let indent = if properties.align == Alignment::Center { 0 } else { properties.indent };

        let runs = build_runs(
            &chars,
            attrs,
            &levels,
            &breaks,
            self.shaper.as_mut(),
            properties.underline_font.as_ref(),
            properties.round,
        )?;

        let lines = if properties.optimize_line_breaks {
            fit_optimizing(&runs, region, indent, start_y)
        } else {
            fit_greedy(&runs, region, indent, start_y)
        };

        let mut layout = Layout::new();
        emit_lines(
            &mut layout,
            &lines,
            &runs,
            region,
            properties.align,
            indent,
            &properties.url_table,
            start_y,
        );
        Ok(layout)
    }

    /// Hyphenates word by word, scoping each word's dictionary lookup to
    /// its own language tag.
    fn apply_hyphenation(&self, chars: &[char], attrs: &AttributeIndex, breaks: &mut BreakOpportunities) {
        let mut i = 0;
        while i < chars.len() {
            if !chars[i].is_alphabetic() {
                i += 1;
                continue;
            }
            let start = i;
            let lang = attrs.get(start).map(|a| a.language.clone()).unwrap_or_default();
            while i < chars.len() && chars[i].is_alphabetic() && language_matches(attrs, i, &lang) {
                i += 1;
            }
            if let Some(dict) = self.hyphenation.get(&lang) {
                let word: String = chars[start..i].iter().collect();
                for offset in dict.hyphenate(&word) {
                    breaks.allow_hyphenated_break_at(start + offset);
                }
            }
        }
    }
}

fn language_at<'a>(attrs: &'a AttributeIndex, i: usize) -> &'a str {
    attrs.get(i).map(|a| a.language.as_str()).unwrap_or("")
}

fn language_matches(attrs: &AttributeIndex, i: usize, lang: &str) -> bool {
    language_at(attrs, i) == lang
}
