// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dictionary hyphenation: a registered pattern set lets a single long word
//! break mid-word, and the chosen break draws a visible hyphen glyph.

mod common;

use textflow::linebreak::{HyphenationDictionary, HyphenationRegistry};
use textflow::region::RectRegion;
use textflow::runs::HYPHEN_CHAR;
use textflow::{DrawCommand, LayoutProperties};

/// `hy3ph` / `hy3phen` / `hen2a` with `LEFTHYPHENMIN 2` / `RIGHTHYPHENMIN 2`
/// hyphenates "hyphen" after "hy" (Liang's pattern algorithm picks the
/// highest-weight pattern covering each position; the only odd weight in
/// range here is the `3` between "hy" and "ph").
fn toy_dictionary() -> HyphenationDictionary {
    HyphenationDictionary::parse("LEFTHYPHENMIN 2\nRIGHTHYPHENMIN 2\n.hy3ph\nhy3phen\nhen2a\n").unwrap()
}

/// A single word far too wide for its shape, with no spaces to break on:
/// without hyphenation the greedy fitter would have to take the whole
/// oversized word on one line; with a registered
/// dictionary it instead breaks mid-word and draws a hyphen.
#[test]
fn registered_dictionary_lets_a_long_word_break_and_draws_a_hyphen() {
    let (_font_ctx, font) = common::synthetic_font(16.0);
    let mut ctx = common::layout_context();
    ctx.hyphenation_registry_mut().register(&["en".to_string()], toy_dictionary());

    let text = "hyphenhyphenhyphen";
    let attrs = common::uniform_attrs(text, &font, "en");
    // Wide enough for about half the word, so the fitter is forced to pick
    // one of the hyphenation dictionary's break points rather than taking
    // the whole word whole.
    let region = RectRegion::new(70 * 64);

    let layout = ctx
        .layout_paragraph(text, &attrs, &region, &LayoutProperties::default(), 0)
        .unwrap();

    let mut ys: Vec<i32> = layout
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Glyph { y, .. } => Some(*y),
            _ => None,
        })
        .collect();
    ys.sort_unstable();
    ys.dedup();
    assert!(ys.len() > 1, "the long word should wrap onto more than one line: {ys:?}");

    let hyphen_glyph = HYPHEN_CHAR as u32;
    let hyphen_count = layout
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::Glyph { glyph, .. } if *glyph == hyphen_glyph))
        .count();
    assert!(hyphen_count >= 1, "a hyphenation-chosen break should draw a hyphen glyph: {:?}", layout.commands());
}

/// Without a registered dictionary for the paragraph's language, the same
/// text never hyphenates: no hyphen glyph is ever drawn.
#[test]
fn no_dictionary_means_no_hyphenation() {
    let (_font_ctx, font) = common::synthetic_font(16.0);
    let mut ctx = common::layout_context();

    let text = "hyphenhyphenhyphen";
    let attrs = common::uniform_attrs(text, &font, "en");
    let region = RectRegion::new(70 * 64);

    let layout = ctx
        .layout_paragraph(text, &attrs, &region, &LayoutProperties::default(), 0)
        .unwrap();

    let hyphen_glyph = HYPHEN_CHAR as u32;
    let hyphen_count = layout
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::Glyph { glyph, .. } if *glyph == hyphen_glyph))
        .count();
    assert_eq!(hyphen_count, 0);
}
