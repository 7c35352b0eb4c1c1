// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `Layout::append`/`Layout::shift` group-action laws, and the persisted
//! format's round-trip law, exercised on real layouts produced by
//! `layout_paragraph` rather than synthetic command literals.

mod common;

use textflow::font::FontResource;
use textflow::layout::persist;
use textflow::region::RectRegion;
use textflow::{DrawCommand, Layout, LayoutProperties};

fn paragraph(text: &str) -> Layout {
    let (_font_ctx, font) = common::synthetic_font(16.0);
    let mut ctx = common::layout_context();
    let attrs = common::uniform_attrs(text, &font, "en");
    let region = RectRegion::new(400 * 64);
    ctx.layout_paragraph(text, &attrs, &region, &LayoutProperties::default(), 0).unwrap()
}

fn glyph_xys(layout: &Layout) -> Vec<(i32, i32)> {
    layout
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Glyph { x, y, .. } => Some((*x, *y)),
            _ => None,
        })
        .collect()
}

/// Appending `b` and `c` to `a` at their own offsets lands on the same
/// glyph positions as pre-shifting `b` and `c` by those same offsets,
/// merging them into one layout, and appending that at zero offset: `append`
/// composes with `shift` the way a group action should.
#[test]
fn append_composes_with_shift_over_real_paragraphs() {
    let a = paragraph("one");
    let b = paragraph("two");
    let c = paragraph("three");

    let mut chained = a.clone();
    chained.append(&b, 10 * 64, 5 * 64);
    chained.append(&c, 20 * 64, 15 * 64);

    let mut b_shifted = b.clone();
    b_shifted.shift(10 * 64, 5 * 64);
    let mut c_shifted = c.clone();
    c_shifted.shift(20 * 64, 15 * 64);
    let mut combined = Layout::new();
    combined.append(&b_shifted, 0, 0);
    combined.append(&c_shifted, 0, 0);
    let mut grouped = a.clone();
    grouped.append(&combined, 0, 0);

    // `shift` deliberately leaves bbox numerics untouched (that's the
    // caller's job), so only the glyph positions are expected to agree here.
    assert_eq!(glyph_xys(&chained), glyph_xys(&grouped));
}

/// An empty `Layout` adopts the first appended layout's first baseline;
/// appending a second one never overwrites it.
#[test]
fn append_adopts_first_baseline_only_once() {
    let a = paragraph("alpha");
    let b = paragraph("beta");

    let mut combined = Layout::new();
    combined.append(&a, 0, 0);
    let after_first = combined.first_baseline();
    combined.append(&b, 0, 100 * 64);

    assert_eq!(combined.first_baseline(), after_first);
    assert_eq!(combined.first_baseline(), a.first_baseline());
}

/// Two successive shifts equal one shift by the sum of both deltas.
#[test]
fn shift_is_a_group_action_on_a_real_paragraph() {
    let base = paragraph("hyphenation makes long words wrap more evenly");

    let mut twice = base.clone();
    twice.shift(3 * 64, -2 * 64);
    twice.shift(7 * 64, 11 * 64);

    let mut once = base.clone();
    once.shift(10 * 64, 9 * 64);

    assert_eq!(glyph_xys(&twice), glyph_xys(&once));
}

/// Saving a real paragraph's layout and loading it back reproduces its
/// commands, links, and bbox; `first_baseline` is documented as not
/// restored, so a fresh layout call is still required for that.
#[test]
fn save_and_load_round_trips_a_real_paragraph() {
    let (mut font_ctx, _font) = common::synthetic_font(16.0);
    let layout = paragraph("a quick round trip through the persisted format");

    let tree = persist::save(&layout);
    assert!(!tree.commands.is_empty());

    let reloaded = persist::load(&tree, &mut font_ctx, |_description| FontResource::Synthetic { id: 0 }).unwrap();

    assert_eq!(glyph_xys(&reloaded), glyph_xys(&layout));
    assert_eq!(reloaded.left(), layout.left());
    assert_eq!(reloaded.right(), layout.right());
    assert_eq!(reloaded.height(), layout.height());
    assert_eq!(reloaded.links(), layout.links());

    let tree_again = persist::save(&reloaded);
    assert_eq!(tree_again.commands.len(), tree.commands.len());
}
