// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-line English paragraphs: LEFT alignment and first-line indent.

mod common;

use textflow::region::RectRegion;
use textflow::{Alignment, DrawCommand, LayoutProperties};

/// "Test Text" laid out LTR/LEFT in a wide shape: glyph x-coordinates strictly
/// increase, and the first baseline equals the font's ascender.
#[test]
fn one_liner_left_aligned_orders_glyphs_left_to_right() {
    let (_font_ctx, font) = common::synthetic_font(16.0);
    let mut ctx = common::layout_context();
    let text = "Test Text";
    let attrs = common::uniform_attrs(text, &font, "en");
    let region = RectRegion::new(1000 * 64);

    let layout = ctx
        .layout_paragraph(text, &attrs, &region, &LayoutProperties::default(), 0)
        .unwrap();

    let xs: Vec<i32> = layout
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Glyph { x, .. } => Some(*x),
            _ => None,
        })
        .collect();
    assert!(!xs.is_empty());
    assert!(xs.windows(2).all(|w| w[0] < w[1]), "glyph x-coordinates must strictly increase: {xs:?}");

    assert_eq!(layout.first_baseline(), Some(font.metrics().ascender));
}

/// The same text with a 10px text-indent: the first glyph starts at or past
/// the indent (plus whatever left-side bearing the shaper introduces, which
/// the fake shaper reports as zero).
#[test]
fn text_indent_pushes_the_first_line_right() {
    let (_font_ctx, font) = common::synthetic_font(16.0);
    let mut ctx = common::layout_context();
    let text = "Test Text";
    let attrs = common::uniform_attrs(text, &font, "en");
    let region = RectRegion::new(1000 * 64);
    let properties = LayoutProperties {
        align: Alignment::Left,
        indent: 10 * 64,
        ..LayoutProperties::default()
    };

    let layout = ctx.layout_paragraph(text, &attrs, &region, &properties, 0).unwrap();

    let first_x = layout
        .commands()
        .iter()
        .find_map(|c| match c {
            DrawCommand::Glyph { x, .. } => Some(*x),
            _ => None,
        })
        .unwrap();
    assert!(first_x >= 10 * 64, "first glyph at {first_x} should be at or past the 10px indent");
}

/// Center alignment ignores `indent` entirely.
#[test]
fn center_alignment_ignores_indent() {
    let (_font_ctx, font) = common::synthetic_font(16.0);
    let mut ctx = common::layout_context();
    let text = "Test";
    let attrs = common::uniform_attrs(text, &font, "en");
    let region = RectRegion::new(1000 * 64);
    let indented = LayoutProperties {
        align: Alignment::Center,
        indent: 50 * 64,
        ..LayoutProperties::default()
    };
    let plain = LayoutProperties {
        align: Alignment::Center,
        indent: 0,
        ..LayoutProperties::default()
    };

    let a = ctx.layout_paragraph(text, &attrs, &region, &indented, 0).unwrap();
    let b = ctx.layout_paragraph(text, &attrs, &region, &plain, 0).unwrap();
    assert_eq!(a.left(), b.left());
    assert_eq!(a.right(), b.right());
}
