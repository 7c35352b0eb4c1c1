// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the integration suite. Only textflow's public API is
//! reachable from `tests/`, so font/shaper determinism comes from the two
//! public test seams: `FontResource::Synthetic` and `shape::FakeShaper`.
#![allow(dead_code)]

use textflow::attributes::{AttributeIndex, CodepointAttribute};
use textflow::font::{FontContext, FontFamilyDescriptor, FontHandle, FontResource, FontStretch, FontStyle, FontWeight};
use textflow::{Color, LayoutContext};

pub const FAMILY: &str = "Synthetic Test Family";

/// A font context with one registered synthetic family, and a handle opened
/// from it at `pixel_size`.
pub fn synthetic_font(pixel_size: f32) -> (FontContext, FontHandle) {
    let mut ctx = FontContext::new(8);
    ctx.register_family(
        FAMILY,
        FontStyle::Normal,
        FontWeight::NORMAL,
        FontStretch::Normal,
        FontResource::Synthetic { id: 0 },
    );
    let handle = ctx
        .resolve(&FontFamilyDescriptor::new(FAMILY), pixel_size)
        .expect("synthetic family always resolves");
    (ctx, handle)
}

/// A `LayoutContext` driven by the deterministic fake shaper.
pub fn layout_context() -> LayoutContext {
    LayoutContext::new(Box::new(textflow::shape::FakeShaper))
}

/// An attribute index covering all of `text` with one plain attribute using
/// `font` and `language`.
pub fn uniform_attrs(text: &str, font: &FontHandle, language: &str) -> AttributeIndex {
    let mut attrs = AttributeIndex::new();
    attrs.set(0..text.chars().count(), CodepointAttribute::new(Color::BLACK, font.clone(), language));
    attrs
}
