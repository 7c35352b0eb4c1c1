// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font handles, the font cache, and family resolution.

mod cache;
mod family;
mod rasterize;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{FontContext, FontResource};
pub use family::{FontFamilyDescriptor, FontStretch, FontStyle, FontWeight};
pub use rasterize::GlyphBitmap;

use crate::error::LayoutError;
use crate::{Fixed, SubpixelArrangement};
use std::sync::Arc;

/// A glyph index as produced by the shaper and consumed by the outline
/// library.
pub type GlyphId = u32;

/// A shared handle to an opened font at a fixed pixel size.
///
/// Two handles compare equal iff they refer to the same underlying opened
/// font (pointer identity), matching the C++ original's use of the raw
/// `FontFace_c*` as a cache key component.
#[derive(Clone, Debug)]
pub struct FontHandle(pub(crate) Arc<FontHandleInner>);

#[derive(Debug)]
pub(crate) struct FontHandleInner {
    pub(crate) metrics: FontMetrics,
    pub(crate) font_data: Arc<[u8]>,
    pub(crate) face_index: u32,
    pub(crate) pixel_size: f32,
    pub(crate) description: String,
}

impl PartialEq for FontHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for FontHandle {}

/// Scaled font metrics, all in 1/64 px.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FontMetrics {
    pub ascender: Fixed,
    pub descender: Fixed,
    pub height: Fixed,
    pub underline_position: Fixed,
    pub underline_thickness: Fixed,
}

impl FontHandle {
    pub fn metrics(&self) -> FontMetrics {
        self.0.metrics
    }

    /// Whether the font's Unicode cmap maps `ch` to a glyph.
    pub fn contains_glyph(&self, ch: char) -> bool {
        rasterize::contains_glyph(&self.0, ch)
    }

    /// Maps a codepoint to a glyph id via the font's Unicode cmap.
    pub fn glyph_for_char(&self, ch: char) -> Option<GlyphId> {
        rasterize::glyph_for_char(&self.0, ch)
    }

    /// Rasterizes one glyph at the given sub-pixel arrangement, producing an
    /// alpha-only bitmap with baseline-relative offsets.
    pub fn render_glyph(
        &self,
        glyph: GlyphId,
        subpixel: SubpixelArrangement,
    ) -> Result<GlyphBitmap, LayoutError> {
        rasterize::render_glyph(&self.0, glyph, subpixel)
    }

    pub fn pixel_size(&self) -> f32 {
        self.0.pixel_size
    }

    /// Raw font bytes, for passing to a shaping backend. For the synthetic
    /// test font this is the 4-byte placeholder payload, never shaped with
    /// a real shaper.
    pub(crate) fn font_data_for_shaping(&self) -> &[u8] {
        &self.0.font_data
    }

    pub(crate) fn face_index_for_shaping(&self) -> u32 {
        self.0.face_index
    }

    /// A human-readable description of the underlying resource, stable
    /// across opens of the same resource; used by the persisted layout
    /// format's font table.
    pub fn description(&self) -> &str {
        &self.0.description
    }

    /// A stable integer identity for this opened font, usable as a hash-map
    /// key. Two
    /// handles sharing the same underlying resource return the same value.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}
