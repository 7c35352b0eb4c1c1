// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shaper integration.
//!
//! The engine only depends on a capability contract: given
//! `(font, codepoints, direction, script, language)`, produce a sequence of
//! `(glyph id, cluster, x-advance, y-advance, x-offset, y-offset)`. That
//! contract is expressed here as the [`TextShaper`] trait so the run builder
//! never names a shaping library directly; [`HarfrustShaper`] is the
//! production backend, built on `harfrust`.

use crate::font::{FontHandle, GlyphId};
use crate::error::LayoutError;
use crate::Fixed;

/// Base shaping direction, derived from the embedding level's parity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeDirection {
    Ltr,
    Rtl,
}

/// Everything the shaper needs about one run.
#[derive(Debug)]
pub struct ShapeRequest<'a> {
    pub text: &'a str,
    pub font: &'a FontHandle,
    pub direction: ShapeDirection,
    /// ISO-15924 script tag, if derivable from the language tag.
    pub script: Option<&'a str>,
    pub language: &'a str,
}

/// One shaped glyph, cluster-mapped back to source codepoint positions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: GlyphId,
    /// Byte offset into the run's source text of the cluster this glyph
    /// belongs to.
    pub cluster: u32,
    pub x_advance: Fixed,
    pub y_advance: Fixed,
    pub x_offset: Fixed,
    pub y_offset: Fixed,
}

/// Capability the run builder depends on.
pub trait TextShaper {
    fn shape(&mut self, request: &ShapeRequest<'_>) -> Result<Vec<ShapedGlyph>, LayoutError>;
}

fn to_fixed_from_font_units(value: i32, units_per_em_scale: f32) -> Fixed {
    ((value as f32) * units_per_em_scale * 64.0).round() as Fixed
}

/// Production shaper backed by `harfrust` (HarfBuzz-compatible shaping).
#[derive(Default)]
pub struct HarfrustShaper;

impl HarfrustShaper {
    pub fn new() -> Self {
        Self
    }
}

impl TextShaper for HarfrustShaper {
    fn shape(&mut self, request: &ShapeRequest<'_>) -> Result<Vec<ShapedGlyph>, LayoutError> {
        use crate::error;

        let font_data = request.font.font_data_for_shaping();
        let face_index = request.font.face_index_for_shaping();
        let pixel_size = request.font.pixel_size();

        let harf_font = harfrust::FontRef::from_index(font_data, face_index)
            .map_err(|e| error::font_open_failed(format!("{e}")))?;
        let shaper_data = harfrust::ShaperData::new(&harf_font);
        let shaper = shaper_data
            .shaper(&harf_font)
            .point_size(Some(pixel_size))
            .build();

        let mut buffer = harfrust::UnicodeBuffer::new();
        buffer.push_str(request.text);
        buffer.set_direction(match request.direction {
            ShapeDirection::Ltr => harfrust::Direction::LeftToRight,
            ShapeDirection::Rtl => harfrust::Direction::RightToLeft,
        });
        if let Some(script_tag) = request.script.and_then(iso15924_to_harfrust_script) {
            buffer.set_script(script_tag);
        }

        let glyph_buffer = shaper.shape(buffer, &[]);
        let infos = glyph_buffer.glyph_infos();
        let positions = glyph_buffer.glyph_positions();

        // harfrust reports advances/offsets in font design units at the
        // shaper's configured point size; `skrifa` metrics are already
        // scaled to pixels, so normalize by font units-per-em here. Most
        // OpenType fonts use 1000 or 2048 upem; harfrust exposes the
        // font's upem directly.
        let upem = harf_font.units_per_em().max(1) as f32;
        let scale = pixel_size / upem;

        let glyphs = infos
            .iter()
            .zip(positions.iter())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id,
                cluster: info.cluster,
                x_advance: to_fixed_from_font_units(pos.x_advance, scale),
                y_advance: to_fixed_from_font_units(pos.y_advance, scale),
                x_offset: to_fixed_from_font_units(pos.x_offset, scale),
                y_offset: to_fixed_from_font_units(pos.y_offset, scale),
            })
            .collect();
        Ok(glyphs)
    }
}

fn iso15924_to_harfrust_script(tag: &str) -> Option<harfrust::Script> {
    if tag.len() != 4 {
        return None;
    }
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(tag.as_bytes());
    harfrust::Script::from_iso15924_tag(harfrust::Tag::from_be_bytes(bytes))
}

/// Deterministic shaper for tests: one glyph per codepoint, advance derived
/// from the font's pixel size, no ligatures or reordering. Grounded in the
/// same "fake backend instead of real font files" approach as
/// [`crate::font::testing`].
#[derive(Default)]
pub struct FakeShaper;

impl TextShaper for FakeShaper {
    fn shape(&mut self, request: &ShapeRequest<'_>) -> Result<Vec<ShapedGlyph>, LayoutError> {
        let advance = ((request.font.pixel_size() * 0.6).round() as i32) * 64;
        let glyphs = request
            .text
            .char_indices()
            .map(|(byte_pos, ch)| ShapedGlyph {
                glyph_id: request.font.glyph_for_char(ch).unwrap_or(0),
                cluster: byte_pos as u32,
                x_advance: if ch == ' ' { advance } else { advance },
                y_advance: 0,
                x_offset: 0,
                y_offset: 0,
            })
            .collect();
        Ok(glyphs)
    }
}
