// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The "outline library" contract: scaled metrics, cmap lookup,
//! and glyph rasterization to an alpha mask.
//!
//! Metrics and the character map come from `skrifa`. Rasterization records
//! the `skrifa` outline (via its `OutlinePen` callback) as a `zeno` path and
//! hands it to `zeno::Mask` for scan conversion, the same division of labor
//! `parley_draw` uses between `skrifa` (outlines) and its CPU rasterization
//! stack.

use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::raw::FontRef;
use skrifa::{GlyphId as SkrifaGlyphId, MetadataProvider};
use zeno::{Command, Fill, Mask, Vector};

use crate::error::{self, LayoutError};
use crate::{Fixed, SubpixelArrangement};

use super::{FontHandleInner, FontMetrics, GlyphId};

pub(crate) fn to_fixed(px: f32) -> Fixed {
    (px * 64.0).round() as Fixed
}

pub(crate) fn synthetic_metrics(pixel_size: f32) -> FontMetrics {
    FontMetrics {
        ascender: to_fixed(pixel_size * 0.8),
        descender: to_fixed(-pixel_size * 0.2),
        height: to_fixed(pixel_size * 1.2),
        underline_position: to_fixed(-pixel_size * 0.1),
        underline_thickness: to_fixed(pixel_size * 0.05).max(64),
    }
}

/// The synthetic test font (see `FontResource::Synthetic`) stores a 4-byte
/// id in place of real font bytes; no real sfnt is ever that short.
fn is_synthetic(inner: &FontHandleInner) -> bool {
    inner.font_data.len() == 4
}

fn with_font_ref<R>(
    inner: &FontHandleInner,
    f: impl FnOnce(&FontRef<'_>) -> Result<R, LayoutError>,
) -> Result<R, LayoutError> {
    let font_ref = FontRef::from_index(inner.font_data.as_ref(), inner.face_index)
        .map_err(|e| error::font_open_failed(format!("{e}")))?;
    f(&font_ref)
}

pub(crate) fn open_metrics(
    data: &[u8],
    face_index: u32,
    pixel_size: f32,
) -> Result<FontMetrics, LayoutError> {
    let font_ref =
        FontRef::from_index(data, face_index).map_err(|e| error::font_open_failed(format!("{e}")))?;
    if font_ref.charmap().map('A').is_none() && font_ref.charmap().map(' ').is_none() {
        return Err(error::missing_cmap("font has no usable Unicode cmap"));
    }
    let metrics = font_ref.metrics(Size::new(pixel_size), LocationRef::default());
    Ok(FontMetrics {
        ascender: to_fixed(metrics.ascent),
        descender: to_fixed(-metrics.descent),
        height: to_fixed(metrics.ascent + metrics.descent + metrics.leading),
        underline_position: to_fixed(metrics.underline_offset.unwrap_or(-pixel_size * 0.1)),
        underline_thickness: to_fixed(metrics.underline_size.unwrap_or(pixel_size * 0.05)).max(64),
    })
}

pub(crate) fn contains_glyph(inner: &FontHandleInner, ch: char) -> bool {
    glyph_for_char(inner, ch).is_some()
}

pub(crate) fn glyph_for_char(inner: &FontHandleInner, ch: char) -> Option<GlyphId> {
    if is_synthetic(inner) {
        return if ch == ' ' { None } else { Some(ch as GlyphId) };
    }
    with_font_ref(inner, |font_ref| Ok(font_ref.charmap().map(ch)))
        .ok()
        .flatten()
}

/// A rasterized alpha-only glyph bitmap with baseline-relative offsets.
#[derive(Clone, Debug)]
pub struct GlyphBitmap {
    /// Offset from the baseline origin to the bitmap's left edge, in px.
    pub left: i32,
    /// Offset from the baseline origin to the bitmap's top edge, in px
    /// (positive is up, matching font-ascent convention).
    pub top: i32,
    pub width: u32,
    pub height: u32,
    /// Bytes per row; guaranteed `>= width + 1`.
    pub pitch: u32,
    pub alpha: Vec<u8>,
}

/// Records a `skrifa` outline as a `zeno` path, scaling the x axis by
/// `subpixel_scale` (3 for horizontal LCD subpixel arrangements, 1 otherwise)
/// as it goes.
struct PathRecorder {
    commands: Vec<Command>,
    subpixel_scale: f32,
}

impl PathRecorder {
    fn new(subpixel_scale: f32) -> Self {
        Self { commands: Vec::new(), subpixel_scale }
    }

    fn scaled(&self, x: f32, y: f32) -> Vector {
        Vector::new(x * self.subpixel_scale, y)
    }
}

impl OutlinePen for PathRecorder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(Command::MoveTo(self.scaled(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(Command::LineTo(self.scaled(x, y)));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.commands.push(Command::QuadTo(self.scaled(cx0, cy0), self.scaled(x, y)));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.commands
            .push(Command::CurveTo(self.scaled(cx0, cy0), self.scaled(cx1, cy1), self.scaled(x, y)));
    }

    fn close(&mut self) {
        self.commands.push(Command::Close);
    }
}

fn synthetic_bitmap(ch: char, pixel_size: f32) -> GlyphBitmap {
    let size = (pixel_size * 0.6).max(1.0) as u32;
    let pitch = size + 1;
    let mut alpha = vec![0u8; (pitch * size) as usize];
    if ch != ' ' {
        for row in 0..size {
            for col in 0..size {
                alpha[(row * pitch + col) as usize] = 255;
            }
        }
    }
    GlyphBitmap {
        left: 0,
        top: size as i32,
        width: size,
        height: size,
        pitch,
        alpha,
    }
}

pub(crate) fn render_glyph(
    inner: &FontHandleInner,
    glyph: GlyphId,
    subpixel: SubpixelArrangement,
) -> Result<GlyphBitmap, LayoutError> {
    if is_synthetic(inner) {
        return Ok(synthetic_bitmap(
            char::from_u32(glyph).unwrap_or(' '),
            inner.pixel_size,
        ));
    }
    with_font_ref(inner, |font_ref| {
        let outlines = font_ref.outline_glyphs();
        let outline = outlines
            .get(SkrifaGlyphId::new(glyph))
            .ok_or_else(|| error::glyph_render_failed(format!("no outline for glyph {glyph}")))?;
        let subpixel_scale = match subpixel {
            SubpixelArrangement::HorizontalRgb | SubpixelArrangement::HorizontalBgr => 3.0,
            _ => 1.0,
        };
        let mut recorder = PathRecorder::new(subpixel_scale);
        let settings = DrawSettings::unhinted(Size::new(inner.pixel_size), LocationRef::default());
        outline
            .draw(settings, &mut recorder)
            .map_err(|e| error::glyph_render_failed(format!("glyph draw failed: {e:?}")))?;

        if recorder.commands.is_empty() {
            return Ok(GlyphBitmap {
                left: 0,
                top: 0,
                width: 0,
                height: 0,
                pitch: 1,
                alpha: Vec::new(),
            });
        }

        let (alpha, placement) = Mask::new(&recorder.commands[..]).style(Fill::NonZero).render();
        let pitch = placement.width + 1;
        let mut padded = vec![0u8; (pitch * placement.height) as usize];
        for row in 0..placement.height {
            let src_start = (row * placement.width) as usize;
            let src = &alpha[src_start..src_start + placement.width as usize];
            let dst_start = (row * pitch) as usize;
            padded[dst_start..dst_start + placement.width as usize].copy_from_slice(src);
        }
        Ok(GlyphBitmap {
            left: placement.left,
            top: placement.top,
            width: placement.width,
            height: placement.height,
            pitch,
            alpha: padded,
        })
    })
}
