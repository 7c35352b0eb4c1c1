// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The glyph paint cache: rasterized alpha masks
//! keyed by `(font, glyph id, sub-pixel arrangement, blur radius)`, plus
//! blurred rectangles sharing the same cache under a distinct key shape.

use log::debug;

use crate::error::LayoutError;
use crate::font::GlyphId;
use crate::lru_cache::LruCache;
use crate::SubpixelArrangement;

pub use crate::font::GlyphBitmap;

/// Blur radii at or above this force [`SubpixelArrangement::None`].
pub const BLUR_SUBPIXEL_THRESHOLD: u32 = 1;

/// Padding added on every side of a glyph bitmap per pixel of blur radius,
/// so the box blur doesn't read past the original outline.
const BLUR_SPREAD_PER_PIXEL: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum PaintKey {
    Glyph { font: usize, glyph: GlyphId, subpixel: SubpixelArrangementKey, blur: u32 },
    /// Width/height in px, blur radius. Rectangles share the cache under a
    /// distinct key of (width, height, blur), folded here into its own
    /// variant rather than a magic `font = 0`, `glyph = 0` sentinel.
    Rect { width: u32, height: u32, blur: u32 },
}

/// [`SubpixelArrangement`] doesn't derive `Hash`/`Eq` (it's a `#[non_exhaustive]`
/// ambient-config enum); mirror it locally for use as a cache key component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum SubpixelArrangementKey {
    None,
    HorizontalRgb,
    HorizontalBgr,
    VerticalRgb,
    VerticalBgr,
}

impl From<SubpixelArrangement> for SubpixelArrangementKey {
    fn from(value: SubpixelArrangement) -> Self {
        match value {
            SubpixelArrangement::None => Self::None,
            SubpixelArrangement::HorizontalRgb => Self::HorizontalRgb,
            SubpixelArrangement::HorizontalBgr => Self::HorizontalBgr,
            SubpixelArrangement::VerticalRgb => Self::VerticalRgb,
            SubpixelArrangement::VerticalBgr => Self::VerticalBgr,
        }
    }
}

/// Rasterized alpha masks keyed by font/glyph/sub-pixel/blur, trimmed
/// least-recently-used. Owned by a rendering back
/// end; the layout core never touches it.
#[derive(Default)]
pub struct PaintCache {
    entries: LruCache<PaintKey, GlyphBitmap>,
}

impl std::fmt::Debug for PaintCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaintCache").field("len", &self.entries.len()).finish()
    }
}

impl PaintCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up or rasterizes+blurs a glyph. `render` produces the
    /// unblurred, unpadded bitmap (typically [`FontHandle::render_glyph`]).
    /// `blur_radius` of `0` skips blurring and padding entirely.
    pub fn get_or_render_glyph(
        &mut self,
        font_identity: usize,
        glyph: GlyphId,
        subpixel: SubpixelArrangement,
        blur_radius: u32,
        render: impl FnOnce() -> Result<GlyphBitmap, LayoutError>,
    ) -> Result<&GlyphBitmap, LayoutError> {
        let effective_subpixel = if blur_radius >= BLUR_SUBPIXEL_THRESHOLD {
            SubpixelArrangement::None
        } else {
            subpixel
        };
        let key = PaintKey::Glyph {
            font: font_identity,
            glyph,
            subpixel: effective_subpixel.into(),
            blur: blur_radius,
        };
        self.entries.get_or_try_insert_with(key, || {
            let raw = render()?;
            Ok(prepare_glyph(&raw, blur_radius))
        })
    }

    /// Looks up or generates a blurred filled-rectangle alpha mask.
    pub fn get_or_render_rect(
        &mut self,
        width: u32,
        height: u32,
        blur_radius: u32,
        render: impl FnOnce() -> GlyphBitmap,
    ) -> &GlyphBitmap {
        let key = PaintKey::Rect { width, height, blur: blur_radius };
        self.entries
            .get_or_try_insert_with::<()>(key, || Ok(prepare_glyph(&render(), blur_radius)))
            .expect("rect rasterization is infallible")
    }

    /// Trims to at most `max_entries`, evicting rectangle entries first
    /// regardless of recency.
    pub fn trim(&mut self, max_entries: usize) {
        let before = self.entries.len();
        self.entries.trim_with(max_entries, |k| matches!(k, PaintKey::Rect { .. }));
        let evicted = before.saturating_sub(self.entries.len());
        if evicted > 0 {
            debug!("paint cache trimmed {evicted} entries (kept {max_entries})");
        }
    }
}

/// Pads a rasterized bitmap by the blur spread on all sides and applies a
/// three-pass box blur, or returns an unpadded clone when `blur_radius == 0`.
fn prepare_glyph(bitmap: &GlyphBitmap, blur_radius: u32) -> GlyphBitmap {
    if blur_radius == 0 {
        return bitmap.clone();
    }
    let spread = blur_radius * BLUR_SPREAD_PER_PIXEL;
    let padded_width = bitmap.width + 2 * spread;
    let padded_height = bitmap.height + 2 * spread;

    let mut tight = vec![0u8; (padded_width * padded_height) as usize];
    for row in 0..bitmap.height {
        let src_start = (row * bitmap.pitch) as usize;
        let src = &bitmap.alpha[src_start..src_start + bitmap.width as usize];
        let dst_row = row + spread;
        let dst_start = (dst_row * padded_width + spread) as usize;
        tight[dst_start..dst_start + bitmap.width as usize].copy_from_slice(src);
    }

    let blurred = box_blur3(&tight, padded_width, padded_height, blur_radius as f32);

    // Re-pad with the one extra column the renderer relies on.
    let pitch = padded_width + 1;
    let mut alpha = vec![0u8; (pitch * padded_height) as usize];
    for row in 0..padded_height {
        let src = &blurred[(row * padded_width) as usize..((row + 1) * padded_width) as usize];
        let dst_start = (row * pitch) as usize;
        alpha[dst_start..dst_start + padded_width as usize].copy_from_slice(src);
    }

    GlyphBitmap {
        left: bitmap.left - spread as i32,
        top: bitmap.top + spread as i32,
        width: padded_width,
        height: padded_height,
        pitch,
        alpha,
    }
}

/// A three-pass box blur approximating a Gaussian of standard deviation
/// `sigma`, operating on a tightly packed `width * height` alpha buffer.
pub fn box_blur3(src: &[u8], width: u32, height: u32, sigma: f32) -> Vec<u8> {
    if width == 0 || height == 0 || sigma <= 0.0 {
        return src.to_vec();
    }
    let mut buf = src.to_vec();
    for box_width in box_widths_for_sigma(sigma) {
        let radius = (box_width.saturating_sub(1)) / 2;
        if radius == 0 {
            continue;
        }
        buf = box_blur_pass(&buf, width, height, radius);
    }
    buf
}

/// Derives three (odd) box widths whose combined variance approximates a
/// Gaussian of the given `sigma`, per the standard box-blur-approximation
/// formula (Kutskir, "Fast Almost-Gaussian Filtering").
fn box_widths_for_sigma(sigma: f32) -> [u32; 3] {
    let n = 3.0_f32;
    let ideal_width = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut low = ideal_width.floor() as i32;
    if low % 2 == 0 {
        low -= 1;
    }
    let low = low.max(1);
    let high = low + 2;
    let ideal_boxes_at_low = (12.0 * sigma * sigma
        - n * (low * low) as f32
        - 4.0 * n * low as f32
        - 3.0 * n)
        / (-4.0 * low as f32 - 4.0);
    let boxes_at_low = ideal_boxes_at_low.round().clamp(0.0, n) as i32;
    let mut widths = [0u32; 3];
    for (i, w) in widths.iter_mut().enumerate() {
        *w = if (i as i32) < boxes_at_low { low as u32 } else { high as u32 };
    }
    widths
}

/// One horizontal-then-vertical box blur pass with clamped (edge-extended)
/// boundaries.
fn box_blur_pass(src: &[u8], width: u32, height: u32, radius: u32) -> Vec<u8> {
    let horizontal = box_blur_1d(src, width, height, radius, true);
    box_blur_1d(&horizontal, width, height, radius, false)
}

fn box_blur_1d(src: &[u8], width: u32, height: u32, radius: u32, horizontal: bool) -> Vec<u8> {
    let (w, h) = (width as i64, height as i64);
    let r = radius as i64;
    let window = (2 * r + 1) as f32;
    let mut dst = vec![0u8; src.len()];
    let (outer, inner) = if horizontal { (h, w) } else { (w, h) };
    for outer_idx in 0..outer {
        let pixel = |inner_idx: i64| -> u32 {
            let clamped = inner_idx.clamp(0, inner - 1);
            let (x, y) = if horizontal { (clamped, outer_idx) } else { (outer_idx, clamped) };
            src[(y * w + x) as usize] as u32
        };
        let mut sum: u32 = (-r..=r).map(pixel).sum();
        for inner_idx in 0..inner {
            let (x, y) = if horizontal { (inner_idx, outer_idx) } else { (outer_idx, inner_idx) };
            dst[(y * w + x) as usize] = (sum as f32 / window).round() as u8;
            sum = sum + pixel(inner_idx + r + 1) - pixel(inner_idx - r);
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blurring_a_single_bright_pixel_spreads_it_to_neighbors() {
        let width = 9;
        let height = 9;
        let mut src = vec![0u8; (width * height) as usize];
        src[(4 * width + 4) as usize] = 255;

        let blurred = box_blur3(&src, width, height, 1.5);

        let center = blurred[(4 * width + 4) as usize];
        let neighbor = blurred[(4 * width + 5) as usize];
        let far = blurred[0];
        assert!(center > 0);
        assert!(neighbor > 0 && neighbor < center);
        assert_eq!(far, 0);
    }

    #[test]
    fn blurring_a_flat_field_is_a_no_op() {
        let width = 6;
        let height = 6;
        let src = vec![128u8; (width * height) as usize];
        let blurred = box_blur3(&src, width, height, 2.0);
        // Interior pixels (away from the clamped edges) are unchanged by a
        // blur of a perfectly flat field.
        assert_eq!(blurred[(3 * width + 3) as usize], 128);
    }

    #[test]
    fn zero_sigma_is_a_no_op() {
        let src = vec![10u8, 20, 30, 40];
        let blurred = box_blur3(&src, 2, 2, 0.0);
        assert_eq!(blurred, src);
    }

    #[test]
    fn high_blur_radius_forces_subpixel_none() {
        let mut cache = PaintCache::new();
        let bitmap = GlyphBitmap { left: 0, top: 0, width: 2, height: 2, pitch: 3, alpha: vec![255; 9] };
        cache
            .get_or_render_glyph(1, 7, SubpixelArrangement::HorizontalRgb, BLUR_SUBPIXEL_THRESHOLD, || {
                Ok(bitmap.clone())
            })
            .unwrap();
        // Requesting the same glyph at SubpixelArrangement::None with the
        // same blur must hit the cache entry the first call produced.
        let hit = cache.get_or_render_glyph(1, 7, SubpixelArrangement::None, BLUR_SUBPIXEL_THRESHOLD, || {
            panic!("should have been a cache hit")
        });
        assert!(hit.is_ok());
    }

    #[test]
    fn rect_entries_are_trimmed_before_glyph_entries() {
        let mut cache = PaintCache::new();
        cache.get_or_render_rect(4, 4, 0, || GlyphBitmap {
            left: 0,
            top: 0,
            width: 4,
            height: 4,
            pitch: 5,
            alpha: vec![255; 20],
        });
        for glyph in 0..3u32 {
            cache
                .get_or_render_glyph(1, glyph, SubpixelArrangement::None, 0, || {
                    Ok(GlyphBitmap { left: 0, top: 0, width: 1, height: 1, pitch: 2, alpha: vec![255; 2] })
                })
                .unwrap();
        }
        assert_eq!(cache.len(), 4);
        cache.trim(3);
        assert_eq!(cache.len(), 3);
        // The rect is gone even though it's the least recently touched only
        // incidentally; glyph 0 (oldest glyph) must have survived instead.
        assert!(cache
            .get_or_render_glyph(1, 0, SubpixelArrangement::None, 0, || panic!("should be cached"))
            .is_ok());
    }
}
