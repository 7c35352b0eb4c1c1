// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The texture atlas: a skyline rectangle packer
//! over a fixed `W x H` grid, versioned so GPU back ends know when to
//! reupload.

use log::warn;

/// One placed rectangle's position in the atlas: `(x, y, width, height)` in the atlas, plus the glyph's
/// baseline-relative `(left, top)` offsets carried through from rasterization.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasEntry {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct SkylineSegment {
    x: u32,
    width: u32,
    y: u32,
}

/// Returned by [`Atlas::allocate`] when no placement fits within the
/// atlas's height at the current fill level.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasFull;

/// A versioned skyline-packed texture atlas.
/// Owned and mutated by a rendering back end; the layout core never
/// touches it.
#[derive(Debug)]
pub struct Atlas {
    width: u32,
    height: u32,
    skyline: Vec<SkylineSegment>,
    version: u32,
}

impl Atlas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            skyline: vec![SkylineSegment { x: 0, width, y: 0 }],
            version: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bumps on every [`Atlas::clear`]; back ends compare this to their last
    /// uploaded version to decide whether to reupload.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Allocates a `width x height` rectangle, picking the skyline segment
    /// that minimizes the resulting placement height, ties broken by lowest
    /// segment index. `left`/`top` are copied onto the returned
    /// entry unchanged; they describe the rasterized bitmap, not the
    /// packing.
    pub fn allocate(&mut self, width: u32, height: u32, left: i32, top: i32) -> Result<AtlasEntry, AtlasFull> {
        let Some((segment_index, placement_y)) = self.best_placement(width, height) else {
            warn!("atlas has no room for a {width}x{height} rectangle at version {}", self.version);
            return Err(AtlasFull);
        };
        let x = self.skyline[segment_index].x;
        self.insert_skyline(x, width, placement_y + height);
        Ok(AtlasEntry { x, y: placement_y, width, height, left, top })
    }

    /// Finds the segment index and resulting top-y minimizing the placement
    /// height, or `None` if every candidate would exceed the atlas bounds.
    fn best_placement(&self, width: u32, height: u32) -> Option<(usize, u32)> {
        let mut best: Option<(usize, u32)> = None;
        for (i, segment) in self.skyline.iter().enumerate() {
            if segment.x + width > self.width {
                continue;
            }
            let placement_y = self.max_y_over_range(segment.x, segment.x + width);
            if placement_y + height > self.height {
                continue;
            }
            match best {
                Some((_, best_y)) if best_y <= placement_y => {}
                _ => best = Some((i, placement_y)),
            }
        }
        best
    }

    fn max_y_over_range(&self, x0: u32, x1: u32) -> u32 {
        self.skyline
            .iter()
            .filter(|s| s.x < x1 && s.x + s.width > x0)
            .map(|s| s.y)
            .max()
            .unwrap_or(0)
    }

    /// Rebuilds the skyline in a shadow vector, then swaps it in.
    fn insert_skyline(&mut self, x0: u32, width: u32, new_y: u32) {
        let x1 = x0 + width;
        let mut shadow: Vec<SkylineSegment> = Vec::with_capacity(self.skyline.len() + 1);
        for segment in &self.skyline {
            let segment_end = segment.x + segment.width;
            if segment_end <= x0 || segment.x >= x1 {
                shadow.push(*segment);
                continue;
            }
            if segment.x < x0 {
                shadow.push(SkylineSegment { x: segment.x, width: x0 - segment.x, y: segment.y });
            }
            if segment_end > x1 {
                shadow.push(SkylineSegment { x: x1, width: segment_end - x1, y: segment.y });
            }
        }
        shadow.push(SkylineSegment { x: x0, width, y: new_y });
        shadow.sort_by_key(|s| s.x);

        let mut merged: Vec<SkylineSegment> = Vec::with_capacity(shadow.len());
        for segment in shadow {
            match merged.last_mut() {
                Some(last) if last.x + last.width == segment.x && last.y == segment.y => {
                    last.width += segment.width;
                }
                _ => merged.push(segment),
            }
        }
        self.skyline = merged;
    }

    /// Clears all packed content and bumps [`Atlas::version`].
    pub fn clear(&mut self) {
        self.skyline = vec![SkylineSegment { x: 0, width: self.width, y: 0 }];
        self.version = self.version.wrapping_add(1);
    }

    /// Every skyline segment's `y` strictly exceeds the allocated height of
    /// anything to its left within its own x-range. Exposed for tests.
    #[cfg(test)]
    fn skyline_is_consistent(&self) -> bool {
        self.skyline.windows(2).all(|w| w[0].x + w[0].width == w[1].x)
    }
}
