// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout object: drawing commands, link regions, and the bounding box.

use crate::font::{FontHandle, GlyphId};
use crate::{Color, Fixed};

pub mod persist;

/// One positioned drawing instruction, in absolute 1/64 px coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Glyph {
        font: FontHandle,
        glyph: GlyphId,
        x: Fixed,
        y: Fixed,
        color: Color,
        blur: Fixed,
    },
    Rect {
        x: Fixed,
        y: Fixed,
        w: Fixed,
        h: Fixed,
        color: Color,
        blur: Fixed,
    },
    Image {
        x: Fixed,
        y: Fixed,
        w: Fixed,
        h: Fixed,
        url: String,
    },
}

impl DrawCommand {
    pub(crate) fn translate(&mut self, dx: Fixed, dy: Fixed) {
        match self {
            Self::Glyph { x, y, .. } | Self::Rect { x, y, .. } | Self::Image { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
        }
    }
}

/// One hyperlink's hit-test rectangles, in absolute 1/64 px coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkInfo {
    pub url: String,
    /// `(x, y, w, h)` rectangles, in order of first appearance.
    pub rects: Vec<(Fixed, Fixed, Fixed, Fixed)>,
}

/// An ordered sequence of drawing commands plus link regions and a bounding
/// box. Built once by the layouter; read-only for
/// rendering back ends, but may be recombined with [`Layout::append`] and
/// [`Layout::shift`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    commands: Vec<DrawCommand>,
    links: Vec<LinkInfo>,
    left: Fixed,
    right: Fixed,
    height: Fixed,
    first_baseline: Option<Fixed>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn links(&self) -> &[LinkInfo] {
        &self.links
    }

    pub fn left(&self) -> Fixed {
        self.left
    }

    pub fn right(&self) -> Fixed {
        self.right
    }

    pub fn height(&self) -> Fixed {
        self.height
    }

    /// The y-coordinate of the first baseline, if the layout contains any
    /// lines.
    pub fn first_baseline(&self) -> Option<Fixed> {
        self.first_baseline
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn push_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub(crate) fn merge_link(&mut self, url: &str, rect: (Fixed, Fixed, Fixed, Fixed)) {
        if let Some(entry) = self.links.iter_mut().find(|l| l.url == url) {
            entry.rects.push(rect);
        } else {
            self.links.push(LinkInfo {
                url: url.to_string(),
                rects: vec![rect],
            });
        }
    }

    pub(crate) fn set_first_baseline_if_unset(&mut self, baseline: Fixed) {
        if self.first_baseline.is_none() {
            self.first_baseline = Some(baseline);
        }
    }

    /// Sets the bounding box directly, as computed by the line fitter from
    /// the shape's *outer* edges.
    pub(crate) fn set_bbox(&mut self, left: Fixed, right: Fixed, height: Fixed) {
        self.left = left;
        self.right = right;
        self.height = height;
    }

    /// Copies `other`'s commands and link rectangles translated by
    /// `(dx, dy)`, unions the bounding box, and adopts `other`'s
    /// first baseline iff `self` was empty before the call.
    pub fn append(&mut self, other: &Layout, dx: Fixed, dy: Fixed) {
        let was_empty = self.commands.is_empty();

        for command in &other.commands {
            let mut command = command.clone();
            command.translate(dx, dy);
            self.commands.push(command);
        }
        for link in &other.links {
            for &(x, y, w, h) in &link.rects {
                self.merge_link(&link.url, (x + dx, y + dy, w, h));
            }
        }

        if was_empty {
            self.left = other.left + dx;
            self.right = other.right + dx;
            self.height = other.height + dy;
            self.first_baseline = other.first_baseline.map(|b| b + dy);
        } else {
            self.left = self.left.min(other.left + dx);
            self.right = self.right.max(other.right + dx);
            self.height = self.height.max(other.height + dy);
        }
    }

    /// Translates every command and every link rectangle by `(dx, dy)`.
    /// Does not touch the bounding box numerics; the caller is responsible
    /// for updating `left`/`right`/`height` if needed.
    pub fn shift(&mut self, dx: Fixed, dy: Fixed) {
        for command in &mut self.commands {
            command.translate(dx, dy);
        }
        for link in &mut self.links {
            for rect in &mut link.rects {
                rect.0 += dx;
                rect.1 += dy;
            }
        }
    }
}
