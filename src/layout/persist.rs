// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persisted layout format: a structural stand-in for an XML save/load
//! layer, without the XML I/O itself (out of scope).
//!
//! `Tree` is a plain in-memory tree: root height/left/right, a font table,
//! an ordered command list, and a link table. `save`/`load` convert between
//! it and a [`Layout`]; re-loading needs a [`FontContext`] and a resolver
//! that turns a font's persisted description back into a [`FontResource`].

use crate::error::{self, LayoutError};
use crate::font::{FontContext, FontResource, GlyphId};
use crate::{Color, Fixed};

use super::{DrawCommand, Layout, LinkInfo};

/// One font table entry: a resource description plus the pixel size it was
/// opened at.
#[derive(Clone, Debug, PartialEq)]
pub struct FontTableEntry {
    pub description: String,
    pub pixel_size: f32,
}

/// A persisted drawing command, referencing fonts by index into the
/// accompanying [`Tree::fonts`] table rather than by live handle.
#[derive(Clone, Debug, PartialEq)]
pub enum PersistCommand {
    Glyph {
        font_index: usize,
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

/// The persisted structure: root bbox, font table, command list, link
/// table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tree {
    pub left: Fixed,
    pub right: Fixed,
    pub height: Fixed,
    pub fonts: Vec<FontTableEntry>,
    pub commands: Vec<PersistCommand>,
    pub links: Vec<LinkInfo>,
}

/// Converts a built [`Layout`] into its persisted representation. Two
/// glyphs sharing the same font handle share one font table entry.
pub fn save(layout: &Layout) -> Tree {
    let mut fonts: Vec<FontTableEntry> = Vec::new();
    let mut commands = Vec::with_capacity(layout.commands().len());

    for command in layout.commands() {
        let persisted = match command {
            DrawCommand::Glyph {
                font,
                glyph,
                x,
                y,
                color,
                blur,
            } => {
                let font_index = fonts
                    .iter()
                    .position(|entry| {
                        entry.description == font.description() && entry.pixel_size == font.pixel_size()
                    })
                    .unwrap_or_else(|| {
                        fonts.push(FontTableEntry {
                            description: font.description().to_string(),
                            pixel_size: font.pixel_size(),
                        });
                        fonts.len() - 1
                    });
                PersistCommand::Glyph {
                    font_index,
                    glyph: *glyph,
                    x: *x,
                    y: *y,
                    color: *color,
                    blur: *blur,
                }
            }
            DrawCommand::Rect { x, y, w, h, color, blur } => PersistCommand::Rect {
                x: *x,
                y: *y,
                w: *w,
                h: *h,
                color: *color,
                blur: *blur,
            },
            DrawCommand::Image { x, y, w, h, url } => PersistCommand::Image {
                x: *x,
                y: *y,
                w: *w,
                h: *h,
                url: url.clone(),
            },
        };
        commands.push(persisted);
    }

    Tree {
        left: layout.left(),
        right: layout.right(),
        height: layout.height(),
        fonts,
        commands,
        links: layout.links().to_vec(),
    }
}

/// Rebuilds a [`Layout`] from a persisted [`Tree`]. `resolve` maps a font
/// table entry's description back to the [`FontResource`] it was opened
/// from; the caller owns that mapping since descriptions are
/// free-form text.
///
/// Does not restore `first_baseline`: the persisted format has no field
/// for it, so round-tripping a `Layout` through `save`/`load` reproduces
/// the bounding box, commands, and links, but a fresh layout call is
/// required to recover the first baseline.
pub fn load(
    tree: &Tree,
    font_context: &mut FontContext,
    resolve: impl Fn(&str) -> FontResource,
) -> Result<Layout, LayoutError> {
    let mut handles = Vec::with_capacity(tree.fonts.len());
    for entry in &tree.fonts {
        let resource = resolve(&entry.description);
        let handle = font_context.open(resource, entry.pixel_size).map_err(|e| {
            error::font_open_failed(format!("{}: {e}", entry.description))
        })?;
        handles.push(handle);
    }

    let mut layout = Layout::new();
    for command in &tree.commands {
        let command = match command {
            PersistCommand::Glyph {
                font_index,
                glyph,
                x,
                y,
                color,
                blur,
            } => {
                let font = handles
                    .get(*font_index)
                    .ok_or_else(|| error::font_open_failed("font index out of range"))?
                    .clone();
                DrawCommand::Glyph {
                    font,
                    glyph: *glyph,
                    x: *x,
                    y: *y,
                    color: *color,
                    blur: *blur,
                }
            }
            PersistCommand::Rect { x, y, w, h, color, blur } => DrawCommand::Rect {
                x: *x,
                y: *y,
                w: *w,
                h: *h,
                color: *color,
                blur: *blur,
            },
            PersistCommand::Image { x, y, w, h, url } => DrawCommand::Image {
                x: *x,
                y: *y,
                w: *w,
                h: *h,
                url: url.clone(),
            },
        };
        layout.push_command(command);
    }
    for link in &tree.links {
        for &rect in &link.rects {
            layout.merge_link(&link.url, rect);
        }
    }
    layout.set_bbox(tree.left, tree.right, tree.height);
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::fake_font_handle;

    #[test]
    fn save_then_load_reproduces_commands_and_bbox() {
        let mut ctx = FontContext::new(4);
        let font = fake_font_handle();

        let mut layout = Layout::new();
        layout.push_command(DrawCommand::Glyph {
            font: font.clone(),
            glyph: 42,
            x: 64,
            y: 128,
            color: Color::WHITE,
            blur: 0,
        });
        layout.push_command(DrawCommand::Rect {
            x: 0,
            y: 0,
            w: 100,
            h: 10,
            color: Color::BLACK,
            blur: 0,
        });
        layout.merge_link("https://example.test", (0, 0, 50, 20));
        layout.set_bbox(0, 1000, 200);

        let tree = save(&layout);
        assert_eq!(tree.fonts.len(), 1);

        let reloaded = load(&tree, &mut ctx, |_description| FontResource::Synthetic { id: 0 }).unwrap();
        assert_eq!(reloaded.commands().len(), layout.commands().len());
        assert_eq!(reloaded.left(), layout.left());
        assert_eq!(reloaded.right(), layout.right());
        assert_eq!(reloaded.height(), layout.height());
        assert_eq!(reloaded.links(), layout.links());

        let tree_again = save(&reloaded);
        assert_eq!(tree_again.left, tree.left);
        assert_eq!(tree_again.commands.len(), tree.commands.len());
    }
}
