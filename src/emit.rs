// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening fitted, reordered, and justified lines into a [`Layout`].

use log::trace;

use crate::layout::{DrawCommand, Layout};
use crate::line::{justify::justify_line, reorder::reorder_line, FittedLine};
use crate::region::Region;
use crate::runs::Run;
use crate::{Alignment, Fixed};

/// Emits every fitted line into `layout`, in visual order, with shadows
/// under glyphs, baselines at `y + ascender`, justification space
/// distributed across successive space runs, and links merged by URL.
pub fn emit_lines(
    layout: &mut Layout,
    lines: &[FittedLine],
    runs: &[Run],
    region: &dyn Region,
    alignment: Alignment,
    indent: Fixed,
    url_table: &[String],
    start_y: Fixed,
) {
    let mut y = start_y;
    let mut outer_left = Fixed::MAX;
    let mut outer_right = Fixed::MIN;

    for (line_index, line) in lines.iter().enumerate() {
        let is_last_line = line_index == lines.len() - 1;
        let baseline = y + line.ascender;

        let band_top = y;
        let band_bottom = y + line.ascender - line.descender;
        let inner_left = region.inner_left(band_top, band_bottom);
        let inner_right = region.inner_right(band_top, band_bottom);
        outer_left = outer_left.min(region.outer_left(band_top, band_bottom));
        outer_right = outer_right.max(region.outer_right(band_top, band_bottom));

        let justification = justify_line(line, alignment, inner_left, inner_right, indent, is_last_line);

        let order = reorder_line(runs, line.run_range.clone());

        trace!(
            "emit line {line_index}: runs={} advance={} x_origin={}",
            order.len(),
            line.ascender - line.descender,
            justification.x_origin
        );

        let mut cursor_x = justification.x_origin;
        let mut spaces_seen: Fixed = 0;
        // Collected across every run of the line and sorted by layer before
        // emission, so a shadow from an earlier run can never be overpainted
        // by a later run's own glyph (layer 0..N-1 are shadows, N is the
        // glyph/underline itself; see `RunFragment::layer`).
        let mut layered: Vec<(u32, DrawCommand)> = Vec::new();

        for &run_index in &order {
            let run = &runs[run_index];
            let run_origin_x = cursor_x + justification.space_adder * spaces_seen;

            // A soft hyphen not actually used as this line's break is never
            // drawn, even though its width still counted toward the line
            //: only the break that ends a line there
            // makes the hyphen visible.
            let draws_hyphen_glyph = !run.is_soft_hyphen || (line.trims_soft_hyphen && run_index == line.run_range.end - 1);
            if draws_hyphen_glyph {
                for fragment in &run.fragments {
                    let mut command = fragment.command.clone();
                    command.translate(run_origin_x, baseline);
                    layered.push((fragment.layer, command));
                }
            }

            // A dictionary-hyphenation opportunity only draws its glyph
            // when it's actually this line's chosen break,
            // synthesized after the run's own glyphs since it isn't part of
            // the shaped text. It always belongs to the line's last run, so
            // sorting it last among the line's layers keeps it after every
            // glyph layer while still following any of that run's shadows.
            if run_index == line.run_range.end - 1 && line.draws_trailing_hyphen {
                if let Some(hyphen) = &run.trailing_hyphen {
                    layered.push((
                        u32::MAX,
                        DrawCommand::Glyph {
                            font: run.font.clone(),
                            glyph: hyphen.glyph,
                            x: run_origin_x + run.width,
                            y: baseline,
                            color: hyphen.color,
                            blur: 0,
                        },
                    ));
                }
            }
            for link in &run.links {
                let (x, y, w, h) = link.rect;
                let rect = (x + run_origin_x, y + baseline, w, h);
                if let Some(url) = url_table.get((link.link_id - 1) as usize) {
                    layout.merge_link(url, rect);
                }
            }

            cursor_x += run.width;
            if run.is_space {
                spaces_seen += 1;
            }
        }

        layered.sort_by_key(|(layer, _)| *layer);
        for (_, command) in layered {
            layout.push_command(command);
        }

        layout.set_first_baseline_if_unset(baseline);
        y += line.ascender - line.descender;
    }

    if outer_left > outer_right {
        outer_left = 0;
        outer_right = 0;
    }
    layout.set_bbox(outer_left, outer_right, y - start_y);
}
