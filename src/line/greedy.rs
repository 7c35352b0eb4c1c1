// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The greedy line fitter: accumulate runs up to the
//! widest break point that still fits, commit, repeat.

use crate::linebreak::BreakClass;
use crate::region::Region;
use crate::Fixed;

use super::{available_width, compute_metrics, is_break_point, FittedLine};
use crate::runs::Run;

/// Greedily splits `runs` into lines that fit within `region`, starting at
/// `start_y`. `indent` is added to the first line and to any line
/// immediately following a forced break; the caller is responsible for
/// passing `0` when the paragraph's alignment is CENTER.
pub fn fit_greedy(runs: &[Run], region: &dyn Region, indent: Fixed, start_y: Fixed) -> Vec<FittedLine> {
    let mut lines = Vec::new();
    let mut cursor = 0usize;
    let mut y = start_y;
    let mut next_indent_applies = true;

    while cursor < runs.len() {
        while cursor < runs.len() && runs[cursor].is_space {
            cursor += 1;
        }
        if cursor >= runs.len() {
            break;
        }

        let line_start = cursor;
        let indent_applies = next_indent_applies;

        let mut committed_end: Option<usize> = None;
        let mut committed = None;
        let mut probe_end = line_start;

        loop {
            if probe_end >= runs.len() {
                if committed_end.is_none() {
                    let metrics = compute_metrics(runs, line_start, runs.len(), indent_applies, indent);
                    committed_end = Some(runs.len());
                    committed = Some(metrics);
                }
                break;
            }
            probe_end += 1;
            if !is_break_point(runs, probe_end) {
                continue;
            }

            let metrics = compute_metrics(runs, line_start, probe_end, indent_applies, indent);
            let available = available_width(region, y, metrics.ascender, metrics.descender);
            let fits = metrics.width <= available;
            let forced = runs[probe_end - 1].trailing_break == BreakClass::Must;

            if fits {
                committed_end = Some(probe_end);
                committed = Some(metrics);
                if forced {
                    break;
                }
                continue;
            }
            if committed_end.is_some() {
                break;
            }
            // Nothing committed yet and even this first candidate overflows:
            // take it anyway.
            committed_end = Some(probe_end);
            committed = Some(metrics);
            break;
        }

        let end = committed_end.unwrap();
        let metrics = committed.unwrap();
        let forced = runs[end - 1].trailing_break == BreakClass::Must;
        next_indent_applies = forced;

        y += metrics.ascender - metrics.descender;

        lines.push(FittedLine {
            run_range: line_start..end,
            ascender: metrics.ascender,
            descender: metrics.descender,
            width: metrics.width,
            num_spaces: metrics.num_spaces,
            forced_break: forced,
            trims_soft_hyphen: metrics.trims_soft_hyphen,
            draws_trailing_hyphen: metrics.draws_trailing_hyphen,
            indent_applies,
        });

        cursor = end;
    }

    lines
}
