// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The optimizing line fitter: a
//! forward dynamic program over break points that minimizes total badness
//! across the whole paragraph, rather than greedily taking the widest line
//! that fits.
//!
//! Badness is the squared deviation from a fill ratio of 1.0, plus a flat
//! penalty for ending a line on a hyphen and a further penalty for two
//! hyphenated lines in a row (constants chosen here rather than pinned
//! upstream; see DESIGN.md).

use crate::region::Region;
use crate::Fixed;

use super::{available_width, compute_metrics, is_break_point, FittedLine};
use crate::linebreak::BreakClass;
use crate::runs::Run;

const HYPHEN_PENALTY: f64 = 10.0;
const CONSECUTIVE_HYPHEN_PENALTY: f64 = 20.0;

/// Same contract as [`super::fit_greedy`], but chooses break points via a
/// whole-paragraph dynamic program instead of committing greedily. Produces
/// identical output to the greedy fitter whenever the greedy choice is
/// already optimal.
pub fn fit_optimizing(runs: &[Run], region: &dyn Region, indent: Fixed, start_y: Fixed) -> Vec<FittedLine> {
    if runs.is_empty() {
        return Vec::new();
    }

    let n = runs.len();
    let mut candidates: Vec<usize> = vec![0];
    for p in 1..=n {
        if p == n || is_break_point(runs, p) {
            candidates.push(p);
        }
    }
    candidates.dedup();
    let m = candidates.len();

    let mut best_cost = vec![f64::INFINITY; m];
    let mut best_prev: Vec<Option<usize>> = vec![None; m];
    let mut best_hyphens = vec![0u32; m];
    let mut best_y = vec![start_y; m];
    best_cost[0] = 0.0;

    for i in 0..m {
        if !best_cost[i].is_finite() {
            continue;
        }
        let raw_start = candidates[i];
        let mut line_start = raw_start;
        while line_start < n && runs[line_start].is_space {
            line_start += 1;
        }
        if line_start >= n {
            continue;
        }
        let indent_applies =
            raw_start == 0 || (raw_start > 0 && runs[raw_start - 1].trailing_break == BreakClass::Must);
        let y = best_y[i];

        for j in (i + 1)..m {
            let end = candidates[j];
            if end <= line_start {
                continue;
            }
            let metrics = compute_metrics(runs, line_start, end, indent_applies, indent);
            let available = available_width(region, y, metrics.ascender, metrics.descender);
            let overflows = metrics.width > available;

            if overflows {
                if j == i + 1 {
                    // First candidate for this line already overflows: take
                    // it anyway, same as the greedy fitter's shape-infeasible
                    // fallback, then stop extending this line further.
                } else {
                    break;
                }
            }

            let ratio = if available > 0 {
                metrics.width as f64 / available as f64
            } else {
                1.0
            };
            let slack = ratio - 1.0;
            let ends_on_hyphen = metrics.trims_soft_hyphen || metrics.draws_trailing_hyphen;
            let mut badness = slack * slack * 100.0;
            if ends_on_hyphen {
                badness += HYPHEN_PENALTY;
            }
            let hyph_here = u32::from(ends_on_hyphen);
            if hyph_here > 0 && best_hyphens[i] > 0 {
                badness += CONSECUTIVE_HYPHEN_PENALTY;
            }

            let total = best_cost[i] + badness;
            let hyphens_after = best_hyphens[i] + hyph_here;
            let new_y = y + metrics.ascender - metrics.descender;

            let improves = total < best_cost[j] || (total == best_cost[j] && hyphens_after < best_hyphens[j]);
            if improves {
                best_cost[j] = total;
                best_prev[j] = Some(i);
                best_hyphens[j] = hyphens_after;
                best_y[j] = new_y;
            }

            let forced = runs[end - 1].trailing_break == BreakClass::Must;
            if forced || overflows {
                break;
            }
        }
    }

    let last = m - 1;
    debug_assert_eq!(candidates[last], n);
    if !best_cost[last].is_finite() {
        // Unreachable in practice (every line can always take at least one
        // run), but fall back to the greedy fitter rather than panic.
        return super::fit_greedy(runs, region, indent, start_y);
    }

    let mut chain = Vec::new();
    let mut j = last;
    while let Some(i) = best_prev[j] {
        chain.push((i, j));
        j = i;
    }
    chain.reverse();

    let mut lines = Vec::with_capacity(chain.len());
    for (i, j) in chain {
        let raw_start = candidates[i];
        let mut line_start = raw_start;
        while line_start < n && runs[line_start].is_space {
            line_start += 1;
        }
        let end = candidates[j];
        let indent_applies =
            raw_start == 0 || (raw_start > 0 && runs[raw_start - 1].trailing_break == BreakClass::Must);
        let metrics = compute_metrics(runs, line_start, end, indent_applies, indent);
        let forced = runs[end - 1].trailing_break == BreakClass::Must;
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
    }
    lines
}
