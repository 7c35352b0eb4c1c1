// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal placement of a fitted line: the
//! x-origin for the alignment mode, and — for `JustifyLeft`/`JustifyRight`
//! lines that actually justify — the extra width ("spaceAdder") each space
//! run receives, accumulated across successive spaces by the emitter.

use crate::{Alignment, Fixed};

use super::FittedLine;

/// How much extra width to distribute and where the line starts. The
/// emitter adds `space_adder * spaces_before_run` to each run's
/// x-offset rather than widening spaces directly, so `space_adder *
/// num_spaces` matches `inner_right - inner_left - width` only up to
/// rounding, not exactly.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Justification {
    pub x_origin: Fixed,
    /// Extra width added to every space run's advance.
    pub space_adder: Fixed,
}

/// Computes the justification for one fitted line.
///
/// A line only stretches its spaces when its alignment is
/// `JustifyLeft`/`JustifyRight`, it isn't the paragraph's last line, it
/// didn't end on a forced break, it has at least one space to stretch, and
/// there's slack to distribute. Otherwise `JustifyLeft`/`JustifyRight` fall
/// back to plain `Left`/`Right`.
pub fn justify_line(
    line: &FittedLine,
    alignment: Alignment,
    inner_left: Fixed,
    inner_right: Fixed,
    indent: Fixed,
    is_last_line_of_paragraph: bool,
) -> Justification {
    let available = (inner_right - inner_left).max(0);
    let slack = available - line.width;
    let indent_here = if line.indent_applies { indent } else { 0 };

    let justifies = matches!(alignment, Alignment::JustifyLeft | Alignment::JustifyRight)
        && !line.forced_break
        && !is_last_line_of_paragraph
        && line.num_spaces > 0
        && slack > 0;

    if justifies {
        let n = line.num_spaces as Fixed;
        let space_adder = slack / n;
        return Justification {
            x_origin: inner_left + indent_here,
            space_adder,
        };
    }

    let fallback = match alignment {
        Alignment::JustifyLeft => Alignment::Left,
        Alignment::JustifyRight => Alignment::Right,
        other => other,
    };
    let x_origin = match fallback {
        Alignment::Left | Alignment::JustifyLeft => inner_left + indent_here,
        Alignment::Right | Alignment::JustifyRight => inner_right - line.width,
        Alignment::Center => inner_left + slack.max(0) / 2,
    };
    Justification { x_origin, space_adder: 0 }
}
