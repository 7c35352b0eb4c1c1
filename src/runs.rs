// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run builder: splits the codepoint stream into
//! contiguous runs sharing font/language/level/baseline-shift, invokes the
//! shaper per run, and emits layered draw-command fragments in run-local
//! coordinates.

use std::ops::Range;

use crate::attributes::AttributeIndex;
use crate::bidi::BidiLevels;
use crate::error::{self, LayoutError};
use crate::font::{FontHandle, GlyphId};
use crate::layout::DrawCommand;
use crate::linebreak::BreakOpportunities;
use crate::shape::{ShapeDirection, ShapeRequest, ShapedGlyph, TextShaper};
use crate::util::round_to_granularity;
use crate::{Color, Fixed};

pub use crate::linebreak::BreakClass;

/// Preferred hyphen glyph; the engine falls back to [`HYPHEN_FALLBACK`] if
/// the run's font lacks it.
pub const HYPHEN_CHAR: char = '\u{2010}';
pub const HYPHEN_FALLBACK: char = '-';

const SOFT_HYPHEN: char = '\u{00AD}';

fn is_bidi_control(ch: char) -> bool {
    matches!(ch, '\u{202A}' | '\u{202B}' | '\u{202C}')
}

fn forces_singleton_run(ch: char) -> bool {
    ch == ' ' || ch == '\n' || ch == SOFT_HYPHEN
}

/// One drawing fragment inside a run, in run-local coordinates: x=0 is the
/// run's start, y=0 is the baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct RunFragment {
    /// `0..N-1` for shadows, `N` for the glyph/inlay/underline itself,
    /// where `N` is the run's shadow-count high-water mark.
    pub layer: u32,
    pub command: DrawCommand,
}

/// One contiguous same-link sub-range of a run, in run-local coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkSegment {
    pub link_id: u32,
    pub rect: (Fixed, Fixed, Fixed, Fixed),
}

/// An unbreakable chunk produced by the run builder.
#[derive(Clone, Debug)]
pub struct Run {
    pub range: Range<usize>,
    pub level: u8,
    pub trailing_break: BreakClass,
    pub font: FontHandle,
    pub is_space: bool,
    pub is_soft_hyphen: bool,
    pub ascender: Fixed,
    pub descender: Fixed,
    /// Sum of x-advances; excludes a trailing soft hyphen only when the
    /// line fitter decides it — the run builder always
    /// reports the full width including the hyphen glyph.
    pub width: Fixed,
    pub fragments: Vec<RunFragment>,
    pub links: Vec<LinkSegment>,
    /// Set when this run's trailing gap is a dictionary-hyphenation
    /// opportunity: the hyphen glyph to draw if the line fitter chooses
    /// this gap as a line end.
    /// Not counted in `width`; the line fitter adds it only when it's
    /// actually used (mirroring how a literal soft hyphen's width is
    /// excluded unless it's used).
    pub trailing_hyphen: Option<TrailingHyphen>,
}

/// The hyphen glyph a hyphenation-chosen break draws at the end of a line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TrailingHyphen {
    pub glyph: GlyphId,
    pub width: Fixed,
    pub color: Color,
}

fn derive_lang_and_script(tag: &str) -> (&str, Option<&str>) {
    match tag.split_once('-') {
        Some((lang, rest)) if rest.len() == 4 && rest.chars().all(|c| c.is_ascii_alphabetic()) => {
            (lang, Some(rest))
        }
        Some((lang, _)) => (lang, None),
        None => (tag, None),
    }
}

/// Builds the run list for one paragraph.
///
/// `chars` is the paragraph's codepoints; `attrs`, `levels`, and `breaks`
/// must all be indexed by the same codepoint positions. `underline_font`
/// overrides per-glyph underline metrics when set. `round` is the layout's rounding granularity.
pub fn build_runs(
    chars: &[char],
    attrs: &AttributeIndex,
    levels: &BidiLevels,
    breaks: &BreakOpportunities,
    shaper: &mut dyn TextShaper,
    underline_font: Option<&FontHandle>,
    round: i32,
) -> Result<Vec<Run>, LayoutError> {
    let visible: Vec<usize> = (0..chars.len()).filter(|&i| !is_bidi_control(chars[i])).collect();
    let mut runs = Vec::new();
    let mut vi = 0;

    while vi < visible.len() {
        let oi = visible[vi];
        let attr0 = attrs
            .get(oi)
            .ok_or_else(|| error::attribute_missing(format!("codepoint {oi}")))?;
        let level0 = levels.level(oi);
        let singleton = forces_singleton_run(chars[oi]) || attr0.inlay.is_some();

        let mut end_vi = vi + 1;
        if !singleton {
            while end_vi < visible.len() {
                let oj = visible[end_vi];
                if forces_singleton_run(chars[oj]) {
                    break;
                }
                let attrj = attrs
                    .get(oj)
                    .ok_or_else(|| error::attribute_missing(format!("codepoint {oj}")))?;
                if attrj.inlay.is_some() {
                    break;
                }
                if levels.level(oj) != level0
                    || attrj.language != attr0.language
                    || attrj.font != attr0.font
                    || attrj.baseline_shift != attr0.baseline_shift
                {
                    break;
                }
                let prev_oi = visible[end_vi - 1];
                if matches!(breaks.class_at(prev_oi), BreakClass::Allow | BreakClass::Must) {
                    break;
                }
                end_vi += 1;
            }
        }

        let run_indices = &visible[vi..end_vi];
        let last_oi = run_indices[run_indices.len() - 1];
        let range = run_indices[0]..(last_oi + 1);
        let trailing_break = breaks.class_at(last_oi);
        let hyphenated = trailing_break == BreakClass::Allow && breaks.is_hyphenated_break(last_oi);

        let run = if attr0.inlay.is_some() {
            build_inlay_run(chars, attrs, run_indices, range, level0, trailing_break)?
        } else if chars[oi] == SOFT_HYPHEN {
            build_soft_hyphen_run(
                chars,
                attrs,
                run_indices,
                range,
                level0,
                trailing_break,
                shaper,
                underline_font,
                round,
            )?
        } else {
            build_shaped_run(
                chars,
                attrs,
                run_indices,
                range,
                level0,
                trailing_break,
                chars[oi] == ' ',
                hyphenated,
                shaper,
                underline_font,
                round,
            )?
        };
        runs.push(run);
        vi = end_vi;
    }

    Ok(runs)
}

fn shadow_high_water_mark(attrs: &AttributeIndex, run_indices: &[usize]) -> Result<u32, LayoutError> {
    let mut n = 0usize;
    for &oi in run_indices {
        let a = attrs
            .get(oi)
            .ok_or_else(|| error::attribute_missing(format!("codepoint {oi}")))?;
        n = n.max(a.clamped_shadow_count());
    }
    Ok(n as u32)
}

fn build_inlay_run(
    _chars: &[char],
    attrs: &AttributeIndex,
    run_indices: &[usize],
    range: Range<usize>,
    level: u8,
    trailing_break: BreakClass,
) -> Result<Run, LayoutError> {
    let oi = run_indices[0];
    let attr = attrs
        .get(oi)
        .ok_or_else(|| error::attribute_missing(format!("codepoint {oi}")))?;
    let inlay = attr.inlay.as_ref().expect("build_inlay_run requires an inlay");

    let width = inlay.right() - inlay.left();
    let ascender = (inlay.height() + attr.baseline_shift).max(64);
    let descender = 0;
    let layer = attr.clamped_shadow_count() as u32;

    // Shift the inlay's own commands up by `ascender - 1` so its top sits
    // at the line's top rather than on the baseline.
    let dy = -(ascender - 1);
    let mut fragments = Vec::with_capacity(inlay.commands().len());
    for command in inlay.commands() {
        let mut command = command.clone();
        command.translate(-inlay.left(), dy);
        fragments.push(RunFragment { layer, command });
    }

    let mut links = Vec::new();
    if attr.link_id != 0 {
        links.push(LinkSegment {
            link_id: attr.link_id,
            rect: (0, dy, width, ascender - descender),
        });
    }

    Ok(Run {
        range,
        level,
        trailing_break,
        font: attr.font.clone(),
        is_space: false,
        is_soft_hyphen: false,
        ascender,
        descender,
        width,
        fragments,
        links,
        trailing_hyphen: None,
    })
}

#[allow(clippy::too_many_arguments)]
fn build_soft_hyphen_run(
    chars: &[char],
    attrs: &AttributeIndex,
    run_indices: &[usize],
    range: Range<usize>,
    level: u8,
    trailing_break: BreakClass,
    shaper: &mut dyn TextShaper,
    underline_font: Option<&FontHandle>,
    round: i32,
) -> Result<Run, LayoutError> {
    let oi = run_indices[0];
    let attr = attrs
        .get(oi)
        .ok_or_else(|| error::attribute_missing(format!("codepoint {oi}")))?;
    let hyphen_char = if attr.font.contains_glyph(HYPHEN_CHAR) {
        HYPHEN_CHAR
    } else {
        HYPHEN_FALLBACK
    };
    shape_one_codepoint_run(
        chars,
        attrs,
        run_indices,
        range,
        level,
        trailing_break,
        false,
        true,
        false,
        Some(hyphen_char),
        shaper,
        underline_font,
        round,
    )
}

#[allow(clippy::too_many_arguments)]
fn build_shaped_run(
    chars: &[char],
    attrs: &AttributeIndex,
    run_indices: &[usize],
    range: Range<usize>,
    level: u8,
    trailing_break: BreakClass,
    is_space: bool,
    hyphenated: bool,
    shaper: &mut dyn TextShaper,
    underline_font: Option<&FontHandle>,
    round: i32,
) -> Result<Run, LayoutError> {
    shape_one_codepoint_run(
        chars, attrs, run_indices, range, level, trailing_break, is_space, false, hyphenated, None,
        shaper, underline_font, round,
    )
}

#[allow(clippy::too_many_arguments)]
fn shape_one_codepoint_run(
    chars: &[char],
    attrs: &AttributeIndex,
    run_indices: &[usize],
    range: Range<usize>,
    level: u8,
    trailing_break: BreakClass,
    is_space: bool,
    is_soft_hyphen: bool,
    hyphenated: bool,
    text_override: Option<char>,
    shaper: &mut dyn TextShaper,
    underline_font: Option<&FontHandle>,
    round: i32,
) -> Result<Run, LayoutError> {
    let oi0 = run_indices[0];
    let attr0 = attrs
        .get(oi0)
        .ok_or_else(|| error::attribute_missing(format!("codepoint {oi0}")))?;
    let font = attr0.font.clone();
    let (lang, script) = derive_lang_and_script(&attr0.language);
    let direction = if level % 2 == 0 { ShapeDirection::Ltr } else { ShapeDirection::Rtl };

    let text: String = match text_override {
        Some(ch) => ch.to_string(),
        None => run_indices.iter().map(|&oi| chars[oi]).collect(),
    };
    // Byte offset -> original codepoint index, for cluster remapping.
    let byte_offsets: Vec<(usize, usize)> = if text_override.is_some() {
        vec![(0, oi0)]
    } else {
        text.char_indices()
            .zip(run_indices.iter().copied())
            .map(|((b, _), oi)| (b, oi))
            .collect()
    };

    let request = ShapeRequest {
        text: &text,
        font: &font,
        direction,
        script,
        language: lang,
    };
    let glyphs = shaper.shape(&request)?;

    let layer = shadow_high_water_mark(attrs, run_indices)?;
    let mut fragments = Vec::with_capacity(glyphs.len() * 2);
    let mut links = Vec::new();
    let mut cursor_x: Fixed = 0;
    let mut ascender: Fixed = 0;
    let mut descender: Fixed = 0;

    let mut current_link: Option<(u32, Fixed)> = None;
    let close_link = |links: &mut Vec<LinkSegment>, current: &mut Option<(u32, Fixed)>, end_x: Fixed| {
        if let Some((id, start_x)) = current.take() {
            links.push(LinkSegment {
                link_id: id,
                rect: (start_x, 0, end_x - start_x, 0),
            });
        }
    };

    for glyph in &glyphs {
        let orig_index = map_cluster_to_orig(&byte_offsets, glyph.cluster as usize);
        let a = attrs
            .get(orig_index)
            .ok_or_else(|| error::attribute_missing(format!("codepoint {orig_index}")))?;
        ascender = ascender.max(a.font.metrics().ascender + a.baseline_shift);
        descender = descender.min(a.font.metrics().descender + a.baseline_shift);

        emit_glyph_fragments(
            &mut fragments,
            glyph,
            a,
            cursor_x,
            layer,
            underline_font,
            round,
        );

        match (a.link_id, &mut current_link) {
            (0, _) => close_link(&mut links, &mut current_link, cursor_x),
            (id, Some((cur_id, _))) if *cur_id != id => {
                close_link(&mut links, &mut current_link, cursor_x);
                current_link = Some((id, cursor_x));
            }
            (id, None) => current_link = Some((id, cursor_x)),
            _ => {}
        }

        cursor_x += glyph.x_advance;
    }
    close_link(&mut links, &mut current_link, cursor_x);

    if ascender == 0 && descender == 0 {
        // No glyphs (empty shape result): fall back to the font's own
        // metrics so line placement still makes sense.
        ascender = attr0.font.metrics().ascender + attr0.baseline_shift;
        descender = attr0.font.metrics().descender + attr0.baseline_shift;
    }

    let trailing_hyphen = if hyphenated {
        let last_oi = *run_indices.last().expect("run_indices is never empty");
        let last_attr = attrs
            .get(last_oi)
            .ok_or_else(|| error::attribute_missing(format!("codepoint {last_oi}")))?;
        let hyphen_char = if last_attr.font.contains_glyph(HYPHEN_CHAR) {
            HYPHEN_CHAR
        } else {
            HYPHEN_FALLBACK
        };
        let hyphen_text = hyphen_char.to_string();
        let hyphen_request = ShapeRequest {
            text: &hyphen_text,
            font: &last_attr.font,
            direction,
            script,
            language: lang,
        };
        shaper
            .shape(&hyphen_request)?
            .first()
            .map(|g| TrailingHyphen {
                glyph: g.glyph_id,
                width: g.x_advance,
                color: last_attr.color,
            })
    } else {
        None
    };

    Ok(Run {
        range,
        level,
        trailing_break,
        font,
        is_space,
        is_soft_hyphen,
        ascender,
        descender,
        width: cursor_x,
        fragments,
        links,
        trailing_hyphen,
    })
}

fn map_cluster_to_orig(byte_offsets: &[(usize, usize)], cluster_byte: usize) -> usize {
    match byte_offsets.binary_search_by_key(&cluster_byte, |(b, _)| *b) {
        Ok(i) => byte_offsets[i].1,
        Err(0) => byte_offsets[0].1,
        Err(i) => byte_offsets[i - 1].1,
    }
}

fn emit_glyph_fragments(
    fragments: &mut Vec<RunFragment>,
    glyph: &ShapedGlyph,
    attr: &crate::attributes::CodepointAttribute,
    cursor_x: Fixed,
    layer: u32,
    underline_font: Option<&FontHandle>,
    round: i32,
) {
    let x = round_to_granularity(cursor_x + glyph.x_offset, round);
    let y = round_to_granularity(-glyph.y_offset - attr.baseline_shift, round);

    for (i, shadow) in attr.shadows.iter().take(attr.clamped_shadow_count()).enumerate() {
        fragments.push(RunFragment {
            layer: i as u32,
            command: DrawCommand::Glyph {
                font: attr.font.clone(),
                glyph: glyph.glyph_id,
                x: round_to_granularity(x + shadow.dx, round),
                y: round_to_granularity(y + shadow.dy, round),
                color: shadow.color,
                blur: shadow.blur,
            },
        });
    }

    fragments.push(RunFragment {
        layer,
        command: DrawCommand::Glyph {
            font: attr.font.clone(),
            glyph: glyph.glyph_id,
            x,
            y,
            color: attr.color,
            blur: 0,
        },
    });

    if attr.has_underline() {
        let metrics_font = underline_font.unwrap_or(&attr.font);
        let metrics = metrics_font.metrics();
        let thickness = metrics.underline_thickness.max(64);
        let underline_y =
            round_to_granularity(-(metrics.underline_position + thickness / 2) - attr.baseline_shift, round);

        for (i, shadow) in attr.shadows.iter().take(attr.clamped_shadow_count()).enumerate() {
            fragments.push(RunFragment {
                layer: i as u32,
                command: DrawCommand::Rect {
                    x: round_to_granularity(x + shadow.dx, round),
                    y: round_to_granularity(underline_y + shadow.dy, round),
                    w: glyph.x_advance,
                    h: thickness,
                    color: shadow.color,
                    blur: shadow.blur,
                },
            });
        }
        fragments.push(RunFragment {
            layer,
            command: DrawCommand::Rect {
                x,
                y: underline_y,
                w: glyph.x_advance,
                h: thickness,
                color: attr.color,
                blur: 0,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeFlags, CodepointAttribute};
    use crate::font::testing::fake_font_handle;
    use crate::linebreak::BreakOpportunities as Breaks;
    use crate::shape::FakeShaper;
    use crate::BaseDirection;
    use crate::Color;

    fn simple_index(text: &str) -> AttributeIndex {
        let mut idx = AttributeIndex::new();
        idx.set(0..text.chars().count(), CodepointAttribute::new(Color::WHITE, fake_font_handle(), "en"));
        idx
    }

    #[test]
    fn space_and_word_form_separate_runs() {
        let text = "ab cd";
        let chars: Vec<char> = text.chars().collect();
        let attrs = simple_index(text);
        let levels = BidiLevels::resolve(text, BaseDirection::Ltr);
        let breaks = Breaks::classify(text);
        let mut shaper = FakeShaper;

        let runs = build_runs(&chars, &attrs, &levels, &breaks, &mut shaper, None, 1).unwrap();
        assert_eq!(runs.len(), 3);
        assert!(!runs[0].is_space);
        assert!(runs[1].is_space);
        assert!(!runs[2].is_space);
        assert_eq!(runs[0].range, 0..2);
        assert_eq!(runs[1].range, 2..3);
        assert_eq!(runs[2].range, 3..5);
    }

    #[test]
    fn differing_fonts_split_runs_even_without_a_break() {
        let text = "ab";
        let chars: Vec<char> = text.chars().collect();
        let mut attrs = AttributeIndex::new();
        attrs.set(0..1, CodepointAttribute::new(Color::WHITE, fake_font_handle(), "en"));
        attrs.set(1..2, CodepointAttribute::new(Color::WHITE, fake_font_handle(), "en"));
        let levels = BidiLevels::resolve(text, BaseDirection::Ltr);
        let breaks = Breaks::classify(text);
        let mut shaper = FakeShaper;

        let runs = build_runs(&chars, &attrs, &levels, &breaks, &mut shaper, None, 1).unwrap();
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn soft_hyphen_is_its_own_run_and_shapes_a_hyphen_glyph() {
        let text = "a\u{00AD}b";
        let chars: Vec<char> = text.chars().collect();
        let attrs = simple_index(text);
        let levels = BidiLevels::resolve(text, BaseDirection::Ltr);
        let breaks = Breaks::classify(text);
        let mut shaper = FakeShaper;

        let runs = build_runs(&chars, &attrs, &levels, &breaks, &mut shaper, None, 1).unwrap();
        assert_eq!(runs.len(), 3);
        assert!(runs[1].is_soft_hyphen);
        assert_eq!(runs[1].width, runs[0].width);
    }

    #[test]
    fn hyphenated_break_point_produces_a_run_with_a_trailing_hyphen() {
        // "hyphen" with a break allowed (and marked hyphenation-derived)
        // after "hy": build_runs should split it into two shaped runs, and
        // the first should carry a trailing hyphen glyph.
        let text = "hyphen";
        let chars: Vec<char> = text.chars().collect();
        let attrs = simple_index(text);
        let levels = BidiLevels::resolve(text, BaseDirection::Ltr);
        let mut breaks = Breaks::classify(text);
        breaks.allow_hyphenated_break_at(1);
        let mut shaper = FakeShaper;

        let runs = build_runs(&chars, &attrs, &levels, &breaks, &mut shaper, None, 1).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].range, 0..2);
        assert!(runs[0].trailing_hyphen.is_some());
        assert!(runs[1].trailing_hyphen.is_none());
    }

    #[test]
    fn ordinary_word_break_carries_no_trailing_hyphen() {
        let text = "ab cd";
        let chars: Vec<char> = text.chars().collect();
        let attrs = simple_index(text);
        let levels = BidiLevels::resolve(text, BaseDirection::Ltr);
        let breaks = Breaks::classify(text);
        let mut shaper = FakeShaper;

        let runs = build_runs(&chars, &attrs, &levels, &breaks, &mut shaper, None, 1).unwrap();
        assert!(runs.iter().all(|r| r.trailing_hyphen.is_none()));
    }

    #[test]
    fn baseline_shift_moves_the_glyph_and_underline_up() {
        fn glyph_and_underline_y(shift: Fixed) -> (Fixed, Fixed) {
            let text = "a";
            let chars: Vec<char> = text.chars().collect();
            let mut attrs = AttributeIndex::new();
            let mut attr = CodepointAttribute::new(Color::WHITE, fake_font_handle(), "en");
            attr.baseline_shift = shift;
            attr.flags = AttributeFlags::UNDERLINE;
            attrs.set(0..1, attr);
            let levels = BidiLevels::resolve(text, BaseDirection::Ltr);
            let breaks = Breaks::classify(text);
            let mut shaper = FakeShaper;

            let runs = build_runs(&chars, &attrs, &levels, &breaks, &mut shaper, None, 1).unwrap();
            let mut glyph_y = None;
            let mut rect_y = None;
            for fragment in &runs[0].fragments {
                match fragment.command {
                    DrawCommand::Glyph { y, .. } => glyph_y = Some(y),
                    DrawCommand::Rect { y, .. } => rect_y = Some(y),
                    _ => {}
                }
            }
            (glyph_y.unwrap(), rect_y.unwrap())
        }

        let shift = 5 * 64;
        let (glyph_y_plain, rect_y_plain) = glyph_and_underline_y(0);
        let (glyph_y_shifted, rect_y_shifted) = glyph_and_underline_y(shift);

        // A positive (up) baseline shift subtracts directly from both the
        // glyph and underline y, moving both up by exactly the shift.
        assert_eq!(glyph_y_shifted, glyph_y_plain - shift);
        assert_eq!(rect_y_shifted, rect_y_plain - shift);
    }

    #[test]
    fn missing_attribute_is_fatal() {
        let text = "ab";
        let chars: Vec<char> = text.chars().collect();
        let attrs = AttributeIndex::new();
        let levels = BidiLevels::resolve(text, BaseDirection::Ltr);
        let breaks = Breaks::classify(text);
        let mut shaper = FakeShaper;

        let err = build_runs(&chars, &attrs, &levels, &breaks, &mut shaper, None, 1).unwrap_err();
        assert_eq!(err.kind(), crate::error::LayoutErrorKind::AttributeMissing);
    }
}
