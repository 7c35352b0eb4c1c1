// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic font fixtures for unit and integration tests, so tests
//! don't depend on real font files.

use std::sync::Arc;

use super::cache::FontResource;
use super::{FontContext, FontHandle};

/// Opens the shared synthetic test font at a fixed 16px size.
///
/// The synthetic font answers every codepoint query with a glyph (box
/// for non-space, empty for space) and reports plausible fixed metrics
/// without parsing any real font data.
pub(crate) fn fake_font_handle() -> FontHandle {
    let mut ctx = FontContext::new(4);
    ctx.open(FontResource::Synthetic { id: 0 }, 16.0)
        .expect("synthetic font resource never fails to open")
}

/// A `FontContext` pre-registered with the synthetic family `"Test Sans"`
/// at normal style/weight/stretch.
pub(crate) fn fake_font_context() -> FontContext {
    use super::family::{FontStretch, FontStyle, FontWeight};

    let mut ctx = FontContext::new(16);
    ctx.register_family(
        "Test Sans",
        FontStyle::Normal,
        FontWeight::NORMAL,
        FontStretch::Normal,
        FontResource::Synthetic { id: 0 },
    );
    ctx
}

#[allow(dead_code)]
pub(crate) fn fake_font_bytes() -> Arc<[u8]> {
    Arc::from(Vec::new().into_boxed_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_handle_answers_glyph_queries() {
        let handle = fake_font_handle();
        assert!(handle.contains_glyph('a'));
        assert!(handle.glyph_for_char('a').is_some());
    }
}
