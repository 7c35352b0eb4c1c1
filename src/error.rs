// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for layout and resource operations.

/// Rich error type for layout and font-resource operations.
///
/// Carries a non-exhaustive [`LayoutErrorKind`] plus a free-form `detail`
/// string describing the offending resource (file path, language tag, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutError {
    kind: LayoutErrorKind,
    detail: String,
}

impl LayoutError {
    pub(crate) fn new(kind: LayoutErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// The machine-readable category for this error.
    pub fn kind(&self) -> LayoutErrorKind {
        self.kind
    }

    /// Free-form context: a resource path, language tag, or codepoint index.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl core::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let what = match self.kind {
            LayoutErrorKind::FontOpenFailed => "font resource could not be opened",
            LayoutErrorKind::MissingUnicodeCmap => "font has no Unicode character map",
            LayoutErrorKind::GlyphRenderFailed => "glyph rasterization failed",
            LayoutErrorKind::AttributeMissing => "no attribute covers queried codepoint",
            LayoutErrorKind::DictionaryMalformed => "hyphenation dictionary is malformed",
            LayoutErrorKind::OutOfMemory => "allocation failed",
        };
        write!(f, "{what}: {}", self.detail)
    }
}

impl core::error::Error for LayoutError {}

/// Non-exhaustive category of a [`LayoutError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum LayoutErrorKind {
    /// Resource not openable by the outline library. Fatal to the layout call.
    FontOpenFailed,
    /// Font lacks a Unicode cmap. Fatal to the layout call.
    MissingUnicodeCmap,
    /// Outline library failed to rasterize a glyph. Fatal to the layout call.
    GlyphRenderFailed,
    /// No attribute covers a queried non-control codepoint. Programmer error.
    AttributeMissing,
    /// Malformed hyphenation dictionary. Fatal only to that registration;
    /// the layout call continues without that dictionary.
    DictionaryMalformed,
    /// Propagated allocation failure.
    OutOfMemory,
}

pub(crate) fn font_open_failed(detail: impl Into<String>) -> LayoutError {
    LayoutError::new(LayoutErrorKind::FontOpenFailed, detail)
}

pub(crate) fn missing_cmap(detail: impl Into<String>) -> LayoutError {
    LayoutError::new(LayoutErrorKind::MissingUnicodeCmap, detail)
}

pub(crate) fn glyph_render_failed(detail: impl Into<String>) -> LayoutError {
    LayoutError::new(LayoutErrorKind::GlyphRenderFailed, detail)
}

pub(crate) fn attribute_missing(detail: impl Into<String>) -> LayoutError {
    LayoutError::new(LayoutErrorKind::AttributeMissing, detail)
}

pub(crate) fn dictionary_malformed(detail: impl Into<String>) -> LayoutError {
    LayoutError::new(LayoutErrorKind::DictionaryMalformed, detail)
}
