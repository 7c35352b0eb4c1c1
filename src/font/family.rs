// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Family/style/weight/stretch resolution to a concrete font resource.
//!
//! Discovering installed system fonts is an OS integration concern outside
//! this crate's scope. Here, resolution is driven by an explicit
//! registration table the caller populates, matching the part of the
//! contract this crate actually owns: turning a style quadruple into a
//! font resource.

use hashbrown::HashMap;

use super::cache::FontResource;

/// Visual weight, 1–1000, 400 = normal, 700 = bold (CSS-compatible scale).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: Self = Self(400);
    pub const BOLD: Self = Self(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum FontStretch {
    Condensed,
    #[default]
    Normal,
    Expanded,
}

/// A `(family, style, weight, stretch)` query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFamilyDescriptor {
    pub family: String,
    pub style: FontStyle,
    pub weight: FontWeight,
    pub stretch: FontStretch,
}

impl FontFamilyDescriptor {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: FontStyle::default(),
            weight: FontWeight::default(),
            stretch: FontStretch::default(),
        }
    }
}

/// Registry mapping family names to candidate resources, searched in
/// registration order for the closest style/weight/stretch match.
#[derive(Default)]
pub(crate) struct FamilyRegistry {
    families: HashMap<String, Vec<(FontStyle, FontWeight, FontStretch, FontResource)>>,
}

impl FamilyRegistry {
    pub(crate) fn register(
        &mut self,
        family: impl Into<String>,
        style: FontStyle,
        weight: FontWeight,
        stretch: FontStretch,
        resource: FontResource,
    ) {
        self.families
            .entry(family.into())
            .or_default()
            .push((style, weight, stretch, resource));
    }

    /// Resolves a descriptor to the registered candidate with the lowest
    /// weight distance, preferring an exact style/stretch match.
    pub(crate) fn resolve(&self, desc: &FontFamilyDescriptor) -> Option<FontResource> {
        let candidates = self.families.get(&desc.family)?;
        candidates
            .iter()
            .min_by_key(|(style, weight, stretch, _)| {
                let style_penalty = u32::from(*style != desc.style);
                let stretch_penalty = u32::from(*stretch != desc.stretch);
                let weight_distance = (i32::from(weight.0) - i32::from(desc.weight.0)).unsigned_abs();
                (style_penalty, stretch_penalty, weight_distance)
            })
            .map(|(_, _, _, resource)| resource.clone())
    }
}
