// Copyright 2026 the Textflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font cache: opens font resources and caches handles by (resource,
//! pixel-size).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{self, LayoutError};
use crate::lru_cache::LruCache;

use super::family::{FamilyRegistry, FontFamilyDescriptor, FontStretch, FontStyle, FontWeight};
use super::rasterize;
use super::{FontHandle, FontHandleInner};

/// A font resource: either an in-memory blob or a path to be read lazily.
/// Cloning is cheap (the backing bytes are reference-counted).
#[derive(Clone, Debug)]
pub enum FontResource {
    Memory { data: Arc<[u8]>, face_index: u32 },
    Path { path: Arc<PathBuf>, face_index: u32 },
    /// Deterministic synthetic font for tests: no real outlines are parsed.
    #[doc(hidden)]
    Synthetic { id: u32 },
}

impl FontResource {
    pub fn from_bytes(data: impl Into<Arc<[u8]>>, face_index: u32) -> Self {
        Self::Memory {
            data: data.into(),
            face_index,
        }
    }

    pub fn from_path(path: impl Into<PathBuf>, face_index: u32) -> Self {
        Self::Path {
            path: Arc::new(path.into()),
            face_index,
        }
    }
}

impl PartialEq for FontResource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Memory { data: a, face_index: ai }, Self::Memory { data: b, face_index: bi }) => {
                Arc::ptr_eq(a, b) && ai == bi
            }
            (Self::Path { path: a, face_index: ai }, Self::Path { path: b, face_index: bi }) => {
                a == b && ai == bi
            }
            (Self::Synthetic { id: a }, Self::Synthetic { id: b }) => a == b,
            _ => false,
        }
    }
}
impl Eq for FontResource {}

impl std::hash::Hash for FontResource {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Self::Memory { data, face_index } => {
                0u8.hash(state);
                (Arc::as_ptr(data) as *const u8 as usize).hash(state);
                face_index.hash(state);
            }
            Self::Path { path, face_index } => {
                1u8.hash(state);
                path.hash(state);
                face_index.hash(state);
            }
            Self::Synthetic { id } => {
                2u8.hash(state);
                id.hash(state);
            }
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct FontCacheKey {
    resource: FontResource,
    pixel_size_bits: u32,
}

/// Opens and caches fonts; resolves family queries. One instance per
/// thread/font-cache-user.
pub struct FontContext {
    families: FamilyRegistry,
    cache: LruCache<FontCacheKey, FontHandle>,
    max_cached_fonts: usize,
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new(64)
    }
}

impl FontContext {
    /// Creates a font context whose handle cache holds at most
    /// `max_cached_fonts` entries.
    pub fn new(max_cached_fonts: usize) -> Self {
        Self {
            families: FamilyRegistry::default(),
            cache: LruCache::new(),
            max_cached_fonts,
        }
    }

    pub fn register_family(
        &mut self,
        family: impl Into<String>,
        style: FontStyle,
        weight: FontWeight,
        stretch: FontStretch,
        resource: FontResource,
    ) {
        self.families.register(family, style, weight, stretch, resource);
    }

    /// Resolves `desc` to a registered resource and opens it at `pixel_size`.
    pub fn resolve(
        &mut self,
        desc: &FontFamilyDescriptor,
        pixel_size: f32,
    ) -> Result<FontHandle, LayoutError> {
        let resource = self
            .families
            .resolve(desc)
            .ok_or_else(|| error::font_open_failed(format!("unregistered family {:?}", desc.family)))?;
        self.open(resource, pixel_size)
    }

    /// Opens `resource` at `pixel_size`, using the cache if possible.
    pub fn open(&mut self, resource: FontResource, pixel_size: f32) -> Result<FontHandle, LayoutError> {
        let key = FontCacheKey {
            resource,
            pixel_size_bits: pixel_size.to_bits(),
        };
        let resource_for_open = key.resource.clone();
        let handle = self
            .cache
            .get_or_try_insert_with(key, || Self::open_uncached(&resource_for_open, pixel_size))?
            .clone();
        self.cache.trim(self.max_cached_fonts);
        Ok(handle)
    }

    fn open_uncached(resource: &FontResource, pixel_size: f32) -> Result<FontHandle, LayoutError> {
        let (font_data, face_index): (Arc<[u8]>, u32) = match resource {
            FontResource::Memory { data, face_index } => (data.clone(), *face_index),
            FontResource::Path { path, face_index } => {
                let bytes = std::fs::read(path.as_ref() as &Path)
                    .map_err(|e| error::font_open_failed(format!("{}: {e}", path.display())))?;
                (Arc::from(bytes), *face_index)
            }
            FontResource::Synthetic { id } => {
                let metrics = rasterize::synthetic_metrics(pixel_size);
                return Ok(FontHandle(Arc::new(FontHandleInner {
                    metrics,
                    font_data: Arc::from(id.to_le_bytes()),
                    face_index: 0,
                    pixel_size,
                    description: format!("<synthetic:{id}>"),
                })));
            }
        };
        let metrics = rasterize::open_metrics(&font_data, face_index, pixel_size)?;
        Ok(FontHandle(Arc::new(FontHandleInner {
            metrics,
            font_data,
            face_index,
            pixel_size,
            description: describe_resource(resource),
        })))
    }
}

/// A human-readable "file description" for the persisted layout format's
/// font table.
fn describe_resource(resource: &FontResource) -> String {
    match resource {
        FontResource::Memory { face_index, .. } => format!("<memory:{face_index}>"),
        FontResource::Path { path, face_index } => format!("{}#{face_index}", path.display()),
        FontResource::Synthetic { id } => format!("<synthetic:{id}>"),
    }
}
