//! Image loaders.

use std::collections::HashMap;

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::render::ImageLoader;

/// Loader that refuses every path.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullImageLoader;

impl ImageLoader for NullImageLoader {
    fn load(&self, path: &str) -> Result<Bitmap> {
        Err(Error::ImageLoad {
            path: path.to_string(),
            reason: "no image loader configured".to_string(),
        })
    }
}

/// Loader serving bitmaps registered up front, keyed by path.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageLoader {
    images: HashMap<String, Bitmap>,
}

impl MemoryImageLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bitmap` under `path`, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<String>, bitmap: Bitmap) {
        self.images.insert(path.into(), bitmap);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_image(mut self, path: impl Into<String>, bitmap: Bitmap) -> Self {
        self.insert(path, bitmap);
        self
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&self, path: &str) -> Result<Bitmap> {
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| Error::ImageLoad {
                path: path.to_string(),
                reason: "not found".to_string(),
            })
    }
}
