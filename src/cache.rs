//! An explicit image cache keyed by source URL.
//!
//! Entries stay until the caller evicts them; there is no size bound or
//! expiry. Images are shared as `Arc<RgbaImage>` so that a cached source can
//! be handed to several renders, each of which clones it before drawing.

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;
use log::debug;

#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<String, Arc<RgbaImage>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<Arc<RgbaImage>> {
        self.entries.get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Stores `image` under `url`, replacing any previous entry.
    pub fn insert(&mut self, url: impl Into<String>, image: RgbaImage) -> Arc<RgbaImage> {
        let image = Arc::new(image);
        self.entries.insert(url.into(), Arc::clone(&image));
        image
    }

    /// Returns the cached image for `url`, or runs `load` and caches its
    /// result. A failed load caches nothing.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        url: &str,
        load: impl FnOnce() -> Result<RgbaImage, E>,
    ) -> Result<Arc<RgbaImage>, E> {
        if let Some(image) = self.entries.get(url) {
            debug!("image cache hit: {}", url);
            return Ok(Arc::clone(image));
        }
        debug!("image cache miss: {}", url);
        let image = load()?;
        Ok(self.insert(url, image))
    }

    /// Removes the entry for `url`, returning it if present.
    pub fn evict(&mut self, url: &str) -> Option<Arc<RgbaImage>> {
        self.entries.remove(url)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
