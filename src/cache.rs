// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    error::RenderError,
    render::{Pipeline, ViewParameters},
};
use image::RgbImage;
use lru::LruCache;
use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
    rc::Rc,
};
use tracing::{debug, info};

/// Default number of canvases kept by a [`RenderCache`].
pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(500) {
    Some(capacity) => capacity,
    None => panic!("capacity must be non-zero"),
};

/// Memoization key for a rendered canvas.
///
/// The key is a pure value: the path as given plus the view parameters. File
/// contents and modification times are not part of it, so a file rewritten
/// in place keeps serving its old canvas until the cache is cleared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    path: PathBuf,
    target_height: u32,
    target_width: u32,
    zoom: u64,
    rotation: u64,
}

impl CacheKey {
    pub fn new(path: &Path, params: &ViewParameters) -> Self {
        Self {
            path: path.to_path_buf(),
            target_height: params.target_height,
            target_width: params.target_width,
            zoom: float_key(params.zoom),
            rotation: float_key(params.rotation),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// -0.0 and 0.0 request the same view.
fn float_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Counters reported by [`RenderCache::stats`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Number of canvases currently stored
    pub len: usize,
    pub capacity: usize,
    /// Pixel bytes held by the stored canvases
    pub bytes: usize,
}

/// Bounded least-recently-used cache in front of the render [`Pipeline`].
///
/// Each distinct (path, view parameters) pair is rendered at most once while
/// its canvas stays cached; later requests hand out another reference to the
/// same immutable canvas. Failed renders are never cached.
///
/// The cache is owned by a single session and is not thread-safe.
///
/// # Example
///
/// ```no_run
/// use kms_slideshow::{
///     cache::{RenderCache, DEFAULT_CAPACITY},
///     render::{Pipeline, ViewParameters},
/// };
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut cache = RenderCache::new(DEFAULT_CAPACITY, Pipeline::default());
/// let params = ViewParameters::new(1920, 1080).with_rotation(90.0);
/// let first = cache.get(Path::new("photo.jpg"), &params)?;
/// let second = cache.get(Path::new("photo.jpg"), &params)?;
/// assert!(std::rc::Rc::ptr_eq(&first, &second));
/// assert_eq!(cache.stats().hits, 1);
/// # Ok(())
/// # }
/// ```
pub struct RenderCache {
    entries: LruCache<CacheKey, Rc<RgbImage>>,
    pipeline: Pipeline,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl RenderCache {
    pub fn new(capacity: NonZeroUsize, pipeline: Pipeline) -> Self {
        Self {
            entries: LruCache::new(capacity),
            pipeline,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Returns the canvas for `path` under `params`, rendering it on a miss.
    ///
    /// A hit marks the entry as most recently used. A miss runs the pipeline
    /// and stores the result, evicting the least recently used canvas if the
    /// cache is full.
    ///
    /// # Errors
    ///
    /// Propagates the pipeline's recoverable [`RenderError`]; nothing is
    /// stored in that case and a later request retries the render.
    pub fn get(&mut self, path: &Path, params: &ViewParameters) -> Result<Rc<RgbImage>, RenderError> {
        let key = CacheKey::new(path, params);
        if let Some(canvas) = self.entries.get(&key) {
            self.hits += 1;
            debug!(path = %path.display(), "render cache hit");
            return Ok(Rc::clone(canvas));
        }

        self.misses += 1;
        debug!(path = %path.display(), "render cache miss");
        let canvas = Rc::new(self.pipeline.render(path, params)?);

        if let Some((evicted, _)) = self.entries.push(key, Rc::clone(&canvas)) {
            self.evictions += 1;
            debug!(path = %evicted.path().display(), "evicted least recently used canvas");
        }

        Ok(canvas)
    }

    /// Returns true if a canvas is cached for `path` under `params`, without
    /// touching recency or the hit/miss counters.
    pub fn contains(&self, path: &Path, params: &ViewParameters) -> bool {
        self.entries.contains(&CacheKey::new(path, params))
    }

    /// Drops every cached canvas. Counters are kept.
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        info!(dropped, "render cache cleared");
    }

    /// Changes the maximum number of canvases, evicting the least recently
    /// used entries if the cache currently holds more.
    pub fn set_capacity(&mut self, capacity: NonZeroUsize) {
        let before = self.entries.len();
        self.entries.resize(capacity);
        let evicted = before - self.entries.len();
        self.evictions += evicted as u64;
        info!(capacity = capacity.get(), evicted, "render cache resized");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            len: self.entries.len(),
            capacity: self.entries.cap().get(),
            bytes: self.entries.iter().map(|(_, canvas)| canvas.as_raw().len()).sum(),
        }
    }
}
