// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    cache::{CacheStats, RenderCache},
    error::{DisplayError, RenderError},
    framebuffer::{DisplaySink, FramebufferWriter},
    render::{Pipeline, ViewParameters},
};
use std::{num::NonZeroUsize, path::Path, time::Instant};
use tracing::{debug, warn};

/// Outcome of a render request that did not hit a fatal display error.
#[must_use]
#[derive(Debug)]
pub enum Presented {
    /// The frame is on screen.
    Shown,
    /// No frame was produced; the previous frame is still on screen.
    Skipped(RenderError),
}

impl Presented {
    pub fn is_shown(&self) -> bool {
        matches!(self, Presented::Shown)
    }
}

/// A viewing session: the render cache plus the writer that owns the
/// display sink.
///
/// # Example
///
/// ```
/// use kms_slideshow::{
///     cache::DEFAULT_CAPACITY, framebuffer::MemorySink, render::Pipeline, viewer::Viewer,
/// };
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut viewer = Viewer::new(MemorySink::new(320, 240), DEFAULT_CAPACITY, Pipeline::default());
/// let outcome = viewer.render_and_display(Path::new("missing.png"), 0.0, 0.0)?;
/// assert!(!outcome.is_shown());
/// # Ok(())
/// # }
/// ```
pub struct Viewer<S: DisplaySink> {
    cache: RenderCache,
    writer: FramebufferWriter<S>,
}

impl<S: DisplaySink> Viewer<S> {
    pub fn new(sink: S, capacity: NonZeroUsize, pipeline: Pipeline) -> Self {
        Self {
            cache: RenderCache::new(capacity, pipeline),
            writer: FramebufferWriter::new(sink),
        }
    }

    /// Display resolution, used as the render target for every frame.
    pub fn resolution(&self) -> (u32, u32) {
        self.writer.resolution()
    }

    pub fn sink(&self) -> &S {
        self.writer.sink()
    }

    /// Renders `path` with the given zoom and rotation at the display
    /// resolution and presents it.
    ///
    /// # Errors
    ///
    /// Only display failures are errors. Decode and crop failures come back
    /// as [`Presented::Skipped`] and leave the display untouched.
    pub fn render_and_display(
        &mut self,
        path: &Path,
        zoom: f64,
        rotation: f64,
    ) -> Result<Presented, DisplayError> {
        let (width, height) = self.resolution();
        let params = ViewParameters::new(width, height)
            .with_zoom(zoom)
            .with_rotation(rotation);

        let now = Instant::now();
        let canvas = match self.cache.get(path, &params) {
            Ok(canvas) => canvas,
            Err(err) => {
                warn!(path = %path.display(), %err, "frame skipped");
                return Ok(Presented::Skipped(err));
            }
        };
        let render_time = now.elapsed();

        let now = Instant::now();
        self.writer.write(&canvas)?;
        let write_time = now.elapsed();

        if let Some(client) = tracy_client::Client::running() {
            client.frame_mark();
        }
        debug!(
            path = %path.display(),
            "presented render: {:?} write: {:?}",
            render_time,
            write_time
        );
        Ok(Presented::Shown)
    }

    /// Blanks the display to black.
    pub fn clear_display(&mut self) -> Result<(), DisplayError> {
        self.writer.clear()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn set_capacity(&mut self, capacity: NonZeroUsize) {
        self.cache.set_capacity(capacity);
    }
}
