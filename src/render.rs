// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    compose::{compose, Filter},
    decode::{decode, DecodeLimits},
    error::RenderError,
    transform::{rotate, zoom_crop},
};
use image::RgbImage;
use std::path::Path;
use tracing::{debug, instrument};

/// View parameters for a single render request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewParameters {
    /// Output canvas width in pixels
    pub target_width: u32,
    /// Output canvas height in pixels
    pub target_height: u32,
    /// Fraction of the (rotated) image height cropped from the top, `0..1`
    pub zoom: f64,
    /// Counter-clockwise rotation in degrees
    pub rotation: f64,
}

impl ViewParameters {
    /// Parameters for an unzoomed, unrotated view at the given resolution.
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
            zoom: 0.0,
            rotation: 0.0,
        }
    }

    pub fn with_zoom(self, zoom: f64) -> Self {
        Self { zoom, ..self }
    }

    pub fn with_rotation(self, rotation: f64) -> Self {
        Self { rotation, ..self }
    }
}

/// The uncached decode → rotate → zoom-crop → compose pipeline.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    /// Filter used to scale the image onto the canvas
    pub filter: Filter,
    /// Limits applied while decoding
    pub limits: DecodeLimits,
}

impl Pipeline {
    pub fn new(filter: Filter, limits: DecodeLimits) -> Self {
        Self { filter, limits }
    }

    /// Runs the full pipeline for one file, producing an RGB canvas of
    /// exactly `params.target_width x params.target_height`.
    ///
    /// Intermediate images are dropped as soon as the next stage has
    /// consumed them.
    ///
    /// # Errors
    ///
    /// Returns a recoverable [`RenderError`] if the file cannot be decoded or
    /// the zoom yields an empty crop.
    #[instrument(skip_all, fields(path = %path.display(), zoom = params.zoom, rotation = params.rotation))]
    pub fn render(&self, path: &Path, params: &ViewParameters) -> Result<RgbImage, RenderError> {
        let image = decode(path, &self.limits)?;
        let image = rotate(image, params.rotation);
        let image = zoom_crop(image, params.zoom)?;
        debug!(
            width = image.width(),
            height = image.height(),
            "composing onto {}x{}",
            params.target_width,
            params.target_height
        );
        Ok(compose(
            &image,
            params.target_width,
            params.target_height,
            self.filter,
        ))
    }
}
