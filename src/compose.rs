// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Letterbox/pillarbox fitting of an image onto a fixed-size canvas.

use fast_image_resize as fr;
use image::{imageops, RgbImage};
use std::error::Error;
use tracing::{instrument, warn};

/// Resampling filter used when scaling an image onto the canvas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    /// Nearest neighbour, fastest and blockiest
    Nearest,
    /// Bilinear interpolation
    Bilinear,
    /// Bicubic Catmull-Rom
    CatmullRom,
    /// Lanczos with a 3-lobe window, the sharpest
    #[default]
    Lanczos3,
}

impl Filter {
    fn resize_alg(self) -> fr::ResizeAlg {
        match self {
            Filter::Nearest => fr::ResizeAlg::Nearest,
            Filter::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            Filter::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
            Filter::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
        }
    }
}

impl From<Filter> for imageops::FilterType {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => imageops::FilterType::Nearest,
            Filter::Bilinear => imageops::FilterType::Triangle,
            Filter::CatmullRom => imageops::FilterType::CatmullRom,
            Filter::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Where a scaled image lands on the canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Scaled image width in pixels
    pub width: u32,
    /// Scaled image height in pixels
    pub height: u32,
    /// Left edge of the scaled image on the canvas
    pub x: u32,
    /// Top edge of the scaled image on the canvas
    pub y: u32,
}

/// Computes the aspect-preserving placement of a `src_width x src_height`
/// image on a `target_width x target_height` canvas.
///
/// A source relatively wider than the target spans the full width and is
/// centred vertically (letterbox). Otherwise it spans the full height and is
/// centred horizontally (pillarbox). The scaled extent on the short axis is
/// rounded half-to-even and kept within `1..=target`.
///
/// ```
/// use kms_slideshow::compose::{fit, Placement};
///
/// let p = fit(400, 100, 200, 200);
/// assert_eq!(p, Placement { width: 200, height: 50, x: 0, y: 75 });
/// ```
pub fn fit(src_width: u32, src_height: u32, target_width: u32, target_height: u32) -> Placement {
    let current_aspect = f64::from(src_width) / f64::from(src_height);
    let target_aspect = f64::from(target_width) / f64::from(target_height);

    let (width, height) = if current_aspect > target_aspect {
        let height = (f64::from(target_width) / current_aspect).round_ties_even();
        (target_width, clamp_extent(height, target_height))
    } else {
        let width = (f64::from(target_height) * current_aspect).round_ties_even();
        (clamp_extent(width, target_width), target_height)
    };

    Placement {
        width,
        height,
        x: target_width.saturating_sub(width) / 2,
        y: target_height.saturating_sub(height) / 2,
    }
}

// NaN (a 0x0 source) saturates to 0 and is lifted to 1 by the clamp.
fn clamp_extent(extent: f64, target: u32) -> u32 {
    (extent as u32).clamp(1, target.max(1))
}

/// Scales `image` to fit a `target_width x target_height` canvas, preserving
/// its aspect ratio, and centres it on a black background.
///
/// The returned canvas is always exactly the target size, whatever the
/// aspect ratio of the input.
///
/// # Example
///
/// ```
/// use image::RgbImage;
/// use kms_slideshow::compose::{compose, Filter};
///
/// let canvas = compose(&RgbImage::new(1, 1000), 640, 480, Filter::default());
/// assert_eq!(canvas.dimensions(), (640, 480));
/// ```
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn compose(image: &RgbImage, target_width: u32, target_height: u32, filter: Filter) -> RgbImage {
    let mut canvas = RgbImage::new(target_width, target_height);
    if target_width == 0 || target_height == 0 || image.width() == 0 || image.height() == 0 {
        return canvas;
    }

    let placement = fit(image.width(), image.height(), target_width, target_height);
    if image.dimensions() == (placement.width, placement.height) {
        imageops::replace(&mut canvas, image, placement.x.into(), placement.y.into());
    } else {
        let scaled = resize(image, placement.width, placement.height, filter);
        imageops::replace(&mut canvas, &scaled, placement.x.into(), placement.y.into());
    }

    canvas
}

/// Resizes with `fast_image_resize`, falling back to `image::imageops` if the
/// SIMD resizer rejects the buffers.
pub fn resize(image: &RgbImage, width: u32, height: u32, filter: Filter) -> RgbImage {
    match resize_fast(image, width, height, filter) {
        Ok(resized) => resized,
        Err(err) => {
            warn!(%err, "fast_image_resize failed, falling back to imageops::resize");
            imageops::resize(image, width, height, filter.into())
        }
    }
}

fn resize_fast(
    image: &RgbImage,
    width: u32,
    height: u32,
    filter: Filter,
) -> Result<RgbImage, Box<dyn Error>> {
    let src = fr::images::ImageRef::new(
        image.width(),
        image.height(),
        image.as_raw(),
        fr::PixelType::U8x3,
    )?;
    let mut dst = fr::images::Image::new(width, height, fr::PixelType::U8x3);

    let options = fr::ResizeOptions::new().resize_alg(filter.resize_alg());
    let mut resizer = fr::Resizer::new();
    resizer.resize(&src, &mut dst, &options)?;

    RgbImage::from_raw(width, height, dst.into_vec())
        .ok_or_else(|| "resized buffer has unexpected length".into())
}
