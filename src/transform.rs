// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Rotation and zoom-crop applied to decoded images.

use crate::error::RenderError;
use image::{imageops, Rgb, RgbImage};
use tracing::{instrument, warn};

// Slack used when deciding whether an angle is a quarter turn and when
// rounding the expanded canvas size, so 90.0000000001 does not grow a pixel.
const EPSILON: f64 = 1e-6;

/// Rotates an image counter-clockwise by `degrees`.
///
/// A rotation of zero (or any multiple of 360) returns the input untouched.
/// Quarter turns are lossless pixel transpositions. Any other angle expands
/// the canvas so that no corner of the source is clipped; the source is
/// resampled with a bicubic (Catmull-Rom) kernel and uncovered areas are
/// black.
///
/// # Example
///
/// ```
/// use image::RgbImage;
/// use kms_slideshow::transform::rotate;
///
/// let img = rotate(RgbImage::new(40, 10), 90.0);
/// assert_eq!(img.dimensions(), (10, 40));
/// ```
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn rotate(image: RgbImage, degrees: f64) -> RgbImage {
    if !degrees.is_finite() {
        warn!(degrees, "ignoring non-finite rotation");
        return image;
    }

    let degrees = degrees.rem_euclid(360.0);
    let quarter = degrees / 90.0;
    if (quarter - quarter.round()).abs() < EPSILON {
        return match quarter.round() as u32 % 4 {
            0 => image,
            1 => imageops::rotate270(&image),
            2 => imageops::rotate180(&image),
            _ => imageops::rotate90(&image),
        };
    }

    rotate_resampled(&image, degrees)
}

fn rotate_resampled(image: &RgbImage, degrees: f64) -> RgbImage {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (src_w, src_h) = (f64::from(image.width()), f64::from(image.height()));
    let out_w = expanded(src_w * cos.abs() + src_h * sin.abs());
    let out_h = expanded(src_w * sin.abs() + src_h * cos.abs());

    let (src_cx, src_cy) = (src_w / 2.0, src_h / 2.0);
    let (out_cx, out_cy) = (f64::from(out_w) / 2.0, f64::from(out_h) / 2.0);

    // Screen coordinates grow downwards, so a counter-clockwise turn maps an
    // output offset (dx, dy) back to the source through the inverse rotation.
    RgbImage::from_fn(out_w, out_h, |x, y| {
        let dx = f64::from(x) + 0.5 - out_cx;
        let dy = f64::from(y) + 0.5 - out_cy;
        let sx = dx * cos - dy * sin + src_cx;
        let sy = dx * sin + dy * cos + src_cy;
        if sx < 0.0 || sy < 0.0 || sx >= src_w || sy >= src_h {
            Rgb([0, 0, 0])
        } else {
            sample_bicubic(image, sx - 0.5, sy - 0.5)
        }
    })
}

fn expanded(extent: f64) -> u32 {
    (extent - EPSILON).ceil().max(1.0) as u32
}

fn catmull_rom(t: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        1.5 * t * t * t - 2.5 * t * t + 1.0
    } else if t < 2.0 {
        -0.5 * t * t * t + 2.5 * t * t - 4.0 * t + 2.0
    } else {
        0.0
    }
}

fn sample_bicubic(image: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
    let max_x = i64::from(image.width()) - 1;
    let max_y = i64::from(image.height()) - 1;
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);

    let mut acc = [0.0f64; 3];
    for j in -1..=2i64 {
        let wy = catmull_rom(fy - j as f64);
        let py = (y0 as i64 + j).clamp(0, max_y) as u32;
        for i in -1..=2i64 {
            let weight = catmull_rom(fx - i as f64) * wy;
            let px = (x0 as i64 + i).clamp(0, max_x) as u32;
            let pixel = image.get_pixel(px, py);
            for (sum, channel) in acc.iter_mut().zip(pixel.0) {
                *sum += weight * f64::from(channel);
            }
        }
    }

    Rgb(acc.map(|v| v.round().clamp(0.0, 255.0) as u8))
}

/// Crops away the top `zoom` fraction of the image height, keeping the full
/// width and everything below.
///
/// The crop box is `(0, round(height * zoom), width, height)`; rounding is
/// half-to-even. A zoom of zero returns the input untouched.
///
/// # Errors
///
/// Returns [`RenderError::InvalidCrop`] when the box would be empty, which
/// happens for any `zoom >= 1.0`, for negative or non-finite zooms, and for
/// zooms that round to the full height on very short images. The caller
/// should keep the previous frame.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn zoom_crop(image: RgbImage, zoom: f64) -> Result<RgbImage, RenderError> {
    if zoom == 0.0 {
        return Ok(image);
    }

    let (width, height) = image.dimensions();
    let bottom = i64::from(height);
    let top = (f64::from(height) * zoom).round_ties_even();
    if !zoom.is_finite() || zoom < 0.0 || top >= bottom as f64 {
        return Err(RenderError::InvalidCrop {
            zoom,
            top: top as i64,
            bottom,
        });
    }

    let top = top as u32;
    Ok(imageops::crop_imm(&image, 0, top, width, height - top).to_image())
}
