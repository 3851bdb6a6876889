// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::DecodeError;
use image::{ImageFormat, ImageReader, RgbImage};
use std::{fs, io::Cursor, path::Path};
use tracing::{debug, instrument};

/// File extensions (lowercase) treated as displayable images when browsing a
/// directory.
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "bmp", "gif", "webp", "tif", "tiff"];

/// Upper bounds applied before an image is fully decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum `width * height` accepted from the image header.
    pub max_pixels: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_pixels: 100_000_000,
        }
    }
}

/// Returns true if the path carries one of the [`SUPPORTED_EXTENSIONS`].
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Decodes an image file into an 8-bit RGB pixel grid.
///
/// The format is sniffed from the file contents, falling back to the file
/// extension. JPEG files are decoded with libjpeg-turbo; anything turbojpeg
/// refuses (CMYK, arithmetic coding, ...) is retried through the `image`
/// decoders. Grayscale, palette, alpha and 16-bit sources are all converted
/// to plain RGB; alpha is discarded and no color management is applied.
///
/// # Errors
///
/// Every failure is a recoverable [`DecodeError`]:
/// - [`DecodeError::Io`] if the file cannot be read
/// - [`DecodeError::Unsupported`] if the format cannot be identified
/// - [`DecodeError::Corrupt`] if the data is truncated or invalid
/// - [`DecodeError::Limits`] if the header reports more than
///   `limits.max_pixels` pixels
/// - [`DecodeError::TooLarge`] if the decoder's own memory limit is hit
///
/// # Example
///
/// ```no_run
/// use kms_slideshow::decode::{decode, DecodeLimits};
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = decode(Path::new("photo.jpg"), &DecodeLimits::default())?;
/// println!("decoded {}x{}", img.width(), img.height());
/// # Ok(())
/// # }
/// ```
#[instrument(skip_all, fields(path = %path.display()))]
pub fn decode(path: &Path, limits: &DecodeLimits) -> Result<RgbImage, DecodeError> {
    let bytes = fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let format = image::guess_format(&bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map_err(|_| DecodeError::Unsupported {
            path: path.to_path_buf(),
        })?;

    let (width, height) = ImageReader::with_format(Cursor::new(bytes.as_slice()), format)
        .into_dimensions()
        .map_err(|err| classify(path, err))?;
    if u64::from(width) * u64::from(height) > limits.max_pixels {
        return Err(DecodeError::Limits {
            path: path.to_path_buf(),
            width,
            height,
            max_pixels: limits.max_pixels,
        });
    }

    if format == ImageFormat::Jpeg {
        match turbojpeg::decompress_image::<image::Rgb<u8>>(&bytes) {
            Ok(img) => {
                debug!(width, height, "decoded with turbojpeg");
                return Ok(img);
            }
            Err(err) => debug!(%err, "turbojpeg rejected image, using fallback decoder"),
        }
    }

    let img =
        image::load_from_memory_with_format(&bytes, format).map_err(|err| classify(path, err))?;
    debug!(width, height, color = ?img.color(), ?format, "decoded");

    Ok(img.to_rgb8())
}

fn classify(path: &Path, err: image::ImageError) -> DecodeError {
    match err {
        image::ImageError::Unsupported(_) => DecodeError::Unsupported {
            path: path.to_path_buf(),
        },
        image::ImageError::Limits(err) => DecodeError::TooLarge {
            path: path.to_path_buf(),
            reason: err.to_string(),
        },
        err => DecodeError::Corrupt {
            path: path.to_path_buf(),
            reason: err.to_string(),
        },
    }
}
