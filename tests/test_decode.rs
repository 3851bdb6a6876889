// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

mod common;

use common::{close, fixture_dir, marked, solid};
use image::{GrayImage, Luma, Rgb, Rgba, RgbaImage};
use kms_slideshow::{
    decode::{decode, is_supported, DecodeLimits},
    error::DecodeError,
};
use std::{error::Error, fs, path::Path};

#[test]
fn test_decode_png() -> Result<(), Box<dyn Error>> {
    let dir = fixture_dir("decode-png")?;
    let path = marked(&dir, "marked.png", 8, 4)?;

    let img = decode(&path, &DecodeLimits::default())?;
    assert_eq!(img.dimensions(), (8, 4));
    assert_eq!(img.get_pixel(0, 0), &Rgb([255, 0, 0]));
    assert_eq!(img.get_pixel(7, 3), &Rgb([0, 0, 255]));
    Ok(())
}

#[test]
fn test_decode_grayscale_and_alpha_to_rgb() -> Result<(), Box<dyn Error>> {
    let dir = fixture_dir("decode-convert")?;

    let gray = dir.join("gray.png");
    GrayImage::from_pixel(3, 3, Luma([77])).save(&gray)?;
    let img = decode(&gray, &DecodeLimits::default())?;
    assert_eq!(img.get_pixel(1, 1), &Rgb([77, 77, 77]));

    // Alpha is dropped, not blended.
    let rgba = dir.join("rgba.png");
    RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 0])).save(&rgba)?;
    let img = decode(&rgba, &DecodeLimits::default())?;
    assert_eq!(img.get_pixel(2, 2), &Rgb([10, 20, 30]));
    Ok(())
}

#[test]
fn test_decode_bmp() -> Result<(), Box<dyn Error>> {
    let dir = fixture_dir("decode-bmp")?;
    let path = solid(&dir, "solid.bmp", 5, 7, [1, 2, 3])?;

    let img = decode(&path, &DecodeLimits::default())?;
    assert_eq!(img.dimensions(), (5, 7));
    assert!(img.pixels().all(|px| *px == Rgb([1, 2, 3])));
    Ok(())
}

#[test]
fn test_decode_jpeg() -> Result<(), Box<dyn Error>> {
    let dir = fixture_dir("decode-jpeg")?;
    let path = solid(&dir, "solid.jpg", 32, 16, [200, 100, 50])?;

    let img = decode(&path, &DecodeLimits::default())?;
    assert_eq!(img.dimensions(), (32, 16));
    assert!(close(img.get_pixel(16, 8), [200, 100, 50], 8));
    Ok(())
}

#[test]
fn test_decode_sniffs_contents_over_extension() -> Result<(), Box<dyn Error>> {
    let dir = fixture_dir("decode-sniff")?;
    let png = solid(&dir, "really.png", 4, 4, [9, 9, 9])?;
    let renamed = dir.join("really.jpg");
    fs::rename(&png, &renamed)?;

    let img = decode(&renamed, &DecodeLimits::default())?;
    assert_eq!(img.get_pixel(0, 0), &Rgb([9, 9, 9]));
    Ok(())
}

#[test]
fn test_decode_missing_file() {
    let err = decode(Path::new("/nonexistent/kms-slideshow.png"), &DecodeLimits::default());
    assert!(matches!(err, Err(DecodeError::Io { .. })), "{err:?}");
}

#[test]
fn test_decode_unsupported() -> Result<(), Box<dyn Error>> {
    let dir = fixture_dir("decode-unsupported")?;
    let path = dir.join("notes.txt");
    fs::write(&path, "not an image at all")?;

    let err = decode(&path, &DecodeLimits::default());
    assert!(matches!(err, Err(DecodeError::Unsupported { .. })), "{err:?}");
    Ok(())
}

#[test]
fn test_decode_corrupt() -> Result<(), Box<dyn Error>> {
    let dir = fixture_dir("decode-corrupt")?;

    let garbage = dir.join("garbage.png");
    fs::write(&garbage, b"\x89PNG\r\n\x1a\nthis is not a real chunk stream")?;
    let err = decode(&garbage, &DecodeLimits::default());
    assert!(matches!(err, Err(DecodeError::Corrupt { .. })), "{err:?}");

    let full = solid(&dir, "full.png", 64, 64, [1, 2, 3])?;
    let bytes = fs::read(&full)?;
    let truncated = dir.join("truncated.png");
    fs::write(&truncated, &bytes[..bytes.len() / 2])?;
    let err = decode(&truncated, &DecodeLimits::default());
    assert!(matches!(err, Err(DecodeError::Corrupt { .. })), "{err:?}");
    Ok(())
}

#[test]
fn test_decode_limits() -> Result<(), Box<dyn Error>> {
    let dir = fixture_dir("decode-limits")?;
    let path = solid(&dir, "big.png", 100, 100, [0, 0, 0])?;

    let limits = DecodeLimits { max_pixels: 9_999 };
    match decode(&path, &limits) {
        Err(DecodeError::Limits {
            width,
            height,
            max_pixels,
            ..
        }) => {
            assert_eq!((width, height), (100, 100));
            assert_eq!(max_pixels, 9_999);
        }
        other => panic!("expected limits error, got {other:?}"),
    }

    let limits = DecodeLimits { max_pixels: 10_000 };
    assert!(decode(&path, &limits).is_ok());
    Ok(())
}

#[test]
fn test_supported_extensions() {
    assert!(is_supported(Path::new("holiday.JPG")));
    assert!(is_supported(Path::new("scan.tiff")));
    assert!(is_supported(Path::new("dir/anim.gif")));
    assert!(!is_supported(Path::new("notes.txt")));
    assert!(!is_supported(Path::new("Makefile")));
}
