// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

#![allow(dead_code)]

use image::{Rgb, RgbImage};
use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
};

/// Creates an empty directory unique to this test process and `name`.
pub fn fixture_dir(name: &str) -> Result<PathBuf, Box<dyn Error>> {
    let dir = std::env::temp_dir().join(format!("kms-slideshow-{}-{}", name, std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Writes a solid-colour image, encoded according to the file extension.
pub fn solid(dir: &Path, file: &str, width: u32, height: u32, color: [u8; 3]) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(file);
    RgbImage::from_pixel(width, height, Rgb(color)).save(&path)?;
    Ok(path)
}

/// Writes a PNG whose top-left pixel is red and every other pixel blue.
pub fn marked(dir: &Path, file: &str, width: u32, height: u32) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(file);
    let mut img = RgbImage::from_pixel(width, height, Rgb([0, 0, 255]));
    img.put_pixel(0, 0, Rgb([255, 0, 0]));
    img.save(&path)?;
    Ok(path)
}

/// True if every channel differs by at most `tolerance`.
pub fn close(a: &Rgb<u8>, b: [u8; 3], tolerance: u8) -> bool {
    a.0.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= tolerance)
}
