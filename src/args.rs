// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use kms_slideshow::compose::Filter;
use std::{num::NonZeroUsize, path::PathBuf, str::FromStr};

/// Resampling filter used to fit images to the display.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum FilterSetting {
    /// Nearest neighbour (fastest)
    Nearest,
    /// Bilinear interpolation
    Bilinear,
    /// Bicubic Catmull-Rom
    CatmullRom,
    /// Lanczos3 (sharpest)
    Lanczos3,
}

impl From<FilterSetting> for Filter {
    fn from(value: FilterSetting) -> Self {
        match value {
            FilterSetting::Nearest => Filter::Nearest,
            FilterSetting::Bilinear => Filter::Bilinear,
            FilterSetting::CatmullRom => Filter::CatmullRom,
            FilterSetting::Lanczos3 => Filter::Lanczos3,
        }
    }
}

/// Display size given as `WIDTHxHEIGHT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
        let width: u32 = width.trim().parse().map_err(|e| format!("width: {e}"))?;
        let height: u32 = height.trim().parse().map_err(|e| format!("height: {e}"))?;
        if width == 0 || height == 0 {
            return Err(format!("resolution must be non-zero, got `{s}`"));
        }
        Ok(Self { width, height })
    }
}

/// Command-line arguments for the KMS slideshow viewer.
///
/// Arguments can be specified via command line or environment variables.
///
/// # Example
///
/// ```bash
/// # Via command line
/// kms-slideshow /srv/photos --device /dev/dri/card1 --cache-capacity 200
///
/// # Via environment variables
/// export DRM_DEVICE=/dev/dri/card1
/// export CACHE_CAPACITY=200
/// kms-slideshow /srv/photos
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory of images to browse
    #[arg(env = "SLIDESHOW_DIR", default_value = ".")]
    pub directory: PathBuf,

    /// DRM device node driving the display
    #[arg(short, long, env = "DRM_DEVICE", default_value = "/dev/dri/card0")]
    pub device: PathBuf,

    /// Virtual console switched to graphics mode while the viewer runs
    #[arg(long, env = "SLIDESHOW_TTY", default_value = "/dev/tty")]
    pub tty: PathBuf,

    /// Maximum number of rendered frames kept in memory
    #[arg(short, long, env = "CACHE_CAPACITY", default_value = "500")]
    pub cache_capacity: NonZeroUsize,

    /// Fraction of the image height added or removed by one zoom step
    #[arg(long, env = "ZOOM_STEP", default_value = "0.1")]
    pub zoom_step: f64,

    /// Degrees turned by one rotate step
    #[arg(long, env = "ROTATE_STEP", default_value = "90")]
    pub rotate_step: f64,

    /// Resampling filter used to fit images to the display
    #[arg(long, env = "RESIZE_FILTER", default_value = "lanczos3", value_enum)]
    pub filter: FilterSetting,

    /// Largest image, in pixels, that will be decoded
    #[arg(long, env = "MAX_PIXELS", default_value = "100000000")]
    pub max_pixels: u64,

    /// Render into memory at WIDTHxHEIGHT instead of driving a display
    #[arg(long, env = "HEADLESS")]
    pub headless: Option<Resolution>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable Tracy profiler for performance analysis
    #[arg(long, env = "TRACY")]
    pub tracy: bool,

    /// Do not send logs to the systemd journal
    #[arg(long, env = "NO_JOURNALD")]
    pub no_journald: bool,
}
