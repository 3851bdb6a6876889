// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # KMS Slideshow Library
//!
//! This library provides the image rendering pipeline behind the KMS
//! slideshow viewer. It turns an image file plus a set of view parameters
//! (display resolution, zoom, rotation) into pixels laid out exactly as the
//! display hardware expects, and memoizes the result so revisiting an image
//! is instant.
//!
//! ## Features
//!
//! - **Decoding**: JPEG through libjpeg-turbo with SIMD, PNG, BMP, GIF, WebP
//!   and TIFF through the `image` crate, all normalized to 8-bit RGB.
//! - **Geometry**: lossless quarter-turn rotation, bicubic rotation by any
//!   angle with an expanded canvas, and top-anchored zoom crops.
//! - **Compositing**: aspect-preserving letterbox/pillarbox fitting with
//!   SIMD resampling via `fast_image_resize`.
//! - **Render Cache**: bounded LRU memoization of the whole pipeline keyed
//!   by file path and view parameters.
//! - **Display Output**: in-place XRGB8888 writes into a KMS dumb
//!   framebuffer, with guaranteed restoration of the previous display and
//!   console state.
//!
//! ## Example
//!
//! ```no_run
//! use kms_slideshow::{
//!     cache::DEFAULT_CAPACITY, kms::KmsSink, render::Pipeline, viewer::Viewer,
//! };
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = KmsSink::open(Path::new("/dev/dri/card0"))?;
//! let mut viewer = Viewer::new(sink, DEFAULT_CAPACITY, Pipeline::default());
//!
//! // Show a photo rotated a quarter turn counter-clockwise
//! let outcome = viewer.render_and_display(Path::new("photo.jpg"), 0.0, 90.0)?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Platform Requirements
//!
//! - **Linux**: a DRM driver with dumb buffer support and permission to
//!   become DRM master (no compositor running on the target display)
//! - Other platforms can use the pipeline with an in-memory
//!   [`framebuffer::MemorySink`]
//!
//! ## Safety
//!
//! `unsafe` is confined to the console mode ioctls in `console` and the
//! long-lived framebuffer mapping in `kms`, which is created once when the
//! display is opened and unmapped once when it is released.

pub mod cache;
pub mod command;
pub mod compose;
#[cfg(target_os = "linux")]
pub mod console;
pub mod decode;
pub mod error;
pub mod framebuffer;
#[cfg(target_os = "linux")]
pub mod kms;
pub mod memory;
pub mod playlist;
pub mod render;
pub mod transform;
pub mod viewer;
