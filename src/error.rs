// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Error types for the render pipeline and the display path.
//!
//! Errors are split by how the caller must react to them:
//!
//! - [`DecodeError`] and [`RenderError`] are recoverable. The image is skipped
//!   and whatever frame is currently on screen stays there.
//! - [`DisplayError`] means the display path can no longer be trusted. The
//!   session should release its resources and terminate.

use std::{io, path::PathBuf};

/// Failure to turn a file on storage into an RGB pixel grid.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not in a raster format we can decode.
    #[error("unsupported image format: {path}")]
    Unsupported { path: PathBuf },

    /// The file claims a supported format but its contents are invalid
    /// (truncated data, bad header, unsupported encoding).
    #[error("corrupt image {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Decoding needs more memory than the decoder allows, e.g. a large
    /// 16-bit image that is within the pixel limit.
    #[error("image {path} is too large to decode: {reason}")]
    TooLarge { path: PathBuf, reason: String },

    /// The image exceeds the configured decode limits.
    #[error("image {path} is {width}x{height}, over the {max_pixels} pixel limit")]
    Limits {
        path: PathBuf,
        width: u32,
        height: u32,
        max_pixels: u64,
    },
}

/// Recoverable failure of the decode → transform → compose pipeline.
///
/// No frame is produced for the request; nothing is cached.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The zoom fraction yields an empty or inverted crop box.
    #[error("invalid zoom {zoom}: crop rows {top}..{bottom} are empty")]
    InvalidCrop { zoom: f64, top: i64, bottom: i64 },
}

/// Fatal failure on the display path.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("display device error: {0}")]
    Io(#[from] io::Error),

    #[error("no connected display connector found")]
    NoConnector,

    #[error("connector has no display modes")]
    NoMode,

    #[error("no CRTC can drive the connected display")]
    NoCrtc,

    /// The sink's buffer cannot hold a frame of its advertised size.
    #[error("sink buffer of {len} bytes with pitch {pitch} cannot hold {width}x{height} XRGB8888")]
    Layout {
        len: usize,
        pitch: usize,
        width: u32,
        height: u32,
    },

    /// The canvas handed to the writer does not match the sink resolution.
    #[error("canvas is {canvas_width}x{canvas_height} but display is {width}x{height}")]
    FrameSize {
        canvas_width: u32,
        canvas_height: u32,
        width: u32,
        height: u32,
    },
}
