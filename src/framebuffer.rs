// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::DisplayError;
use image::RgbImage;
use tracing::{instrument, trace};

/// Bytes per pixel of the XRGB8888 layout every sink exposes.
pub const BYTES_PER_PIXEL: usize = 4;

/// Destination for rendered frames.
///
/// A sink owns a long-lived pixel buffer in XRGB8888 little-endian layout
/// (bytes B, G, R, X per pixel) with a fixed resolution and row pitch.
pub trait DisplaySink {
    /// Display resolution in pixels (width, height), fixed for the session.
    fn resolution(&self) -> (u32, u32);

    /// Hands the sink's existing pixel buffer and its row pitch in bytes to
    /// `draw`, which updates it in place.
    ///
    /// # Errors
    ///
    /// Returns a [`DisplayError`] if the buffer cannot be accessed, or
    /// whatever error `draw` returns.
    fn update(
        &mut self,
        draw: &mut dyn FnMut(&mut [u8], usize) -> Result<(), DisplayError>,
    ) -> Result<(), DisplayError>;
}

/// Heap-backed sink, used for headless runs and tests.
#[derive(Debug, Clone)]
pub struct MemorySink {
    width: u32,
    height: u32,
    pitch: usize,
    pixels: Vec<u8>,
    frames: u64,
}

impl MemorySink {
    /// Creates a zeroed sink with tightly packed rows.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_pitch(width, height, width as usize * BYTES_PER_PIXEL)
    }

    /// Creates a zeroed sink whose rows are `pitch` bytes apart, like a dumb
    /// buffer with alignment padding.
    pub fn with_pitch(width: u32, height: u32, pitch: usize) -> Self {
        Self {
            width,
            height,
            pitch,
            pixels: vec![0; pitch * height as usize],
            frames: 0,
        }
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The four bytes stored for pixel (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = y as usize * self.pitch + x as usize * BYTES_PER_PIXEL;
        let mut px = [0; 4];
        px.copy_from_slice(&self.pixels[offset..offset + BYTES_PER_PIXEL]);
        px
    }

    /// Number of completed updates.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl DisplaySink for MemorySink {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn update(
        &mut self,
        draw: &mut dyn FnMut(&mut [u8], usize) -> Result<(), DisplayError>,
    ) -> Result<(), DisplayError> {
        draw(self.pixels.as_mut_slice(), self.pitch)?;
        self.frames += 1;
        Ok(())
    }
}

/// Copies RGB canvases into a [`DisplaySink`], converting to the sink's
/// native B, G, R, 0xFF byte order.
///
/// The writer takes exclusive ownership of the sink so that exactly one
/// writer ever touches the mapped buffer. Frames are written in place; the
/// sink buffer is never reallocated.
///
/// # Example
///
/// ```
/// use image::{Rgb, RgbImage};
/// use kms_slideshow::framebuffer::{FramebufferWriter, MemorySink};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut writer = FramebufferWriter::new(MemorySink::new(2, 1));
/// writer.write(&RgbImage::from_pixel(2, 1, Rgb([10, 20, 30])))?;
/// assert_eq!(writer.sink().pixel(1, 0), [30, 20, 10, 255]);
/// # Ok(())
/// # }
/// ```
pub struct FramebufferWriter<S: DisplaySink> {
    sink: S,
}

impl<S: DisplaySink> FramebufferWriter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.sink.resolution()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Releases the sink, handing ownership back to the caller.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Writes `canvas` to the display.
    ///
    /// # Errors
    ///
    /// - [`DisplayError::FrameSize`] if the canvas is not exactly the sink
    ///   resolution; the sink is left untouched
    /// - [`DisplayError::Layout`] if the sink buffer is too small for its
    ///   advertised resolution and pitch
    /// - any error the sink reports while mapping its buffer
    #[instrument(skip_all)]
    pub fn write(&mut self, canvas: &RgbImage) -> Result<(), DisplayError> {
        let (width, height) = self.sink.resolution();
        if canvas.dimensions() != (width, height) {
            return Err(DisplayError::FrameSize {
                canvas_width: canvas.width(),
                canvas_height: canvas.height(),
                width,
                height,
            });
        }
        if width == 0 || height == 0 {
            return Ok(());
        }

        let src_stride = width as usize * 3;
        let row_bytes = width as usize * BYTES_PER_PIXEL;
        self.sink.update(&mut |buf: &mut [u8], pitch: usize| {
            check_layout(buf.len(), pitch, width, height)?;
            for (y, src) in canvas.as_raw().chunks_exact(src_stride).enumerate() {
                let dst = &mut buf[y * pitch..y * pitch + row_bytes];
                for (d, s) in dst.chunks_exact_mut(BYTES_PER_PIXEL).zip(src.chunks_exact(3)) {
                    d[0] = s[2];
                    d[1] = s[1];
                    d[2] = s[0];
                    d[3] = 0xff;
                }
            }
            Ok(())
        })?;
        trace!(width, height, "frame written");
        Ok(())
    }

    /// Fills the visible area of the sink with opaque black.
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        let (width, height) = self.sink.resolution();
        if width == 0 || height == 0 {
            return Ok(());
        }

        let row_bytes = width as usize * BYTES_PER_PIXEL;
        self.sink.update(&mut |buf: &mut [u8], pitch: usize| {
            check_layout(buf.len(), pitch, width, height)?;
            for y in 0..height as usize {
                for px in buf[y * pitch..y * pitch + row_bytes].chunks_exact_mut(BYTES_PER_PIXEL) {
                    px.copy_from_slice(&[0, 0, 0, 0xff]);
                }
            }
            Ok(())
        })
    }
}

fn check_layout(len: usize, pitch: usize, width: u32, height: u32) -> Result<(), DisplayError> {
    let row_bytes = width as usize * BYTES_PER_PIXEL;
    let needed = pitch
        .checked_mul(height as usize - 1)
        .and_then(|n| n.checked_add(row_bytes));
    match needed {
        Some(needed) if pitch >= row_bytes && len >= needed => Ok(()),
        _ => Err(DisplayError::Layout {
            len,
            pitch,
            width,
            height,
        }),
    }
}
