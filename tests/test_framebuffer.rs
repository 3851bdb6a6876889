// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use image::{Rgb, RgbImage};
use kms_slideshow::{
    error::DisplayError,
    framebuffer::{DisplaySink, FramebufferWriter, MemorySink},
};
use std::error::Error;

#[test]
fn test_write_bgrx_order() -> Result<(), Box<dyn Error>> {
    let mut writer = FramebufferWriter::new(MemorySink::new(3, 2));
    let canvas = RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 200]));
    writer.write(&canvas)?;

    let sink = writer.sink();
    assert_eq!(sink.frames(), 1);
    assert_eq!(sink.pixel(0, 0), [200, 0, 0, 0xff]);
    assert_eq!(sink.pixel(2, 1), [200, 1, 2, 0xff]);
    Ok(())
}

#[test]
fn test_write_honours_pitch() -> Result<(), Box<dyn Error>> {
    // 2 pixels per row plus 8 bytes of padding.
    let mut writer = FramebufferWriter::new(MemorySink::with_pitch(2, 3, 16));
    writer.write(&RgbImage::from_pixel(2, 3, Rgb([1, 2, 3])))?;

    let sink = writer.into_sink();
    for y in 0..3 {
        let row = &sink.pixels()[y * 16..(y + 1) * 16];
        assert_eq!(&row[..8], &[3, 2, 1, 0xff, 3, 2, 1, 0xff]);
        assert_eq!(&row[8..], &[0; 8], "padding of row {y} was touched");
    }
    Ok(())
}

#[test]
fn test_write_rejects_wrong_size() {
    let mut writer = FramebufferWriter::new(MemorySink::new(4, 4));
    let result = writer.write(&RgbImage::new(4, 3));

    match result {
        Err(DisplayError::FrameSize {
            canvas_width,
            canvas_height,
            width,
            height,
        }) => assert_eq!((canvas_width, canvas_height, width, height), (4, 3, 4, 4)),
        other => panic!("expected frame size error, got {other:?}"),
    }
    assert_eq!(writer.sink().frames(), 0);
    assert!(writer.sink().pixels().iter().all(|&b| b == 0));
}

#[test]
fn test_write_rejects_short_buffer() {
    // A pitch narrower than a row cannot hold the frame.
    let mut writer = FramebufferWriter::new(MemorySink::with_pitch(4, 2, 8));
    let result = writer.write(&RgbImage::new(4, 2));
    assert!(matches!(result, Err(DisplayError::Layout { pitch: 8, .. })), "{result:?}");
}

#[test]
fn test_write_overwrites_previous_frame() -> Result<(), Box<dyn Error>> {
    let mut writer = FramebufferWriter::new(MemorySink::new(2, 2));
    writer.write(&RgbImage::from_pixel(2, 2, Rgb([255, 255, 255])))?;
    writer.write(&RgbImage::from_pixel(2, 2, Rgb([0, 0, 9])))?;

    assert_eq!(writer.sink().frames(), 2);
    assert_eq!(writer.sink().pixel(1, 1), [9, 0, 0, 0xff]);
    Ok(())
}

#[test]
fn test_clear_blanks_to_black() -> Result<(), Box<dyn Error>> {
    let mut writer = FramebufferWriter::new(MemorySink::with_pitch(2, 2, 12));
    writer.write(&RgbImage::from_pixel(2, 2, Rgb([9, 9, 9])))?;
    writer.clear()?;

    let sink = writer.sink();
    assert_eq!(sink.resolution(), (2, 2));
    assert_eq!(sink.pixel(0, 0), [0, 0, 0, 0xff]);
    assert_eq!(sink.pixel(1, 1), [0, 0, 0, 0xff]);
    assert_eq!(&sink.pixels()[8..12], &[0; 4]);
    Ok(())
}
