// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use image::{Rgb, RgbImage};
use kms_slideshow::compose::{compose, fit, Filter, Placement};
use proptest::prelude::*;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

#[test]
fn test_fit_letterbox() {
    assert_eq!(
        fit(400, 100, 200, 200),
        Placement {
            width: 200,
            height: 50,
            x: 0,
            y: 75
        }
    );
}

#[test]
fn test_fit_pillarbox() {
    assert_eq!(
        fit(100, 400, 200, 200),
        Placement {
            width: 50,
            height: 200,
            x: 75,
            y: 0
        }
    );

    // Equal aspect ratios fill the canvas.
    assert_eq!(
        fit(320, 240, 1920, 1440),
        Placement {
            width: 1920,
            height: 1440,
            x: 0,
            y: 0
        }
    );
}

#[test]
fn test_fit_extreme_aspect() {
    let p = fit(100_000, 1, 640, 480);
    assert_eq!((p.width, p.height), (640, 1));
    let p = fit(1, 100_000, 640, 480);
    assert_eq!((p.width, p.height), (1, 480));
}

#[test]
fn test_compose_letterbox_bands() {
    let img = RgbImage::from_pixel(400, 100, Rgb([255, 255, 255]));
    let canvas = compose(&img, 200, 200, Filter::Lanczos3);

    assert_eq!(canvas.dimensions(), (200, 200));
    for x in [0, 100, 199] {
        assert_eq!(canvas.get_pixel(x, 0), &BLACK);
        assert_eq!(canvas.get_pixel(x, 74), &BLACK);
        assert_eq!(canvas.get_pixel(x, 125), &BLACK);
        assert_eq!(canvas.get_pixel(x, 199), &BLACK);
        assert!(canvas.get_pixel(x, 100).0.iter().all(|&c| c >= 250));
    }
}

#[test]
fn test_compose_pillarbox_bands() {
    let img = RgbImage::from_pixel(100, 400, Rgb([255, 255, 255]));
    let canvas = compose(&img, 200, 200, Filter::Bilinear);

    assert_eq!(canvas.dimensions(), (200, 200));
    assert_eq!(canvas.get_pixel(74, 100), &BLACK);
    assert_eq!(canvas.get_pixel(125, 100), &BLACK);
    assert!(canvas.get_pixel(100, 100).0.iter().all(|&c| c >= 250));
}

#[test]
fn test_compose_without_resize_copies_pixels() {
    let img = RgbImage::from_fn(200, 50, |x, y| Rgb([x as u8, y as u8, 1]));
    let canvas = compose(&img, 200, 200, Filter::Nearest);

    assert_eq!(canvas.get_pixel(0, 75), &Rgb([0, 0, 1]));
    assert_eq!(canvas.get_pixel(199, 124), &Rgb([199, 49, 1]));
    assert_eq!(canvas.get_pixel(0, 74), &BLACK);
}

#[test]
fn test_compose_every_filter() {
    let img = RgbImage::from_pixel(64, 48, Rgb([10, 20, 30]));
    for filter in [
        Filter::Nearest,
        Filter::Bilinear,
        Filter::CatmullRom,
        Filter::Lanczos3,
    ] {
        let canvas = compose(&img, 32, 24, filter);
        assert_eq!(canvas.dimensions(), (32, 24));
        let px = canvas.get_pixel(16, 12);
        assert!(
            px.0.iter().zip([10u8, 20, 30]).all(|(a, b)| a.abs_diff(b) <= 1),
            "{filter:?}: {px:?}"
        );
    }
}

#[test]
fn test_compose_degenerate_sizes() {
    assert_eq!(compose(&RgbImage::new(1, 1000), 640, 480, Filter::default()).dimensions(), (640, 480));
    assert_eq!(compose(&RgbImage::new(1000, 1), 640, 480, Filter::default()).dimensions(), (640, 480));
    assert_eq!(compose(&RgbImage::new(0, 0), 8, 8, Filter::default()).dimensions(), (8, 8));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn compose_always_fills_target(
        src_w in 1u32..512,
        src_h in 1u32..512,
        dst_w in 1u32..256,
        dst_h in 1u32..256,
    ) {
        let canvas = compose(&RgbImage::new(src_w, src_h), dst_w, dst_h, Filter::Nearest);
        prop_assert_eq!(canvas.dimensions(), (dst_w, dst_h));
    }

    #[test]
    fn fit_stays_inside_target(
        src_w in 1u32..100_000,
        src_h in 1u32..100_000,
        dst_w in 1u32..4096,
        dst_h in 1u32..4096,
    ) {
        let p = fit(src_w, src_h, dst_w, dst_h);
        prop_assert!(p.width >= 1 && p.height >= 1);
        prop_assert!(p.x + p.width <= dst_w);
        prop_assert!(p.y + p.height <= dst_h);
        prop_assert!(p.width == dst_w || p.height == dst_h);
    }
}
