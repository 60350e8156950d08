use zenblit::*;

const UNCOMPRESSED: [PixelFormat; 10] = [
    PixelFormat::Grayscale,
    PixelFormat::GrayAlpha,
    PixelFormat::R5G6B5,
    PixelFormat::R8G8B8,
    PixelFormat::R5G5B5A1,
    PixelFormat::R4G4B4A4,
    PixelFormat::R8G8B8A8,
    PixelFormat::R32,
    PixelFormat::R32G32B32,
    PixelFormat::R32G32B32A32,
];

/// `color` as it reads back after a round trip through one pixel of `format`.
fn reduced(format: PixelFormat, color: Color) -> Color {
    let mut px = [0u8; 16];
    write_color(&mut px, format, color);
    read_color(&px, format)
}

#[test]
fn clear_565_red_is_full_scale() {
    let mut bmp = Bitmap::new(5, 3, PixelFormat::R5G6B5).unwrap();
    clear(&mut bmp, Color::new(255, 0, 0, 255));
    for px in bmp.data().chunks_exact(2) {
        let word = u16::from_le_bytes([px[0], px[1]]);
        assert_eq!(word >> 11, 31);
        assert_eq!(word & 0x07FF, 0);
    }
}

#[test]
fn clear_reads_back_at_format_precision() {
    let color = Color::new(200, 100, 37, 180);
    for format in UNCOMPRESSED {
        // 17 wide exercises whole patterns plus a per-pixel tail for every bpp
        let mut bmp = Bitmap::new(17, 3, format).unwrap();
        clear(&mut bmp, color);
        let expected = reduced(format, color);
        for y in 0..3 {
            for x in 0..17 {
                assert_eq!(bmp.get_pixel(x, y), Some(expected), "{format:?} ({x},{y})");
            }
        }
    }
}

#[test]
fn fill_rect_clips_to_bitmap() {
    let mut bmp = Bitmap::new(6, 4, PixelFormat::R8G8B8).unwrap();
    fill_rect(&mut bmp, Rect::new(4.0, -3.0, 10.0, 5.0), Color::new(9, 8, 7, 255));
    for y in 0..4 {
        for x in 0..6 {
            let filled = x >= 4 && y < 2;
            let expected = if filled {
                Color::new(9, 8, 7, 255)
            } else {
                Color::new(0, 0, 0, 255)
            };
            assert_eq!(bmp.get_pixel(x, y), Some(expected), "({x},{y})");
        }
    }
}

#[test]
fn fill_outside_or_empty_is_noop() {
    let mut bmp = Bitmap::new(4, 4, PixelFormat::R8G8B8A8).unwrap();
    let c = Color::new(1, 2, 3, 4);
    fill_rect(&mut bmp, Rect::new(10.0, 10.0, 3.0, 3.0), c);
    fill_rect(&mut bmp, Rect::new(1.0, 1.0, 0.0, 2.0), c);
    fill_rect(&mut bmp, Rect::new(1.0, 1.0, -2.0, 2.0), c);
    fill_rect_xywh(&mut bmp, -5, 0, 5, 4, c);
    fill_rect(&mut bmp, Rect::new(f32::NAN, 0.0, 4.0, 4.0), c);
    assert!(bmp.data().iter().all(|&b| b == 0));
}

#[test]
fn fill_xywh_matches_float_rect() {
    let mut a = Bitmap::new(9, 7, PixelFormat::R4G4B4A4).unwrap();
    let mut b = a.clone();
    let c = Color::new(255, 136, 0, 255);
    fill_rect_xywh(&mut a, 2, 1, 5, 4, c);
    fill_rect(&mut b, Rect::new(2.0, 1.0, 5.0, 4.0), c);
    assert_eq!(a, b);
    assert_eq!(a.get_pixel(2, 1), Some(c));
    assert_eq!(a.get_pixel(7, 1), Some(Color::new(0, 0, 0, 0)));
}

#[test]
fn broadcast_and_blit_agree_for_opaque_colors() {
    let broadcast = Compositor::default();
    let blit = Compositor::default().with_fill_strategy(FillStrategy::Blit);
    let color = Color::new(12, 240, 99, 255);
    for format in UNCOMPRESSED {
        for rect in [
            Rect::new(0.0, 0.0, 9.0, 5.0),
            Rect::new(1.5, 2.0, 6.0, 2.9),
            Rect::new(-3.0, -1.0, 5.0, 3.0),
            Rect::new(7.0, 4.0, 10.0, 10.0),
        ] {
            let mut a = Bitmap::new(9, 5, format).unwrap();
            let mut b = a.clone();
            broadcast.fill_rect(&mut a, rect, color);
            blit.fill_rect(&mut b, rect, color);
            assert_eq!(a, b, "{format:?} {rect:?}");
        }
    }
}

#[test]
fn blit_fill_with_scalar_execution() {
    let c = Compositor::default()
        .with_fill_strategy(FillStrategy::Blit)
        .with_execution_mode(ExecutionMode::Scalar);
    let mut bmp = Bitmap::new(6, 2, PixelFormat::R8G8B8A8).unwrap();
    c.clear(&mut bmp, Color::new(5, 6, 7, 255));
    assert!(bmp.data().chunks_exact(4).all(|px| px == [5, 6, 7, 255]));
}

#[test]
fn blit_fill_allocates_one_row() {
    // 32x32 area under a 32-pixel cap: only the swatch row is allocated
    let limits = Limits {
        max_pixels: Some(32),
        ..Default::default()
    };
    let color = Color::new(40, 80, 160, 255);
    let mut expected = Bitmap::new(32, 32, PixelFormat::R5G6B5).unwrap();
    fill_rect(&mut expected, Rect::new(0.0, 0.0, 32.0, 32.0), color);

    let mut bmp = Bitmap::new(32, 32, PixelFormat::R5G6B5).unwrap();
    Compositor::default()
        .with_fill_strategy(FillStrategy::Blit)
        .with_limits(limits.clone())
        .fill_rect(&mut bmp, Rect::new(0.0, 0.0, 32.0, 32.0), color);
    assert_eq!(bmp, expected);

    // a swatch wider than the cap is rejected and the fill skipped
    let mut wide = Bitmap::new(40, 2, PixelFormat::R5G6B5).unwrap();
    Compositor::default()
        .with_fill_strategy(FillStrategy::Blit)
        .with_limits(limits)
        .clear(&mut wide, color);
    assert!(wide.data().iter().all(|&b| b == 0));
}

#[test]
fn fill_on_compressed_is_skipped() {
    let mut bmp = Bitmap::new(8, 8, PixelFormat::Astc4x4Rgba).unwrap();
    clear(&mut bmp, Color::new(255, 255, 255, 255));
    assert!(bmp.data().iter().all(|&b| b == 0));
}

#[test]
fn solid_bitmap_is_uniform() {
    let bmp = generate_solid_bitmap(5, 3, Color::new(1, 2, 3, 4)).unwrap();
    assert_eq!(bmp.format(), PixelFormat::R8G8B8A8);
    assert_eq!(bmp.data().len(), 60);
    assert!(bmp.data().chunks_exact(4).all(|px| px == [1, 2, 3, 4]));
}

#[test]
fn solid_bitmap_rejects_overflowing_dimensions() {
    let limits = Limits {
        max_width: Some(1024),
        ..Default::default()
    };
    let err = Compositor::default()
        .with_limits(limits)
        .generate_solid_bitmap(4096, 1, Color::new(0, 0, 0, 0))
        .unwrap_err();
    assert!(matches!(err, BitmapError::LimitExceeded(_)));
}
