#![no_main]
use libfuzzer_sys::fuzz_target;
use zenblit::*;

const FORMATS: [PixelFormat; 11] = [
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
    PixelFormat::Etc2EacRgba,
];

fuzz_target!(|data: &[u8]| {
    // Fills must never panic, and both strategies agree on opaque colors
    if data.len() < 16 {
        return;
    }
    let format = FORMATS[usize::from(data[0]) % FORMATS.len()];
    let (w, h) = (u32::from(data[1] % 48), u32::from(data[2] % 48));
    let coord = |i: usize| f32::from(i16::from_le_bytes([data[i], data[i + 1]])) / 3.0;
    let rect = Rect::new(coord(3), coord(5), coord(7), coord(9));
    let color = Color::new(data[11], data[12], data[13], 255);

    let Ok(mut a) = Bitmap::new(w, h, format) else { return };
    let mut b = a.clone();
    Compositor::default().fill_rect(&mut a, rect, color);
    Compositor::default()
        .with_fill_strategy(FillStrategy::Blit)
        .with_execution_mode(if data[14] & 1 == 0 {
            ExecutionMode::Auto
        } else {
            ExecutionMode::Scalar
        })
        .fill_rect(&mut b, rect, color);
    assert_eq!(a, b);

    let xywh = |i: usize| i32::from(data[i] as i8);
    fill_rect_xywh(&mut a, xywh(11), xywh(12), xywh(13), xywh(15), color);
});
