#![no_main]
use libfuzzer_sys::fuzz_target;
use zenblit::*;

const FORMATS: [PixelFormat; 12] = [
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
    PixelFormat::Dxt1Rgb,
    PixelFormat::Astc8x8Rgba,
];

struct Input<'a>(&'a [u8]);

impl Input<'_> {
    fn byte(&mut self) -> u8 {
        let Some((&b, rest)) = self.0.split_first() else { return 0 };
        self.0 = rest;
        b
    }

    fn coord(&mut self) -> f32 {
        let raw = i16::from_le_bytes([self.byte(), self.byte()]);
        // low bits become a fraction so truncation is exercised
        f32::from(raw) / 4.0
    }

    fn rect(&mut self) -> Rect {
        Rect::new(self.coord(), self.coord(), self.coord(), self.coord())
    }

    fn bitmap(&mut self) -> Option<Bitmap> {
        let format = FORMATS[usize::from(self.byte()) % FORMATS.len()];
        let (w, h) = (u32::from(self.byte() % 40), u32::from(self.byte() % 40));
        let mut bmp = Bitmap::new(w, h, format).ok()?;
        for b in bmp.data_mut() {
            *b = self.byte();
        }
        Some(bmp)
    }
}

fuzz_target!(|data: &[u8]| {
    // Drawing must never panic, whatever the geometry or formats
    let mut input = Input(data);
    let mode = if input.byte() & 1 == 0 {
        ExecutionMode::Auto
    } else {
        ExecutionMode::Scalar
    };
    let (Some(source), Some(mut dest)) = (input.bitmap(), input.bitmap()) else {
        return;
    };
    let source_rect = input.rect();
    let dest_rect = input.rect();
    let tint = Color::new(input.byte(), input.byte(), input.byte(), input.byte());

    let limits = Limits {
        max_pixels: Some(1 << 20),
        max_memory_bytes: Some(1 << 24),
        ..Default::default()
    };
    let before = dest.data().len();
    Compositor::default()
        .with_limits(limits)
        .with_execution_mode(mode)
        .draw_blended(&mut dest, &source, source_rect, dest_rect, tint);
    assert_eq!(dest.data().len(), before);
});
