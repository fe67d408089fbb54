use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};

/// 8x8 bitmap for `c`. Row `r` bit `b` set means pixel (b, r) is ink.
pub fn glyph(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(c).or_else(|| LATIN_FONTS.get(c))
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Rgba<u8>,
}

/// Draws `text` left aligned at `x` with its bottom edge on `bottom`. Every character
/// occupies a square cell of `style.size` pixels; characters without a glyph leave a gap.
/// Anything outside the canvas is clipped.
pub fn draw_text(canvas: &mut RgbaImage, text: &str, x: f32, bottom: f32, style: TextStyle) {
    let cell = style.size.round().max(1.0) as i64;
    let top = (bottom - style.size).round() as i64;
    let bold_offset = if style.bold {
        ((style.size / 16.0).floor() as i64).max(1)
    } else {
        0
    };

    for (i, c) in text.chars().enumerate() {
        let Some(bitmap) = glyph(c) else {
            continue;
        };
        let left = (x + i as f32 * style.size).round() as i64;

        draw_glyph(canvas, &bitmap, left, top, cell, style.color);
        if bold_offset > 0 {
            draw_glyph(canvas, &bitmap, left + bold_offset, top, cell, style.color);
        }
    }
}

fn draw_glyph(canvas: &mut RgbaImage, bitmap: &[u8; 8], left: i64, top: i64, cell: i64, color: Rgba<u8>) {
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);

    for dy in 0..cell {
        let y = top + dy;
        if y < 0 || y >= height {
            continue;
        }
        let row = bitmap[(dy * 8 / cell) as usize];
        if row == 0 {
            continue;
        }
        for dx in 0..cell {
            let x = left + dx;
            if x < 0 || x >= width {
                continue;
            }
            if row & (1 << (dx * 8 / cell)) != 0 {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
