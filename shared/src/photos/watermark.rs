use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, Rgba, RgbaImage};

use super::glyphs::{draw_text, TextStyle};
use super::PhotoError;

pub const HASHTAGS: &str = "#Questmas #ChristmasCalendar #Adventure";
pub const BRAND: &str = "🎄 Questmas";
pub const JPEG_QUALITY: u8 = 90;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const GOLD: Rgba<u8> = Rgba([255, 215, 0, 255]);

const BAND_FILL_ALPHA: f32 = 0.5;
const GRADIENT_BOTTOM_ALPHA: f32 = 0.6;

/// Text burned into a photo. The caption is expected to be resolved already.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkText {
    pub caption: String,
    pub quest_title: Option<String>,
}

/// Sizes derived from the image width so text scales with resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub base: f32,
    pub medium: f32,
    pub small: f32,
    pub padding: f32,
    pub band_height: f32,
    pub border_width: f32,
}

impl Layout {
    pub fn for_width(width: u32) -> Self {
        let w = width as f32;
        let base = (w / 30.0).max(24.0);
        let padding = (w / 50.0).max(20.0);

        Self {
            base,
            medium: (w / 35.0).max(20.0),
            small: (w / 45.0).max(16.0),
            padding,
            band_height: base * 4.5 + padding * 2.0,
            border_width: (w / 200.0).max(3.0),
        }
    }
}

/// Lays the caption band, text and border over a copy of `source`.
///
/// Pure: the same image and text always give the same pixels.
pub fn compose(source: &DynamicImage, text: &WatermarkText) -> RgbaImage {
    let mut canvas = source.to_rgba8();
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return canvas;
    }

    let layout = Layout::for_width(width);
    let h = height as f32;

    shade_band(&mut canvas, layout.band_height);

    // Lines stack bottom-up from the lower padding
    let x = layout.padding;
    let mut bottom = h - layout.padding;

    draw_text(
        &mut canvas,
        HASHTAGS,
        x,
        bottom,
        TextStyle { size: layout.small, bold: true, color: WHITE },
    );
    bottom -= layout.small + 8.0;

    if let Some(title) = text.quest_title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        draw_text(
            &mut canvas,
            title,
            x,
            bottom,
            TextStyle { size: layout.small, bold: false, color: WHITE },
        );
        bottom -= layout.small + 8.0;
    }

    draw_text(
        &mut canvas,
        &text.caption,
        x,
        bottom,
        TextStyle { size: layout.medium, bold: true, color: GOLD },
    );
    bottom -= layout.medium + 12.0;

    draw_text(
        &mut canvas,
        BRAND,
        x,
        bottom,
        TextStyle { size: layout.base, bold: true, color: WHITE },
    );

    draw_border(&mut canvas, layout.border_width);

    canvas
}

/// Decodes `bytes`, composes the watermark and re-encodes as JPEG.
pub fn apply_watermark(
    bytes: &[u8],
    caption: &str,
    quest_title: Option<&str>,
) -> Result<Vec<u8>, PhotoError> {
    if caption.trim().is_empty() {
        return Err(PhotoError::EmptyCaption);
    }
    let source = image::load_from_memory(bytes)?;
    watermark_image(&source, caption, quest_title)
}

/// Same as [`apply_watermark`] for an already decoded image.
pub fn watermark_image(
    source: &DynamicImage,
    caption: &str,
    quest_title: Option<&str>,
) -> Result<Vec<u8>, PhotoError> {
    let caption = caption.trim();
    if caption.is_empty() {
        return Err(PhotoError::EmptyCaption);
    }
    if source.width() == 0 || source.height() == 0 {
        return Err(PhotoError::EmptyImage);
    }

    let text = WatermarkText {
        caption: caption.to_string(),
        quest_title: quest_title.map(str::to_string),
    };
    let composed = compose(source, &text);

    encode_jpeg(&DynamicImage::ImageRgba8(composed))
}

/// JPEG at the fixed share quality. Alpha is dropped.
pub fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, PhotoError> {
    let rgb = image.to_rgb8();
    let mut out = Vec::new();

    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
        .map_err(PhotoError::Encode)?;

    Ok(out)
}

/// Flat black at 50%, then a black gradient from clear at the band top to 60% at the bottom.
///
/// On images shorter than the band the top sits above the canvas and only the lower part
/// of the gradient is visible.
fn shade_band(canvas: &mut RgbaImage, band_height: f32) {
    let height = canvas.height();
    let band_top = height as f32 - band_height;
    let first_row = band_top.floor().max(0.0) as u32;

    for y in first_row..height {
        let t = ((y as f32 + 0.5 - band_top) / band_height).clamp(0.0, 1.0);
        let keep = (1.0 - BAND_FILL_ALPHA) * (1.0 - GRADIENT_BOTTOM_ALPHA * t);

        for x in 0..canvas.width() {
            let pixel = canvas.get_pixel_mut(x, y);
            for channel in pixel.0.iter_mut().take(3) {
                *channel = (*channel as f32 * keep).round() as u8;
            }
        }
    }
}

/// Stroke centred on the canvas edge: only the inner half is visible.
fn draw_border(canvas: &mut RgbaImage, line_width: f32) {
    let (width, height) = canvas.dimensions();
    let inside = (line_width / 2.0).ceil() as u32;

    for y in 0..height {
        for x in 0..width {
            let on_edge = x < inside
                || y < inside
                || x >= width.saturating_sub(inside)
                || y >= height.saturating_sub(inside);
            if on_edge {
                canvas.put_pixel(x, y, GOLD);
            }
        }
    }
}
