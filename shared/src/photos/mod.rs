//! Photo pipeline for completed doors: caption selection, framing, the watermark overlay
//! and data URLs for storage.

use serde::Deserialize;

pub mod captions;
pub mod data_url;
pub mod framing;
mod glyphs;
pub mod watermark;

pub use captions::{resolve_caption, Locale};
pub use watermark::{apply_watermark, compose, watermark_image, WatermarkText};

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("could not encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("caption is empty")]
    EmptyCaption,

    #[error("image has no pixels")]
    EmptyImage,
}

/// Framing applied before the watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frame {
    #[default]
    Original,
    /// 9:16 centre crop, see [`framing::crop_to_portrait`]
    Portrait,
}

impl Frame {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "portrait" => Frame::Portrait,
            _ => Frame::Original,
        }
    }
}

/// Full share path: raw bytes or a base64 data URL in, watermarked JPEG out.
pub fn share_photo(
    input: &[u8],
    caption: &str,
    quest_title: Option<&str>,
    frame: Frame,
) -> Result<Vec<u8>, PhotoError> {
    if caption.trim().is_empty() {
        return Err(PhotoError::EmptyCaption);
    }

    let decoded_url = std::str::from_utf8(input)
        .ok()
        .filter(|s| data_url::is_data_url(s))
        .and_then(data_url::decode_data_url);
    let bytes = decoded_url.as_deref().unwrap_or(input);

    let source = image::load_from_memory(bytes)?;
    let source = match frame {
        Frame::Original => source,
        Frame::Portrait => framing::crop_to_portrait(&source),
    };

    watermark_image(&source, caption, quest_title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut out, ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn dimensions(jpeg: &[u8]) -> (u32, u32) {
        let decoded = image::load_from_memory(jpeg).unwrap();
        (decoded.width(), decoded.height())
    }

    #[test]
    fn portrait_frame_crops_before_watermarking() {
        let jpeg = share_photo(&png(1600, 900), "Found it!", None, Frame::Portrait).unwrap();
        assert_eq!(dimensions(&jpeg), (506, 900));

        let jpeg = share_photo(&png(1600, 900), "Found it!", None, Frame::Original).unwrap();
        assert_eq!(dimensions(&jpeg), (1600, 900));
    }

    #[test]
    fn data_urls_are_accepted() {
        let url = data_url::to_data_url(&png(120, 80));
        let jpeg = share_photo(url.as_bytes(), "Found it!", Some("Quest"), Frame::Original).unwrap();
        assert_eq!(dimensions(&jpeg), (120, 80));
    }

    #[test]
    fn frame_names() {
        assert_eq!(Frame::parse("Portrait"), Frame::Portrait);
        assert_eq!(Frame::parse(""), Frame::Original);
    }
}
