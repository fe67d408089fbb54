use image::DynamicImage;

/// Portrait 9:16, the share format of phone stories.
const PORTRAIT_W: u64 = 9;
const PORTRAIT_H: u64 = 16;

/// Centre crop to 9:16. Wider images lose width, taller images lose height.
pub fn crop_to_portrait(image: &DynamicImage) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return image.clone();
    }

    let (w, h) = (width as u64, height as u64);
    let (crop_w, crop_h) = if w * PORTRAIT_H > h * PORTRAIT_W {
        ((h * PORTRAIT_W / PORTRAIT_H).max(1), h)
    } else {
        (w, (w * PORTRAIT_H / PORTRAIT_W).max(1))
    };

    let x = ((w - crop_w) / 2) as u32;
    let y = ((h - crop_h) / 2) as u32;
    image.crop_imm(x, y, crop_w as u32, crop_h as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn blank(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::new(width, height))
    }

    #[test]
    fn landscape_loses_width() {
        let cropped = crop_to_portrait(&blank(1920, 1080));
        assert_eq!((cropped.width(), cropped.height()), (607, 1080));
    }

    #[test]
    fn tall_images_lose_height() {
        let cropped = crop_to_portrait(&blank(900, 2000));
        assert_eq!((cropped.width(), cropped.height()), (900, 1600));
    }

    #[test]
    fn portrait_is_kept() {
        let cropped = crop_to_portrait(&blank(1080, 1920));
        assert_eq!((cropped.width(), cropped.height()), (1080, 1920));
    }

    #[test]
    fn crop_is_centred() {
        let mut source = RgbaImage::new(160, 90);
        // Mark the middle column
        for y in 0..90 {
            source.put_pixel(80, y, Rgba([255, 0, 0, 255]));
        }
        let cropped = crop_to_portrait(&DynamicImage::ImageRgba8(source)).to_rgba8();

        // 50px wide, starting at x = 55
        assert_eq!(cropped.width(), 50);
        assert_eq!(*cropped.get_pixel(25, 45), Rgba([255, 0, 0, 255]));
    }
}
