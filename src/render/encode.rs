//! Sticker post-processing
//!
//! The raw capture comes back at 3x scale; stickers must be exactly 512 px
//! wide. Decode, Lanczos downscale preserving aspect, re-encode as lossless
//! WebP.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat};

use crate::error::Result;

/// Target sticker width in pixels.
pub const STICKER_WIDTH: u32 = 512;

/// An encoded sticker artifact.
#[derive(Debug, Clone)]
pub struct Sticker {
    pub webp: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Downscale a captured PNG to sticker size and encode it as WebP.
pub fn encode_sticker(png: &[u8]) -> Result<Sticker> {
    let decoded = image::load_from_memory(png)?;

    let (source_width, source_height) = decoded.dimensions();
    let target_height =
        ((source_height as f64) * (STICKER_WIDTH as f64 / source_width as f64)).max(1.0) as u32;

    let resized = decoded.resize_exact(STICKER_WIDTH, target_height, FilterType::Lanczos3);

    let mut buffer = Cursor::new(Vec::new());
    resized.write_to(&mut buffer, ImageFormat::WebP)?;

    Ok(Sticker {
        webp: buffer.into_inner(),
        width: STICKER_WIDTH,
        height: target_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbaImage};

    fn png_of(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([200, 100, 50, 255]),
        ));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_downscale_lands_on_exact_width() {
        let sticker = encode_sticker(&png_of(1536, 900)).unwrap();
        assert_eq!(sticker.width, 512);
        // 900 * 512 / 1536 = 300
        assert_eq!(sticker.height, 300);
    }

    #[test]
    fn test_upscale_small_capture_also_lands_on_width() {
        let sticker = encode_sticker(&png_of(256, 128)).unwrap();
        assert_eq!(sticker.width, 512);
        assert_eq!(sticker.height, 256);
    }

    #[test]
    fn test_output_is_webp() {
        let sticker = encode_sticker(&png_of(1024, 512)).unwrap();
        // RIFF....WEBP container signature.
        assert_eq!(&sticker.webp[0..4], b"RIFF");
        assert_eq!(&sticker.webp[8..12], b"WEBP");
    }

    #[test]
    fn test_garbage_input_is_an_error() {
        assert!(encode_sticker(&[0, 1, 2, 3]).is_err());
    }

    #[test]
    fn test_extreme_aspect_ratio_keeps_nonzero_height() {
        let sticker = encode_sticker(&png_of(4096, 2)).unwrap();
        assert_eq!(sticker.width, 512);
        assert!(sticker.height >= 1);
    }
}
