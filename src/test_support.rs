//! Synthetic fixtures shared by the unit tests.
//!
//! Images are generated in memory and encoded with the `image` crate's own
//! encoders, so fixtures never depend on the code under test.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

/// Diagonal gradient with some texture so filters have something to do.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let noise = ((x * 31 + y * 17) % 23) as u8;
        Rgb([
            ((x * 255) / width.max(1)) as u8 / 2 + noise,
            ((y * 255) / height.max(1)) as u8 / 2 + noise,
            128,
        ])
    }))
}

pub fn gradient_rgba(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 96, 200])
    }))
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), format)
        .expect("fixture encode");
    buffer
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Jpeg)
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Png)
}

/// Offset and marker byte of the first start-of-frame segment in a JPEG.
pub fn jpeg_frame(data: &[u8]) -> Option<(usize, u8)> {
    let mut offset = 2;
    while offset + 4 <= data.len() {
        if data[offset] != 0xFF {
            return None;
        }
        let marker = data[offset + 1];
        if (0xC0..=0xCF).contains(&marker) && ![0xC4, 0xC8, 0xCC].contains(&marker) {
            return Some((offset, marker));
        }
        let length = u16::from_be_bytes([data[offset + 2], data[offset + 3]]) as usize;
        offset += 2 + length;
    }
    None
}
