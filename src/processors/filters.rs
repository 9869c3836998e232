// jpg2png/src/processors/filters.rs
//
// Pixel primitives used by the filter stages. Every function takes the image
// by reference and returns a new one; alpha is carried through untouched.
// Images without alpha come back as RGB8, images with alpha as RGBA8.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::filter::gaussian_blur_f32;

/// Luma differences at or below this (8-bit units) count as flat areas.
const SHARPEN_FLAT_THRESHOLD: f32 = 5.0;
/// Upper bounds on how far a sharpen may push a pixel.
const SHARPEN_MAX_BRIGHTEN: f32 = 25.0;
const SHARPEN_MAX_DARKEN: f32 = 50.0;
/// Fraction of pixels clipped at each end of the histogram by `normalize`.
const NORMALIZE_CLIP: f64 = 0.01;

fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn finish(buffer: RgbaImage, has_alpha: bool) -> DynamicImage {
    let image = DynamicImage::ImageRgba8(buffer);
    if has_alpha {
        image
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    }
}

/// Applies `f` to the colour channels of every pixel.
fn map_rgb<F>(image: &DynamicImage, f: F) -> DynamicImage
where
    F: Fn([f32; 3]) -> [f32; 3],
{
    let has_alpha = image.color().has_alpha();
    let mut buffer = image.to_rgba8();

    for pixel in buffer.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let [r, g, b] = f([r as f32, g as f32, b as f32]);
        *pixel = Rgba([to_u8(r), to_u8(g), to_u8(b), a]);
    }

    finish(buffer, has_alpha)
}

/// Gaussian blur. A non-positive sigma returns an unchanged copy.
pub fn blur(image: &DynamicImage, sigma: f32) -> DynamicImage {
    if sigma <= 0.0 {
        return image.clone();
    }

    let has_alpha = image.color().has_alpha();
    finish(gaussian_blur_f32(&image.to_rgba8(), sigma), has_alpha)
}

/// Unsharp mask on luminance.
///
/// The detail signal is `luma - blurred_luma`; `flat` scales it where the
/// signal is within the flat threshold and `jagged` scales it elsewhere.
/// The same offset is added to all three channels so hue is preserved.
pub fn sharpen(image: &DynamicImage, sigma: f32, flat: f32, jagged: f32) -> DynamicImage {
    if sigma <= 0.0 {
        return image.clone();
    }

    let has_alpha = image.color().has_alpha();
    let source = image.to_rgba8();
    let blurred = gaussian_blur_f32(&source, sigma);
    let mut output = source.clone();

    for (out, soft) in output.pixels_mut().zip(blurred.pixels()) {
        let Rgba([r, g, b, a]) = *out;
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let Rgba([sr, sg, sb, _]) = *soft;

        let detail = luma(r, g, b) - luma(sr as f32, sg as f32, sb as f32);
        let amount = if detail.abs() <= SHARPEN_FLAT_THRESHOLD {
            flat
        } else {
            jagged
        };
        let offset = (detail * amount).clamp(-SHARPEN_MAX_DARKEN, SHARPEN_MAX_BRIGHTEN);

        *out = Rgba([to_u8(r + offset), to_u8(g + offset), to_u8(b + offset), a]);
    }

    finish(output, has_alpha)
}

/// Multiplicative brightness and saturation. Saturation scales each channel's
/// distance from the pixel's luma; brightness then scales the result.
pub fn modulate(image: &DynamicImage, brightness: f32, saturation: f32) -> DynamicImage {
    map_rgb(image, |[r, g, b]| {
        let y = luma(r, g, b);
        [
            (y + (r - y) * saturation) * brightness,
            (y + (g - y) * saturation) * brightness,
            (y + (b - y) * saturation) * brightness,
        ]
    })
}

/// Per-channel `a * v + b`.
pub fn linear(image: &DynamicImage, a: f32, b: f32) -> DynamicImage {
    map_rgb(image, |[r, g, bl]| [a * r + b, a * g + b, a * bl + b])
}

/// Stretches luminance so the 1st and 99th percentiles span the full range.
/// Images with a flat histogram are returned unchanged.
pub fn normalize(image: &DynamicImage) -> DynamicImage {
    let rgba = image.to_rgba8();
    let mut histogram = [0u64; 256];
    for Rgba([r, g, b, _]) in rgba.pixels() {
        histogram[to_u8(luma(*r as f32, *g as f32, *b as f32)) as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    let clip = (total as f64 * NORMALIZE_CLIP) as u64;
    let low = percentile_bin(histogram.iter().enumerate(), clip);
    let high = percentile_bin(histogram.iter().enumerate().rev(), clip);

    if high <= low {
        return image.clone();
    }

    let scale = 255.0 / (high - low) as f32;
    let offset = low as f32;
    map_rgb(image, |[r, g, b]| {
        [(r - offset) * scale, (g - offset) * scale, (b - offset) * scale]
    })
}

fn percentile_bin<'a>(bins: impl Iterator<Item = (usize, &'a u64)>, clip: u64) -> usize {
    let mut seen = 0;
    let mut last = 0;
    for (bin, count) in bins {
        if *count == 0 {
            continue;
        }
        last = bin;
        seen += count;
        if seen > clip {
            return bin;
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{gradient, gradient_rgba};
    use image::{GenericImageView, Rgb, RgbImage};

    fn solid(value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([value, value, value])))
    }

    #[test]
    fn test_blur_zero_sigma_is_identity() {
        let image = gradient(16, 16);
        assert_eq!(blur(&image, 0.0).to_rgb8(), image.to_rgb8());
    }

    #[test]
    fn test_blur_keeps_dimensions_and_alpha() {
        let image = gradient_rgba(20, 10);
        let blurred = blur(&image, 1.5);
        assert_eq!(blurred.dimensions(), (20, 10));
        assert!(blurred.color().has_alpha());
        assert_eq!(blurred.to_rgba8().get_pixel(3, 3)[3], 200);
    }

    #[test]
    fn test_sharpen_flat_image_stays_flat() {
        let sharpened = sharpen(&solid(120), 1.0, 1.0, 2.0).to_rgb8();
        // blur rounding can shift a constant image by one level at most
        assert!(sharpened.pixels().all(|p| p[0].abs_diff(120) <= 1));
    }

    #[test]
    fn test_sharpen_increases_edge_contrast() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(16, 1, |x, _| {
            if x < 8 {
                Rgb([60, 60, 60])
            } else {
                Rgb([180, 180, 180])
            }
        }));
        let sharpened = sharpen(&image, 1.0, 1.0, 2.0).to_rgb8();
        assert!(sharpened.get_pixel(7, 0)[0] < 60);
        assert!(sharpened.get_pixel(8, 0)[0] > 180);
    }

    #[test]
    fn test_modulate_brightness() {
        let brighter = modulate(&solid(100), 1.1, 1.0).to_rgb8();
        assert_eq!(brighter.get_pixel(0, 0)[0], 110);
    }

    #[test]
    fn test_modulate_zero_saturation_is_gray() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([200, 50, 50])));
        let pixel = *modulate(&image, 1.0, 0.0).to_rgb8().get_pixel(0, 0);
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
    }

    #[test]
    fn test_linear_scales_and_clamps() {
        let out = linear(&solid(100), 1.05, 0.0).to_rgb8();
        assert_eq!(out.get_pixel(0, 0)[0], 105);

        let out = linear(&solid(250), 1.05, 0.0).to_rgb8();
        assert_eq!(out.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_normalize_stretches_range() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(100, 1, |x, _| {
            let v = 100 + (x as u8 % 50);
            Rgb([v, v, v])
        }));
        let normalized = normalize(&image).to_rgb8();
        let min = normalized.pixels().map(|p| p[0]).min().unwrap();
        let max = normalized.pixels().map(|p| p[0]).max().unwrap();
        assert!(min <= 5);
        assert!(max >= 250);
    }

    #[test]
    fn test_normalize_flat_image_unchanged() {
        let image = solid(42);
        assert_eq!(normalize(&image).to_rgb8(), image.to_rgb8());
    }
}
