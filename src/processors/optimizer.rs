// jpg2png/src/processors/optimizer.rs
use super::compressor::Compressor;
use super::loader::Loader;
use super::resizer::{ResizeFit, Resizer};
use crate::core::{CodecError, Format, SizeOptimizationParams};

/// Longest edge used by `resize_to_fit` when no bound is given.
pub const DEFAULT_MAX_DIMENSION: u32 = 1920;
/// libwebp method used when optimizing for size.
const WEBP_EFFORT: i32 = 6;

/// Size stage: optional bounded downscale, then a format-specific re-encode.
#[derive(Debug, Clone, Default)]
pub struct SizeOptimizer {
    loader: Loader,
    resizer: Resizer,
}

impl SizeOptimizer {
    pub fn new(loader: Loader, resizer: Resizer) -> Self {
        Self { loader, resizer }
    }

    pub fn optimize(
        &self,
        buffer: &[u8],
        params: &SizeOptimizationParams,
    ) -> Result<Vec<u8>, CodecError> {
        let format = self.loader.detect_format(buffer)?;

        let compressor = match format {
            Format::Jpeg => Compressor::new(params.quality).with_progressive(params.progressive),
            Format::Png => Compressor::new(params.quality)
                .with_compression_level(params.compression_level)
                .with_adaptive_filtering(params.adaptive_filtering)
                .with_progressive(params.progressive),
            Format::WebP => Compressor::new(params.quality).with_webp_effort(WEBP_EFFORT),
            Format::Other(name) => {
                log::debug!("No encoder settings for {name}, resizing only");
                Compressor::default()
            }
        };

        let (image, _) = self.loader.decode(buffer)?;
        let fit = ResizeFit::from_aspect_flag(params.preserve_aspect_ratio);
        let image = if params.wants_resize() {
            self.resizer
                .shrink_to_fit(&image, params.max_width, params.max_height, fit)
                .unwrap_or(image)
        } else {
            image
        };

        compressor.compress_to_bytes(&image, format)
    }

    /// Fits the image inside a `max_dimension` square without enlarging it,
    /// re-encoding in the source format with default settings.
    pub fn resize_to_fit(&self, buffer: &[u8], max_dimension: u32) -> Result<Vec<u8>, CodecError> {
        let (image, format) = self.loader.decode(buffer)?;
        let bound = Some(max_dimension.max(1));

        match self.resizer.shrink_to_fit(&image, bound, bound, ResizeFit::Inside) {
            Some(resized) => Compressor::default().compress_to_bytes(&resized, format),
            None => Compressor::default().compress_to_bytes(&image, format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{encode, gradient, jpeg_bytes, png_bytes};
    use image::{GenericImageView, ImageFormat};

    fn dimensions(bytes: &[u8]) -> (u32, u32) {
        image::load_from_memory(bytes).unwrap().dimensions()
    }

    #[test]
    fn test_downscale_preserves_aspect() {
        let params = SizeOptimizationParams {
            max_width: Some(50),
            ..SizeOptimizationParams::default()
        };
        let output = SizeOptimizer::default().optimize(&jpeg_bytes(200, 100), &params).unwrap();
        assert_eq!(dimensions(&output), (50, 25));
        assert_eq!(&output[0..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_no_upscale_and_idempotent_dimensions() {
        let optimizer = SizeOptimizer::default();
        let params = SizeOptimizationParams {
            max_width: Some(500),
            ..SizeOptimizationParams::default()
        };

        let once = optimizer.optimize(&jpeg_bytes(120, 90), &params).unwrap();
        let twice = optimizer.optimize(&once, &params).unwrap();
        assert_eq!(dimensions(&once), (120, 90));
        assert_eq!(dimensions(&twice), (120, 90));
    }

    #[test]
    fn test_fill_when_aspect_not_preserved() {
        let params = SizeOptimizationParams {
            max_width: Some(40),
            max_height: Some(40),
            preserve_aspect_ratio: false,
            ..SizeOptimizationParams::default()
        };
        let output = SizeOptimizer::default().optimize(&png_bytes(80, 60), &params).unwrap();
        assert_eq!(dimensions(&output), (40, 40));
        assert_eq!(&output[1..4], b"PNG");
    }

    #[test]
    fn test_fill_with_width_only_follows_aspect() {
        let params = SizeOptimizationParams {
            max_width: Some(50),
            preserve_aspect_ratio: false,
            ..SizeOptimizationParams::default()
        };
        let output = SizeOptimizer::default().optimize(&jpeg_bytes(200, 100), &params).unwrap();
        assert_eq!(dimensions(&output), (50, 25));
    }

    #[test]
    fn test_webp_stays_webp() {
        let input = encode(&gradient(32, 32), ImageFormat::WebP);
        let output = SizeOptimizer::default()
            .optimize(&input, &SizeOptimizationParams::default())
            .unwrap();
        assert_eq!(&output[8..12], b"WEBP");
    }

    #[test]
    fn test_other_formats_resized_in_place() {
        let input = encode(&gradient(16, 8), ImageFormat::Bmp);
        let params = SizeOptimizationParams {
            max_width: Some(4),
            ..SizeOptimizationParams::default()
        };
        let output = SizeOptimizer::default().optimize(&input, &params).unwrap();
        assert_eq!(&output[0..2], b"BM");
        assert_eq!(dimensions(&output), (4, 2));
    }

    #[test]
    fn test_resize_to_fit() {
        let optimizer = SizeOptimizer::default();
        let output = optimizer.resize_to_fit(&png_bytes(300, 150), 100).unwrap();
        assert_eq!(dimensions(&output), (100, 50));

        let output = optimizer
            .resize_to_fit(&png_bytes(30, 15), DEFAULT_MAX_DIMENSION)
            .unwrap();
        assert_eq!(dimensions(&output), (30, 15));
    }
}
