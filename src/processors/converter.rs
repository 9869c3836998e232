// jpg2png/src/processors/converter.rs
use super::compressor::Compressor;
use super::loader::{validate_jpeg, Loader};
use crate::core::{CodecError, OutputFormat, OutputParams, SizeChange};

/// Final step of the pipeline: source validation and the encode into the
/// response format.
#[derive(Debug, Clone, Default)]
pub struct FormatConverter {
    loader: Loader,
}

impl FormatConverter {
    pub fn new(loader: Loader) -> Self {
        Self { loader }
    }

    pub fn validate(&self, buffer: &[u8]) -> bool {
        validate_jpeg(buffer)
    }

    pub fn convert(&self, buffer: &[u8], params: &OutputParams) -> Result<Vec<u8>, CodecError> {
        let (image, source) = self.loader.decode(buffer)?;
        let target = params.format.format();
        log::debug!("Converting {} to {}", source, target);

        let compressor = match params.format {
            OutputFormat::Png => Compressor::new(params.quality)
                .with_compression_level(params.compression_level)
                .with_adaptive_filtering(params.adaptive_filtering)
                .with_progressive(params.progressive),
            OutputFormat::Jpeg => {
                Compressor::new(params.quality).with_progressive(params.progressive)
            }
            OutputFormat::WebP => Compressor::new(params.quality),
        };

        compressor.compress_to_bytes(&image, target)
    }

    pub fn size_stats(&self, original_size: u64, final_size: u64) -> SizeChange {
        SizeChange::between(original_size, final_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{gradient_rgba, encode, jpeg_bytes};
    use image::{GenericImageView, ImageFormat};

    #[test]
    fn test_jpeg_to_png_defaults() {
        let output = FormatConverter::default()
            .convert(&jpeg_bytes(64, 40), &OutputParams::default())
            .unwrap();
        assert_eq!(&output[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        assert_eq!(image::load_from_memory(&output).unwrap().dimensions(), (64, 40));
    }

    #[test]
    fn test_png_with_alpha_to_png_keeps_alpha() {
        let input = encode(&gradient_rgba(10, 10), ImageFormat::Png);
        let output = FormatConverter::default()
            .convert(&input, &OutputParams::default())
            .unwrap();
        assert!(image::load_from_memory(&output).unwrap().color().has_alpha());
    }

    #[test]
    fn test_other_targets() {
        let converter = FormatConverter::default();
        let input = jpeg_bytes(20, 20);

        let webp = OutputParams {
            format: OutputFormat::WebP,
            ..OutputParams::default()
        };
        assert_eq!(&converter.convert(&input, &webp).unwrap()[8..12], b"WEBP");

        let jpeg = OutputParams {
            format: OutputFormat::Jpeg,
            ..OutputParams::default()
        };
        assert!(converter.validate(&converter.convert(&input, &jpeg).unwrap()));
    }

    #[test]
    fn test_size_stats() {
        let stats = FormatConverter::default().size_stats(1000, 800);
        assert_eq!(stats.size_change_bytes, -200);
        assert_eq!(stats.size_change_percent, "-20.0");
        assert_eq!(stats.compression_ratio, "20.0");
    }
}
