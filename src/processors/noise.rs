// jpg2png/src/processors/noise.rs
use super::compressor::Compressor;
use super::filters;
use super::loader::Loader;
use crate::core::{CodecError, NoiseReductionParams};

/// Denoise stage: blur, then a compensating sharpen, then a brightness and
/// saturation correction for the dullness the blur leaves behind.
#[derive(Debug, Clone, Default)]
pub struct NoiseReducer {
    loader: Loader,
    compressor: Compressor,
}

impl NoiseReducer {
    pub fn new(loader: Loader) -> Self {
        Self {
            loader,
            compressor: Compressor::default(),
        }
    }

    /// Returns a new buffer in the same container format as `buffer`.
    pub fn reduce(&self, buffer: &[u8], params: &NoiseReductionParams) -> Result<Vec<u8>, CodecError> {
        let (image, format) = self.loader.decode(buffer)?;

        let image = filters::blur(&image, params.blur_sigma);
        let image = filters::sharpen(
            &image,
            params.sharpen_sigma,
            params.sharpen_flat,
            params.sharpen_jagged,
        );
        let image = filters::modulate(&image, params.brightness_adjust, params.saturation_adjust);

        self.compressor.compress_to_bytes(&image, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Preset;
    use crate::test_support::{jpeg_bytes, png_bytes};
    use image::GenericImageView;

    #[test]
    fn test_reduce_keeps_format_and_size() {
        let reducer = NoiseReducer::default();
        let output = reducer
            .reduce(&jpeg_bytes(48, 32), &NoiseReductionParams::default())
            .unwrap();

        assert_eq!(&output[0..3], &[0xFF, 0xD8, 0xFF]);
        assert_eq!(image::load_from_memory(&output).unwrap().dimensions(), (48, 32));
    }

    #[test]
    fn test_empty_params_match_explicit_defaults() {
        let reducer = NoiseReducer::default();
        let input = png_bytes(24, 24);

        let implicit: NoiseReductionParams = serde_json::from_str("{}").unwrap();
        let explicit = NoiseReductionParams {
            blur_sigma: 0.3,
            sharpen_sigma: 0.5,
            sharpen_flat: 1.0,
            sharpen_jagged: 1.0,
            brightness_adjust: 1.02,
            saturation_adjust: 0.98,
        };

        assert_eq!(
            reducer.reduce(&input, &implicit).unwrap(),
            reducer.reduce(&input, &explicit).unwrap()
        );
    }

    #[test]
    fn test_disabled_filters_with_neutral_modulate_is_lossless_on_png() {
        let reducer = NoiseReducer::default();
        let input = png_bytes(16, 16);
        let params = NoiseReductionParams {
            blur_sigma: 0.0,
            sharpen_sigma: 0.0,
            brightness_adjust: 1.0,
            saturation_adjust: 1.0,
            ..NoiseReductionParams::default()
        };

        let output = reducer.reduce(&input, &params).unwrap();
        assert_eq!(
            image::load_from_memory(&output).unwrap().to_rgb8(),
            image::load_from_memory(&input).unwrap().to_rgb8()
        );
    }

    #[test]
    fn test_presets_run() {
        let reducer = NoiseReducer::default();
        let input = jpeg_bytes(20, 20);
        for preset in [Preset::Photo, Preset::Aggressive, Preset::Conservative] {
            let params = NoiseReductionParams::preset(preset).unwrap();
            assert!(reducer.reduce(&input, &params).is_ok());
        }
    }

    #[test]
    fn test_rejects_undecodable_input() {
        let reducer = NoiseReducer::default();
        assert!(reducer
            .reduce(&[0xFF, 0xD8, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0], &NoiseReductionParams::default())
            .is_err());
    }
}
