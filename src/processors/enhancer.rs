// jpg2png/src/processors/enhancer.rs
use super::compressor::Compressor;
use super::filters;
use super::loader::Loader;
use crate::core::{CodecError, QualityEnhancementParams};

/// Enhancement stage. Fixed order: sharpen, optional histogram normalize,
/// brightness with a small saturation boost, optional linear contrast.
#[derive(Debug, Clone, Default)]
pub struct QualityEnhancer {
    loader: Loader,
    compressor: Compressor,
}

impl QualityEnhancer {
    pub fn new(loader: Loader) -> Self {
        Self {
            loader,
            compressor: Compressor::default(),
        }
    }

    pub fn enhance(
        &self,
        buffer: &[u8],
        params: &QualityEnhancementParams,
    ) -> Result<Vec<u8>, CodecError> {
        let (image, format) = self.loader.decode(buffer)?;

        let mut image = filters::sharpen(
            &image,
            params.sharpen_sigma,
            params.sharpen_flat,
            params.sharpen_jagged,
        );

        if params.normalize_enabled {
            image = filters::normalize(&image);
        }

        image = filters::modulate(
            &image,
            params.brightness_multiplier,
            QualityEnhancementParams::SATURATION_BOOST,
        );

        if params.enhance_enabled {
            image = filters::linear(&image, params.contrast_multiplier, 0.0);
        }

        self.compressor.compress_to_bytes(&image, format)
    }
}
