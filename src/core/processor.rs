// jpg2png/src/core/processor.rs
use super::{
    CodecError, ConversionParams, ConversionResult, ConvertError, ImageMetadata,
    ProcessingOption, ProcessingOptions, Result, SizeChange,
};
use crate::processors::{FormatConverter, Loader, NoiseReducer, QualityEnhancer, Resizer, SizeOptimizer};
use crate::utils::format_file_size;
use std::borrow::Cow;
use std::path::Path;

/// Runs the conversion pipeline. Holds no per-request state, so one instance
/// can serve any number of concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ImageProcessor {
    loader: Loader,
    noise_reducer: NoiseReducer,
    quality_enhancer: QualityEnhancer,
    size_optimizer: SizeOptimizer,
    converter: FormatConverter,
}

impl ImageProcessor {
    pub fn new() -> Self {
        Self::with_loader(Loader::new())
    }

    pub fn with_loader(loader: Loader) -> Self {
        Self {
            noise_reducer: NoiseReducer::new(loader.clone()),
            quality_enhancer: QualityEnhancer::new(loader.clone()),
            size_optimizer: SizeOptimizer::new(loader.clone(), Resizer::default()),
            converter: FormatConverter::new(loader.clone()),
            loader,
        }
    }

    /// Validates `buffer` as JPEG, applies the requested stages in canonical
    /// order and encodes the result into `params.output.format`.
    ///
    /// The input is never modified. Any stage failure aborts the whole run.
    pub fn process(
        &self,
        buffer: &[u8],
        options: &ProcessingOptions,
        params: &ConversionParams,
    ) -> Result<ConversionResult> {
        params.validate()?;

        if !self.converter.validate(buffer) {
            return Err(ConvertError::InvalidFormat);
        }

        let original_metadata = self.get_metadata(buffer)?;
        let original_size = buffer.len() as u64;

        log::info!(
            "Processing JPEG: {}x{}, {}",
            original_metadata.width,
            original_metadata.height,
            format_file_size(original_size)
        );

        let mut current = Cow::Borrowed(buffer);
        for stage in options.iter() {
            log::debug!("Applying stage {}", stage);
            let next = self
                .run_stage(stage, &current, params)
                .map_err(|source| ConvertError::StageFailure { stage, source })?;
            current = Cow::Owned(next);
        }

        let target = params.output.format.format();
        let output = self
            .converter
            .convert(&current, &params.output)
            .map_err(|source| ConvertError::EncodeFailure {
                format: target,
                source,
            })?;

        let final_metadata = self.get_metadata(&output)?;
        let final_size = output.len() as u64;

        log::info!(
            "Generated {}: {}x{}, {}",
            final_metadata.format,
            final_metadata.width,
            final_metadata.height,
            format_file_size(final_size)
        );

        Ok(ConversionResult {
            buffer: output,
            original_metadata,
            final_metadata,
            original_size,
            final_size,
            applied_options: options.to_vec(),
            size_change: SizeChange::between(original_size, final_size),
        })
    }

    /// Reads `input_path`, runs `process` and writes the encoded result to
    /// `output_path`, creating parent directories as needed.
    pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        options: &ProcessingOptions,
        params: &ConversionParams,
    ) -> Result<ConversionResult> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        self.validate_paths(input_path, output_path)?;

        let buffer = std::fs::read(input_path)?;
        let result = self.process(&buffer, options, params)?;
        std::fs::write(output_path, &result.buffer)?;

        log::info!("Saved image: {} ({} bytes)", output_path.display(), result.final_size);
        Ok(result)
    }

    pub fn get_metadata(&self, buffer: &[u8]) -> Result<ImageMetadata> {
        self.loader.read_metadata(buffer).map_err(ConvertError::Metadata)
    }

    fn run_stage(
        &self,
        stage: ProcessingOption,
        buffer: &[u8],
        params: &ConversionParams,
    ) -> std::result::Result<Vec<u8>, CodecError> {
        match stage {
            ProcessingOption::ReduceNoise => {
                self.noise_reducer.reduce(buffer, &params.noise_reduction)
            }
            ProcessingOption::ImproveQuality => {
                self.quality_enhancer.enhance(buffer, &params.quality_enhancement)
            }
            ProcessingOption::OptimizeSize => {
                self.size_optimizer.optimize(buffer, &params.size_optimization)
            }
        }
    }

    fn validate_paths(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        if !input_path.is_file() {
            return Err(ConvertError::InvalidParameter(format!(
                "Input file does not exist: {}",
                input_path.display()
            )));
        }

        if input_path == output_path {
            return Err(ConvertError::InvalidParameter(
                "Input and output paths cannot be the same".to_string(),
            ));
        }

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(())
    }
}
