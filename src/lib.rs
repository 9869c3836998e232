pub mod cli;
mod core;
mod processors;
pub mod response;
mod utils;

#[cfg(test)]
mod test_support;

pub use crate::core::{
    CodecError, ConversionParams, ConversionResult, ConvertError, Format, ImageMetadata,
    ImageProcessor, NoiseReductionParams, OptionInfo, OutputFormat, OutputParams, Preset,
    ProcessingOption, ProcessingOptions, ProcessingStats, QualityEnhancementParams, Result,
    SizeChange, SizeOptimizationParams,
};
pub use crate::processors::{
    bounded_dimensions, filters, validate_jpeg, BatchProcessor, Compressor, FormatConverter,
    Loader, NoiseReducer, QualityEnhancer, ResizeAlgorithm, ResizeFit, Resizer, SizeOptimizer,
    DEFAULT_MAX_DIMENSION,
};
pub use crate::utils::{calculate_aspect_ratio, format_file_size, generate_output_path, is_jpeg_path};

pub mod prelude {
    pub use crate::processors::prelude::*;
    pub use crate::{
        ConversionParams, ConversionResult, ConvertError, ImageProcessor, Preset,
        ProcessingOption, ProcessingOptions,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
