// jpg2png/src/processors/mod.rs
mod batch;
mod compressor;
mod converter;
mod enhancer;
pub mod filters;
mod loader;
mod noise;
mod optimizer;
mod resizer;

pub use batch::BatchProcessor;
pub use compressor::Compressor;
pub use converter::FormatConverter;
pub use enhancer::QualityEnhancer;
pub use loader::{validate_jpeg, Loader};
pub use noise::NoiseReducer;
pub use optimizer::{SizeOptimizer, DEFAULT_MAX_DIMENSION};
pub use resizer::{bounded_dimensions, ResizeAlgorithm, ResizeFit, Resizer};

pub mod prelude {
    pub use super::{
        BatchProcessor, Compressor, FormatConverter, Loader, NoiseReducer, QualityEnhancer,
        SizeOptimizer,
    };
}
