// jpg2png/src/core/mod.rs
mod options;
mod params;
mod processor;

pub use options::{OptionInfo, ProcessingOption, ProcessingOptions};
pub use params::{
    ConversionParams, NoiseReductionParams, OutputParams, Preset, QualityEnhancementParams,
    SizeOptimizationParams,
};
pub use processor::ImageProcessor;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Container format of an encoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Jpeg,
    Png,
    WebP,
    /// Decodable but not a pipeline target (gif, bmp, tiff, ...).
    Other(&'static str),
}

impl Format {
    pub fn from_image_format(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Jpeg => Format::Jpeg,
            image::ImageFormat::Png => Format::Png,
            image::ImageFormat::WebP => Format::WebP,
            other => Format::Other(other.extensions_str().first().copied().unwrap_or("unknown")),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Jpeg => "jpeg",
            Format::Png => "png",
            Format::WebP => "webp",
            Format::Other(name) => name,
        }
    }

    /// File extension used when writing this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Jpeg => "jpg",
            other => other.name(),
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Format::Jpeg => "image/jpeg",
            Format::Png => "image/png",
            Format::WebP => "image/webp",
            Format::Other(_) => "application/octet-stream",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Format {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Target of the final encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    WebP,
}

impl OutputFormat {
    pub fn format(self) -> Format {
        match self {
            OutputFormat::Png => Format::Png,
            OutputFormat::Jpeg => Format::Jpeg,
            OutputFormat::WebP => Format::WebP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub format: Format,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub has_alpha: bool,
}

/// Size delta between the uploaded and the produced buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeChange {
    pub size_change_bytes: i64,
    pub size_change_percent: String,
    pub compression_ratio: String,
}

impl SizeChange {
    pub fn between(original_size: u64, final_size: u64) -> Self {
        let delta = final_size as i64 - original_size as i64;

        let size_change_percent = if original_size == 0 {
            "0.0".to_string()
        } else {
            format!("{:.1}", delta as f64 / original_size as f64 * 100.0)
        };

        let compression_ratio = if original_size > final_size {
            let shrink = (original_size - final_size) as f64 / original_size as f64 * 100.0;
            format!("{:.1}", shrink)
        } else {
            "0".to_string()
        };

        Self {
            size_change_bytes: delta,
            size_change_percent,
            compression_ratio,
        }
    }
}

/// Outcome of one pipeline run. Built once at the end of `ImageProcessor::process`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    #[serde(skip)]
    pub buffer: Vec<u8>,
    pub original_metadata: ImageMetadata,
    pub final_metadata: ImageMetadata,
    pub original_size: u64,
    pub final_size: u64,
    pub applied_options: Vec<ProcessingOption>,
    #[serde(flatten)]
    pub size_change: SizeChange,
}

/// Aggregate over a batch run.
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub processed_count: usize,
    pub total_size_before: u64,
    pub total_size_after: u64,
    pub errors: Vec<(String, String)>,
}

impl ProcessingStats {
    pub fn overall_change(&self) -> SizeChange {
        SizeChange::between(self.total_size_before, self.total_size_after)
    }
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unrecognized image data")]
    UnknownFormat,

    #[error("Image dimensions {width}x{height} exceed maximum {max_width}x{max_height}")]
    DimensionsExceeded {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("{format} encoder failed: {message}")]
    Encoder { format: Format, message: String },
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Input is not a valid JPEG image")]
    InvalidFormat,

    #[error("Stage '{stage}' failed: {source}")]
    StageFailure {
        stage: ProcessingOption,
        #[source]
        source: CodecError,
    },

    #[error("Encoding to {format} failed: {source}")]
    EncodeFailure {
        format: Format,
        #[source]
        source: CodecError,
    },

    #[error("Failed to read image metadata: {0}")]
    Metadata(#[source] CodecError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_change_shrink() {
        let change = SizeChange::between(1000, 800);
        assert_eq!(change.size_change_bytes, -200);
        assert_eq!(change.size_change_percent, "-20.0");
        assert_eq!(change.compression_ratio, "20.0");
    }

    #[test]
    fn test_size_change_growth_has_no_compression() {
        let change = SizeChange::between(1000, 1500);
        assert_eq!(change.size_change_bytes, 500);
        assert_eq!(change.size_change_percent, "50.0");
        assert_eq!(change.compression_ratio, "0");
    }

    #[test]
    fn test_size_change_empty_original() {
        let change = SizeChange::between(0, 10);
        assert_eq!(change.size_change_percent, "0.0");
        assert_eq!(change.compression_ratio, "0");
    }

    #[test]
    fn test_format_names() {
        assert_eq!(Format::from_image_format(image::ImageFormat::Jpeg), Format::Jpeg);
        assert_eq!(Format::from_image_format(image::ImageFormat::Gif).name(), "gif");
        assert_eq!(Format::Png.to_string(), "png");
        assert_eq!(Format::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::default().format(), Format::Png);
    }
}
