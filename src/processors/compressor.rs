// jpg2png/src/processors/compressor.rs
use crate::core::{CodecError, Format};
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{DynamicImage, GenericImageView};
use mozjpeg::{ColorSpace, Compress, ScanMode};
use oxipng::{optimize_from_memory, Interlacing, Options, RowFilter};
use std::io::Cursor;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// PNG levels from here up get an extra lossless oxipng pass.
const OXIPNG_MIN_LEVEL: u8 = 7;
/// libwebp's default method.
const DEFAULT_WEBP_EFFORT: i32 = 4;

/// Format-aware encoder. JPEG goes through mozjpeg with optimized Huffman
/// coding, PNG through the `image` encoder plus oxipng, WebP through libwebp.
#[derive(Debug, Clone)]
pub struct Compressor {
    quality: u8,
    compression_level: u8,
    adaptive_filtering: bool,
    progressive: bool,
    webp_effort: i32,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            compression_level: 6,
            adaptive_filtering: true,
            progressive: false,
            webp_effort: DEFAULT_WEBP_EFFORT,
        }
    }

    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn with_adaptive_filtering(mut self, adaptive: bool) -> Self {
        self.adaptive_filtering = adaptive;
        self
    }

    /// Progressive scans for JPEG, Adam7 interlacing for PNG.
    pub fn with_progressive(mut self, progressive: bool) -> Self {
        self.progressive = progressive;
        self
    }

    pub fn with_webp_effort(mut self, effort: i32) -> Self {
        self.webp_effort = effort.clamp(0, 6);
        self
    }

    pub fn compress_to_bytes(
        &self,
        image: &DynamicImage,
        format: Format,
    ) -> Result<Vec<u8>, CodecError> {
        log::debug!(
            "Encoding {}x{} image as {} (quality {}, level {}, progressive {})",
            image.width(),
            image.height(),
            format,
            self.quality,
            self.compression_level,
            self.progressive
        );

        let encoded = match format {
            Format::Jpeg => self.encode_jpeg(image)?,
            Format::Png => self.encode_png(image)?,
            Format::WebP => self.encode_webp(image)?,
            Format::Other(name) => self.encode_generic(image, name)?,
        };

        log::debug!("Encoded {} bytes of {}", encoded.len(), format);
        Ok(encoded)
    }

    fn encode_jpeg(&self, image: &DynamicImage) -> Result<Vec<u8>, CodecError> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let quality = self.quality as f32;
        let progressive = self.progressive;

        // mozjpeg reports libjpeg errors by unwinding
        let result = catch_unwind(AssertUnwindSafe(|| -> std::io::Result<Vec<u8>> {
            let mut comp = Compress::new(ColorSpace::JCS_RGB);
            // resets defaults, so it must precede quality and scan settings
            comp.set_scan_optimization_mode(ScanMode::AllComponentsTogether);
            if progressive {
                comp.set_progressive_mode();
                comp.set_optimize_scans(true);
            } else {
                // drops the scan script only; trellis quantization stays on
                comp.set_optimize_scans(false);
            }
            comp.set_size(width as usize, height as usize);
            comp.set_color_space(ColorSpace::JCS_YCbCr);
            comp.set_quality(quality);
            comp.set_optimize_coding(true);

            let mut output = Vec::with_capacity((width as usize * height as usize / 4).max(4096));
            {
                let mut writer = comp.start_compress(&mut output)?;
                for row in rgb.as_raw().chunks(width as usize * 3) {
                    writer.write_scanlines(row)?;
                }
                writer.finish()?;
            }
            Ok(output)
        }));

        match result {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) => Err(CodecError::Encoder {
                format: Format::Jpeg,
                message: format!("mozjpeg: {e}"),
            }),
            Err(_) => Err(CodecError::Encoder {
                format: Format::Jpeg,
                message: "mozjpeg aborted while compressing".to_string(),
            }),
        }
    }

    fn encode_png(&self, image: &DynamicImage) -> Result<Vec<u8>, CodecError> {
        let compression = match self.compression_level {
            0..=3 => CompressionType::Fast,
            4..=6 => CompressionType::Default,
            _ => CompressionType::Best,
        };
        let filter = if self.adaptive_filtering {
            PngFilterType::Adaptive
        } else {
            PngFilterType::NoFilter
        };

        let mut buffer = Vec::new();
        image.write_with_encoder(PngEncoder::new_with_quality(&mut buffer, compression, filter))?;

        if self.progressive || self.compression_level >= OXIPNG_MIN_LEVEL {
            return self.optimize_png_bytes(&buffer);
        }

        Ok(buffer)
    }

    fn optimize_png_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let preset = self.compression_level.saturating_sub(5).min(4);
        let mut options = Options::from_preset(preset);
        options.interlace = Some(if self.progressive {
            Interlacing::Adam7
        } else {
            Interlacing::None
        });
        if !self.adaptive_filtering {
            options.filter.clear();
            options.filter.insert(RowFilter::None);
        }

        optimize_from_memory(data, &options).map_err(|e| CodecError::Encoder {
            format: Format::Png,
            message: format!("PNG optimization failed: {e}"),
        })
    }

    fn encode_webp(&self, image: &DynamicImage) -> Result<Vec<u8>, CodecError> {
        let (width, height) = image.dimensions();
        let has_alpha = image.color().has_alpha();
        let pixels = if has_alpha {
            image.to_rgba8().into_raw()
        } else {
            image.to_rgb8().into_raw()
        };

        let encoder = if has_alpha {
            webp::Encoder::from_rgba(&pixels, width, height)
        } else {
            webp::Encoder::from_rgb(&pixels, width, height)
        };

        let mut config = webp::WebPConfig::new().map_err(|_| CodecError::Encoder {
            format: Format::WebP,
            message: "failed to create WebPConfig".to_string(),
        })?;
        config.quality = self.quality as f32;
        config.method = self.webp_effort;

        let memory = encoder
            .encode_advanced(&config)
            .map_err(|e| CodecError::Encoder {
                format: Format::WebP,
                message: format!("WebP encode failed: {e:?}"),
            })?;

        Ok(memory.to_vec())
    }

    fn encode_generic(&self, image: &DynamicImage, name: &'static str) -> Result<Vec<u8>, CodecError> {
        let format = image::ImageFormat::from_extension(name).ok_or(CodecError::UnknownFormat)?;
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, format)?;
        Ok(buffer.into_inner())
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(80)
    }
}
