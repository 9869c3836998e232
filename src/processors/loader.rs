// jpg2png/src/processors/loader.rs
use crate::core::{CodecError, Format, ImageMetadata};
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::io::Cursor;

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const MIN_JPEG_LEN: usize = 10;

/// True iff `data` carries the JPEG signature and is long enough to hold more
/// than a bare marker.
pub fn validate_jpeg(data: &[u8]) -> bool {
    data.len() >= MIN_JPEG_LEN && data[..3] == JPEG_MAGIC
}

#[derive(Debug, Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((100_000, 100_000)),
        }
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    /// Decodes `data`, returning the pixels and the container format they came from.
    /// Header dimensions are checked before any pixel buffer is allocated.
    pub fn decode(&self, data: &[u8]) -> Result<(DynamicImage, Format), CodecError> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        let format = reader
            .format()
            .map(Format::from_image_format)
            .ok_or(CodecError::UnknownFormat)?;

        let decoder = reader.into_decoder()?;
        let (width, height) = decoder.dimensions();
        self.check_dimensions(width, height)?;

        let image = DynamicImage::from_decoder(decoder)?;

        log::debug!(
            "Decoded {} image: {}x{} pixels, color: {:?}",
            format,
            width,
            height,
            image.color()
        );

        Ok((image, format))
    }

    /// Reads format, dimensions and color layout from the header without
    /// decoding pixel data.
    pub fn read_metadata(&self, data: &[u8]) -> Result<ImageMetadata, CodecError> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        let format = reader
            .format()
            .map(Format::from_image_format)
            .ok_or(CodecError::UnknownFormat)?;

        let decoder = reader.into_decoder()?;
        let (width, height) = decoder.dimensions();
        let color = decoder.color_type();

        Ok(ImageMetadata {
            format,
            width,
            height,
            channels: color.channel_count(),
            has_alpha: color.has_alpha(),
        })
    }

    pub fn detect_format(&self, data: &[u8]) -> Result<Format, CodecError> {
        image::guess_format(data)
            .map(Format::from_image_format)
            .map_err(|_| CodecError::UnknownFormat)
    }

    fn check_dimensions(&self, width: u32, height: u32) -> Result<(), CodecError> {
        if let Some((max_width, max_height)) = self.max_dimensions {
            if width > max_width || height > max_height {
                return Err(CodecError::DimensionsExceeded {
                    width,
                    height,
                    max_width,
                    max_height,
                });
            }
        }
        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
