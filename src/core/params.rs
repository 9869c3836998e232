// jpg2png/src/core/params.rs
//
// Request-scoped stage parameters. Every field has a default, so `{}` (or
// `Default::default()`) is always a valid configuration.

use super::{ConvertError, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named parameter bundle. Not every stage defines every preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Default,
    Photo,
    Graphics,
    Aggressive,
    Conservative,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Photo => "photo",
            Preset::Graphics => "graphics",
            Preset::Aggressive => "aggressive",
            Preset::Conservative => "conservative",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(Preset::Default),
            "photo" => Ok(Preset::Photo),
            "graphics" => Ok(Preset::Graphics),
            "aggressive" => Ok(Preset::Aggressive),
            "conservative" => Ok(Preset::Conservative),
            other => Err(ConvertError::InvalidParameter(format!("Unknown preset: {other}"))),
        }
    }
}

fn lookup<T: Copy>(table: &[(Preset, T)], preset: Preset) -> Option<T> {
    table.iter().find(|(key, _)| *key == preset).map(|(_, params)| *params)
}

fn check_finite(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(ConvertError::InvalidParameter(format!("{name} must be a finite number")));
    }
    Ok(())
}

fn check_positive(name: &str, value: f32) -> Result<()> {
    check_finite(name, value)?;
    if value <= 0.0 {
        return Err(ConvertError::InvalidParameter(format!("{name} must be greater than 0")));
    }
    Ok(())
}

fn check_quality(quality: u8) -> Result<()> {
    if quality == 0 || quality > 100 {
        return Err(ConvertError::InvalidParameter(
            "Quality must be between 1 and 100".to_string(),
        ));
    }
    Ok(())
}

fn check_compression_level(level: u8) -> Result<()> {
    if level > 9 {
        return Err(ConvertError::InvalidParameter(
            "Compression level must be between 0 and 9".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoiseReductionParams {
    /// Gaussian blur sigma; `<= 0` skips the blur.
    pub blur_sigma: f32,
    /// Compensating sharpen sigma; `<= 0` skips the sharpen.
    pub sharpen_sigma: f32,
    pub sharpen_flat: f32,
    pub sharpen_jagged: f32,
    pub brightness_adjust: f32,
    pub saturation_adjust: f32,
}

impl NoiseReductionParams {
    pub const DEFAULT: Self = Self {
        blur_sigma: 0.3,
        sharpen_sigma: 0.5,
        sharpen_flat: 1.0,
        sharpen_jagged: 1.0,
        brightness_adjust: 1.02,
        saturation_adjust: 0.98,
    };

    const PRESETS: [(Preset, Self); 4] = [
        (Preset::Default, Self::DEFAULT),
        (
            Preset::Photo,
            Self {
                blur_sigma: 0.2,
                sharpen_sigma: 0.4,
                sharpen_flat: 1.2,
                sharpen_jagged: 0.8,
                brightness_adjust: 1.01,
                saturation_adjust: 0.99,
            },
        ),
        (
            Preset::Aggressive,
            Self {
                blur_sigma: 0.5,
                sharpen_sigma: 0.7,
                sharpen_flat: 0.8,
                sharpen_jagged: 1.2,
                brightness_adjust: 1.03,
                saturation_adjust: 0.96,
            },
        ),
        (
            Preset::Conservative,
            Self {
                blur_sigma: 0.1,
                sharpen_sigma: 0.3,
                sharpen_flat: 1.0,
                sharpen_jagged: 1.0,
                brightness_adjust: 1.005,
                saturation_adjust: 0.995,
            },
        ),
    ];

    pub fn preset(preset: Preset) -> Option<Self> {
        lookup(&Self::PRESETS, preset)
    }

    pub fn validate(&self) -> Result<()> {
        check_finite("blurSigma", self.blur_sigma)?;
        check_finite("sharpenSigma", self.sharpen_sigma)?;
        check_finite("sharpenFlat", self.sharpen_flat)?;
        check_finite("sharpenJagged", self.sharpen_jagged)?;
        check_positive("brightnessAdjust", self.brightness_adjust)?;
        check_positive("saturationAdjust", self.saturation_adjust)
    }
}

impl Default for NoiseReductionParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QualityEnhancementParams {
    pub sharpen_sigma: f32,
    pub sharpen_flat: f32,
    pub sharpen_jagged: f32,
    pub normalize_enabled: bool,
    /// Gates the linear contrast stretch.
    pub enhance_enabled: bool,
    pub contrast_multiplier: f32,
    pub brightness_multiplier: f32,
}

impl QualityEnhancementParams {
    /// Saturation boost applied alongside the brightness multiplier.
    pub const SATURATION_BOOST: f32 = 1.01;

    pub const DEFAULT: Self = Self {
        sharpen_sigma: 1.0,
        sharpen_flat: 1.0,
        sharpen_jagged: 2.0,
        normalize_enabled: true,
        enhance_enabled: true,
        contrast_multiplier: 1.05,
        brightness_multiplier: 1.02,
    };

    const PHOTO: Self = Self {
        sharpen_sigma: 1.2,
        sharpen_flat: 1.0,
        sharpen_jagged: 2.5,
        normalize_enabled: true,
        enhance_enabled: true,
        contrast_multiplier: 1.08,
        brightness_multiplier: 1.03,
    };

    const GRAPHICS: Self = Self {
        sharpen_sigma: 0.8,
        sharpen_flat: 0.5,
        sharpen_jagged: 1.5,
        normalize_enabled: false,
        enhance_enabled: true,
        contrast_multiplier: 1.03,
        brightness_multiplier: 1.01,
    };

    const PRESETS: [(Preset, Self); 5] = [
        (Preset::Default, Self::DEFAULT),
        (Preset::Photo, Self::PHOTO),
        (Preset::Graphics, Self::GRAPHICS),
        (Preset::Aggressive, Self::PHOTO),
        (Preset::Conservative, Self::GRAPHICS),
    ];

    pub fn preset(preset: Preset) -> Option<Self> {
        lookup(&Self::PRESETS, preset)
    }

    pub fn validate(&self) -> Result<()> {
        check_finite("sharpenSigma", self.sharpen_sigma)?;
        check_finite("sharpenFlat", self.sharpen_flat)?;
        check_finite("sharpenJagged", self.sharpen_jagged)?;
        check_positive("contrastMultiplier", self.contrast_multiplier)?;
        check_positive("brightnessMultiplier", self.brightness_multiplier)
    }
}

impl Default for QualityEnhancementParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SizeOptimizationParams {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// JPEG/WebP quality.
    pub quality: u8,
    /// zlib-style level, PNG only.
    pub compression_level: u8,
    pub progressive: bool,
    pub adaptive_filtering: bool,
    pub preserve_aspect_ratio: bool,
}

impl SizeOptimizationParams {
    pub const DEFAULT: Self = Self {
        max_width: None,
        max_height: None,
        quality: 80,
        compression_level: 9,
        progressive: true,
        adaptive_filtering: true,
        preserve_aspect_ratio: true,
    };

    const PRESETS: [(Preset, Self); 3] = [
        (Preset::Default, Self::DEFAULT),
        (
            Preset::Aggressive,
            Self {
                quality: 70,
                compression_level: 9,
                ..Self::DEFAULT
            },
        ),
        (
            Preset::Conservative,
            Self {
                quality: 85,
                compression_level: 6,
                ..Self::DEFAULT
            },
        ),
    ];

    pub fn preset(preset: Preset) -> Option<Self> {
        lookup(&Self::PRESETS, preset)
    }

    pub fn wants_resize(&self) -> bool {
        self.max_width.is_some() || self.max_height.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        check_quality(self.quality)?;
        check_compression_level(self.compression_level)?;

        if self.max_width == Some(0) || self.max_height == Some(0) {
            return Err(ConvertError::InvalidParameter(
                "maxWidth and maxHeight must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for SizeOptimizationParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Settings for the final encode into the response format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputParams {
    pub format: OutputFormat,
    /// Used by JPEG and WebP targets.
    pub quality: u8,
    pub compression_level: u8,
    pub adaptive_filtering: bool,
    /// Adam7 interlacing for PNG, progressive scans for JPEG.
    pub progressive: bool,
}

impl OutputParams {
    pub const DEFAULT: Self = Self {
        format: OutputFormat::Png,
        quality: 90,
        compression_level: 6,
        adaptive_filtering: true,
        progressive: false,
    };

    pub fn validate(&self) -> Result<()> {
        check_quality(self.quality)?;
        check_compression_level(self.compression_level)
    }
}

impl Default for OutputParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-request configuration passed by reference through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionParams {
    pub noise_reduction: NoiseReductionParams,
    pub quality_enhancement: QualityEnhancementParams,
    pub size_optimization: SizeOptimizationParams,
    #[serde(rename = "pngOptions", alias = "output")]
    pub output: OutputParams,
}

impl ConversionParams {
    /// Applies `preset` to every stage that defines it; stages without that
    /// preset keep their defaults.
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            noise_reduction: NoiseReductionParams::preset(preset).unwrap_or_default(),
            quality_enhancement: QualityEnhancementParams::preset(preset).unwrap_or_default(),
            size_optimization: SizeOptimizationParams::preset(preset).unwrap_or_default(),
            output: OutputParams::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ConvertError::InvalidParameter(format!("Invalid parameters: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        self.noise_reduction.validate()?;
        self.quality_enhancement.validate()?;
        self.size_optimization.validate()?;
        self.output.validate()
    }
}
