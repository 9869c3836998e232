// jpg2png/src/cli.rs
use crate::core::{OutputFormat, Preset, ProcessingOption};
use crate::processors::ResizeAlgorithm;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jpg2png")]
#[command(about = "Convert JPEG images to PNG with optional cleanup stages", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a single JPEG
    Convert {
        /// Input JPEG file
        input: PathBuf,

        /// Output file (defaults to <input>_converted.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stages to apply; always run in canonical order
        #[arg(short = 'p', long = "option", value_enum)]
        options: Vec<StageArg>,

        /// Apply every stage
        #[arg(long, conflicts_with = "options")]
        all: bool,

        /// Named parameter preset
        #[arg(long, value_enum, default_value = "default")]
        preset: PresetArg,

        /// Parameter overrides as JSON, replacing the preset
        #[arg(long)]
        params: Option<String>,

        /// Maximum width for the size stage
        #[arg(long)]
        max_width: Option<u32>,

        /// Maximum height for the size stage
        #[arg(long)]
        max_height: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "png")]
        format: FormatArg,

        /// Print the JSON response envelope instead of writing a file
        #[arg(long)]
        json: bool,
    },

    /// Convert every JPEG in a directory
    Batch {
        /// Input directory
        input: PathBuf,

        /// Output directory
        output: PathBuf,

        /// Stages to apply
        #[arg(short = 'p', long = "option", value_enum)]
        options: Vec<StageArg>,

        /// Named parameter preset
        #[arg(long, value_enum, default_value = "default")]
        preset: PresetArg,

        /// Output format
        #[arg(short, long, value_enum, default_value = "png")]
        format: FormatArg,

        /// Number of threads (0 = auto)
        #[arg(short, long, default_value_t = 0)]
        threads: usize,

        /// Process subdirectories recursively
        #[arg(short, long)]
        recursive: bool,
    },

    /// Shrink an image to fit a square bound, keeping its format
    Fit {
        /// Input image
        input: PathBuf,

        /// Output file (defaults to <input>_fit.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Longest allowed edge
        #[arg(short, long, default_value_t = crate::processors::DEFAULT_MAX_DIMENSION)]
        max_dimension: u32,

        /// Resampling filter
        #[arg(short, long, value_enum, default_value = "lanczos3")]
        algorithm: Algorithm,
    },

    /// Show image information
    Info {
        /// Input image file
        input: PathBuf,
    },

    /// List the available processing stages
    Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StageArg {
    ReduceNoise,
    ImproveQuality,
    OptimizeSize,
}

impl From<StageArg> for ProcessingOption {
    fn from(arg: StageArg) -> Self {
        match arg {
            StageArg::ReduceNoise => ProcessingOption::ReduceNoise,
            StageArg::ImproveQuality => ProcessingOption::ImproveQuality,
            StageArg::OptimizeSize => ProcessingOption::OptimizeSize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    Default,
    Photo,
    Graphics,
    Aggressive,
    Conservative,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Default => Preset::Default,
            PresetArg::Photo => Preset::Photo,
            PresetArg::Graphics => Preset::Graphics,
            PresetArg::Aggressive => Preset::Aggressive,
            PresetArg::Conservative => Preset::Conservative,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Png,
    Jpeg,
    Webp,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Webp => OutputFormat::WebP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl From<Algorithm> for ResizeAlgorithm {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Nearest => ResizeAlgorithm::Nearest,
            Algorithm::Bilinear => ResizeAlgorithm::Bilinear,
            Algorithm::Bicubic => ResizeAlgorithm::Bicubic,
            Algorithm::Lanczos3 => ResizeAlgorithm::Lanczos3,
        }
    }
}
