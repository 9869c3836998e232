use anyhow::{bail, Context, Result};
use clap::Parser;
use jpg2png::cli::{Algorithm, Cli, Commands, FormatArg, PresetArg, StageArg};
use jpg2png::response::Response;
use jpg2png::{
    calculate_aspect_ratio, format_file_size, generate_output_path, validate_jpeg,
    BatchProcessor, ConversionParams, ImageProcessor, Loader, ProcessingOption,
    ProcessingOptions, Resizer, SizeOptimizer,
};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            options,
            all,
            preset,
            params,
            max_width,
            max_height,
            format,
            json,
        } => {
            let options = if all {
                ProcessingOptions::all()
            } else {
                stage_set(&options)
            };
            let mut params = build_params(preset, params.as_deref(), format)?;
            if max_width.is_some() {
                params.size_optimization.max_width = max_width;
            }
            if max_height.is_some() {
                params.size_optimization.max_height = max_height;
            }

            if json {
                process_convert_json(&input, &options, &params)?;
            } else {
                process_convert(&input, output, &options, &params)?;
            }
        }
        Commands::Batch {
            input,
            output,
            options,
            preset,
            format,
            threads,
            recursive,
        } => {
            let params = build_params(preset, None, format)?;
            process_batch(&input, &output, stage_set(&options), params, threads, recursive)?;
        }
        Commands::Fit {
            input,
            output,
            max_dimension,
            algorithm,
        } => {
            process_fit(&input, output, max_dimension, algorithm)?;
        }
        Commands::Info { input } => {
            process_info(&input)?;
        }
        Commands::Options => {
            process_options();
        }
    }

    Ok(())
}

fn stage_set(stages: &[StageArg]) -> ProcessingOptions {
    stages.iter().copied().map(ProcessingOption::from).collect()
}

/// JSON overrides replace the preset entirely; the format flag always wins.
fn build_params(preset: PresetArg, json: Option<&str>, format: FormatArg) -> Result<ConversionParams> {
    let mut params = match json {
        Some(json) => ConversionParams::from_json(json).context("Failed to parse --params")?,
        None => ConversionParams::from_preset(preset.into()),
    };
    params.output.format = format.into();
    Ok(params)
}

fn process_convert(
    input: &Path,
    output: Option<PathBuf>,
    options: &ProcessingOptions,
    params: &ConversionParams,
) -> Result<()> {
    let extension = params.output.format.format().extension();
    let output_path = generate_output_path(input, output.as_deref(), "converted", extension);

    let result = ImageProcessor::new()
        .process_file(input, &output_path, options, params)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    println!("Converted image saved to: {}", output_path.display());
    println!(
        "Size: {} -> {} ({}%)",
        format_file_size(result.original_size),
        format_file_size(result.final_size),
        result.size_change.size_change_percent
    );
    if !result.applied_options.is_empty() {
        let applied: Vec<&str> = result.applied_options.iter().map(|o| o.id()).collect();
        println!("Applied: {}", applied.join(", "));
    }

    Ok(())
}

fn process_convert_json(
    input: &Path,
    options: &ProcessingOptions,
    params: &ConversionParams,
) -> Result<()> {
    let buffer =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let start = Instant::now();
    let outcome = ImageProcessor::new().process(&buffer, options, params);
    let response = Response::from_outcome(outcome, start.elapsed());

    println!("{}", response.to_json()?);

    if response.status() != 200 {
        bail!("Conversion failed with status {}", response.status());
    }
    Ok(())
}

fn process_batch(
    input: &Path,
    output: &Path,
    options: ProcessingOptions,
    params: ConversionParams,
    threads: usize,
    recursive: bool,
) -> Result<()> {
    let processor = BatchProcessor::new(options, params, threads)?;
    processor.validate_paths(input, output)?;

    let stats = processor
        .process_directory(input, output, recursive)
        .with_context(|| format!("Batch processing of {} failed", input.display()))?;

    println!(
        "Batch processing complete. Processed {} images to: {}",
        stats.processed_count,
        output.display()
    );
    println!(
        "Total: {} -> {} ({}% size reduction)",
        format_file_size(stats.total_size_before),
        format_file_size(stats.total_size_after),
        stats.overall_change().compression_ratio
    );
    for (path, error) in &stats.errors {
        println!("Failed: {} ({})", path, error);
    }

    Ok(())
}

fn process_fit(
    input: &Path,
    output: Option<PathBuf>,
    max_dimension: u32,
    algorithm: Algorithm,
) -> Result<()> {
    let buffer =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let loader = Loader::new();
    let format = loader.detect_format(&buffer)?;
    let output_path = generate_output_path(input, output.as_deref(), "fit", format.extension());

    let optimizer = SizeOptimizer::new(loader, Resizer::new(algorithm.into()));
    let resized = optimizer
        .resize_to_fit(&buffer, max_dimension)
        .with_context(|| format!("Failed to resize {}", input.display()))?;

    std::fs::write(&output_path, resized)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!("Resized image saved to: {}", output_path.display());
    Ok(())
}

fn process_info(input: &Path) -> Result<()> {
    if !input.exists() {
        bail!("File does not exist: {}", input.display());
    }

    let buffer =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let metadata = Loader::new()
        .read_metadata(&buffer)
        .with_context(|| format!("Failed to read image header of {}", input.display()))?;
    let aspect_ratio = calculate_aspect_ratio(metadata.width, metadata.height);

    println!("=== Image Information ===");
    println!("File: {}", input.display());
    println!("Size: {}", format_file_size(buffer.len() as u64));
    println!("Dimensions: {} x {} pixels", metadata.width, metadata.height);
    println!("Aspect Ratio: {:.2}:1", aspect_ratio);
    println!("Format: {}", metadata.format);
    println!("Channels: {}", metadata.channels);
    println!("Has alpha: {}", metadata.has_alpha);
    println!("Convertible: {}", validate_jpeg(&buffer));

    Ok(())
}

fn process_options() {
    println!("=== Processing Options ===");
    for info in ProcessingOption::catalogue() {
        println!("{:<16} {:<16} [{}] {}", info.id, info.name, info.category, info.description);
    }
}
