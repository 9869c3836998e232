// jpg2png/src/processors/batch.rs
use crate::core::{
    ConversionParams, ConvertError, ImageProcessor, ProcessingOptions, ProcessingStats, Result,
};
use crate::utils::is_jpeg_path;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Converts every JPEG in a directory, one independent pipeline per file.
pub struct BatchProcessor {
    processor: ImageProcessor,
    options: ProcessingOptions,
    params: ConversionParams,
    thread_pool: Option<rayon::ThreadPool>,
    show_progress: bool,
}

impl BatchProcessor {
    /// `max_threads == 0` uses the global rayon pool.
    pub fn new(
        options: ProcessingOptions,
        params: ConversionParams,
        max_threads: usize,
    ) -> Result<Self> {
        params.validate()?;

        let thread_pool = if max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(max_threads)
                .build()
                .map_err(|e| {
                    ConvertError::InvalidParameter(format!("Failed to create thread pool: {}", e))
                })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            processor: ImageProcessor::new(),
            options,
            params,
            thread_pool,
            show_progress: true,
        })
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        recursive: bool,
    ) -> Result<ProcessingStats> {
        self.validate_paths(input_dir, output_dir)?;

        let image_paths = self.collect_image_paths(input_dir, recursive);

        if image_paths.is_empty() {
            log::warn!("No JPEG files found in {}", input_dir.display());
            return Ok(ProcessingStats::default());
        }

        log::info!(
            "Processing {} images from {}",
            image_paths.len(),
            input_dir.display()
        );

        std::fs::create_dir_all(output_dir)?;

        let pb = self.create_progress_bar(image_paths.len());
        let run = || -> Vec<(PathBuf, Result<(u64, u64)>)> {
            image_paths
                .par_iter()
                .progress_with(pb.clone())
                .map(|input_path| {
                    let result = self.process_one(input_path, input_dir, output_dir);
                    (input_path.clone(), result)
                })
                .collect()
        };

        let results = match &self.thread_pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let mut stats = ProcessingStats::default();
        for (path, result) in results {
            match result {
                Ok((before, after)) => {
                    stats.processed_count += 1;
                    stats.total_size_before += before;
                    stats.total_size_after += after;
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    stats.errors.push((path.display().to_string(), e.to_string()));
                }
            }
        }

        pb.finish_with_message(format!(
            "Processed {} images ({}% size reduction)",
            stats.processed_count,
            stats.overall_change().compression_ratio
        ));

        Ok(stats)
    }

    fn process_one(&self, input_path: &Path, input_dir: &Path, output_dir: &Path) -> Result<(u64, u64)> {
        let output_path = self.output_path_for(input_path, input_dir, output_dir)?;
        let result =
            self.processor
                .process_file(input_path, &output_path, &self.options, &self.params)?;
        Ok((result.original_size, result.final_size))
    }

    /// Mirrors the input's location under `output_dir`, swapping the extension
    /// for the target format's.
    fn output_path_for(&self, input_path: &Path, input_dir: &Path, output_dir: &Path) -> Result<PathBuf> {
        let relative = input_path.strip_prefix(input_dir).map_err(|_| {
            ConvertError::InvalidParameter(format!("Invalid file name: {}", input_path.display()))
        })?;

        let extension = self.params.output.format.format().extension();
        Ok(output_dir.join(relative).with_extension(extension))
    }

    fn collect_image_paths(&self, input_dir: &Path, recursive: bool) -> Vec<PathBuf> {
        let walker = if recursive {
            WalkDir::new(input_dir)
        } else {
            WalkDir::new(input_dir).max_depth(1)
        };

        walker
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| is_jpeg_path(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    }

    fn create_progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    pub fn validate_paths(&self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        if !input_dir.is_dir() {
            return Err(ConvertError::InvalidParameter(format!(
                "Input path is not a directory: {}",
                input_dir.display()
            )));
        }

        if output_dir.exists() && !output_dir.is_dir() {
            return Err(ConvertError::InvalidParameter(format!(
                "Output path exists but is not a directory: {}",
                output_dir.display()
            )));
        }

        if input_dir == output_dir {
            return Err(ConvertError::InvalidParameter(
                "Input and output directories cannot be the same".to_string(),
            ));
        }

        Ok(())
    }
}
