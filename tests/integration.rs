#[cfg(test)]
mod tests {
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use image::{GenericImageView, ImageFormat, Rgb, RgbImage};
    use jpg2png::response::Response;
    use jpg2png::{
        BatchProcessor, ConversionParams, ConvertError, Format, ImageProcessor, OutputFormat,
        Preset, ProcessingOption, ProcessingOptions,
    };
    use std::fs;
    use std::time::Duration;

    fn write_jpeg(path: &std::path::Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        img.save_with_format(path, ImageFormat::Jpeg).unwrap();
    }

    #[test]
    fn test_convert_file_to_png() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("photo.jpg");
        write_jpeg(input.path(), 100, 100);
        let output = temp_dir.child("out/photo.png");

        let result = ImageProcessor::new()
            .process_file(
                input.path(),
                output.path(),
                &ProcessingOptions::new(),
                &ConversionParams::default(),
            )
            .unwrap();

        assert!(output.path().exists());
        assert_eq!(result.final_metadata.format, Format::Png);
        assert!(result.applied_options.is_empty());

        let written = fs::read(output.path()).unwrap();
        assert_eq!(written, result.buffer);
        assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_all_stages_with_preset() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("big.jpg");
        write_jpeg(input.path(), 300, 150);

        let mut params = ConversionParams::from_preset(Preset::Aggressive);
        params.size_optimization.max_width = Some(120);

        let buffer = fs::read(input.path()).unwrap();
        let result = ImageProcessor::new()
            .process(&buffer, &ProcessingOptions::all(), &params)
            .unwrap();

        assert_eq!(result.applied_options, ProcessingOption::ALL.to_vec());
        assert_eq!(result.final_metadata.width, 120);
        assert_eq!(result.final_metadata.height, 60);

        let decoded = image::load_from_memory(&result.buffer).unwrap();
        assert_eq!(decoded.dimensions(), (120, 60));
    }

    #[test]
    fn test_png_upload_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("not_a_jpeg.png");
        RgbImage::new(20, 20)
            .save_with_format(input.path(), ImageFormat::Png)
            .unwrap();
        let output = temp_dir.child("never.png");

        let result = ImageProcessor::new().process_file(
            input.path(),
            output.path(),
            &ProcessingOptions::all(),
            &ConversionParams::default(),
        );

        assert!(matches!(result, Err(ConvertError::InvalidFormat)));
        assert!(!output.path().exists());
    }

    #[test]
    fn test_invalid_file() {
        let result = ImageProcessor::new().process_file(
            "nonexistent.jpg",
            "output.png",
            &ProcessingOptions::new(),
            &ConversionParams::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_batch_directory() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("in");
        input.create_dir_all().unwrap();
        write_jpeg(input.child("a.jpg").path(), 40, 30);
        write_jpeg(input.child("b.JPEG").path(), 30, 40);
        input.child("notes.txt").write_str("skip me").unwrap();
        input.child("nested").create_dir_all().unwrap();
        write_jpeg(input.child("nested/c.jpg").path(), 16, 16);
        let output = temp_dir.child("out");

        let processor = BatchProcessor::new(
            ProcessingOptions::new().with(ProcessingOption::ReduceNoise),
            ConversionParams::default(),
            2,
        )
        .unwrap()
        .with_progress(false);

        let stats = processor
            .process_directory(input.path(), output.path(), false)
            .unwrap();
        assert_eq!(stats.processed_count, 2);
        assert!(stats.errors.is_empty());
        assert!(output.child("a.png").path().exists());
        assert!(output.child("b.png").path().exists());
        assert!(!output.child("nested/c.png").path().exists());

        let stats = processor
            .process_directory(input.path(), output.path(), true)
            .unwrap();
        assert_eq!(stats.processed_count, 3);
        assert!(output.child("nested/c.png").path().exists());
    }

    #[test]
    fn test_batch_records_broken_files() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("in");
        input.create_dir_all().unwrap();
        write_jpeg(input.child("good.jpg").path(), 20, 20);
        input.child("broken.jpg").write_binary(b"GIF89a is not a jpeg").unwrap();

        let stats = BatchProcessor::new(ProcessingOptions::new(), ConversionParams::default(), 0)
            .unwrap()
            .with_progress(false)
            .process_directory(input.path(), temp_dir.child("out").path(), false)
            .unwrap();

        assert_eq!(stats.processed_count, 1);
        assert_eq!(stats.errors.len(), 1);
        assert!(stats.errors[0].0.ends_with("broken.jpg"));
    }

    #[test]
    fn test_batch_rejects_same_directory() {
        let temp_dir = TempDir::new().unwrap();
        let processor =
            BatchProcessor::new(ProcessingOptions::new(), ConversionParams::default(), 0).unwrap();
        assert!(processor
            .validate_paths(temp_dir.path(), temp_dir.path())
            .is_err());
    }

    #[test]
    fn test_response_envelope_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("photo.jpg");
        write_jpeg(input.path(), 50, 50);
        let buffer = fs::read(input.path()).unwrap();

        let mut params = ConversionParams::default();
        params.output.format = OutputFormat::WebP;
        let outcome = ImageProcessor::new().process(&buffer, &ProcessingOptions::new(), &params);
        let response = Response::from_outcome(outcome, Duration::from_millis(5));

        assert_eq!(response.status(), 200);
        let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert!(json["image"]
            .as_str()
            .unwrap()
            .starts_with("data:image/webp;base64,"));
        assert_eq!(json["originalSize"], buffer.len() as u64);
    }
}
