// jpg2png/src/utils/mod.rs
use std::path::{Path, PathBuf};

/// `<stem>_<suffix>.<extension>` next to the input, unless `output` is given.
/// A counter is appended when the name is already taken.
pub fn generate_output_path(
    input_path: &Path,
    output: Option<&Path>,
    suffix: &str,
    extension: &str,
) -> PathBuf {
    if let Some(path) = output {
        return path.to_path_buf();
    }

    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");

    let mut candidate = input_path.with_file_name(format!("{}_{}.{}", stem, suffix, extension));
    let mut counter = 1;
    while candidate.exists() {
        candidate =
            input_path.with_file_name(format!("{}_{}_{}.{}", stem, suffix, counter, extension));
        counter += 1;
    }

    candidate
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as usize).min(UNITS.len() - 1);
    let size = bytes_f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}

pub fn calculate_aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        0.0
    } else {
        width as f32 / height as f32
    }
}

pub fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_lowercase().as_str(), "jpg" | "jpeg" | "jpe"))
        .unwrap_or(false)
}
