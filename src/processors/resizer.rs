// jpg2png/src/processors/resizer.rs
use image::{imageops::FilterType, DynamicImage, GenericImageView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    Bicubic,
    #[default]
    Lanczos3,
}

/// How a bounding box is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFit {
    /// Scale uniformly until the image fits inside the box.
    Inside,
    /// Clamp each axis to the box independently, distorting the aspect ratio.
    Fill,
}

impl ResizeFit {
    pub fn from_aspect_flag(preserve_aspect_ratio: bool) -> Self {
        if preserve_aspect_ratio {
            ResizeFit::Inside
        } else {
            ResizeFit::Fill
        }
    }
}

/// Target size for an `orig_w`x`orig_h` image bounded by `max_w`/`max_h`.
///
/// Never enlarges: a bound larger than the source leaves that axis alone. In
/// `Inside` mode a missing bound is unconstrained; in `Fill` mode with a single
/// bound the other axis follows the aspect ratio, so only two bounds distort.
pub fn bounded_dimensions(
    orig_w: u32,
    orig_h: u32,
    max_w: Option<u32>,
    max_h: Option<u32>,
    fit: ResizeFit,
) -> (u32, u32) {
    match fit {
        ResizeFit::Inside => {
            let ratio_w = max_w.map_or(1.0, |w| w as f64 / orig_w as f64);
            let ratio_h = max_h.map_or(1.0, |h| h as f64 / orig_h as f64);
            let ratio = ratio_w.min(ratio_h).min(1.0);

            if ratio >= 1.0 {
                return (orig_w, orig_h);
            }

            let new_w = ((orig_w as f64 * ratio).round() as u32).clamp(1, orig_w);
            let new_h = ((orig_h as f64 * ratio).round() as u32).clamp(1, orig_h);
            (new_w, new_h)
        }
        ResizeFit::Fill => match (max_w, max_h) {
            (Some(w), Some(h)) => (w.clamp(1, orig_w), h.clamp(1, orig_h)),
            (Some(w), None) => {
                let new_w = w.clamp(1, orig_w);
                (new_w, scale_axis(orig_h, new_w, orig_w))
            }
            (None, Some(h)) => {
                let new_h = h.clamp(1, orig_h);
                (scale_axis(orig_w, new_h, orig_h), new_h)
            }
            (None, None) => (orig_w, orig_h),
        },
    }
}

/// Scales `length` by `numerator / denominator`, keeping at least one pixel.
fn scale_axis(length: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (length as f64 * numerator as f64 / denominator as f64).round() as u32;
    scaled.clamp(1, length)
}

#[derive(Debug, Clone, Default)]
pub struct Resizer {
    algorithm: ResizeAlgorithm,
}

impl Resizer {
    pub fn new(algorithm: ResizeAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Shrinks `image` into the bounding box. Returns `None` when the image
    /// already fits, so callers can skip re-encoding work.
    pub fn shrink_to_fit(
        &self,
        image: &DynamicImage,
        max_w: Option<u32>,
        max_h: Option<u32>,
        fit: ResizeFit,
    ) -> Option<DynamicImage> {
        let (orig_w, orig_h) = image.dimensions();
        let (width, height) = bounded_dimensions(orig_w, orig_h, max_w, max_h, fit);

        if width == orig_w && height == orig_h {
            log::debug!("Image dimensions unchanged, skipping resize");
            return None;
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            orig_w,
            orig_h,
            width,
            height
        );

        Some(image.resize_exact(width, height, self.filter_type()))
    }

    fn filter_type(&self) -> FilterType {
        match self.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
