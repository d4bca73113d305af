// imgpipe/src/processors/resizer.rs
use crate::core::{Processed, Processor, ResizeAlgorithm, Result};
use image::{imageops::FilterType, DynamicImage};

/// Scaling step. Without bounds it passes every image through unchanged;
/// with bounds it replaces oversized images by a scaled-down copy.
#[derive(Debug, Clone, Copy)]
pub struct Resizer {
    bounds: Option<(u32, u32)>,
    algorithm: ResizeAlgorithm,
}

impl Resizer {
    pub fn new() -> Self {
        Self {
            bounds: None,
            algorithm: ResizeAlgorithm::Lanczos3,
        }
    }

    /// Shrinks images so they fit inside `width` x `height`, keeping aspect.
    pub fn fit_within(width: u32, height: u32) -> Self {
        Self {
            bounds: Some((width, height)),
            ..Self::new()
        }
    }

    pub fn with_algorithm(mut self, algorithm: ResizeAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn resize(&self, image: DynamicImage) -> DynamicImage {
        let Some((max_w, max_h)) = self.bounds else {
            return image;
        };

        if image.width() <= max_w && image.height() <= max_h {
            log::debug!("Image fits within {}x{}, skipping resize", max_w, max_h);
            return image;
        }

        let resized = image.resize(max_w, max_h, self.get_filter_type());

        log::debug!(
            "Resized image from {}x{} to {}x{}",
            image.width(),
            image.height(),
            resized.width(),
            resized.height()
        );

        resized
    }

    fn get_filter_type(&self) -> FilterType {
        match self.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for Resizer {
    fn process(&self, image: DynamicImage, _format: &str) -> Result<Processed> {
        Ok(self.resize(image).into())
    }

    fn name(&self) -> &str {
        "resizer"
    }
}
