// imgpipe/src/core/processor.rs
use super::Result;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One inspect-or-transform step over a decoded image and its format tag.
///
/// Gates hand the image back untouched or fail; transformers may return a
/// different image. The format tag is borrowed, so no step can rewrite it.
pub trait Processor: Send + Sync {
    fn process(&self, image: DynamicImage, format: &str) -> Result<Processed>;

    /// Short label used in log lines.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Successful result of a single processor step.
#[derive(Debug, Clone)]
pub struct Processed {
    image: DynamicImage,
    saved_path: Option<PathBuf>,
}

impl Processed {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            saved_path: None,
        }
    }

    /// A step that wrote `image` to `path`.
    pub fn saved(image: DynamicImage, path: PathBuf) -> Self {
        Self {
            image,
            saved_path: Some(path),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn saved_path(&self) -> Option<&Path> {
        self.saved_path.as_deref()
    }

    pub fn into_parts(self) -> (DynamicImage, Option<PathBuf>) {
        (self.image, self.saved_path)
    }
}

impl From<DynamicImage> for Processed {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

impl<P: Processor + ?Sized> Processor for Arc<P> {
    fn process(&self, image: DynamicImage, format: &str) -> Result<Processed> {
        (**self).process(image, format)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: Processor + ?Sized> Processor for Box<P> {
    fn process(&self, image: DynamicImage, format: &str) -> Result<Processed> {
        (**self).process(image, format)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
