// imgpipe/src/processors/loader.rs
use crate::core::Result;
use crate::utils::format_tag;
use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::{DynamicImage, ImageError, ImageReader, Limits};
use std::io::{Cursor, Read};

/// Decodes an upload stream into an image plus its format tag.
#[derive(Clone, Default)]
pub struct Loader {
    limits: Option<Limits>,
}

impl Loader {
    pub fn new() -> Self {
        Self { limits: None }
    }

    /// Caps decoder allocations and dimensions. Violations surface as
    /// `ImageError::Limits` from [`Loader::decode`].
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn decode<R: Read>(&self, mut reader: R) -> Result<(DynamicImage, String)> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        log::debug!("Read {} bytes of image data", data.len());

        let mut reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;

        let Some(format) = reader.format() else {
            return Err(ImageError::Unsupported(UnsupportedError::from_format_and_kind(
                ImageFormatHint::Unknown,
                UnsupportedErrorKind::Format(ImageFormatHint::Unknown),
            ))
            .into());
        };

        if let Some(limits) = &self.limits {
            reader.limits(limits.clone());
        }

        let image = reader.decode()?;

        Ok((image, format_tag(format).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PipelineError;
    use image::{ImageFormat, RgbImage};

    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let mut data = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut data, format)
            .unwrap();
        data.into_inner()
    }

    #[test]
    fn detects_png_and_jpeg() {
        let loader = Loader::new();

        let (image, format) = loader.decode(Cursor::new(encoded(5, 7, ImageFormat::Png))).unwrap();
        assert_eq!(format, "png");
        assert_eq!((image.width(), image.height()), (5, 7));

        let (_, format) = loader.decode(Cursor::new(encoded(8, 8, ImageFormat::Jpeg))).unwrap();
        assert_eq!(format, "jpeg");
    }

    #[test]
    fn unknown_bytes_fail_to_decode() {
        let result = Loader::new().decode(Cursor::new(b"plain text".to_vec()));
        assert!(matches!(result, Err(PipelineError::Image(ImageError::Unsupported(_)))));
    }

    #[test]
    fn empty_stream_fails_to_decode() {
        let result = Loader::new().decode(std::io::empty());
        assert!(matches!(result, Err(PipelineError::Image(_))));
    }

    #[test]
    fn limits_are_applied() {
        let mut limits = Limits::default();
        limits.max_image_width = Some(4);

        let result = Loader::new()
            .with_limits(limits)
            .decode(Cursor::new(encoded(10, 2, ImageFormat::Png)));

        assert!(matches!(result, Err(PipelineError::Image(ImageError::Limits(_)))));
    }
}
