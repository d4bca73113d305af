// imgpipe/src/core/mod.rs
mod pipeline;
mod processor;

pub use pipeline::{Pipeline, PipelineOutcome};
pub use processor::{Processed, Processor};

use crate::processors::{FormatGate, Persister, Resizer, SizeGate};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

/// Construction-time settings for the standard processor chain.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub allowed_formats: Vec<String>,
    pub max_width: u32,
    pub max_height: u32,
    pub output_dir: PathBuf,
    pub resize_to: Option<(u32, u32)>,
    pub algorithm: ResizeAlgorithm,
    pub jpeg_quality: u8,
    pub optimize_png: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            allowed_formats: vec!["jpeg".to_string(), "png".to_string()],
            max_width: 4096,
            max_height: 4096,
            output_dir: PathBuf::from("uploads"),
            resize_to: None,
            algorithm: ResizeAlgorithm::Lanczos3,
            jpeg_quality: 95,
            optimize_png: false,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.allowed_formats.is_empty() {
            return Err(PipelineError::InvalidParameter(
                "At least one allowed format must be given".to_string(),
            ));
        }

        if self.max_width == 0 || self.max_height == 0 {
            return Err(PipelineError::InvalidParameter(
                "Maximum width and height must be positive".to_string(),
            ));
        }

        if let Some((width, height)) = self.resize_to {
            if width == 0 || height == 0 {
                return Err(PipelineError::InvalidParameter(
                    "Resize bounds must be positive".to_string(),
                ));
            }
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(PipelineError::InvalidParameter(
                "JPEG quality must be between 1 and 100".to_string(),
            ));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(PipelineError::InvalidParameter(
                "Output directory must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Builds `FormatGate -> SizeGate -> Resizer -> Persister` from this config.
    pub fn build(&self) -> Result<Pipeline> {
        self.validate()?;

        let resizer = match self.resize_to {
            Some((width, height)) => Resizer::fit_within(width, height),
            None => Resizer::new(),
        }
        .with_algorithm(self.algorithm);

        let persister = Persister::new(&self.output_dir)
            .with_jpeg_quality(self.jpeg_quality)
            .with_png_optimization(self.optimize_png);

        let mut pipeline = Pipeline::new();
        pipeline
            .add_processor(FormatGate::new(self.allowed_formats.iter().cloned()))
            .add_processor(SizeGate::new(self.max_width, self.max_height))
            .add_processor(resizer)
            .add_processor(persister);

        Ok(pipeline)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("format:invalid")]
    FormatInvalid,

    #[error("image:too_wide")]
    ImageTooWide,

    #[error("image:too_long")]
    ImageTooLong,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("PNG optimization failed: {0}")]
    Optimization(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PipelineError {
    /// True for the three validation sentinels a gate can return.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            PipelineError::FormatInvalid
                | PipelineError::ImageTooWide
                | PipelineError::ImageTooLong
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_empty_allow_list() {
        let config = PipelineConfig {
            allowed_formats: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_zero_limits_and_bad_quality() {
        let zero_width = PipelineConfig {
            max_width: 0,
            ..Default::default()
        };
        assert!(zero_width.validate().is_err());

        let zero_resize = PipelineConfig {
            resize_to: Some((0, 10)),
            ..Default::default()
        };
        assert!(zero_resize.validate().is_err());

        let bad_quality = PipelineConfig {
            jpeg_quality: 101,
            ..Default::default()
        };
        assert!(bad_quality.build().is_err());
    }

    #[test]
    fn build_registers_standard_chain() {
        let pipeline = PipelineConfig::default().build().unwrap();
        assert_eq!(pipeline.len(), 4);
    }

    #[test]
    fn sentinel_messages() {
        assert_eq!(PipelineError::FormatInvalid.to_string(), "format:invalid");
        assert_eq!(PipelineError::ImageTooWide.to_string(), "image:too_wide");
        assert_eq!(PipelineError::ImageTooLong.to_string(), "image:too_long");
        assert!(PipelineError::ImageTooLong.is_rejection());

        let io = PipelineError::from(std::io::Error::other("disk gone"));
        assert_eq!(io.to_string(), "disk gone");
        assert!(!io.is_rejection());
    }
}
