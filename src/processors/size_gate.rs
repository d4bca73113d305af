// imgpipe/src/processors/size_gate.rs
use crate::core::{PipelineError, Processed, Processor, Result};
use image::DynamicImage;

/// Rejects images larger than a fixed width/height ceiling.
#[derive(Debug, Clone, Copy)]
pub struct SizeGate {
    max_width: u32,
    max_height: u32,
}

impl SizeGate {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Width is checked first: an image over both limits is "too wide".
    pub fn check(&self, width: u32, height: u32) -> Result<()> {
        if width > self.max_width {
            return Err(PipelineError::ImageTooWide);
        }

        if height > self.max_height {
            return Err(PipelineError::ImageTooLong);
        }

        Ok(())
    }
}

impl Processor for SizeGate {
    fn process(&self, image: DynamicImage, _format: &str) -> Result<Processed> {
        self.check(image.width(), image.height()).map_err(|e| {
            log::debug!(
                "Image {}x{} exceeds {}x{}",
                image.width(),
                image.height(),
                self.max_width,
                self.max_height
            );
            e
        })?;

        Ok(image.into())
    }

    fn name(&self) -> &str {
        "size-gate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_inclusive() {
        let gate = SizeGate::new(100, 100);
        assert!(gate.check(100, 100).is_ok());
        assert!(gate.check(1, 1).is_ok());
    }

    #[test]
    fn width_wins_over_height() {
        let gate = SizeGate::new(100, 100);

        assert!(matches!(gate.check(200, 50), Err(PipelineError::ImageTooWide)));
        assert!(matches!(gate.check(50, 200), Err(PipelineError::ImageTooLong)));
        assert!(matches!(gate.check(200, 200), Err(PipelineError::ImageTooWide)));
    }

    #[test]
    fn process_reads_image_dimensions() {
        let gate = SizeGate::new(10, 10);

        let result = gate.process(DynamicImage::new_rgb8(11, 3), "png");
        assert!(matches!(result, Err(PipelineError::ImageTooWide)));

        let processed = gate.process(DynamicImage::new_rgb8(10, 10), "png").unwrap();
        assert_eq!(processed.image().width(), 10);
    }
}
