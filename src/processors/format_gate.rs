// imgpipe/src/processors/format_gate.rs
use crate::core::{PipelineError, Processed, Processor, Result};
use image::DynamicImage;
use std::collections::HashSet;

/// Rejects any image whose format tag is not in the allow-list.
#[derive(Debug, Clone)]
pub struct FormatGate {
    allowed: HashSet<String>,
}

impl FormatGate {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Case-sensitive exact match.
    pub fn allows(&self, format: &str) -> bool {
        self.allowed.contains(format)
    }
}

impl Processor for FormatGate {
    fn process(&self, image: DynamicImage, format: &str) -> Result<Processed> {
        if !self.allows(format) {
            log::debug!("Format {} is not allowed", format);
            return Err(PipelineError::FormatInvalid);
        }

        Ok(image.into())
    }

    fn name(&self) -> &str {
        "format-gate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_exact_and_order_independent() {
        let gate = FormatGate::new(["png", "jpeg"]);

        assert!(gate.allows("jpeg"));
        assert!(gate.allows("png"));
        assert!(!gate.allows("PNG"));
        assert!(!gate.allows("jpg"));
        assert!(!gate.allows(""));
    }

    #[test]
    fn passes_image_through_untouched() {
        let gate = FormatGate::new(vec!["png".to_string()]);
        let image = DynamicImage::new_rgb8(3, 3);

        let processed = gate.process(image.clone(), "png").unwrap();
        assert_eq!(processed.image(), &image);
        assert!(processed.saved_path().is_none());
    }

    #[test]
    fn rejects_unlisted_format() {
        let gate = FormatGate::new(["png"]);
        let result = gate.process(DynamicImage::new_rgb8(1, 1), "gif");

        assert!(matches!(result, Err(PipelineError::FormatInvalid)));
    }
}
