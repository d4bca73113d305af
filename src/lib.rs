mod core;
mod processors;
mod utils;

pub use crate::core::{
    Pipeline, PipelineConfig, PipelineError, PipelineOutcome, Processed, Processor,
    ResizeAlgorithm, Result,
};
pub use crate::processors::{
    Encoding, FormatGate, Loader, Persister, Resizer, SizeGate, ID_LENGTH,
};
pub use crate::utils::{format_tag, random_identifier, sharded_path};

pub mod prelude {
    pub use crate::{
        FormatGate, Loader, Persister, Pipeline, PipelineConfig, PipelineError, Processed,
        Processor, Resizer, SizeGate,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
