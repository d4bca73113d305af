// imgpipe/src/core/pipeline.rs
use super::{Processor, Result};
use crate::processors::Loader;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// What a successful run leaves behind. The final image itself is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub format: String,
    pub width: u32,
    pub height: u32,
    /// Every path written by a processor, in the order it was written.
    pub saved_paths: Vec<PathBuf>,
}

/// Ordered chain of processors run against one decoded image per call.
pub struct Pipeline {
    loader: Loader,
    processors: Vec<Box<dyn Processor>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            loader: Loader::new(),
            processors: Vec::new(),
        }
    }

    pub fn with_loader(mut self, loader: Loader) -> Self {
        self.loader = loader;
        self
    }

    /// Appends `processor`; registration order is execution order.
    pub fn add_processor<P: Processor + 'static>(&mut self, processor: P) -> &mut Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Decodes `reader` once and threads the image through every processor.
    ///
    /// Stops at the first error and returns it unchanged. Side effects of
    /// processors that already ran (written files, created directories) are
    /// left in place.
    pub fn process<R: Read>(&self, reader: R) -> Result<PipelineOutcome> {
        let (mut image, format) = self.loader.decode(reader)?;
        log::debug!(
            "Decoded {} image: {}x{} pixels",
            format,
            image.width(),
            image.height()
        );

        let mut saved_paths = Vec::new();

        for processor in &self.processors {
            log::debug!("Running processor {}", processor.name());

            let processed = processor.process(image, &format).map_err(|e| {
                log::debug!("Processor {} stopped the pipeline: {}", processor.name(), e);
                e
            })?;

            let (next, saved) = processed.into_parts();
            image = next;
            saved_paths.extend(saved);
        }

        Ok(PipelineOutcome {
            width: image.width(),
            height: image.height(),
            format,
            saved_paths,
        })
    }

    pub fn process_bytes(&self, data: &[u8]) -> Result<PipelineOutcome> {
        self.process(Cursor::new(data))
    }

    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<PipelineOutcome> {
        let path = path.as_ref();
        log::debug!("Processing image from: {}", path.display());

        let file = File::open(path)?;
        self.process(BufReader::new(file))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
