// imgpipe/src/processors/persister.rs
use crate::core::{PipelineError, Processed, Processor, Result};
use crate::utils::{random_identifier, sharded_path};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::DynamicImage;
use oxipng::{optimize_from_memory, Options};
use rand::Rng;
use std::fs::{DirBuilder, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

pub const ID_LENGTH: usize = 8;

const MAX_ATTEMPTS: usize = 3;

/// Encoder picked from a format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Jpeg,
    Png,
}

impl Encoding {
    /// `"jpeg"`/`"jpg"` encode as JPEG; every other tag falls back to PNG.
    pub fn for_format(format: &str) -> Self {
        match format {
            "jpeg" | "jpg" => Encoding::Jpeg,
            _ => Encoding::Png,
        }
    }
}

/// Writes each image under a randomly sharded path below `base_dir`.
///
/// The file extension is the literal format tag, so an unrecognised tag such
/// as `"gif"` ends up as PNG data in a `.gif` file.
pub struct Persister {
    base_dir: PathBuf,
    jpeg_quality: u8,
    optimize_png: bool,
    saved_path: Mutex<Option<PathBuf>>,
}

impl Persister {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            jpeg_quality: 95,
            optimize_png: false,
            saved_path: Mutex::new(None),
        }
    }

    /// JPEG quality, clamped into `1..=100`. `PipelineConfig::validate`
    /// rejects out-of-range values instead.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the most recent successful write, if any since the last reset.
    pub fn saved_path(&self) -> Option<PathBuf> {
        self.saved_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn reset(&self) {
        *self.saved_path.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Encodes `image` and writes it to a fresh sharded path.
    ///
    /// On failure the saved-path record keeps its previous value.
    pub fn save(&self, image: &DynamicImage, format: &str) -> Result<PathBuf> {
        self.save_with_rng(image, format, &mut rand::rng())
    }

    fn save_with_rng<R: Rng>(
        &self,
        image: &DynamicImage,
        format: &str,
        rng: &mut R,
    ) -> Result<PathBuf> {
        let data = self.encode(image, Encoding::for_format(format))?;

        let mut attempt = 1;
        let (path, file) = loop {
            let path = self.generate_path(format, rng)?;
            log::debug!("Generated path {}", path.display());

            if let Some(parent) = path.parent() {
                self.create_dirs(parent)?;
            }

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < MAX_ATTEMPTS => {
                    log::warn!("Path {} already taken, drawing a new identifier", path.display());
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        if let Err(e) = write_all(file, &data) {
            if let Err(cleanup) = std::fs::remove_file(&path) {
                log::warn!("Failed to remove partial file {}: {}", path.display(), cleanup);
            }
            return Err(e.into());
        }

        log::info!("Saved image: {} ({} bytes)", path.display(), data.len());

        *self.saved_path.lock().unwrap_or_else(PoisonError::into_inner) = Some(path.clone());

        Ok(path)
    }

    fn generate_path<R: Rng>(&self, format: &str, rng: &mut R) -> Result<PathBuf> {
        let id = random_identifier(rng, ID_LENGTH);
        let path = sharded_path(&self.base_dir, &id, format);
        Ok(std::path::absolute(path)?)
    }

    fn create_dirs(&self, dir: &Path) -> Result<()> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o775);
        }

        match builder.create(dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn encode(&self, image: &DynamicImage, encoding: Encoding) -> Result<Vec<u8>> {
        let mut data = Vec::new();

        match encoding {
            Encoding::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut data, self.jpeg_quality);
                match image {
                    DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => {
                        image.write_with_encoder(encoder)?
                    }
                    // JPEG carries neither alpha nor 16-bit samples.
                    _ => DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?,
                }
            }
            Encoding::Png => {
                let encoder = PngEncoder::new(&mut data);
                match image {
                    // PNG has no float samples; keep 16-bit precision instead.
                    DynamicImage::ImageRgb32F(_) => {
                        DynamicImage::ImageRgb16(image.to_rgb16()).write_with_encoder(encoder)?
                    }
                    DynamicImage::ImageRgba32F(_) => {
                        DynamicImage::ImageRgba16(image.to_rgba16()).write_with_encoder(encoder)?
                    }
                    _ => image.write_with_encoder(encoder)?,
                }
                if self.optimize_png {
                    data = optimize_from_memory(&data, &Options::default())
                        .map_err(|e| PipelineError::Optimization(e.to_string()))?;
                }
            }
        }

        Ok(data)
    }
}

fn write_all(mut file: File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data)?;
    file.sync_all()
}

impl Processor for Persister {
    fn process(&self, image: DynamicImage, format: &str) -> Result<Processed> {
        let path = self.save(&image, format)?;
        Ok(Processed::saved(image, path))
    }

    fn name(&self) -> &str {
        "persister"
    }
}
