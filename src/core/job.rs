//! Job configuration

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Default JPEG quality for PDF pages (maximum)
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Allocation limits handed to the image decoder for every file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderLimits {
    /// No pixel or allocation cap
    #[default]
    Unlimited,
    /// The `image` crate's built-in limits
    Default,
}

impl DecoderLimits {
    pub fn to_limits(self) -> image::Limits {
        match self {
            DecoderLimits::Unlimited => image::Limits::no_limits(),
            DecoderLimits::Default => image::Limits::default(),
        }
    }
}

/// How page images are stored inside the PDF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEncoding {
    /// DCT (JPEG) stream at the given quality, 1-100
    Jpeg { quality: u8 },
    /// Raw RGB samples, Flate compressed
    Lossless,
}

impl Default for PageEncoding {
    fn default() -> Self {
        PageEncoding::Jpeg {
            quality: MAX_JPEG_QUALITY,
        }
    }
}

/// Settings for one collection run. Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub input_folder: PathBuf,
    pub output_filename: String,
    pub recursive: bool,
    pub keep_animations: bool,
    pub decoder_limits: DecoderLimits,
    pub page_encoding: PageEncoding,
}

impl JobConfig {
    pub fn new(input_folder: impl Into<PathBuf>, output_filename: impl Into<String>) -> Self {
        Self {
            input_folder: input_folder.into(),
            output_filename: output_filename.into(),
            recursive: false,
            keep_animations: false,
            decoder_limits: DecoderLimits::default(),
            page_encoding: PageEncoding::default(),
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn keep_animations(mut self, keep: bool) -> Self {
        self.keep_animations = keep;
        self
    }

    pub fn decoder_limits(mut self, limits: DecoderLimits) -> Self {
        self.decoder_limits = limits;
        self
    }

    pub fn page_encoding(mut self, encoding: PageEncoding) -> Self {
        self.page_encoding = encoding;
        self
    }

    /// Output location: `<home>/Desktop/<output_filename>`
    pub fn output_path(&self) -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine the home directory")?;
        Ok(home.join("Desktop").join(&self.output_filename))
    }
}
