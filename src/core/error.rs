//! Error types for image collection and PDF assembly
//!
//! * [`SkipReason`] is non-fatal: one candidate file was dropped, the scan
//!   carries on. Its `Display` output is the console line for that file.
//! * [`AssembleError`] is fatal: the output PDF could not be produced.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a candidate file was left out of the accepted image list
#[derive(Debug, Error)]
pub enum SkipReason {
    /// Format could not be identified, or the data failed to decode.
    #[error("Skipping file that the image decoder has a problem loading {}", path.display())]
    Unreadable { path: PathBuf, detail: String },

    /// Valid image with more than one frame, and animations are not kept.
    #[error("Skipping file {} {frames} due to multiple frames {}", path.display(), path.display())]
    MultipleFrames { path: PathBuf, frames: usize },

    #[error("Permission denied on file {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// Any other filesystem fault while reading the file.
    #[error("OSError on {}", path.display())]
    Os { path: PathBuf, detail: String },
}

impl SkipReason {
    /// Classify a filesystem error for `path`
    pub fn from_io(path: &Path, err: &std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            SkipReason::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            SkipReason::Os {
                path: path.to_path_buf(),
                detail: err.to_string(),
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            SkipReason::Unreadable { path, .. }
            | SkipReason::MultipleFrames { path, .. }
            | SkipReason::PermissionDenied { path }
            | SkipReason::Os { path, .. } => path,
        }
    }

    /// Underlying decoder or OS message, when there is one
    pub fn detail(&self) -> Option<&str> {
        match self {
            SkipReason::Unreadable { detail, .. } | SkipReason::Os { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

/// Failures while writing the output PDF
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("Failed to encode page {page} ({}): {source}", path.display())]
    Encode {
        page: usize,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to build PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to serialize PDF: {0}")]
    Serialize(#[source] std::io::Error),

    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
