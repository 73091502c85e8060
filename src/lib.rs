//! Image to PDF Library
//!
//! Collects the images found in a directory tree and assembles them into a
//! single multi-page PDF.

pub mod core;
pub mod output;
pub mod reporting;
pub mod scanner;

pub use self::core::{collector, validator};
pub use self::output::pdf_assembler;
pub use self::reporting::report_writer;
pub use self::scanner::file_scanner;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::core::collector::{ImageCollector, ScanReport};
    pub use crate::core::error::{AssembleError, SkipReason};
    pub use crate::core::job::{DecoderLimits, JobConfig, PageEncoding, MAX_JPEG_QUALITY};
    pub use crate::core::validator::{load_image, normalize, AcceptedImage};
    pub use crate::output::pdf_assembler::{assemble_pdf, render_document, AssembleOutcome};
    pub use crate::reporting::report_writer::write_report;
    pub use crate::scanner::file_scanner::{
        collect_entries, is_hidden, is_supported_image, EntryKind, ScanEntry, SUPPORTED_EXTENSIONS,
    };
}
