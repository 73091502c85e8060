//! PDF output

pub mod pdf_assembler;

pub use pdf_assembler::{assemble_pdf, render_document, AssembleOutcome};
