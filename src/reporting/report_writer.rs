//! Scan report writing

use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::collector::ScanReport;
use crate::core::error::SkipReason;

/// Write a summary of a scan to a text file
///
/// # Arguments
/// * `output_path` - Path to output file
/// * `report` - Scan results to write
/// * `pdf_path` - Where the PDF was written, if one was
///
/// # Returns
/// Result indicating success or failure
pub fn write_report(output_path: &Path, report: &ScanReport, pdf_path: Option<&Path>) -> Result<()> {
    let mut file = File::create(output_path)?;

    writeln!(file, "Image to PDF Report")?;
    writeln!(file, "===================")?;
    writeln!(file)?;

    writeln!(file, "Summary Statistics:")?;
    writeln!(file, "-------------------")?;
    writeln!(file, "  Image candidates scanned: {}", report.scanned)?;
    writeln!(file, "  Accepted images: {}", report.accepted.len())?;
    writeln!(file, "  Skipped images: {}", report.skipped.len())?;
    match pdf_path {
        Some(path) => writeln!(file, "  Output PDF: {}", path.display())?,
        None => writeln!(file, "  Output PDF: none (no qualifying images found)")?,
    }
    writeln!(file)?;

    if !report.skipped.is_empty() {
        let animated = report
            .skipped
            .iter()
            .filter(|s| matches!(s, SkipReason::MultipleFrames { .. }))
            .count();

        writeln!(file, "Skipped Files:")?;
        writeln!(file, "--------------")?;
        writeln!(file, "  Multi-frame: {}", animated)?;
        writeln!(file, "  Errors: {}", report.skipped.len() - animated)?;
        writeln!(file)?;
        for reason in &report.skipped {
            writeln!(file, "  {}", reason.path().display())?;
            writeln!(file, "    {}", reason)?;
            if let Some(detail) = reason.detail() {
                writeln!(file, "    cause: {}", detail)?;
            }
        }
        writeln!(file)?;
    }

    writeln!(file, "Pages:")?;
    writeln!(file, "------")?;
    for (idx, image) in report.accepted.iter().enumerate() {
        let (width, height) = image.dimensions();
        writeln!(
            file,
            "  {:>4}. {} ({}x{})",
            idx + 1,
            image.path.display(),
            width,
            height
        )?;
    }

    Ok(())
}
