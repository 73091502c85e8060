use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use img2pdf_rs::prelude::*;

#[derive(Parser)]
#[command(name = "img2pdf_rs")]
#[command(about = "Convert the image files in a folder to a single PDF", long_about = None)]
struct Cli {
    /// Folder to scan for images
    #[arg(short, long)]
    input_folder: PathBuf,

    /// Output PDF file name, written to ~/Desktop
    #[arg(short, long)]
    output_filename: String,

    /// Keep multi-frame images (first frame only) instead of skipping them
    #[arg(short, long)]
    keep_animations: bool,

    /// Scan subdirectories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Store pages losslessly (Flate) instead of as JPEG
    #[arg(long, conflicts_with = "jpeg_quality")]
    lossless: bool,

    /// JPEG quality for pages
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: Option<u8>,

    /// Apply the image decoder's default memory limits
    #[arg(long)]
    decoder_limits: bool,

    /// Write a text report of accepted and skipped files
    #[arg(long)]
    report: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Run in batch mode (no progress bar)
    #[arg(long)]
    batch: bool,
}

impl Cli {
    fn job(&self) -> JobConfig {
        let encoding = if self.lossless {
            PageEncoding::Lossless
        } else {
            PageEncoding::Jpeg {
                quality: self.jpeg_quality.unwrap_or(MAX_JPEG_QUALITY),
            }
        };
        let limits = if self.decoder_limits {
            DecoderLimits::Default
        } else {
            DecoderLimits::Unlimited
        };

        JobConfig::new(&self.input_folder, &self.output_filename)
            .recursive(self.recursive)
            .keep_animations(self.keep_animations)
            .decoder_limits(limits)
            .page_encoding(encoding)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stdout)
        .with_target(false)
        .with_level(false)
        .without_time()
        .init();

    let job = cli.job();
    let output_path = job.output_path()?;

    println!("Image to PDF (Rust Edition)");
    println!("Input folder:  {}", job.input_folder.display());
    println!("Output PDF:    {}", output_path.display());
    println!();

    let report = ImageCollector::new(&job).collect();

    if let Some(report_path) = &cli.report {
        let pdf_path = (!report.accepted.is_empty()).then_some(output_path.as_path());
        write_report(report_path, &report, pdf_path)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        println!("Report saved to: {}", report_path.display());
    }

    let progress = if cli.batch {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(report.accepted.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({percent}%)")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        pb
    };

    assemble_pdf(report.accepted, &output_path, job.page_encoding, &progress)
        .context("Failed to write PDF")?;
    progress.finish_and_clear();

    println!("Done!");
    Ok(())
}
