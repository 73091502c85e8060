//! Scan a directory and build the ordered list of accepted images

use std::path::PathBuf;

use super::error::SkipReason;
use super::job::JobConfig;
use super::validator::{load_image, AcceptedImage};
use crate::scanner::file_scanner::{collect_entries, is_supported_image};

/// Outcome of a scan
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Accepted images, in scan order
    pub accepted: Vec<AcceptedImage>,
    /// Candidates that were dropped, in scan order
    pub skipped: Vec<SkipReason>,
    /// Number of image candidates examined
    pub scanned: usize,
}

impl ScanReport {
    pub fn accepted_paths(&self) -> Vec<PathBuf> {
        self.accepted.iter().map(|img| img.path.clone()).collect()
    }
}

/// Walks the input folder and collects every image that passes validation
pub struct ImageCollector<'a> {
    job: &'a JobConfig,
}

impl<'a> ImageCollector<'a> {
    pub fn new(job: &'a JobConfig) -> Self {
        Self { job }
    }

    /// Run the scan
    ///
    /// Never fails: an unreadable input folder and every per-file problem
    /// are logged and recorded in [`ScanReport::skipped`].
    pub fn collect(&self) -> ScanReport {
        let mut report = ScanReport::default();
        let entries = match collect_entries(&self.job.input_folder, self.job.recursive) {
            Ok(entries) => entries,
            Err(e) => {
                let reason = SkipReason::from_io(&self.job.input_folder, &e);
                tracing::warn!("{}", reason);
                tracing::debug!("  cause: {}", e);
                report.skipped.push(reason);
                return report;
            }
        };
        let total = entries.len();

        for (idx, entry) in entries.iter().enumerate() {
            if entry.is_dir() {
                if self.job.recursive {
                    tracing::info!("Processing path {}", entry.path.display());
                }
                continue;
            }
            if !is_supported_image(&entry.path) {
                continue;
            }

            tracing::info!("{} / {} {}", idx + 1, total, entry.path.display());
            report.scanned += 1;

            match load_image(&entry.path, self.job.keep_animations, self.job.decoder_limits) {
                Ok(image) => report.accepted.push(image),
                Err(reason) => {
                    tracing::warn!("{}", reason);
                    if let Some(detail) = reason.detail() {
                        tracing::debug!("  cause: {}", detail);
                    }
                    report.skipped.push(reason);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[test]
    fn test_collect_filters_and_orders() {
        let dir = TempDir::new().unwrap();
        RgbImage::from_pixel(5, 5, Rgb([1, 1, 1])).save(dir.path().join("one.png")).unwrap();
        RgbImage::from_pixel(6, 6, Rgb([2, 2, 2])).save(dir.path().join("two.bmp")).unwrap();
        fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        fs::write(dir.path().join("broken.png"), b"\x89PNG\r\n\x1a\nnope").unwrap();

        let job = JobConfig::new(dir.path(), "out.pdf");
        let report = ImageCollector::new(&job).collect();

        assert_eq!(report.scanned, 3);
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].path().ends_with("broken.png"));

        // Accepted order follows the listing order
        let listing: Vec<PathBuf> = collect_entries(dir.path(), false)
            .unwrap()
            .into_iter()
            .map(|e| e.path)
            .filter(|p| p.ends_with("one.png") || p.ends_with("two.bmp"))
            .collect();
        assert_eq!(report.accepted_paths(), listing);
    }

    #[test]
    fn test_collect_empty_folder() {
        let dir = TempDir::new().unwrap();
        let job = JobConfig::new(dir.path(), "out.pdf");
        let report = ImageCollector::new(&job).collect();
        assert!(report.accepted.is_empty());
        assert_eq!(report.scanned, 0);
    }

    #[test]
    fn test_missing_input_folder_is_skipped() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let job = JobConfig::new(&missing, "out.pdf");

        let report = ImageCollector::new(&job).collect();
        assert!(report.accepted.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(&report.skipped[0], SkipReason::Os { path, .. } if path == &missing));
        assert_eq!(report.skipped[0].to_string(), format!("OSError on {}", missing.display()));
    }

    #[test]
    fn test_hidden_files_never_reach_validator() {
        let dir = TempDir::new().unwrap();
        RgbImage::from_pixel(4, 4, Rgb([9, 9, 9])).save(dir.path().join(".hidden.png")).unwrap();
        fs::write(dir.path().join("._apple.jpg"), b"\x00\x05\x16\x07resource fork").unwrap();

        let job = JobConfig::new(dir.path(), "out.pdf");
        let report = ImageCollector::new(&job).collect();
        assert!(report.accepted.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(report.scanned, 0);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs<F: FnOnce()>(f: F) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_target(false)
            .with_level(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_progress_lines() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let top = dir.path().join("a.png");
        let nested = sub.join("b.png");
        RgbImage::from_pixel(3, 3, Rgb([0, 0, 0])).save(&top).unwrap();
        RgbImage::from_pixel(3, 3, Rgb([0, 0, 0])).save(&nested).unwrap();
        fs::write(dir.path().join("notes.txt"), b"skip me quietly").unwrap();

        let job = JobConfig::new(dir.path(), "out.pdf").recursive(true);
        let logs = capture_logs(|| {
            ImageCollector::new(&job).collect();
        });

        // a.png, notes.txt, sub, sub/b.png
        assert!(logs.contains(&format!("Processing path {}", sub.display())));
        assert!(logs.contains(&format!("/ 4 {}", top.display())));
        assert!(logs.contains(&format!("/ 4 {}", nested.display())));
        assert!(!logs.contains("notes.txt"));

        let flat = JobConfig::new(dir.path(), "out.pdf");
        let logs = capture_logs(|| {
            ImageCollector::new(&flat).collect();
        });
        assert!(!logs.contains("Processing path"));
        assert!(logs.contains(&format!("/ 3 {}", top.display())));
    }
}
