//! Directory traversal and extension filtering

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions accepted as image candidates (compared lowercase)
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "apng", "blp", "bmp", "cur", "dcx", "dds", "dib", "eps", "fli", "flc", "fpx", "ftex", "gbr",
    "gif", "ico", "jpeg", "jp2k", "jpg", "j2k", "j2p", "jpx", "msp", "pbm", "pgm", "ppm", "pcx",
    "png", "raw", "tga", "tif", "tiff", "psd", "svg", "wmf", "xcf",
];

/// Kind of filesystem entry yielded by a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A single entry encountered while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl ScanEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Check whether a path carries one of the supported image extensions
///
/// Only the text after the final `.` is considered, case-insensitively.
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Whether a file name is hidden (leading `.`); such entries are never scanned
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn entry_kind(path: &Path) -> EntryKind {
    // Follows symlinks, so a link to a folder is a folder
    if path.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    }
}

/// Collect the entries under a directory in filesystem order
///
/// # Arguments
/// * `dir` - Directory to scan
/// * `recursive` - Whether to descend into subdirectories (depth-first)
///
/// # Returns
/// Every non-hidden file and directory entry below `dir`, excluding `dir`
/// itself. Hidden directories are not descended. Unreadable entries and
/// subdirectories are logged and skipped; only an unreadable `dir` is an error.
pub fn collect_entries(dir: &Path, recursive: bool) -> io::Result<Vec<ScanEntry>> {
    let mut entries = Vec::new();
    let read_dir = fs::read_dir(dir)?;

    if recursive {
        let walker = WalkDir::new(dir)
            .follow_links(false)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Cannot read {}: {}", path_of(&e), e);
                    continue;
                }
            };
            let path = entry.into_path();
            entries.push(ScanEntry {
                kind: entry_kind(&path),
                path,
            });
        }
    } else {
        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Cannot read entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            if is_hidden(&entry.file_name()) {
                continue;
            }
            let path = entry.path();
            entries.push(ScanEntry {
                kind: entry_kind(&path),
                path,
            });
        }
    }

    Ok(entries)
}

fn path_of(err: &walkdir::Error) -> String {
    err.path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}
