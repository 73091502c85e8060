//! Directory scanning and candidate filtering

pub mod file_scanner;

pub use file_scanner::{
    collect_entries, is_hidden, is_supported_image, EntryKind, ScanEntry, SUPPORTED_EXTENSIONS,
};
